//! JWT authentication middleware for protecting API endpoints.
//!
//! The middleware extracts the bearer token from the Authorization header,
//! verifies it with the core `TokenService`, applies the route's role
//! requirements from the `RoutePolicy`, and injects the verified identity
//! into the request extensions.

use actix_web::{
    body::EitherBody,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use sg_core::{
    domain::entities::user::Identity,
    errors::DomainError,
    services::{RoutePolicy, TokenService},
};
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};

use crate::handlers::ApiError;

/// Authentication context injected into guarded requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    /// Identity carried by the verified access token
    pub identity: Identity,
}

impl AuthContext {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }
}

/// JWT authentication middleware factory
#[derive(Clone)]
pub struct JwtAuth {
    token_service: Arc<TokenService>,
    policy: Arc<RoutePolicy>,
}

impl JwtAuth {
    /// Creates the middleware
    ///
    /// # Arguments
    ///
    /// * `token_service` - Verifies access tokens
    /// * `policy` - Role requirements per route; unlisted routes only need a
    ///   valid token
    pub fn new(token_service: Arc<TokenService>, policy: Arc<RoutePolicy>) -> Self {
        Self {
            token_service,
            policy,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            token_service: Arc::clone(&self.token_service),
            policy: Arc::clone(&self.policy),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    token_service: Arc<TokenService>,
    policy: Arc<RoutePolicy>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let token_service = Arc::clone(&self.token_service);
        let policy = Arc::clone(&self.policy);

        Box::pin(async move {
            let identity = match guard_request(&req, &token_service, &policy) {
                Ok(identity) => identity,
                Err(err) => return Ok(req.error_response(err).map_into_right_body()),
            };
            req.extensions_mut().insert(AuthContext::new(identity));

            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

/// Verifies the bearer token and checks the route's role requirements
fn guard_request(
    req: &ServiceRequest,
    token_service: &TokenService,
    policy: &RoutePolicy,
) -> Result<Identity, ApiError> {
    let token = extract_bearer_token(req).ok_or(ApiError::MissingToken)?;

    let identity = token_service
        .verify_access_token(&token)
        .map_err(|rejection| {
            tracing::debug!(path = %req.path(), reason = rejection.code(), "Access token rejected");
            ApiError::Domain(DomainError::TokenRejected(rejection))
        })?;

    let path = routed_path(req);
    policy
        .authorize(&identity, req.method().as_str(), path)
        .map_err(|err| {
            tracing::info!(
                user_id = %identity.user_id,
                role = %identity.role,
                method = %req.method(),
                path = %path,
                "Insufficient role"
            );
            ApiError::Domain(err)
        })?;

    Ok(identity)
}

/// Path as seen by the router
///
/// Unreserved percent-escapes are already decoded here, so `/%75sers` reads
/// `/users`. The raw `req.path()` must not be used for role lookups.
fn routed_path(req: &ServiceRequest) -> &str {
    req.match_info().as_str()
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|s| s.to_string())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .copied()
            .ok_or_else(|| ApiError::MissingToken.into());

        ready(result)
    }
}
