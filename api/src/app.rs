//! Application state and factory
//!
//! This module holds the shared application state and builds the actix-web
//! application used by both the binary and the integration tests.

use std::sync::Arc;

use actix_web::{body::MessageBody, web, App, HttpResponse};
use tracing_actix_web::TracingLogger;

use sg_core::repositories::UserRepository;
use sg_core::services::{AuthService, RoutePolicy, TokenService};
use sg_shared::{HealthResponse, Role};

use crate::handlers::{json_config, ApiError};
use crate::middleware::JwtAuth;
use crate::routes::{auth, users};

/// State shared by every handler
pub struct AppState<U: UserRepository> {
    pub auth_service: Arc<AuthService<U>>,
    pub token_service: Arc<TokenService>,
}

impl<U: UserRepository> AppState<U> {
    pub fn new(auth_service: Arc<AuthService<U>>) -> Self {
        let token_service = Arc::clone(auth_service.token_service());
        Self {
            auth_service,
            token_service,
        }
    }
}

impl<U: UserRepository> Clone for AppState<U> {
    fn clone(&self) -> Self {
        Self {
            auth_service: Arc::clone(&self.auth_service),
            token_service: Arc::clone(&self.token_service),
        }
    }
}

/// Role requirements of the guarded routes
///
/// Guarded routes not listed here only need a valid access token.
pub fn default_route_policy() -> RoutePolicy {
    RoutePolicy::new()
        .require("GET", "/users", &[Role::Admin])
        .require("GET", "/users/{id}", &[Role::Admin])
}

/// Create and configure the application with all dependencies
pub fn create_app<U>(
    app_state: web::Data<AppState<U>>,
    policy: Arc<RoutePolicy>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
{
    let jwt_auth = JwtAuth::new(Arc::clone(&app_state.token_service), policy);

    App::new()
        .app_data(app_state)
        .app_data(json_config())
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/auth")
                .route("/register", web::post().to(auth::register::<U>))
                .route("/login", web::post().to(auth::login::<U>))
                .route("/refresh", web::post().to(auth::refresh::<U>))
                .service(
                    web::resource("/me")
                        .wrap(jwt_auth.clone())
                        .route(web::get().to(auth::me::<U>)),
                ),
        )
        .service(
            web::scope("/users")
                .wrap(jwt_auth)
                .route("", web::get().to(users::list_users::<U>))
                .route("/{id}", web::get().to(users::get_user::<U>)),
        )
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: "sessiongate-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Default 404 handler
async fn not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::RouteNotFound)
}
