use actix_web::{web, HttpResponse};
use sg_core::repositories::UserRepository;

use crate::app::AppState;
use crate::dto::{ApiResponse, AuthResponse, RegisterRequest};
use crate::handlers::{validate_request, ApiError};

/// Handler for POST /auth/register
///
/// Creates a `USER` account and logs it in.
///
/// # Request Body
///
/// ```json
/// { "email": "a@x.com", "password": "correct" }
/// ```
///
/// # Response
///
/// ## Success (201 Created)
/// ```json
/// {
///     "data": { "accessToken": "eyJ...", "refreshToken": "eyJ...", "user": { ... } },
///     "message": "User registered successfully"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: invalid email or password length
/// - 409 Conflict: email already registered
pub async fn register<U>(
    state: web::Data<AppState<U>>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
{
    validate_request(&*request)?;

    let outcome = state
        .auth_service
        .register(&request.email, &request.password)
        .await?;

    let body: AuthResponse = outcome.into_response();
    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        body,
        "User registered successfully",
    )))
}
