use actix_web::{web, HttpResponse};
use sg_core::repositories::UserRepository;

use crate::app::AppState;
use crate::dto::{ApiResponse, LoginRequest};
use crate::handlers::{validate_request, ApiError};

/// Handler for POST /auth/login
///
/// ## Errors
/// - 400 Bad Request: malformed body
/// - 401 Unauthorized: `INVALID_CREDENTIALS`, for unknown email and wrong
///   password alike
pub async fn login<U>(
    state: web::Data<AppState<U>>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
{
    validate_request(&*request)?;

    let outcome = state
        .auth_service
        .login(&request.email, &request.password)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        outcome.into_response(),
        "Login successful",
    )))
}
