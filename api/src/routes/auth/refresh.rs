use actix_web::{web, HttpResponse};
use sg_core::repositories::UserRepository;

use crate::app::AppState;
use crate::dto::{ApiResponse, RefreshTokenRequest, RefreshTokenResponse};
use crate::handlers::{validate_request, ApiError};

/// Handler for POST /auth/refresh
///
/// Exchanges a refresh token for a new token pair. The new access token
/// carries the user's current role.
///
/// # Request Body
///
/// ```json
/// { "refreshToken": "eyJ..." }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: `REFRESH_FAILED` for an expired, tampered or
///   malformed refresh token, or a user that no longer exists
pub async fn refresh<U>(
    state: web::Data<AppState<U>>,
    request: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
{
    validate_request(&*request)?;

    let tokens = state.auth_service.refresh(&request.refresh_token).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        RefreshTokenResponse::from(tokens),
        "Token refreshed successfully",
    )))
}
