use actix_web::{web, HttpResponse};
use sg_core::repositories::UserRepository;

use crate::app::AppState;
use crate::dto::{ApiResponse, UserDto};
use crate::handlers::ApiError;
use crate::middleware::AuthContext;

/// Handler for GET /auth/me
///
/// Returns the stored record of the token's user. The role in the response
/// is the stored one, which may differ from the role in the token.
pub async fn me<U>(
    state: web::Data<AppState<U>>,
    auth: AuthContext,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
{
    let user = state.auth_service.me(&auth.identity).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        UserDto::from(user),
        "User retrieved successfully",
    )))
}
