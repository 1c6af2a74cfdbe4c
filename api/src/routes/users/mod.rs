//! User route handlers, `ADMIN` only through the route policy

use actix_web::{web, HttpResponse};
use sg_core::errors::DomainError;
use sg_core::repositories::UserRepository;
use uuid::Uuid;

use crate::app::AppState;
use crate::dto::{ApiResponse, UserDto};
use crate::handlers::ApiError;

/// Handler for GET /users
pub async fn list_users<U>(state: web::Data<AppState<U>>) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
{
    let users: Vec<UserDto> = state
        .auth_service
        .list_users()
        .await?
        .into_iter()
        .map(UserDto::from)
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        users,
        "Users retrieved successfully",
    )))
}

/// Handler for GET /users/{id}
///
/// An id that is not a UUID cannot name a user, so it is a 404 like any
/// other unknown id.
pub async fn get_user<U>(
    state: web::Data<AppState<U>>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
{
    let id = Uuid::parse_str(&path).map_err(|_| {
        ApiError::Domain(DomainError::NotFound {
            resource: format!("user {}", path.as_str()),
        })
    })?;

    let user = state.auth_service.get_user(id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        UserDto::from(user),
        "User retrieved successfully",
    )))
}
