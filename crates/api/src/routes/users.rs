//! User management routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
};
use serde::Deserialize;
use uuid::Uuid;

use super::page_of;
use crate::{AppState, error::ApiResult, middleware::AuthUser};
use aerodesk_core::auth::Permission;
use aerodesk_db::{UserRepository, entities::users, repositories::CreateUserInput};
use aerodesk_shared::types::{PageRequest, PageResponse};

/// Creates the user routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}/password", put(set_password))
}

/// Request body for creating a user.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Role tag: `cashier`, `admin`, `accountant` or `sales_manager`.
    pub role: String,
    /// Home airport, required for cashiers.
    pub airport_id: Option<Uuid>,
}

/// Request body for an admin password reset.
#[derive(Debug, Deserialize)]
pub struct SetPasswordRequest {
    /// The new password.
    pub new_password: String,
}

/// GET /users - List users, paginated.
async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
) -> ApiResult<Json<PageResponse<users::Model>>> {
    auth.require(Permission::ManageUsers)?;
    let (rows, total) = UserRepository::new((*state.db).clone())
        .list(&page)
        .await?;
    Ok(Json(page_of(rows, &page, total)))
}

/// POST /users - Create a user.
async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<users::Model>)> {
    auth.require(Permission::ManageUsers)?;
    let user = UserRepository::new((*state.db).clone())
        .create(CreateUserInput {
            name: payload.name,
            email: payload.email,
            password: payload.password,
            role: payload.role,
            airport_id: payload.airport_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /users/{id}/password - Reset any user's password.
async fn set_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<SetPasswordRequest>,
) -> ApiResult<StatusCode> {
    auth.require(Permission::ManageUsers)?;
    UserRepository::new((*state.db).clone())
        .set_password(user_id, &payload.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
