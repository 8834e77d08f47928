//! Login and password change.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{post, put},
};
use serde::Deserialize;
use tracing::{error, info};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::AuthUser,
};
use aerodesk_core::auth::Role;
use aerodesk_db::UserRepository;
use aerodesk_shared::auth::{LoginRequest, LoginResponse, UserInfo};

/// Public auth routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// Auth routes that need a valid token.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/password", put(change_password))
}

/// Request body for changing one's own password.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    /// The password in use now.
    pub current_password: String,
    /// The replacement.
    pub new_password: String,
}

/// POST /auth/login - Authenticate user and return an access token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = UserRepository::new((*state.db).clone())
        .authenticate(&payload.email, &payload.password)
        .await
        .inspect_err(|_| info!(email = %payload.email, "Failed login attempt"))?;

    let role = Role::from(user.role);
    let access_token = state
        .jwt_service
        .generate_access_token(user.id, role.as_str(), user.airport_id)
        .map_err(|e| {
            error!(error = %e, "Failed to generate access token");
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An error occurred during login",
            )
        })?;

    info!(user_id = %user.id, role = %role, "User logged in");

    Ok(Json(LoginResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.jwt_service.access_token_expires_in(),
        user: UserInfo {
            id: user.id,
            name: user.name,
            email: user.email,
            role: role.to_string(),
            airport_id: user.airport_id,
        },
    }))
}

/// PUT /auth/password - Change the caller's own password.
async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<StatusCode> {
    UserRepository::new((*state.db).clone())
        .change_own_password(
            auth.user_id(),
            &payload.current_password,
            &payload.new_password,
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
