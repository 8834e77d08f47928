//! Authentication middleware for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;
use uuid::Uuid;

use crate::{AppState, error::ApiError};
use aerodesk_core::auth::{Permission, Role};
use aerodesk_shared::{Claims, JwtError};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Authentication middleware that validates JWT tokens.
///
/// Valid claims are stored in the request extensions for [`AuthUser`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return ApiError::unauthorized(
            "MISSING_TOKEN",
            "Authorization header with Bearer token is required",
        )
        .into_response();
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(JwtError::Expired) => {
            ApiError::unauthorized("TOKEN_EXPIRED", "Token has expired").into_response()
        }
        Err(e) => {
            debug!(error = %e, "Rejected bearer token");
            ApiError::unauthorized("INVALID_TOKEN", "Invalid or malformed token").into_response()
        }
    }
}

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser {
    claims: Claims,
    role: Role,
}

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.claims.user_id()
    }

    /// Returns the caller's home airport, if any.
    #[must_use]
    pub const fn airport_id(&self) -> Option<Uuid> {
        self.claims.airport_id()
    }

    /// Returns the user's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Checks that the caller's role grants `permission`.
    ///
    /// # Errors
    ///
    /// 403 when it does not.
    pub fn require(&self, permission: Permission) -> Result<(), ApiError> {
        Ok(self.role.authorize(permission)?)
    }

    /// Checks that the caller's role grants at least one of `permissions`.
    ///
    /// # Errors
    ///
    /// 403 naming the first permission when none is granted.
    pub fn require_any(&self, permissions: &[Permission]) -> Result<(), ApiError> {
        if permissions.iter().any(|p| self.role.allows(*p)) {
            return Ok(());
        }
        match permissions.first() {
            Some(first) => self.require(*first),
            None => Ok(()),
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<Claims>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("UNAUTHORIZED", "Authentication required"))?;
        let role = claims
            .role
            .parse::<Role>()
            .map_err(|_| ApiError::unauthorized("INVALID_TOKEN", "Token carries an unknown role"))?;
        Ok(Self { claims, role })
    }
}
