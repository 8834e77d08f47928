//! Airport routes.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Deserialize;

use crate::{AppState, error::ApiResult, middleware::AuthUser};
use aerodesk_core::auth::Permission;
use aerodesk_db::{AirportRepository, entities::airports};

/// Creates the airport routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/airports", get(list_airports).post(create_airport))
}

/// Request body for creating an airport.
#[derive(Debug, Deserialize)]
pub struct CreateAirportRequest {
    /// IATA code, e.g. `KBP`.
    pub code: String,
    /// Airport name.
    pub name: String,
    /// City served.
    pub city: String,
}

/// GET /airports - List airports. Any authenticated user.
async fn list_airports(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<Vec<airports::Model>>> {
    Ok(Json(AirportRepository::new((*state.db).clone()).list().await?))
}

/// POST /airports - Create an airport.
async fn create_airport(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateAirportRequest>,
) -> ApiResult<(StatusCode, Json<airports::Model>)> {
    auth.require(Permission::ManageAirports)?;
    let airport = AirportRepository::new((*state.db).clone())
        .create(&payload.code, &payload.name, &payload.city)
        .await?;
    Ok((StatusCode::CREATED, Json(airport)))
}
