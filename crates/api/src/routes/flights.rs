//! Flight and fare catalog routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::ApiResult, middleware::AuthUser};
use aerodesk_core::auth::Permission;
use aerodesk_db::{
    FlightRepository,
    entities::{flight_fares, flights},
    repositories::{CreateFareInput, CreateFlightInput},
};

/// Creates the flight routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/flights", get(list_flights).post(create_flight))
        .route("/flights/{id}", get(get_flight))
        .route("/flights/{id}/fares", get(list_fares).post(create_fare))
}

/// Request body for scheduling a flight.
#[derive(Debug, Deserialize)]
pub struct CreateFlightRequest {
    /// Flight number, e.g. `PS101`.
    pub flight_number: String,
    /// Origin IATA code.
    pub origin: String,
    /// Destination IATA code.
    pub destination: String,
    /// Scheduled departure.
    pub departure_time: DateTime<Utc>,
    /// Scheduled arrival.
    pub arrival_time: DateTime<Utc>,
    /// Seats on the aircraft.
    pub seat_capacity: i32,
}

/// Request body for adding a fare.
#[derive(Debug, Deserialize)]
pub struct CreateFareRequest {
    /// Fare class name, unique per flight.
    pub name: String,
    /// Price in `base_currency`.
    pub base_price: Decimal,
    /// ISO currency code of the price.
    pub base_currency: String,
    /// Seats the fare may sell.
    pub seat_limit: i32,
}

/// GET /flights - Upcoming flights, soonest first.
async fn list_flights(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<flights::Model>>> {
    auth.require(Permission::ViewCatalog)?;
    Ok(Json(
        FlightRepository::new((*state.db).clone())
            .list_upcoming(Utc::now())
            .await?,
    ))
}

/// POST /flights - Schedule a flight.
async fn create_flight(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateFlightRequest>,
) -> ApiResult<(StatusCode, Json<flights::Model>)> {
    auth.require(Permission::ManageCatalog)?;
    let flight = FlightRepository::new((*state.db).clone())
        .create(CreateFlightInput {
            flight_number: payload.flight_number,
            origin: payload.origin,
            destination: payload.destination,
            departure_time: payload.departure_time,
            arrival_time: payload.arrival_time,
            seat_capacity: payload.seat_capacity,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(flight)))
}

/// GET /flights/{id} - One flight.
async fn get_flight(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(flight_id): Path<Uuid>,
) -> ApiResult<Json<flights::Model>> {
    auth.require(Permission::ViewCatalog)?;
    Ok(Json(
        FlightRepository::new((*state.db).clone())
            .get(flight_id)
            .await?,
    ))
}

/// GET /flights/{id}/fares - A flight's fares.
async fn list_fares(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(flight_id): Path<Uuid>,
) -> ApiResult<Json<Vec<flight_fares::Model>>> {
    auth.require(Permission::ViewCatalog)?;
    Ok(Json(
        FlightRepository::new((*state.db).clone())
            .list_fares(flight_id)
            .await?,
    ))
}

/// POST /flights/{id}/fares - Add a fare to a flight.
async fn create_fare(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(flight_id): Path<Uuid>,
    Json(payload): Json<CreateFareRequest>,
) -> ApiResult<(StatusCode, Json<flight_fares::Model>)> {
    auth.require(Permission::ManageCatalog)?;
    let base_currency = state.currencies.parse(&payload.base_currency)?;
    let fare = FlightRepository::new((*state.db).clone())
        .create_fare(
            flight_id,
            CreateFareInput {
                name: payload.name,
                base_price: payload.base_price,
                base_currency,
                seat_limit: payload.seat_limit,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(fare)))
}
