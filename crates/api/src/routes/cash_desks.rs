//! Cash desk and cash desk account routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::AuthUser,
};
use aerodesk_core::auth::{Permission, Role};
use aerodesk_db::{
    CashDeskRepository, LedgerRepository,
    entities::{cash_desk_accounts, cash_desks},
    repositories::UpdateCashDeskInput,
};

/// Creates the cash desk routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cash-desks", get(list_cash_desks).post(create_cash_desk))
        .route("/cash-desks/available", get(available_cash_desks))
        .route("/cash-desks/{id}", patch(update_cash_desk))
        .route(
            "/cash-desks/{id}/accounts",
            get(list_accounts).post(create_account),
        )
}

/// Airport filter for desk listings.
#[derive(Debug, Deserialize)]
pub struct AirportQuery {
    /// Only desks at this airport.
    pub airport_id: Option<Uuid>,
}

/// Request body for creating a cash desk.
#[derive(Debug, Deserialize)]
pub struct CreateCashDeskRequest {
    /// Airport the desk belongs to.
    pub airport_id: Uuid,
    /// Desk name, unique across airports.
    pub name: String,
}

/// Request body for updating a cash desk.
#[derive(Debug, Deserialize)]
pub struct UpdateCashDeskRequest {
    /// New name.
    pub name: Option<String>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Request body for opening a currency account on a desk.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// ISO currency code.
    pub currency: String,
}

/// Cashiers only ever see desks at their home airport.
fn scoped_airport(auth: &AuthUser, requested: Option<Uuid>) -> Option<Uuid> {
    if auth.role() == Role::Cashier {
        auth.airport_id()
    } else {
        requested
    }
}

/// GET /cash-desks - List desks, optionally for one airport.
async fn list_cash_desks(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<AirportQuery>,
) -> ApiResult<Json<Vec<cash_desks::Model>>> {
    let airport_id = scoped_airport(&auth, query.airport_id);
    Ok(Json(
        CashDeskRepository::new((*state.db).clone())
            .list(airport_id)
            .await?,
    ))
}

/// GET /cash-desks/available - Active desks of an airport with no open shift.
async fn available_cash_desks(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<AirportQuery>,
) -> ApiResult<Json<Vec<cash_desks::Model>>> {
    let airport_id = scoped_airport(&auth, query.airport_id)
        .ok_or_else(|| ApiError::bad_request("airport_id is required"))?;
    Ok(Json(
        CashDeskRepository::new((*state.db).clone())
            .available(airport_id)
            .await?,
    ))
}

/// POST /cash-desks - Create a desk.
async fn create_cash_desk(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateCashDeskRequest>,
) -> ApiResult<(StatusCode, Json<cash_desks::Model>)> {
    auth.require(Permission::ManageCashDesks)?;
    let desk = CashDeskRepository::new((*state.db).clone())
        .create(payload.airport_id, &payload.name)
        .await?;
    Ok((StatusCode::CREATED, Json(desk)))
}

/// PATCH /cash-desks/{id} - Rename or (de)activate a desk.
async fn update_cash_desk(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCashDeskRequest>,
) -> ApiResult<Json<cash_desks::Model>> {
    auth.require(Permission::ManageCashDesks)?;
    let desk = CashDeskRepository::new((*state.db).clone())
        .update(
            id,
            UpdateCashDeskInput {
                name: payload.name,
                is_active: payload.is_active,
            },
        )
        .await?;
    Ok(Json(desk))
}

/// GET /cash-desks/{id}/accounts - A desk's currency accounts.
async fn list_accounts(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<cash_desk_accounts::Model>>> {
    auth.require_any(&[Permission::ViewLedger, Permission::MoveCash])?;
    Ok(Json(
        LedgerRepository::new((*state.db).clone())
            .list_accounts(id)
            .await?,
    ))
}

/// POST /cash-desks/{id}/accounts - Open (or fetch) the desk's account in a currency.
async fn create_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateAccountRequest>,
) -> ApiResult<(StatusCode, Json<cash_desk_accounts::Model>)> {
    auth.require(Permission::ManageCashDesks)?;
    let currency = state.currencies.parse(&payload.currency)?;
    let account = LedgerRepository::new((*state.db).clone())
        .get_or_create_account(id, currency, &state.currencies)
        .await?;
    Ok((StatusCode::CREATED, Json(account)))
}
