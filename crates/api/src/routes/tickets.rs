//! Ticket sale and refund routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::AuthUser,
};
use aerodesk_core::{
    auth::{Permission, Role},
    sales::SalesService,
    shift::ShiftError,
};
use aerodesk_db::{
    ShiftRepository, TicketRepository, entities::tickets, repositories::SellTicketInput,
};

/// Creates the ticket routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tickets", get(list_tickets).post(sell_ticket))
        .route("/tickets/{id}", get(get_ticket))
        .route("/tickets/{id}/refund", post(refund_ticket))
}

/// Request body for selling a ticket.
#[derive(Debug, Deserialize)]
pub struct SellTicketRequest {
    /// Flight.
    pub flight_id: Uuid,
    /// Fare of that flight.
    pub fare_id: Uuid,
    /// Passenger full name.
    pub passenger_name: String,
    /// Seat, e.g. `12A`.
    pub seat_number: String,
    /// ISO code of the currency the passenger pays in.
    pub currency: String,
}

/// Query parameters for listing tickets.
#[derive(Debug, Deserialize)]
pub struct ListTicketsQuery {
    /// Shift the tickets were sold on; cashiers default to their open shift.
    pub shift_id: Option<Uuid>,
}

/// The caller's open shift, required for selling.
async fn open_shift_of(state: &AppState, auth: &AuthUser) -> ApiResult<Uuid> {
    let shift = ShiftRepository::new((*state.db).clone())
        .current(auth.user_id())
        .await?
        .ok_or(ShiftError::NoOpenShift(auth.user_id()))?;
    Ok(shift.id)
}

/// POST /tickets - Sell a ticket on the calling cashier's open shift.
async fn sell_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<SellTicketRequest>,
) -> ApiResult<(StatusCode, Json<tickets::Model>)> {
    auth.require(Permission::SellTickets)?;
    let currency = state.currencies.parse(&payload.currency)?;
    let shift_id = open_shift_of(&state, &auth).await?;

    let ticket = TicketRepository::new((*state.db).clone())
        .sell(SellTicketInput {
            shift_id,
            flight_id: payload.flight_id,
            fare_id: payload.fare_id,
            passenger_name: payload.passenger_name,
            seat_number: payload.seat_number,
            currency,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// GET /tickets - Tickets sold on a shift.
async fn list_tickets(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListTicketsQuery>,
) -> ApiResult<Json<Vec<tickets::Model>>> {
    let shift_id = if auth.role() == Role::Cashier {
        match query.shift_id {
            Some(shift_id) => {
                let shift = ShiftRepository::new((*state.db).clone())
                    .get(shift_id)
                    .await?;
                if shift.cashier_id != auth.user_id() {
                    return Err(ApiError::new(
                        StatusCode::FORBIDDEN,
                        "FORBIDDEN",
                        "Shift belongs to another cashier",
                    ));
                }
                shift_id
            }
            None => open_shift_of(&state, &auth).await?,
        }
    } else {
        auth.require(Permission::ViewLedger)?;
        query
            .shift_id
            .ok_or_else(|| ApiError::bad_request("shift_id is required"))?
    };

    Ok(Json(
        TicketRepository::new((*state.db).clone())
            .list_for_shift(shift_id)
            .await?,
    ))
}

/// GET /tickets/{id} - One ticket; cashiers only see their own shifts' tickets.
async fn get_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(ticket_id): Path<Uuid>,
) -> ApiResult<Json<tickets::Model>> {
    auth.require_any(&[Permission::SellTickets, Permission::ViewLedger])?;
    let ticket = TicketRepository::new((*state.db).clone())
        .get(ticket_id)
        .await?;
    if auth.role() == Role::Cashier {
        let shift = ShiftRepository::new((*state.db).clone())
            .get(ticket.shift_id)
            .await?;
        SalesService::check_owner(ticket.id, shift.cashier_id, auth.user_id())?;
    }
    Ok(Json(ticket))
}

/// POST /tickets/{id}/refund - Refund a sold ticket.
async fn refund_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(ticket_id): Path<Uuid>,
) -> ApiResult<Json<tickets::Model>> {
    auth.require(Permission::RefundTickets)?;
    let ticket = TicketRepository::new((*state.db).clone())
        .refund(ticket_id, auth.user_id())
        .await?;
    Ok(Json(ticket))
}
