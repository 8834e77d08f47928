//! Shift routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use uuid::Uuid;

use super::page_of;
use crate::{AppState, error::ApiResult, middleware::AuthUser};
use aerodesk_core::auth::{Permission, Role};
use aerodesk_db::{
    ShiftRepository,
    entities::{sea_orm_active_enums::ShiftStatus, shifts},
    repositories::ShiftFilter,
};
use aerodesk_shared::types::{PageRequest, PageResponse};

/// Creates the shift routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shifts", get(list_shifts))
        .route("/shifts/open", post(open_shift))
        .route("/shifts/close", post(close_shift))
        .route("/shifts/current", get(current_shift))
        .route("/shifts/{id}/reopen", post(reopen_shift))
}

/// Request body for opening a shift.
#[derive(Debug, Deserialize)]
pub struct OpenShiftRequest {
    /// Desk to work at.
    pub cash_desk_id: Uuid,
}

/// Query parameters for listing shifts.
#[derive(Debug, Deserialize)]
pub struct ListShiftsQuery {
    /// Only this cashier's shifts. Ignored for cashiers, who see their own.
    pub cashier_id: Option<Uuid>,
    /// Only shifts on this desk.
    pub cash_desk_id: Option<Uuid>,
    /// `open` or `closed`.
    pub status: Option<ShiftStatus>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// POST /shifts/open - Open a shift for the calling cashier.
async fn open_shift(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<OpenShiftRequest>,
) -> ApiResult<(StatusCode, Json<shifts::Model>)> {
    auth.require(Permission::OperateShift)?;
    let shift = ShiftRepository::new((*state.db).clone())
        .open(auth.user_id(), payload.cash_desk_id)
        .await?;
    Ok((StatusCode::CREATED, Json(shift)))
}

/// POST /shifts/close - Close the calling cashier's open shift.
async fn close_shift(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<shifts::Model>> {
    auth.require(Permission::OperateShift)?;
    let shift = ShiftRepository::new((*state.db).clone())
        .close(auth.user_id())
        .await?;
    Ok(Json(shift))
}

/// GET /shifts/current - The calling cashier's open shift, or `null`.
async fn current_shift(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Option<shifts::Model>>> {
    auth.require(Permission::OperateShift)?;
    let shift = ShiftRepository::new((*state.db).clone())
        .current(auth.user_id())
        .await?;
    Ok(Json(shift))
}

/// GET /shifts - List shifts, newest first.
async fn list_shifts(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListShiftsQuery>,
) -> ApiResult<Json<PageResponse<shifts::Model>>> {
    let cashier_id = if auth.role() == Role::Cashier {
        Some(auth.user_id())
    } else {
        auth.require_any(&[Permission::ViewLedger, Permission::ReopenShift])?;
        query.cashier_id
    };

    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };
    let filter = ShiftFilter {
        cashier_id,
        cash_desk_id: query.cash_desk_id,
        status: query.status,
    };

    let (rows, total) = ShiftRepository::new((*state.db).clone())
        .list(&filter, &page)
        .await?;
    Ok(Json(page_of(rows, &page, total)))
}

/// POST /shifts/{id}/reopen - Reopen a closed shift.
async fn reopen_shift(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(shift_id): Path<Uuid>,
) -> ApiResult<Json<shifts::Model>> {
    auth.require(Permission::ReopenShift)?;
    let shift = ShiftRepository::new((*state.db).clone())
        .reopen(auth.user_id(), shift_id)
        .await?;
    Ok(Json(shift))
}
