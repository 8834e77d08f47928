//! Cash desk account routes: balances, history and cash movements.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::page_of;
use crate::{AppState, error::ApiResult, middleware::AuthUser};
use aerodesk_core::auth::Permission;
use aerodesk_db::{
    LedgerRepository,
    entities::{sea_orm_active_enums::CurrencyCode, transactions},
};
use aerodesk_shared::types::{PageRequest, PageResponse};

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts/{id}/balance", get(get_balance))
        .route("/accounts/{id}/transactions", get(list_transactions))
        .route("/accounts/{id}/deposits", post(deposit))
        .route("/accounts/{id}/withdrawals", post(withdraw))
}

/// Query parameters for a balance lookup.
#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    /// Point in time; defaults to now.
    pub as_of: Option<DateTime<Utc>>,
}

/// Balance of an account at a point in time.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// The account.
    pub account_id: Uuid,
    /// Account currency.
    pub currency: CurrencyCode,
    /// Sum of postings up to `as_of`.
    pub balance: Decimal,
    /// The point in time.
    pub as_of: DateTime<Utc>,
}

/// Request body for a deposit or withdrawal.
#[derive(Debug, Deserialize)]
pub struct CashMovementRequest {
    /// Positive amount with at most two decimals.
    pub amount: Decimal,
    /// Free-text note.
    pub description: Option<String>,
}

/// GET /accounts/{id}/balance - Balance as of a timestamp.
async fn get_balance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(account_id): Path<Uuid>,
    Query(query): Query<BalanceQuery>,
) -> ApiResult<Json<BalanceResponse>> {
    auth.require_any(&[Permission::ViewLedger, Permission::MoveCash])?;
    let repo = LedgerRepository::new((*state.db).clone());
    let account = repo.get_account(account_id).await?;
    let as_of = query.as_of.unwrap_or_else(Utc::now);
    let balance = repo.balance_as_of(account_id, as_of).await?;

    Ok(Json(BalanceResponse {
        account_id,
        currency: account.currency,
        balance,
        as_of,
    }))
}

/// GET /accounts/{id}/transactions - Ledger history, newest first.
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(account_id): Path<Uuid>,
    Query(page): Query<PageRequest>,
) -> ApiResult<Json<PageResponse<transactions::Model>>> {
    auth.require_any(&[Permission::ViewLedger, Permission::MoveCash])?;
    let (rows, total) = LedgerRepository::new((*state.db).clone())
        .list_transactions(account_id, &page)
        .await?;
    Ok(Json(page_of(rows, &page, total)))
}

/// POST /accounts/{id}/deposits - Put cash into the desk.
async fn deposit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(account_id): Path<Uuid>,
    Json(payload): Json<CashMovementRequest>,
) -> ApiResult<(StatusCode, Json<transactions::Model>)> {
    auth.require(Permission::MoveCash)?;
    let posted = LedgerRepository::new((*state.db).clone())
        .deposit(
            auth.user_id(),
            account_id,
            payload.amount,
            payload.description,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(posted)))
}

/// POST /accounts/{id}/withdrawals - Take cash out of the desk.
async fn withdraw(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(account_id): Path<Uuid>,
    Json(payload): Json<CashMovementRequest>,
) -> ApiResult<(StatusCode, Json<transactions::Model>)> {
    auth.require(Permission::MoveCash)?;
    let posted = LedgerRepository::new((*state.db).clone())
        .withdraw(
            auth.user_id(),
            account_id,
            payload.amount,
            payload.description,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(posted)))
}
