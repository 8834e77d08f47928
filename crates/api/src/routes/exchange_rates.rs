//! Exchange rate routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{AppState, error::ApiResult, middleware::AuthUser};
use aerodesk_core::{auth::Permission, currency::ExchangeRate};
use aerodesk_db::{ExchangeRateRepository, entities::exchange_rates};
use aerodesk_shared::types::Currency;

/// Creates the exchange rate routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/exchange-rates", get(list_rates).post(record_rate))
        .route("/exchange-rates/latest", get(latest_rate))
}

/// Optional currency pair filter.
#[derive(Debug, Deserialize)]
pub struct ListRatesQuery {
    /// Base currency code.
    pub base: Option<String>,
    /// Target currency code.
    pub target: Option<String>,
}

/// Query parameters for the rate in force.
#[derive(Debug, Deserialize)]
pub struct LatestRateQuery {
    /// Base currency code.
    pub base: String,
    /// Target currency code.
    pub target: String,
    /// Point in time; defaults to now.
    pub at: Option<DateTime<Utc>>,
}

/// Request body for recording a rate.
#[derive(Debug, Deserialize)]
pub struct RecordRateRequest {
    /// Base currency code.
    pub base_currency: String,
    /// Target currency code.
    pub target_currency: String,
    /// Units of target per unit of base.
    pub rate: Decimal,
    /// When the rate takes effect; defaults to now.
    pub valid_at: Option<DateTime<Utc>>,
}

fn parse_optional(state: &AppState, code: Option<&str>) -> ApiResult<Option<Currency>> {
    Ok(code.map(|c| state.currencies.parse(c)).transpose()?)
}

/// GET /exchange-rates - Recorded rates, newest first.
async fn list_rates(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListRatesQuery>,
) -> ApiResult<Json<Vec<exchange_rates::Model>>> {
    let base = parse_optional(&state, query.base.as_deref())?;
    let target = parse_optional(&state, query.target.as_deref())?;
    Ok(Json(
        ExchangeRateRepository::new((*state.db).clone())
            .list(base, target)
            .await?,
    ))
}

/// GET /exchange-rates/latest - The rate in force for a pair.
async fn latest_rate(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<LatestRateQuery>,
) -> ApiResult<Json<exchange_rates::Model>> {
    let base = state.currencies.parse(&query.base)?;
    let target = state.currencies.parse(&query.target)?;
    let at = query.at.unwrap_or_else(Utc::now);
    Ok(Json(
        ExchangeRateRepository::new((*state.db).clone())
            .latest(base, target, at)
            .await?,
    ))
}

/// POST /exchange-rates - Record a new rate.
async fn record_rate(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<RecordRateRequest>,
) -> ApiResult<(StatusCode, Json<exchange_rates::Model>)> {
    auth.require(Permission::ManageExchangeRates)?;
    let base = state.currencies.parse(&payload.base_currency)?;
    let target = state.currencies.parse(&payload.target_currency)?;
    let rate = ExchangeRate::new(
        base,
        target,
        payload.rate,
        payload.valid_at.unwrap_or_else(Utc::now),
    )?;

    let row = ExchangeRateRepository::new((*state.db).clone())
        .record(rate, Some(auth.user_id()))
        .await?;
    Ok((StatusCode::CREATED, Json(row)))
}
