//! Exchange rate repository.
//!
//! Rates are append-only. The rate in force at an instant is the row with the
//! latest `valid_at` at or before it.

use aerodesk_core::currency::{CurrencyError, ExchangeRate};
use aerodesk_shared::types::Currency;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::{exchange_rates, sea_orm_active_enums::CurrencyCode};
use crate::error::StoreResult;

/// Exchange rate repository.
#[derive(Debug, Clone)]
pub struct ExchangeRateRepository {
    db: DatabaseConnection,
}

impl ExchangeRateRepository {
    /// Creates a new exchange rate repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a validated rate.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn record(
        &self,
        rate: ExchangeRate,
        created_by: Option<Uuid>,
    ) -> StoreResult<exchange_rates::Model> {
        let row = exchange_rates::ActiveModel {
            id: Set(Uuid::new_v4()),
            base_currency: Set(rate.base.into()),
            target_currency: Set(rate.target.into()),
            rate: Set(rate.rate),
            valid_at: Set(rate.valid_at.into()),
            created_by: Set(created_by),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await?;

        info!(
            base = %rate.base,
            target = %rate.target,
            rate = %rate.rate,
            valid_at = %rate.valid_at,
            "Exchange rate recorded"
        );
        Ok(row)
    }

    /// Lists rates, newest first, optionally for one base and/or target.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        base: Option<Currency>,
        target: Option<Currency>,
    ) -> StoreResult<Vec<exchange_rates::Model>> {
        let mut query = exchange_rates::Entity::find();
        if let Some(base) = base {
            query = query.filter(exchange_rates::Column::BaseCurrency.eq(CurrencyCode::from(base)));
        }
        if let Some(target) = target {
            query =
                query.filter(exchange_rates::Column::TargetCurrency.eq(CurrencyCode::from(target)));
        }
        Ok(query
            .order_by_desc(exchange_rates::Column::ValidAt)
            .all(&self.db)
            .await?)
    }

    /// Returns the rate in force for `base -> target` at `at`.
    ///
    /// # Errors
    ///
    /// `RateNotFound` when no rate is valid yet.
    pub async fn latest(
        &self,
        base: Currency,
        target: Currency,
        at: DateTime<Utc>,
    ) -> StoreResult<exchange_rates::Model> {
        Self::latest_in(&self.db, base, target, at)
            .await?
            .ok_or_else(|| CurrencyError::RateNotFound { base, target }.into())
    }

    /// Finds the rate in force on `conn`.
    pub(crate) async fn latest_in<C: ConnectionTrait>(
        conn: &C,
        base: Currency,
        target: Currency,
        at: DateTime<Utc>,
    ) -> Result<Option<exchange_rates::Model>, DbErr> {
        let at: sea_orm::prelude::DateTimeWithTimeZone = at.into();
        exchange_rates::Entity::find()
            .filter(exchange_rates::Column::BaseCurrency.eq(CurrencyCode::from(base)))
            .filter(exchange_rates::Column::TargetCurrency.eq(CurrencyCode::from(target)))
            .filter(exchange_rates::Column::ValidAt.lte(at))
            .order_by_desc(exchange_rates::Column::ValidAt)
            .order_by_desc(exchange_rates::Column::CreatedAt)
            .one(conn)
            .await
    }

    /// Rate value in force, for pricing.
    pub(crate) async fn latest_value_in<C: ConnectionTrait>(
        conn: &C,
        base: Currency,
        target: Currency,
        at: DateTime<Utc>,
    ) -> Result<Option<Decimal>, DbErr> {
        Ok(Self::latest_in(conn, base, target, at).await?.map(|r| r.rate))
    }
}
