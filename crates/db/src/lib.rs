//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//!
//! Every repository operation that reads and then writes runs inside a single
//! database transaction; rows whose state decides the outcome are read with
//! `SELECT ... FOR UPDATE`.

pub mod entities;
pub mod error;
pub mod migration;
pub mod repositories;

pub use error::{StoreError, StoreResult};
pub use repositories::{
    AirportRepository, CashDeskRepository, ExchangeRateRepository, FlightRepository,
    LedgerRepository, ShiftRepository, TicketRepository, UserRepository,
};

use std::time::Duration;

use aerodesk_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::info;

/// Establishes a connection pool to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(config.sqlx_logging);

    let db = Database::connect(options).await?;
    info!(
        max_connections = config.max_connections,
        "Database connection established"
    );
    Ok(db)
}
