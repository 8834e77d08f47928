//! Airport repository.

use aerodesk_core::directory::{DirectoryError, DirectoryService};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::airports;
use crate::error::{StoreResult, unique_violation};

/// Airport repository.
#[derive(Debug, Clone)]
pub struct AirportRepository {
    db: DatabaseConnection,
}

impl AirportRepository {
    /// Creates a new airport repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an airport identified by its IATA code.
    ///
    /// # Errors
    ///
    /// `InvalidAirportCode`, `InvalidName` or `DuplicateAirportCode`.
    pub async fn create(&self, code: &str, name: &str, city: &str) -> StoreResult<airports::Model> {
        let code = DirectoryService::normalize_airport_code(code)?;
        let name = DirectoryService::normalize_name("name", name)?;
        let city = DirectoryService::normalize_name("city", city)?;

        let txn = self.db.begin().await?;
        let exists = airports::Entity::find()
            .filter(airports::Column::Code.eq(&code))
            .count(&txn)
            .await?;
        if exists > 0 {
            return Err(DirectoryError::DuplicateAirportCode(code).into());
        }

        let airport = airports::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code.clone()),
            name: Set(name),
            city: Set(city),
            created_at: Set(chrono::Utc::now().into()),
        };
        let airport = match airport.insert(&txn).await {
            Ok(airport) => airport,
            Err(e) if unique_violation(&e).is_some() => {
                return Err(DirectoryError::DuplicateAirportCode(code).into());
            }
            Err(e) => return Err(e.into()),
        };
        txn.commit().await?;

        info!(airport_id = %airport.id, code = %airport.code, "Airport created");
        Ok(airport)
    }

    /// Lists airports ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> StoreResult<Vec<airports::Model>> {
        Ok(airports::Entity::find()
            .order_by_asc(airports::Column::Code)
            .all(&self.db)
            .await?)
    }

    /// Gets an airport by ID.
    ///
    /// # Errors
    ///
    /// `AirportNotFound`.
    pub async fn get(&self, id: Uuid) -> StoreResult<airports::Model> {
        airports::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DirectoryError::AirportNotFound(id).into())
    }
}
