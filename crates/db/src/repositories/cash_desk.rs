//! Cash desk repository.

use aerodesk_core::directory::{DirectoryError, DirectoryService};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::Query,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::{airports, cash_desks, sea_orm_active_enums::ShiftStatus, shifts};
use crate::error::{StoreResult, unique_violation};

/// Changes applied by [`CashDeskRepository::update`].
#[derive(Debug, Clone, Default)]
pub struct UpdateCashDeskInput {
    /// New name.
    pub name: Option<String>,
    /// Activate or deactivate the desk.
    pub is_active: Option<bool>,
}

/// Cash desk repository.
#[derive(Debug, Clone)]
pub struct CashDeskRepository {
    db: DatabaseConnection,
}

impl CashDeskRepository {
    /// Creates a new cash desk repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an active cash desk at an airport.
    ///
    /// # Errors
    ///
    /// `AirportNotFound`, `InvalidName` or `DuplicateCashDeskName`.
    pub async fn create(&self, airport_id: Uuid, name: &str) -> StoreResult<cash_desks::Model> {
        let name = DirectoryService::normalize_name("name", name)?;

        let txn = self.db.begin().await?;
        if airports::Entity::find_by_id(airport_id).one(&txn).await?.is_none() {
            return Err(DirectoryError::AirportNotFound(airport_id).into());
        }
        Self::ensure_name_free(&txn, &name).await?;

        let desk = cash_desks::ActiveModel {
            id: Set(Uuid::new_v4()),
            airport_id: Set(airport_id),
            name: Set(name.clone()),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now().into()),
        };
        let desk = match desk.insert(&txn).await {
            Ok(desk) => desk,
            Err(e) if unique_violation(&e).is_some() => {
                return Err(DirectoryError::DuplicateCashDeskName(name).into());
            }
            Err(e) => return Err(e.into()),
        };
        txn.commit().await?;

        info!(cash_desk_id = %desk.id, airport_id = %airport_id, "Cash desk created");
        Ok(desk)
    }

    /// Renames and/or (de)activates a desk.
    ///
    /// Deactivating a desk does not close a shift already open on it.
    ///
    /// # Errors
    ///
    /// `CashDeskNotFound`, `InvalidName` or `DuplicateCashDeskName`.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateCashDeskInput,
    ) -> StoreResult<cash_desks::Model> {
        let txn = self.db.begin().await?;
        let desk = cash_desks::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(DirectoryError::CashDeskNotFound(id))?;

        let mut active: cash_desks::ActiveModel = desk.clone().into();
        if let Some(name) = input.name {
            let name = DirectoryService::normalize_name("name", &name)?;
            if name != desk.name {
                Self::ensure_name_free(&txn, &name).await?;
                active.name = Set(name);
            }
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        let desk = active.update(&txn).await?;
        txn.commit().await?;

        info!(cash_desk_id = %desk.id, is_active = desk.is_active, "Cash desk updated");
        Ok(desk)
    }

    /// Lists desks, optionally for one airport.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, airport_id: Option<Uuid>) -> StoreResult<Vec<cash_desks::Model>> {
        let mut query = cash_desks::Entity::find().order_by_asc(cash_desks::Column::Name);
        if let Some(airport_id) = airport_id {
            query = query.filter(cash_desks::Column::AirportId.eq(airport_id));
        }
        Ok(query.all(&self.db).await?)
    }

    /// Gets a desk by ID.
    ///
    /// # Errors
    ///
    /// `CashDeskNotFound`.
    pub async fn get(&self, id: Uuid) -> StoreResult<cash_desks::Model> {
        cash_desks::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DirectoryError::CashDeskNotFound(id).into())
    }

    /// Active desks of an airport with no open shift.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn available(&self, airport_id: Uuid) -> StoreResult<Vec<cash_desks::Model>> {
        let busy = Query::select()
            .column(shifts::Column::CashDeskId)
            .from(shifts::Entity)
            .and_where(shifts::Column::Status.eq(ShiftStatus::Open))
            .to_owned();

        Ok(cash_desks::Entity::find()
            .filter(cash_desks::Column::AirportId.eq(airport_id))
            .filter(cash_desks::Column::IsActive.eq(true))
            .filter(cash_desks::Column::Id.not_in_subquery(busy))
            .order_by_asc(cash_desks::Column::Name)
            .all(&self.db)
            .await?)
    }

    async fn ensure_name_free<C: sea_orm::ConnectionTrait>(conn: &C, name: &str) -> StoreResult<()> {
        let taken = cash_desks::Entity::find()
            .filter(cash_desks::Column::Name.eq(name))
            .count(conn)
            .await?;
        if taken > 0 {
            return Err(DirectoryError::DuplicateCashDeskName(name.to_string()).into());
        }
        Ok(())
    }
}
