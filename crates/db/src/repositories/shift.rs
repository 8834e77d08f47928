//! Shift repository.
//!
//! At most one open shift per cashier and per cash desk. The rule is checked
//! under row locks before writing and enforced by the partial unique indexes
//! `uq_shifts_open_cashier` and `uq_shifts_open_cash_desk`; a violation of
//! either index is reported as the same domain error as the pre-check.

use aerodesk_core::{
    directory::DirectoryError,
    shift::{CashDeskProfile, CashierProfile, ShiftError, ShiftService, ShiftState},
};
use aerodesk_shared::types::PageRequest;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::entities::{cash_desks, sea_orm_active_enums::ShiftStatus, shifts, users};
use crate::error::{StoreError, StoreResult, unique_violation};

/// Filter for listing shifts.
#[derive(Debug, Clone, Default)]
pub struct ShiftFilter {
    /// Only shifts of this cashier.
    pub cashier_id: Option<Uuid>,
    /// Only shifts on this desk.
    pub cash_desk_id: Option<Uuid>,
    /// Only shifts in this status.
    pub status: Option<ShiftStatus>,
}

/// Shift repository.
#[derive(Debug, Clone)]
pub struct ShiftRepository {
    db: DatabaseConnection,
}

impl ShiftRepository {
    /// Creates a new shift repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Opens a shift for a cashier on a cash desk.
    ///
    /// # Errors
    ///
    /// `CashierNotFound`, `CashDeskNotFound`, then the rules of
    /// [`ShiftService::check_open`].
    pub async fn open(&self, cashier_id: Uuid, cash_desk_id: Uuid) -> StoreResult<shifts::Model> {
        let txn = self.db.begin().await?;

        let cashier = users::Entity::find_by_id(cashier_id)
            .one(&txn)
            .await?
            .ok_or(ShiftError::CashierNotFound(cashier_id))?;
        let desk = cash_desks::Entity::find_by_id(cash_desk_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(ShiftError::CashDeskNotFound(cash_desk_id))?;

        let cashier_open = Self::open_for_cashier(&txn, cashier_id).await?;
        let desk_open = Self::open_for_desk(&txn, cash_desk_id).await?;

        let check = ShiftService::check_open(
            &CashierProfile {
                user_id: cashier.id,
                role: cashier.role.into(),
                airport_id: cashier.airport_id,
            },
            &CashDeskProfile {
                id: desk.id,
                airport_id: desk.airport_id,
                is_active: desk.is_active,
            },
            cashier_open.map(|s| s.id),
            desk_open.map(|s| s.id),
        );
        if let Err(e) = check {
            warn!(cashier_id = %cashier_id, cash_desk_id = %cash_desk_id, error = %e, "Shift open rejected");
            return Err(e.into());
        }

        let shift = shifts::ActiveModel {
            id: Set(Uuid::new_v4()),
            cash_desk_id: Set(cash_desk_id),
            cashier_id: Set(cashier_id),
            status: Set(ShiftStatus::Open),
            opened_at: Set(chrono::Utc::now().into()),
            closed_at: Set(None),
            reopened_at: Set(None),
            reopened_by: Set(None),
        };
        let shift = match shift.insert(&txn).await {
            Ok(shift) => shift,
            Err(e) => {
                drop(txn);
                return Err(self.open_conflict(e, cashier_id, cash_desk_id).await);
            }
        };
        txn.commit().await?;

        info!(shift_id = %shift.id, cashier_id = %cashier_id, cash_desk_id = %cash_desk_id, "Shift opened");
        Ok(shift)
    }

    /// Closes the cashier's open shift.
    ///
    /// # Errors
    ///
    /// `NoOpenShift`.
    pub async fn close(&self, cashier_id: Uuid) -> StoreResult<shifts::Model> {
        let txn = self.db.begin().await?;
        let open = Self::open_for_cashier(&txn, cashier_id).await?;
        let state = open.as_ref().map(state_of);
        ShiftService::check_close(cashier_id, state.as_ref())?;
        let Some(open) = open else {
            return Err(ShiftError::NoOpenShift(cashier_id).into());
        };

        let mut active: shifts::ActiveModel = open.into();
        active.status = Set(ShiftStatus::Closed);
        active.closed_at = Set(Some(chrono::Utc::now().into()));
        let shift = active.update(&txn).await?;
        txn.commit().await?;

        info!(shift_id = %shift.id, cashier_id = %cashier_id, "Shift closed");
        Ok(shift)
    }

    /// Reopens a closed shift on behalf of an admin.
    ///
    /// # Errors
    ///
    /// `UserNotFound` for an unknown actor, `NotFound` for an unknown shift,
    /// then the rules of [`ShiftService::check_reopen`].
    pub async fn reopen(&self, actor_id: Uuid, shift_id: Uuid) -> StoreResult<shifts::Model> {
        let txn = self.db.begin().await?;
        let actor = users::Entity::find_by_id(actor_id)
            .one(&txn)
            .await?
            .ok_or(DirectoryError::UserNotFound(actor_id))?;
        let shift = shifts::Entity::find_by_id(shift_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(ShiftError::NotFound(shift_id))?;

        let other = |s: Option<shifts::Model>| s.map(|s| s.id).filter(|id| *id != shift_id);
        let cashier_open = other(Self::open_for_cashier(&txn, shift.cashier_id).await?);
        let desk_open = other(Self::open_for_desk(&txn, shift.cash_desk_id).await?);

        if let Err(e) = ShiftService::check_reopen(
            actor_id,
            actor.role.into(),
            &state_of(&shift),
            cashier_open,
            desk_open,
        ) {
            warn!(shift_id = %shift_id, actor_id = %actor_id, error = %e, "Shift reopen rejected");
            return Err(e.into());
        }

        let (cashier_id, cash_desk_id) = (shift.cashier_id, shift.cash_desk_id);
        let now = chrono::Utc::now().into();
        let mut active: shifts::ActiveModel = shift.into();
        active.status = Set(ShiftStatus::Open);
        active.closed_at = Set(None);
        active.reopened_at = Set(Some(now));
        active.reopened_by = Set(Some(actor_id));
        let shift = match active.update(&txn).await {
            Ok(shift) => shift,
            Err(e) => {
                drop(txn);
                return Err(self.open_conflict(e, cashier_id, cash_desk_id).await);
            }
        };
        txn.commit().await?;

        info!(shift_id = %shift_id, actor_id = %actor_id, "Shift reopened");
        Ok(shift)
    }

    /// Returns the cashier's open shift, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn current(&self, cashier_id: Uuid) -> StoreResult<Option<shifts::Model>> {
        Ok(shifts::Entity::find()
            .filter(shifts::Column::CashierId.eq(cashier_id))
            .filter(shifts::Column::Status.eq(ShiftStatus::Open))
            .one(&self.db)
            .await?)
    }

    /// Gets a shift by ID.
    ///
    /// # Errors
    ///
    /// `NotFound`.
    pub async fn get(&self, shift_id: Uuid) -> StoreResult<shifts::Model> {
        shifts::Entity::find_by_id(shift_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ShiftError::NotFound(shift_id).into())
    }

    /// Lists shifts, newest first, with the total count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &ShiftFilter,
        page: &PageRequest,
    ) -> StoreResult<(Vec<shifts::Model>, u64)> {
        let mut query = shifts::Entity::find();
        if let Some(cashier_id) = filter.cashier_id {
            query = query.filter(shifts::Column::CashierId.eq(cashier_id));
        }
        if let Some(cash_desk_id) = filter.cash_desk_id {
            query = query.filter(shifts::Column::CashDeskId.eq(cash_desk_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(shifts::Column::Status.eq(status));
        }

        let total = query.clone().count(&self.db).await?;
        let rows = query
            .order_by_desc(shifts::Column::OpenedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;
        Ok((rows, total))
    }

    async fn open_for_cashier<C: ConnectionTrait>(
        conn: &C,
        cashier_id: Uuid,
    ) -> Result<Option<shifts::Model>, DbErr> {
        shifts::Entity::find()
            .filter(shifts::Column::CashierId.eq(cashier_id))
            .filter(shifts::Column::Status.eq(ShiftStatus::Open))
            .lock_exclusive()
            .one(conn)
            .await
    }

    async fn open_for_desk<C: ConnectionTrait>(
        conn: &C,
        cash_desk_id: Uuid,
    ) -> Result<Option<shifts::Model>, DbErr> {
        shifts::Entity::find()
            .filter(shifts::Column::CashDeskId.eq(cash_desk_id))
            .filter(shifts::Column::Status.eq(ShiftStatus::Open))
            .lock_exclusive()
            .one(conn)
            .await
    }

    /// Maps a write that lost a race against a concurrent open.
    async fn open_conflict(&self, err: DbErr, cashier_id: Uuid, cash_desk_id: Uuid) -> StoreError {
        let Some(message) = unique_violation(&err) else {
            return err.into();
        };
        warn!(cashier_id = %cashier_id, cash_desk_id = %cash_desk_id, %message, "Open shift index violated");

        if message.contains("cash_desk") {
            let holder = Self::open_for_desk(&self.db, cash_desk_id).await.ok().flatten();
            ShiftError::CashDeskBusy {
                cash_desk_id,
                shift_id: holder.map_or_else(Uuid::nil, |s| s.id),
            }
            .into()
        } else {
            let holder = Self::open_for_cashier(&self.db, cashier_id).await.ok().flatten();
            ShiftError::ShiftAlreadyOpen {
                cashier_id,
                shift_id: holder.map_or_else(Uuid::nil, |s| s.id),
            }
            .into()
        }
    }
}

fn state_of(shift: &shifts::Model) -> ShiftState {
    ShiftState {
        id: shift.id,
        cashier_id: shift.cashier_id,
        cash_desk_id: shift.cash_desk_id,
        status: shift.status.into(),
    }
}
