//! Cash ledger repository.
//!
//! The balance of a cash desk account changes only through
//! [`LedgerRepository::apply_in`], which appends a transaction row and
//! updates the cached balance inside the caller's database transaction.

use aerodesk_core::{
    currency::CurrencyPolicy,
    directory::DirectoryError,
    ledger::{
        AccountState, LedgerError, LedgerService, PostingShift, TransactionKind,
        TransactionReference, sum_amounts,
    },
    shift::ShiftError,
};
use aerodesk_shared::types::{Currency, PageRequest};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::entities::{
    cash_desk_accounts, cash_desks,
    sea_orm_active_enums::{CurrencyCode, ShiftStatus},
    shifts, transactions,
};
use crate::error::{StoreResult, unique_violation};

/// A ledger posting request.
#[derive(Debug, Clone)]
pub struct PostingInput {
    /// Account to post to.
    pub account_id: Uuid,
    /// Shift the posting is made under.
    pub shift_id: Uuid,
    /// What the posting is for; decides the kind.
    pub reference: TransactionReference,
    /// Signed amount.
    pub amount: Decimal,
    /// Free-text note.
    pub description: Option<String>,
}

/// Cash ledger repository.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the desk's account in `currency`, creating it with a zero
    /// balance on first use.
    ///
    /// # Errors
    ///
    /// `NotAllowed` for currencies outside the policy, `CashDeskNotFound`.
    pub async fn get_or_create_account(
        &self,
        cash_desk_id: Uuid,
        currency: Currency,
        policy: &CurrencyPolicy,
    ) -> StoreResult<cash_desk_accounts::Model> {
        policy.ensure_allowed(currency)?;

        let txn = self.db.begin().await?;
        if cash_desks::Entity::find_by_id(cash_desk_id).one(&txn).await?.is_none() {
            return Err(DirectoryError::CashDeskNotFound(cash_desk_id).into());
        }
        if let Some(account) = Self::find_account(&txn, cash_desk_id, currency).await? {
            txn.commit().await?;
            return Ok(account);
        }

        let account = cash_desk_accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            cash_desk_id: Set(cash_desk_id),
            currency: Set(currency.into()),
            balance: Set(Decimal::ZERO),
            last_updated: Set(Utc::now().into()),
        };
        match account.insert(&txn).await {
            Ok(account) => {
                txn.commit().await?;
                info!(account_id = %account.id, cash_desk_id = %cash_desk_id, %currency, "Account created");
                Ok(account)
            }
            Err(e) if unique_violation(&e).is_some() => {
                // Lost a creation race; the other transaction's row is visible now.
                drop(txn);
                Self::find_account(&self.db, cash_desk_id, currency)
                    .await?
                    .ok_or_else(|| e.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Lists the accounts of a desk.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts(
        &self,
        cash_desk_id: Uuid,
    ) -> StoreResult<Vec<cash_desk_accounts::Model>> {
        Ok(cash_desk_accounts::Entity::find()
            .filter(cash_desk_accounts::Column::CashDeskId.eq(cash_desk_id))
            .order_by_asc(cash_desk_accounts::Column::Currency)
            .all(&self.db)
            .await?)
    }

    /// Gets an account by ID.
    ///
    /// # Errors
    ///
    /// `UnknownAccount`.
    pub async fn get_account(&self, account_id: Uuid) -> StoreResult<cash_desk_accounts::Model> {
        cash_desk_accounts::Entity::find_by_id(account_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| LedgerError::UnknownAccount(account_id).into())
    }

    /// Applies one posting in its own database transaction.
    ///
    /// # Errors
    ///
    /// `ShiftNotFound`, `UnknownAccount`, or any rule of
    /// [`LedgerService::check_posting`].
    pub async fn apply_transaction(&self, input: PostingInput) -> StoreResult<transactions::Model> {
        let txn = self.db.begin().await?;
        let shift = shifts::Entity::find_by_id(input.shift_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(LedgerError::ShiftNotFound(input.shift_id))?;
        let tx = Self::apply_in(&txn, &shift, input).await?;
        txn.commit().await?;
        Ok(tx)
    }

    /// Puts cash into a desk account under the cashier's open shift.
    ///
    /// # Errors
    ///
    /// `NoOpenShift`, `SignMismatch` for negative amounts, or any posting rule.
    pub async fn deposit(
        &self,
        cashier_id: Uuid,
        account_id: Uuid,
        amount: Decimal,
        description: Option<String>,
    ) -> StoreResult<transactions::Model> {
        self.move_cash(cashier_id, account_id, TransactionReference::Deposit, amount, description)
            .await
    }

    /// Takes cash out of a desk account under the cashier's open shift.
    ///
    /// # Errors
    ///
    /// `NoOpenShift`, `SignMismatch` for negative amounts, `InsufficientFunds`,
    /// or any other posting rule.
    pub async fn withdraw(
        &self,
        cashier_id: Uuid,
        account_id: Uuid,
        amount: Decimal,
        description: Option<String>,
    ) -> StoreResult<transactions::Model> {
        self.move_cash(cashier_id, account_id, TransactionReference::Withdrawal, amount, description)
            .await
    }

    /// Balance of an account as of `at`: the sum of every transaction
    /// recorded at or before that instant.
    ///
    /// # Errors
    ///
    /// `UnknownAccount`.
    pub async fn balance_as_of(&self, account_id: Uuid, at: DateTime<Utc>) -> StoreResult<Decimal> {
        let txn = self.db.begin().await?;
        if cash_desk_accounts::Entity::find_by_id(account_id)
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(LedgerError::UnknownAccount(account_id).into());
        }

        let at: sea_orm::prelude::DateTimeWithTimeZone = at.into();
        let amounts: Vec<Decimal> = transactions::Entity::find()
            .select_only()
            .column(transactions::Column::Amount)
            .filter(transactions::Column::AccountId.eq(account_id))
            .filter(transactions::Column::CreatedAt.lte(at))
            .into_tuple()
            .all(&txn)
            .await?;
        txn.commit().await?;

        Ok(sum_amounts(amounts))
    }

    /// Lists an account's transactions, newest first, with the total count.
    ///
    /// # Errors
    ///
    /// `UnknownAccount`.
    pub async fn list_transactions(
        &self,
        account_id: Uuid,
        page: &PageRequest,
    ) -> StoreResult<(Vec<transactions::Model>, u64)> {
        self.get_account(account_id).await?;
        let query = transactions::Entity::find()
            .filter(transactions::Column::AccountId.eq(account_id));
        let total = query.clone().count(&self.db).await?;
        let rows = query
            .order_by_desc(transactions::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;
        Ok((rows, total))
    }

    /// Appends a posting and updates the cached balance on `conn`.
    ///
    /// `shift` must already be locked by the caller. The account row is
    /// locked here.
    ///
    /// # Errors
    ///
    /// `UnknownAccount`, or any rule of [`LedgerService::check_posting`].
    pub(crate) async fn apply_in<C: ConnectionTrait>(
        conn: &C,
        shift: &shifts::Model,
        input: PostingInput,
    ) -> StoreResult<transactions::Model> {
        let account = cash_desk_accounts::Entity::find_by_id(input.account_id)
            .lock_exclusive()
            .one(conn)
            .await?
            .ok_or(LedgerError::UnknownAccount(input.account_id))?;

        let kind = input.reference.kind();
        let posting_shift = PostingShift {
            id: shift.id,
            cash_desk_id: shift.cash_desk_id,
            status: shift.status.into(),
        };
        let state = AccountState {
            id: account.id,
            cash_desk_id: account.cash_desk_id,
            currency: account.currency.into(),
            balance: account.balance,
        };
        let running = match LedgerService::check_posting(&posting_shift, &state, kind, input.amount)
        {
            Ok(running) => running,
            Err(e) => {
                warn!(account_id = %account.id, shift_id = %shift.id, %kind, error = %e, "Posting rejected");
                return Err(e.into());
            }
        };

        let now = Utc::now().into();
        let (reference_type, reference_id) = input.reference.to_columns();
        let tx = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            shift_id: Set(shift.id),
            account_id: Set(account.id),
            kind: Set(kind.into()),
            amount: Set(running.amount),
            currency: Set(account.currency),
            balance_after: Set(running.current),
            reference_type: Set(reference_type.map(str::to_string)),
            reference_id: Set(reference_id),
            description: Set(input.description),
            created_at: Set(now),
        }
        .insert(conn)
        .await?;

        let mut active: cash_desk_accounts::ActiveModel = account.into();
        active.balance = Set(running.current);
        active.last_updated = Set(now);
        active.update(conn).await?;

        info!(
            transaction_id = %tx.id,
            account_id = %tx.account_id,
            %kind,
            amount = %running.amount,
            balance = %running.current,
            "Ledger transaction applied"
        );
        Ok(tx)
    }

    /// Finds the desk's account in `currency` on `conn`, locking it.
    pub(crate) async fn find_account<C: ConnectionTrait>(
        conn: &C,
        cash_desk_id: Uuid,
        currency: Currency,
    ) -> StoreResult<Option<cash_desk_accounts::Model>> {
        Ok(cash_desk_accounts::Entity::find()
            .filter(cash_desk_accounts::Column::CashDeskId.eq(cash_desk_id))
            .filter(cash_desk_accounts::Column::Currency.eq(CurrencyCode::from(currency)))
            .lock_exclusive()
            .one(conn)
            .await?)
    }

    async fn move_cash(
        &self,
        cashier_id: Uuid,
        account_id: Uuid,
        reference: TransactionReference,
        amount: Decimal,
        description: Option<String>,
    ) -> StoreResult<transactions::Model> {
        let kind: TransactionKind = reference.kind();
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(LedgerError::SignMismatch { kind, amount }.into());
        }

        let txn = self.db.begin().await?;
        let shift = shifts::Entity::find()
            .filter(shifts::Column::CashierId.eq(cashier_id))
            .filter(shifts::Column::Status.eq(ShiftStatus::Open))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(ShiftError::NoOpenShift(cashier_id))?;

        let tx = Self::apply_in(
            &txn,
            &shift,
            PostingInput {
                account_id,
                shift_id: shift.id,
                reference,
                amount: kind.signed(amount),
                description,
            },
        )
        .await?;
        txn.commit().await?;
        Ok(tx)
    }
}
