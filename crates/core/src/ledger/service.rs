//! Ledger service for posting validation.
//!
//! Pure rules with no database dependencies. The repository loads the shift
//! and account rows under lock, calls [`LedgerService::check_posting`], then
//! writes the transaction row and the new balance in the same database
//! transaction.

use aerodesk_shared::types::{MAX_MONEY, MONEY_SCALE};
use rust_decimal::Decimal;

use super::balance::RunningBalance;
use super::error::LedgerError;
use super::types::{AccountState, PostingShift, TransactionKind};

/// Ledger service for posting validation.
pub struct LedgerService;

impl LedgerService {
    /// Validates a posting and returns the resulting running balance.
    ///
    /// Checks, in order:
    /// 1. The shift is open
    /// 2. The account belongs to the shift's cash desk
    /// 3. The amount is non-zero with at most two decimals and fits a money
    ///    column
    /// 4. The amount's sign matches the kind
    /// 5. The balance stays non-negative and fits a money column
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn check_posting(
        shift: &PostingShift,
        account: &AccountState,
        kind: TransactionKind,
        amount: Decimal,
    ) -> Result<RunningBalance, LedgerError> {
        if !shift.status.is_open() {
            return Err(LedgerError::ShiftNotOpen(shift.id));
        }
        if account.cash_desk_id != shift.cash_desk_id {
            return Err(LedgerError::AccountNotOnShiftDesk {
                account_id: account.id,
                shift_id: shift.id,
            });
        }
        Self::check_amount(kind, amount)?;

        let running = RunningBalance::apply(account.balance, amount)
            .filter(|running| running.current <= MAX_MONEY)
            .ok_or(LedgerError::AmountOutOfRange(amount))?;
        if running.current < Decimal::ZERO {
            return Err(LedgerError::InsufficientFunds {
                account_id: account.id,
                balance: account.balance,
                requested: amount.abs(),
            });
        }
        Ok(running)
    }

    /// Validates an amount against its kind without touching balances.
    ///
    /// # Errors
    ///
    /// `ZeroAmount`, `AmountOutOfRange`, `InvalidAmountScale` or
    /// `SignMismatch`.
    pub fn check_amount(kind: TransactionKind, amount: Decimal) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::ZeroAmount);
        }
        if amount.abs() > MAX_MONEY {
            return Err(LedgerError::AmountOutOfRange(amount));
        }
        if amount.normalize().scale() > MONEY_SCALE {
            return Err(LedgerError::InvalidAmountScale(amount));
        }
        let positive = amount > Decimal::ZERO;
        if positive != kind.is_inflow() {
            return Err(LedgerError::SignMismatch { kind, amount });
        }
        Ok(())
    }
}
