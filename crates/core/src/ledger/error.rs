//! Ledger error types.

use aerodesk_shared::types::Currency;
use aerodesk_shared::{DomainError, ErrorKind};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use super::types::TransactionKind;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Lookup Errors ==========
    /// Shift does not exist.
    #[error("Shift not found: {0}")]
    ShiftNotFound(Uuid),

    /// Account does not exist.
    #[error("Account not found: {0}")]
    UnknownAccount(Uuid),

    /// Cash desk has no account in the currency.
    #[error("Cash desk {cash_desk_id} has no {currency} account")]
    AccountNotFound {
        /// The desk.
        cash_desk_id: Uuid,
        /// The requested currency.
        currency: Currency,
    },

    // ========== State Errors ==========
    /// Postings require an open shift.
    #[error("Shift {0} is not open")]
    ShiftNotOpen(Uuid),

    /// Account belongs to another desk than the shift.
    #[error("Account {account_id} does not belong to the cash desk of shift {shift_id}")]
    AccountNotOnShiftDesk {
        /// The account.
        account_id: Uuid,
        /// The shift.
        shift_id: Uuid,
    },

    // ========== Amount Errors ==========
    /// Amount cannot be zero.
    #[error("Transaction amount cannot be zero")]
    ZeroAmount,

    /// Amount has more than two fractional digits.
    #[error("Amount {0} has more than two decimal places")]
    InvalidAmountScale(Decimal),

    /// Sign does not match the transaction kind.
    #[error("A {kind} cannot carry amount {amount}")]
    SignMismatch {
        /// The kind.
        kind: TransactionKind,
        /// The offending amount.
        amount: Decimal,
    },

    /// Amount or resulting balance exceeds what a money column holds.
    #[error("Amount {0} is out of range")]
    AmountOutOfRange(Decimal),

    /// Balance would go below zero.
    #[error("Insufficient funds on account {account_id}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// The account.
        account_id: Uuid,
        /// Balance before the posting.
        balance: Decimal,
        /// Absolute amount requested.
        requested: Decimal,
    },

    /// Stored reference columns do not fit the kind.
    #[error("Invalid transaction reference: {0}")]
    InvalidReference(String),
}

impl DomainError for LedgerError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::ShiftNotFound(_) | Self::UnknownAccount(_) | Self::AccountNotFound { .. } => {
                ErrorKind::NotFound
            }
            Self::ShiftNotOpen(_) => ErrorKind::Conflict,
            Self::AccountNotOnShiftDesk { .. }
            | Self::ZeroAmount
            | Self::InvalidAmountScale(_)
            | Self::AmountOutOfRange(_)
            | Self::SignMismatch { .. }
            | Self::InvalidReference(_) => ErrorKind::InvalidInput,
            Self::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ShiftNotFound(_) => "SHIFT_NOT_FOUND",
            Self::UnknownAccount(_) | Self::AccountNotFound { .. } => "ACCOUNT_NOT_FOUND",
            Self::ShiftNotOpen(_) => "SHIFT_NOT_OPEN",
            Self::AccountNotOnShiftDesk { .. } => "ACCOUNT_NOT_ON_SHIFT_DESK",
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::InvalidAmountScale(_) => "INVALID_AMOUNT_SCALE",
            Self::SignMismatch { .. } => "SIGN_MISMATCH",
            Self::AmountOutOfRange(_) => "AMOUNT_OUT_OF_RANGE",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::InvalidReference(_) => "INVALID_REFERENCE",
        }
    }
}
