//! Domain types for ledger postings.

use aerodesk_shared::types::Currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::LedgerError;
use crate::shift::ShiftStatus;

/// Kind of ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Cash received for a ticket.
    Sale,
    /// Cash returned for a refunded ticket.
    Refund,
    /// Cash put into the desk.
    Deposit,
    /// Cash taken out of the desk.
    Withdrawal,
}

impl TransactionKind {
    /// Returns true if this kind adds cash to the desk.
    #[must_use]
    pub const fn is_inflow(self) -> bool {
        matches!(self, Self::Sale | Self::Deposit)
    }

    /// Applies this kind's sign to a positive magnitude.
    #[must_use]
    pub fn signed(self, magnitude: Decimal) -> Decimal {
        if self.is_inflow() {
            magnitude.abs()
        } else {
            -magnitude.abs()
        }
    }

    /// Returns the stored tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Refund => "refund",
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a ledger transaction was recorded for.
///
/// Lookup only: a transaction points at its ticket but does not own it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransactionReference {
    /// Sale of a ticket.
    Sale {
        /// The sold ticket.
        ticket_id: Uuid,
    },
    /// Refund of a ticket.
    Refund {
        /// The refunded ticket.
        ticket_id: Uuid,
    },
    /// Manual cash deposit.
    Deposit,
    /// Manual cash withdrawal.
    Withdrawal,
}

/// Stored `reference_type` for ticket references.
pub const TICKET_REFERENCE: &str = "ticket";

impl TransactionReference {
    /// Returns the transaction kind implied by the reference.
    #[must_use]
    pub const fn kind(&self) -> TransactionKind {
        match self {
            Self::Sale { .. } => TransactionKind::Sale,
            Self::Refund { .. } => TransactionKind::Refund,
            Self::Deposit => TransactionKind::Deposit,
            Self::Withdrawal => TransactionKind::Withdrawal,
        }
    }

    /// Returns the `(reference_type, reference_id)` columns.
    #[must_use]
    pub fn to_columns(&self) -> (Option<&'static str>, Option<Uuid>) {
        match self {
            Self::Sale { ticket_id } | Self::Refund { ticket_id } => {
                (Some(TICKET_REFERENCE), Some(*ticket_id))
            }
            Self::Deposit | Self::Withdrawal => (None, None),
        }
    }

    /// Rebuilds a reference from stored columns.
    ///
    /// # Errors
    ///
    /// `InvalidReference` when the columns do not fit the kind.
    pub fn from_columns(
        kind: TransactionKind,
        reference_type: Option<&str>,
        reference_id: Option<Uuid>,
    ) -> Result<Self, LedgerError> {
        match (kind, reference_type, reference_id) {
            (TransactionKind::Sale, Some(TICKET_REFERENCE), Some(id)) => Ok(Self::Sale {
                ticket_id: id,
            }),
            (TransactionKind::Refund, Some(TICKET_REFERENCE), Some(id)) => Ok(Self::Refund {
                ticket_id: id,
            }),
            (TransactionKind::Deposit, None, None) => Ok(Self::Deposit),
            (TransactionKind::Withdrawal, None, None) => Ok(Self::Withdrawal),
            _ => Err(LedgerError::InvalidReference(format!(
                "{kind} with reference {reference_type:?}/{reference_id:?}"
            ))),
        }
    }
}

/// The shift a posting is made under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostingShift {
    /// Shift ID.
    pub id: Uuid,
    /// Cash desk the shift runs on.
    pub cash_desk_id: Uuid,
    /// Current status.
    pub status: ShiftStatus,
}

/// A cash desk account as seen by the posting rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountState {
    /// Account ID.
    pub id: Uuid,
    /// Owning cash desk.
    pub cash_desk_id: Uuid,
    /// Account currency.
    pub currency: Currency,
    /// Cached running balance.
    pub balance: Decimal,
}
