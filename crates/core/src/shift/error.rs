//! Shift lifecycle errors.

use aerodesk_shared::{DomainError, ErrorKind};
use thiserror::Error;
use uuid::Uuid;

/// Why a cash desk cannot host a shift for a cashier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeskUnavailableReason {
    /// The desk is switched off.
    Inactive,
    /// The desk stands in another airport than the cashier's home airport.
    OtherAirport,
}

impl std::fmt::Display for DeskUnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inactive => f.write_str("desk is inactive"),
            Self::OtherAirport => f.write_str("desk belongs to another airport"),
        }
    }
}

/// Errors raised by the shift lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShiftError {
    /// Shift does not exist.
    #[error("Shift not found: {0}")]
    NotFound(Uuid),

    /// User does not exist.
    #[error("Cashier not found: {0}")]
    CashierNotFound(Uuid),

    /// Cash desk does not exist.
    #[error("Cash desk not found: {0}")]
    CashDeskNotFound(Uuid),

    /// User exists but does not hold the cashier role.
    #[error("User {0} is not a cashier")]
    NotACashier(Uuid),

    /// Cashier has no home airport.
    #[error("Cashier {0} is not assigned to an airport")]
    CashierWithoutAirport(Uuid),

    /// Cashier already works an open shift.
    #[error("Cashier {cashier_id} already has open shift {shift_id}")]
    ShiftAlreadyOpen {
        /// The cashier.
        cashier_id: Uuid,
        /// The shift that is open.
        shift_id: Uuid,
    },

    /// Another shift is open on the desk.
    #[error("Cash desk {cash_desk_id} is busy with shift {shift_id}")]
    CashDeskBusy {
        /// The desk.
        cash_desk_id: Uuid,
        /// The shift holding it.
        shift_id: Uuid,
    },

    /// Desk cannot host the cashier's shift.
    #[error("Cash desk {cash_desk_id} is unavailable: {reason}")]
    CashDeskUnavailable {
        /// The desk.
        cash_desk_id: Uuid,
        /// Why.
        reason: DeskUnavailableReason,
    },

    /// Cashier has no open shift to close.
    #[error("Cashier {0} has no open shift")]
    NoOpenShift(Uuid),

    /// Only admins may reopen a shift.
    #[error("User {0} may not reopen shifts")]
    ReopenForbidden(Uuid),
}

impl DomainError for ShiftError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_)
            | Self::CashierNotFound(_)
            | Self::CashDeskNotFound(_)
            | Self::NoOpenShift(_) => ErrorKind::NotFound,
            Self::NotACashier(_) | Self::CashierWithoutAirport(_) => ErrorKind::InvalidInput,
            Self::ShiftAlreadyOpen { .. }
            | Self::CashDeskBusy { .. }
            | Self::CashDeskUnavailable { .. } => ErrorKind::Conflict,
            Self::ReopenForbidden(_) => ErrorKind::Forbidden,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "SHIFT_NOT_FOUND",
            Self::CashierNotFound(_) => "CASHIER_NOT_FOUND",
            Self::CashDeskNotFound(_) => "CASH_DESK_NOT_FOUND",
            Self::NotACashier(_) => "NOT_A_CASHIER",
            Self::CashierWithoutAirport(_) => "CASHIER_WITHOUT_AIRPORT",
            Self::ShiftAlreadyOpen { .. } => "SHIFT_ALREADY_OPEN",
            Self::CashDeskBusy { .. } => "CASH_DESK_BUSY",
            Self::CashDeskUnavailable { .. } => "CASH_DESK_UNAVAILABLE",
            Self::NoOpenShift(_) => "NO_OPEN_SHIFT",
            Self::ReopenForbidden(_) => "REOPEN_FORBIDDEN",
        }
    }
}
