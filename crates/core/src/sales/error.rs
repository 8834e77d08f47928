//! Sale and refund errors.

use aerodesk_shared::types::Currency;
use aerodesk_shared::{DomainError, ErrorKind};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while selling or refunding tickets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaleError {
    /// Shift does not exist.
    #[error("Shift not found: {0}")]
    ShiftNotFound(Uuid),

    /// Sales and refunds require an open shift.
    #[error("Shift {0} is not open")]
    ShiftNotOpen(Uuid),

    /// Fare does not exist.
    #[error("Fare not found: {0}")]
    FareNotFound(Uuid),

    /// Fare belongs to another flight.
    #[error("Fare {fare_id} does not belong to flight {flight_id}")]
    FareMismatch {
        /// The fare.
        fare_id: Uuid,
        /// The requested flight.
        flight_id: Uuid,
    },

    /// Every seat of the fare is sold.
    #[error("Fare {fare_id} is sold out ({seat_limit} seats)")]
    SoldOut {
        /// The fare.
        fare_id: Uuid,
        /// Its seat limit.
        seat_limit: i32,
    },

    /// Seat already held by a sold ticket.
    #[error("Seat {seat_number} on flight {flight_id} is already taken")]
    SeatTaken {
        /// The flight.
        flight_id: Uuid,
        /// The seat.
        seat_number: String,
    },

    /// No rate to price the sale.
    #[error("No exchange rate from {base} to {target}")]
    RateNotFound {
        /// Fare base currency.
        base: Currency,
        /// Sale currency.
        target: Currency,
    },

    /// Converted price exceeds what a money column holds.
    #[error("Price {0} is out of range")]
    PriceOutOfRange(Decimal),

    /// Ticket does not exist.
    #[error("Ticket not found: {0}")]
    TicketNotFound(Uuid),

    /// Ticket was sold on another cashier's shift.
    #[error("Ticket {ticket_id} was not sold on a shift of cashier {cashier_id}")]
    NotShiftOwner {
        /// The ticket.
        ticket_id: Uuid,
        /// The calling cashier.
        cashier_id: Uuid,
    },

    /// Only sold tickets can be refunded.
    #[error("Ticket {0} is not refundable")]
    NotRefundable(Uuid),

    /// Passenger name is empty or too long.
    #[error("Passenger name must be 1 to {max} characters")]
    InvalidPassengerName {
        /// Maximum length.
        max: usize,
    },

    /// Seat number is malformed.
    #[error("Invalid seat number: {0:?}")]
    InvalidSeatNumber(String),
}

impl DomainError for SaleError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::ShiftNotFound(_) | Self::FareNotFound(_) | Self::TicketNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::ShiftNotOpen(_)
            | Self::SoldOut { .. }
            | Self::SeatTaken { .. }
            | Self::NotRefundable(_) => ErrorKind::Conflict,
            Self::FareMismatch { .. }
            | Self::PriceOutOfRange(_)
            | Self::InvalidPassengerName { .. }
            | Self::InvalidSeatNumber(_) => ErrorKind::InvalidInput,
            Self::RateNotFound { .. } => ErrorKind::RateNotFound,
            Self::NotShiftOwner { .. } => ErrorKind::Forbidden,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ShiftNotFound(_) => "SHIFT_NOT_FOUND",
            Self::ShiftNotOpen(_) => "SHIFT_NOT_OPEN",
            Self::FareNotFound(_) => "FARE_NOT_FOUND",
            Self::FareMismatch { .. } => "FARE_MISMATCH",
            Self::SoldOut { .. } => "SOLD_OUT",
            Self::SeatTaken { .. } => "SEAT_TAKEN",
            Self::RateNotFound { .. } => "RATE_NOT_FOUND",
            Self::PriceOutOfRange(_) => "PRICE_OUT_OF_RANGE",
            Self::TicketNotFound(_) => "TICKET_NOT_FOUND",
            Self::NotShiftOwner { .. } => "NOT_SHIFT_OWNER",
            Self::NotRefundable(_) => "NOT_REFUNDABLE",
            Self::InvalidPassengerName { .. } => "INVALID_PASSENGER_NAME",
            Self::InvalidSeatNumber(_) => "INVALID_SEAT_NUMBER",
        }
    }
}
