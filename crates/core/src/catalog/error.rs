//! Catalog errors.

use aerodesk_shared::{DomainError, ErrorKind};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while maintaining flights and fares.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Flight does not exist.
    #[error("Flight not found: {0}")]
    FlightNotFound(Uuid),

    /// Flight number is malformed.
    #[error("Invalid flight number: {0:?}")]
    InvalidFlightNumber(String),

    /// Flight number already used.
    #[error("Flight number already exists: {flight_number}")]
    DuplicateFlight {
        /// Flight number.
        flight_number: String,
    },

    /// Origin or destination code is malformed.
    #[error("Invalid airport code: {0:?}")]
    InvalidAirportCode(String),

    /// Origin equals destination.
    #[error("Origin and destination must differ")]
    SameOriginAndDestination,

    /// Arrival is not after departure.
    #[error("Arrival must be after departure")]
    InvalidSchedule,

    /// Seat capacity is not positive.
    #[error("Seat capacity must be positive, got {0}")]
    InvalidCapacity(i32),

    /// Fare name empty or too long.
    #[error("Fare name must be 1 to {max} characters")]
    InvalidFareName {
        /// Maximum length.
        max: usize,
    },

    /// Fare name already used on this flight.
    #[error("Fare {name} already exists on flight {flight_id}")]
    DuplicateFareName {
        /// Flight.
        flight_id: Uuid,
        /// Fare name.
        name: String,
    },

    /// Base price not positive or finer than cents.
    #[error("Invalid fare price: {0}")]
    InvalidPrice(Decimal),

    /// Seat limit is not positive.
    #[error("Seat limit must be positive, got {0}")]
    InvalidSeatLimit(i32),

    /// Fares would allocate more seats than the aircraft has.
    #[error("Seat limit {requested} exceeds the {available} unallocated seats")]
    CapacityExceeded {
        /// Requested seat limit.
        requested: i32,
        /// Seats not yet allocated to other fares.
        available: i32,
    },
}

impl DomainError for CatalogError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::FlightNotFound(_) => ErrorKind::NotFound,
            Self::DuplicateFlight { .. } | Self::DuplicateFareName { .. } => ErrorKind::Conflict,
            _ => ErrorKind::InvalidInput,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::FlightNotFound(_) => "FLIGHT_NOT_FOUND",
            Self::InvalidFlightNumber(_) => "INVALID_FLIGHT_NUMBER",
            Self::DuplicateFlight { .. } => "DUPLICATE_FLIGHT",
            Self::InvalidAirportCode(_) => "INVALID_AIRPORT_CODE",
            Self::SameOriginAndDestination => "SAME_ORIGIN_AND_DESTINATION",
            Self::InvalidSchedule => "INVALID_SCHEDULE",
            Self::InvalidCapacity(_) => "INVALID_CAPACITY",
            Self::InvalidFareName { .. } => "INVALID_FARE_NAME",
            Self::DuplicateFareName { .. } => "DUPLICATE_FARE_NAME",
            Self::InvalidPrice(_) => "INVALID_PRICE",
            Self::InvalidSeatLimit(_) => "INVALID_SEAT_LIMIT",
            Self::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
        }
    }
}
