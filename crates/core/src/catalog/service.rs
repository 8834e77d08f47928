//! Flight and fare validation.

use aerodesk_shared::types::{Currency, MAX_MONEY, MONEY_SCALE};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::error::CatalogError;
use crate::directory::DirectoryService;

/// Longest accepted fare name.
pub const MAX_FARE_NAME: usize = 50;

/// A validated flight ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFlight {
    /// Upper-cased flight number, e.g. `PS101`.
    pub flight_number: String,
    /// Origin IATA code.
    pub origin: String,
    /// Destination IATA code.
    pub destination: String,
    /// Scheduled departure.
    pub departure_time: DateTime<Utc>,
    /// Scheduled arrival.
    pub arrival_time: DateTime<Utc>,
    /// Seats on the aircraft.
    pub seat_capacity: i32,
}

/// A validated fare ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFare {
    /// Fare name, e.g. `Economy`.
    pub name: String,
    /// Price in the base currency.
    pub base_price: Decimal,
    /// Base currency.
    pub base_currency: Currency,
    /// Seats sold under this fare at most.
    pub seat_limit: i32,
}

/// Catalog rules.
pub struct CatalogService;

impl CatalogService {
    /// Normalises and checks a flight.
    ///
    /// # Errors
    ///
    /// Returns the first rule the flight breaks.
    pub fn prepare_flight(
        flight_number: &str,
        origin: &str,
        destination: &str,
        departure_time: DateTime<Utc>,
        arrival_time: DateTime<Utc>,
        seat_capacity: i32,
    ) -> Result<NewFlight, CatalogError> {
        let flight_number = Self::normalize_flight_number(flight_number)?;
        let origin = Self::airport_code(origin)?;
        let destination = Self::airport_code(destination)?;
        if origin == destination {
            return Err(CatalogError::SameOriginAndDestination);
        }
        if arrival_time <= departure_time {
            return Err(CatalogError::InvalidSchedule);
        }
        if seat_capacity <= 0 {
            return Err(CatalogError::InvalidCapacity(seat_capacity));
        }
        Ok(NewFlight {
            flight_number,
            origin,
            destination,
            departure_time,
            arrival_time,
            seat_capacity,
        })
    }

    /// Checks a fare against the flight's unallocated seats.
    ///
    /// `allocated` is the sum of seat limits of the flight's existing fares.
    ///
    /// # Errors
    ///
    /// Returns the first rule the fare breaks.
    pub fn prepare_fare(
        name: &str,
        base_price: Decimal,
        base_currency: Currency,
        seat_limit: i32,
        seat_capacity: i32,
        allocated: i32,
    ) -> Result<NewFare, CatalogError> {
        let name = name.trim();
        if name.is_empty() || name.chars().count() > MAX_FARE_NAME {
            return Err(CatalogError::InvalidFareName { max: MAX_FARE_NAME });
        }
        if base_price <= Decimal::ZERO
            || base_price > MAX_MONEY
            || base_price.normalize().scale() > MONEY_SCALE
        {
            return Err(CatalogError::InvalidPrice(base_price));
        }
        if seat_limit <= 0 {
            return Err(CatalogError::InvalidSeatLimit(seat_limit));
        }
        let available = (seat_capacity - allocated).max(0);
        if seat_limit > available {
            return Err(CatalogError::CapacityExceeded {
                requested: seat_limit,
                available,
            });
        }
        Ok(NewFare {
            name: name.to_string(),
            base_price,
            base_currency,
            seat_limit,
        })
    }

    /// Two-character airline designator followed by one to four digits.
    ///
    /// # Errors
    ///
    /// `InvalidFlightNumber`.
    pub fn normalize_flight_number(flight_number: &str) -> Result<String, CatalogError> {
        let number = flight_number.trim().to_uppercase();
        let valid = number.len() >= 3
            && number.len() <= 6
            && number[..2].chars().all(|c| c.is_ascii_alphanumeric())
            && number[..2].chars().any(|c| c.is_ascii_uppercase())
            && number[2..].chars().all(|c| c.is_ascii_digit());
        if valid {
            Ok(number)
        } else {
            Err(CatalogError::InvalidFlightNumber(number))
        }
    }

    fn airport_code(code: &str) -> Result<String, CatalogError> {
        DirectoryService::normalize_airport_code(code)
            .map_err(|_| CatalogError::InvalidAirportCode(code.trim().to_uppercase()))
    }
}
