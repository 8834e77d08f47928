//! Sale and refund rules.
//!
//! `SellTicket` evaluates its preconditions in a fixed order; the repository
//! calls these checks one by one inside the database transaction, loading
//! only what the next check needs:
//! 1. shift open, 2. fare belongs to flight, 3. seats left, 4. seat free,
//! 5. rate resolved, 6. price computed, 7. ledger account exists.

use aerodesk_shared::types::{Currency, MAX_MONEY};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::SaleError;
use super::types::{FareState, SaleQuote, TicketState, TicketStatus};
use crate::currency::CurrencyService;
use crate::shift::ShiftStatus;

/// Longest accepted passenger name, in characters.
pub const MAX_PASSENGER_NAME: usize = 100;

/// Longest accepted seat number, in characters.
pub const MAX_SEAT_NUMBER: usize = 8;

/// Ticket sales service.
pub struct SalesService;

impl SalesService {
    /// Trims and validates a passenger name.
    ///
    /// # Errors
    ///
    /// `InvalidPassengerName` for blank or overlong names.
    pub fn normalize_passenger_name(name: &str) -> Result<String, SaleError> {
        let name = name.trim();
        if name.is_empty() || name.chars().count() > MAX_PASSENGER_NAME {
            return Err(SaleError::InvalidPassengerName {
                max: MAX_PASSENGER_NAME,
            });
        }
        Ok(name.to_string())
    }

    /// Trims and upper-cases a seat number. Seats are opaque labels such as
    /// `12A`; only blank or overlong ones are rejected.
    ///
    /// # Errors
    ///
    /// `InvalidSeatNumber`.
    pub fn normalize_seat_number(seat: &str) -> Result<String, SaleError> {
        let seat = seat.trim().to_uppercase();
        if seat.is_empty() || seat.chars().count() > MAX_SEAT_NUMBER {
            return Err(SaleError::InvalidSeatNumber(seat));
        }
        Ok(seat)
    }

    /// Step 1: the shift must be open.
    ///
    /// # Errors
    ///
    /// `ShiftNotOpen`.
    pub const fn check_shift(shift_id: Uuid, status: ShiftStatus) -> Result<(), SaleError> {
        if status.is_open() {
            Ok(())
        } else {
            Err(SaleError::ShiftNotOpen(shift_id))
        }
    }

    /// Steps 2 and 3: the fare belongs to the flight and has seats left.
    ///
    /// # Errors
    ///
    /// `FareMismatch` or `SoldOut`.
    pub fn check_fare(fare: &FareState, flight_id: Uuid) -> Result<(), SaleError> {
        if fare.flight_id != flight_id {
            return Err(SaleError::FareMismatch {
                fare_id: fare.id,
                flight_id,
            });
        }
        if fare.seats_sold >= fare.seat_limit {
            return Err(SaleError::SoldOut {
                fare_id: fare.id,
                seat_limit: fare.seat_limit,
            });
        }
        Ok(())
    }

    /// Step 4: no sold ticket holds the seat.
    ///
    /// # Errors
    ///
    /// `SeatTaken`.
    pub fn check_seat(flight_id: Uuid, seat_number: &str, taken: bool) -> Result<(), SaleError> {
        if taken {
            Err(SaleError::SeatTaken {
                flight_id,
                seat_number: seat_number.to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Steps 5 and 6: resolve the rate and price the sale.
    ///
    /// `latest_rate` is the most recent recorded rate from the fare's base
    /// currency to `currency`; it is ignored when they are the same.
    ///
    /// # Errors
    ///
    /// `RateNotFound`, or `PriceOutOfRange` when the converted price does not
    /// fit a money column.
    pub fn quote(
        fare: &FareState,
        currency: Currency,
        latest_rate: Option<Decimal>,
    ) -> Result<SaleQuote, SaleError> {
        let rate = CurrencyService::resolve_rate(fare.base_currency, currency, latest_rate)
            .map_err(|_| SaleError::RateNotFound {
                base: fare.base_currency,
                target: currency,
            })?;
        let price = CurrencyService::convert_price(fare.base_price, rate);
        if price > MAX_MONEY {
            return Err(SaleError::PriceOutOfRange(price));
        }
        Ok(SaleQuote {
            price,
            currency,
            price_in_base: fare.base_price,
            exchange_rate: rate,
        })
    }

    /// A cashier only handles tickets sold on their own shifts.
    ///
    /// # Errors
    ///
    /// `NotShiftOwner`.
    pub fn check_owner(
        ticket_id: Uuid,
        shift_cashier_id: Uuid,
        cashier_id: Uuid,
    ) -> Result<(), SaleError> {
        if shift_cashier_id == cashier_id {
            Ok(())
        } else {
            Err(SaleError::NotShiftOwner {
                ticket_id,
                cashier_id,
            })
        }
    }

    /// Validates a refund: the ticket is sold and its shift is still open.
    ///
    /// # Errors
    ///
    /// `NotRefundable` or `ShiftNotOpen`.
    pub fn check_refund(ticket: &TicketState, shift_status: ShiftStatus) -> Result<(), SaleError> {
        if ticket.status != TicketStatus::Sold {
            return Err(SaleError::NotRefundable(ticket.id));
        }
        Self::check_shift(ticket.shift_id, shift_status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aerodesk_shared::{DomainError, ErrorKind};
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn fare(base_price: Decimal, base_currency: Currency) -> FareState {
        FareState {
            id: Uuid::new_v4(),
            flight_id: Uuid::new_v4(),
            base_price,
            base_currency,
            seat_limit: 10,
            seats_sold: 0,
        }
    }

    #[test]
    fn test_same_currency_quote() {
        let fare = fare(dec!(100), Currency::Usd);
        let quote = SalesService::quote(&fare, Currency::Usd, None).unwrap();
        assert_eq!(quote.price, dec!(100.00));
        assert_eq!(quote.exchange_rate, Decimal::ONE);
        assert_eq!(quote.price_in_base, dec!(100));
    }

    #[test]
    fn test_converted_quote() {
        let fare = fare(dec!(50), Currency::Usd);
        let quote = SalesService::quote(&fare, Currency::Eur, Some(dec!(0.90))).unwrap();
        assert_eq!(quote.price, dec!(45.00));
        assert_eq!(quote.currency, Currency::Eur);
        assert_eq!(quote.price_in_base, dec!(50));
        assert_eq!(quote.exchange_rate, dec!(0.90));
    }

    #[test]
    fn test_quote_beyond_money_column() {
        let fare = fare(dec!(1000000000.00), Currency::Usd);
        assert_eq!(
            SalesService::quote(&fare, Currency::Uah, Some(dec!(41.2537))),
            Err(SaleError::PriceOutOfRange(dec!(41253700000.00)))
        );
    }

    #[test]
    fn test_quote_without_rate() {
        let fare = fare(dec!(50), Currency::Usd);
        assert_eq!(
            SalesService::quote(&fare, Currency::Uah, None),
            Err(SaleError::RateNotFound {
                base: Currency::Usd,
                target: Currency::Uah,
            })
        );
    }

    #[test]
    fn test_fare_of_other_flight() {
        let fare = fare(dec!(50), Currency::Usd);
        let other_flight = Uuid::new_v4();
        assert_eq!(
            SalesService::check_fare(&fare, other_flight),
            Err(SaleError::FareMismatch {
                fare_id: fare.id,
                flight_id: other_flight,
            })
        );
    }

    #[test]
    fn test_sold_out_fare() {
        let mut fare = fare(dec!(50), Currency::Usd);
        fare.seats_sold = fare.seat_limit;
        assert_eq!(fare.seats_left(), 0);
        assert!(matches!(
            SalesService::check_fare(&fare, fare.flight_id),
            Err(SaleError::SoldOut { seat_limit: 10, .. })
        ));
    }

    #[test]
    fn test_refund_rules() {
        let ticket = TicketState {
            id: Uuid::new_v4(),
            shift_id: Uuid::new_v4(),
            status: TicketStatus::Sold,
        };
        assert!(SalesService::check_refund(&ticket, ShiftStatus::Open).is_ok());
        assert_eq!(
            SalesService::check_refund(&ticket, ShiftStatus::Closed),
            Err(SaleError::ShiftNotOpen(ticket.shift_id))
        );

        let refunded = TicketState {
            status: TicketStatus::Refunded,
            ..ticket
        };
        // Refunded wins over a closed shift.
        assert_eq!(
            SalesService::check_refund(&refunded, ShiftStatus::Closed),
            Err(SaleError::NotRefundable(ticket.id))
        );
    }

    #[test]
    fn test_owner_check() {
        let (ticket_id, owner, other) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        assert!(SalesService::check_owner(ticket_id, owner, owner).is_ok());
        let err = SalesService::check_owner(ticket_id, owner, other).unwrap_err();
        assert_eq!(
            err,
            SaleError::NotShiftOwner {
                ticket_id,
                cashier_id: other,
            }
        );
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[rstest]
    #[case("12a", "12A")]
    #[case("  7C ", "7C")]
    #[case("101", "101")]
    #[case("A12", "A12")]
    #[case("12-a", "12-A")]
    #[case("crew 1", "CREW 1")]
    fn test_valid_seat_numbers(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(SalesService::normalize_seat_number(input).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("123456789")]
    fn test_invalid_seat_numbers(#[case] input: &str) {
        assert!(matches!(
            SalesService::normalize_seat_number(input),
            Err(SaleError::InvalidSeatNumber(_))
        ));
    }

    #[test]
    fn test_passenger_name_is_trimmed() {
        assert_eq!(
            SalesService::normalize_passenger_name("  Olena Kovalenko ").unwrap(),
            "Olena Kovalenko"
        );
        assert!(SalesService::normalize_passenger_name("   ").is_err());
        assert!(SalesService::normalize_passenger_name(&"x".repeat(101)).is_err());
    }
}
