//! Property-based tests for sales rules.
//!
//! Simulates a fare and a seat map in memory, running sale and refund
//! attempts through the same checks the repository uses.

use std::collections::HashSet;

use aerodesk_shared::types::Currency;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::SaleError;
use super::service::SalesService;
use super::types::FareState;

#[derive(Debug, Clone)]
enum Attempt {
    Sell(u8),
    Refund(u8),
}

fn attempt_strategy() -> impl Strategy<Value = Attempt> {
    prop_oneof![
        3 => (1u8..12).prop_map(Attempt::Sell),
        1 => (1u8..12).prop_map(Attempt::Refund),
    ]
}

/// Strategy to generate positive rates with four decimals.
fn rate_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* sequence of sales and refunds, `0 <= seats_sold <= seat_limit`
    /// SHALL hold, no seat SHALL be sold twice, and a sale at the limit SHALL
    /// fail with `SoldOut` leaving `seats_sold` unchanged.
    #[test]
    fn prop_seat_accounting(
        seat_limit in 1i32..8,
        attempts in prop::collection::vec(attempt_strategy(), 1..60),
    ) {
        let mut fare = FareState {
            id: Uuid::new_v4(),
            flight_id: Uuid::new_v4(),
            base_price: Decimal::new(10_000, 2),
            base_currency: Currency::Usd,
            seat_limit,
            seats_sold: 0,
        };
        let mut held: HashSet<String> = HashSet::new();

        for attempt in attempts {
            match attempt {
                Attempt::Sell(row) => {
                    let seat = SalesService::normalize_seat_number(&format!("{row}a")).unwrap();
                    let before = fare.seats_sold;
                    let outcome = SalesService::check_fare(&fare, fare.flight_id)
                        .and_then(|()| SalesService::check_seat(fare.flight_id, &seat, held.contains(&seat)));
                    match outcome {
                        Ok(()) => {
                            fare.seats_sold += 1;
                            held.insert(seat);
                        }
                        Err(SaleError::SoldOut { .. }) => {
                            prop_assert_eq!(before, fare.seat_limit);
                        }
                        Err(SaleError::SeatTaken { .. }) => {
                            prop_assert!(held.contains(&seat));
                        }
                        Err(other) => prop_assert!(false, "unexpected error {other}"),
                    }
                }
                Attempt::Refund(row) => {
                    if held.remove(&format!("{row}A")) {
                        fare.seats_sold -= 1;
                    }
                }
            }
            prop_assert!(fare.seats_sold >= 0);
            prop_assert!(fare.seats_sold <= fare.seat_limit);
            prop_assert_eq!(usize::try_from(fare.seats_sold).unwrap(), held.len());
        }
    }

    /// *For any* rate, the quote SHALL freeze the base price and the rate and
    /// charge the rounded product.
    #[test]
    fn prop_quote_freezes_inputs(cents in 1i64..10_000_000i64, rate in rate_strategy()) {
        let base_price = Decimal::new(cents, 2);
        let fare = FareState {
            id: Uuid::new_v4(),
            flight_id: Uuid::new_v4(),
            base_price,
            base_currency: Currency::Usd,
            seat_limit: 1,
            seats_sold: 0,
        };
        let quote = SalesService::quote(&fare, Currency::Uah, Some(rate)).unwrap();
        prop_assert_eq!(quote.price_in_base, base_price);
        prop_assert_eq!(quote.exchange_rate, rate);
        prop_assert!(quote.price.scale() <= 2);
        prop_assert!((quote.price - base_price * rate).abs() <= Decimal::new(5, 3));
    }
}
