//! Property-based tests for currency conversion.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::CurrencyService;

/// Strategy to generate base prices (0.01 to 100,000.00).
fn positive_price() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive exchange rates (0.0001 to 10000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Converted prices never carry more than two fractional digits.
    #[test]
    fn prop_price_has_two_decimals(price in positive_price(), rate in positive_rate()) {
        let converted = CurrencyService::convert_price(price, rate);
        prop_assert!(converted.scale() <= 2, "{} has scale {}", converted, converted.scale());
    }

    /// Rounding moves the exact product by at most half a cent.
    #[test]
    fn prop_rounding_error_is_bounded(price in positive_price(), rate in positive_rate()) {
        let exact = price * rate;
        let converted = CurrencyService::convert_price(price, rate);
        prop_assert!((converted - exact).abs() <= Decimal::new(5, 3));
    }

    /// A rate of one is the identity on cent-precise prices.
    #[test]
    fn prop_unit_rate_is_identity(price in positive_price()) {
        prop_assert_eq!(CurrencyService::convert_price(price, Decimal::ONE), price);
    }
}
