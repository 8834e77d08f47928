//! Exchange rate types and logic.

use aerodesk_shared::types::{Currency, MAX_RATE, round_rate};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::CurrencyError;

/// Exchange rate between two currencies.
///
/// One unit of `base` buys `rate` units of `target`. Rates are append-only:
/// a newer `valid_at` supersedes older rows without replacing them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Source currency.
    pub base: Currency,
    /// Target currency.
    pub target: Currency,
    /// Rate with four fractional digits.
    pub rate: Decimal,
    /// Moment from which this rate applies.
    pub valid_at: DateTime<Utc>,
}

impl ExchangeRate {
    /// Creates a validated exchange rate, rounding to four decimals.
    ///
    /// # Errors
    ///
    /// `SameCurrency` when base equals target, `InvalidRate` when the rounded
    /// rate is not positive or exceeds [`MAX_RATE`].
    pub fn new(
        base: Currency,
        target: Currency,
        rate: Decimal,
        valid_at: DateTime<Utc>,
    ) -> Result<Self, CurrencyError> {
        if base == target {
            return Err(CurrencyError::SameCurrency(base));
        }
        let rate = round_rate(rate);
        if rate <= Decimal::ZERO || rate > MAX_RATE {
            return Err(CurrencyError::InvalidRate(rate));
        }
        Ok(Self {
            base,
            target,
            rate,
            valid_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rate_is_rounded_to_four_places() {
        let rate = ExchangeRate::new(Currency::Usd, Currency::Eur, dec!(0.912349), Utc::now())
            .unwrap();
        assert_eq!(rate.rate, dec!(0.9123));
    }

    #[test]
    fn test_same_currency_rejected() {
        let err = ExchangeRate::new(Currency::Uah, Currency::Uah, dec!(1), Utc::now()).unwrap_err();
        assert_eq!(err, CurrencyError::SameCurrency(Currency::Uah));
    }

    #[test]
    fn test_non_positive_rate_rejected() {
        assert!(matches!(
            ExchangeRate::new(Currency::Usd, Currency::Uah, dec!(0), Utc::now()),
            Err(CurrencyError::InvalidRate(_))
        ));
        // Rounds to zero at four places.
        assert!(matches!(
            ExchangeRate::new(Currency::Usd, Currency::Uah, dec!(0.00004), Utc::now()),
            Err(CurrencyError::InvalidRate(_))
        ));
        assert!(matches!(
            ExchangeRate::new(Currency::Usd, Currency::Uah, dec!(-41.2), Utc::now()),
            Err(CurrencyError::InvalidRate(_))
        ));
    }

    #[test]
    fn test_oversized_rate_rejected() {
        assert!(ExchangeRate::new(Currency::Usd, Currency::Uah, MAX_RATE, Utc::now()).is_ok());
        assert!(matches!(
            ExchangeRate::new(Currency::Usd, Currency::Uah, Decimal::MAX, Utc::now()),
            Err(CurrencyError::InvalidRate(_))
        ));
    }
}
