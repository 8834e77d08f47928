//! Currency service for conversion operations.
//!
//! Prices are converted with banker's rounding (`MidpointNearestEven`) to
//! two fractional digits.

use aerodesk_shared::types::{Currency, round_money};
use rust_decimal::Decimal;

use super::error::CurrencyError;

/// Currency service for conversion operations.
pub struct CurrencyService;

impl CurrencyService {
    /// Converts a base price into the sale currency.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use aerodesk_core::currency::CurrencyService;
    ///
    /// assert_eq!(CurrencyService::convert_price(dec!(50), dec!(0.90)), dec!(45.00));
    /// ```
    #[must_use]
    pub fn convert_price(base_price: Decimal, rate: Decimal) -> Decimal {
        round_money(base_price * rate)
    }

    /// Picks the rate for a sale: identity for the same currency, otherwise
    /// the latest recorded rate for `base -> target`.
    ///
    /// # Errors
    ///
    /// `RateNotFound` when the currencies differ and no rate is recorded.
    pub fn resolve_rate(
        base: Currency,
        target: Currency,
        latest: Option<Decimal>,
    ) -> Result<Decimal, CurrencyError> {
        if base == target {
            return Ok(Decimal::ONE);
        }
        latest.ok_or(CurrencyError::RateNotFound { base, target })
    }
}
