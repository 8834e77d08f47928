//! Currencies and decimal rounding rules.
//!
//! CRITICAL: Never use floating-point for money calculations.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Fractional digits kept for prices and balances.
pub const MONEY_SCALE: u32 = 2;

/// Fractional digits kept for exchange rates.
pub const RATE_SCALE: u32 = 4;

/// Largest value a money column (`numeric(12,2)`) holds: `9999999999.99`.
pub const MAX_MONEY: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, MONEY_SCALE);

/// Largest value a rate column (`numeric(12,4)`) holds: `99999999.9999`.
pub const MAX_RATE: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, RATE_SCALE);

/// ISO 4217 currency codes a cash desk can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar
    Usd,
    /// Euro
    Eur,
    /// Ukrainian Hryvnia
    Uah,
}

impl Currency {
    /// Every supported currency.
    pub const ALL: [Self; 3] = [Self::Usd, Self::Eur, Self::Uah];

    /// Returns the ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Uah => "UAH",
        }
    }
}

/// Rounds an amount to [`MONEY_SCALE`] using banker's rounding.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Rounds an exchange rate to [`RATE_SCALE`] using banker's rounding.
#[must_use]
pub fn round_rate(rate: Decimal) -> Decimal {
    rate.round_dp_with_strategy(RATE_SCALE, RoundingStrategy::MidpointNearestEven)
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "UAH" => Ok(Self::Uah),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

#[cfg(test)]
#[path = "money_tests.rs"]
mod tests;
