//! Currency and exchange rate errors.

use aerodesk_shared::types::Currency;
use aerodesk_shared::{DomainError, ErrorKind};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while parsing currencies or recording rates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    /// Code is not an ISO currency the system knows.
    #[error("Unsupported currency: {0}")]
    Unsupported(String),

    /// Currency is known but not enabled for cash desk accounts.
    #[error("Currency {0} is not enabled")]
    NotAllowed(Currency),

    /// Exchange rate must be positive.
    #[error("Exchange rate must be positive, got {0}")]
    InvalidRate(Decimal),

    /// Source and target currencies must be different.
    #[error("Cannot record a rate from {0} to itself")]
    SameCurrency(Currency),

    /// No rate recorded for the pair.
    #[error("No exchange rate from {base} to {target}")]
    RateNotFound {
        /// Base currency.
        base: Currency,
        /// Target currency.
        target: Currency,
    },
}

impl DomainError for CurrencyError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Unsupported(_)
            | Self::NotAllowed(_)
            | Self::InvalidRate(_)
            | Self::SameCurrency(_) => ErrorKind::InvalidInput,
            Self::RateNotFound { .. } => ErrorKind::RateNotFound,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Unsupported(_) => "UNSUPPORTED_CURRENCY",
            Self::NotAllowed(_) => "CURRENCY_NOT_ALLOWED",
            Self::InvalidRate(_) => "INVALID_EXCHANGE_RATE",
            Self::SameCurrency(_) => "SAME_CURRENCY_EXCHANGE",
            Self::RateNotFound { .. } => "RATE_NOT_FOUND",
        }
    }
}
