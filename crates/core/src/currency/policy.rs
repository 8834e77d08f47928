//! Allow-list of currencies a cash desk may hold.

use aerodesk_shared::types::Currency;

use super::error::CurrencyError;

/// The configured currency allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyPolicy {
    allowed: Vec<Currency>,
}

impl CurrencyPolicy {
    /// Builds a policy from configured currencies, dropping duplicates.
    #[must_use]
    pub fn new(currencies: &[Currency]) -> Self {
        let mut allowed = currencies.to_vec();
        allowed.sort_unstable();
        allowed.dedup();
        Self { allowed }
    }

    /// Returns the enabled currencies in a stable order.
    #[must_use]
    pub fn allowed(&self) -> &[Currency] {
        &self.allowed
    }

    /// Returns true if `currency` is enabled.
    #[must_use]
    pub fn allows(&self, currency: Currency) -> bool {
        self.allowed.contains(&currency)
    }

    /// Parses an ISO code and checks it against the allow-list.
    ///
    /// # Errors
    ///
    /// `Unsupported` for unknown codes, `NotAllowed` for disabled ones.
    pub fn parse(&self, code: &str) -> Result<Currency, CurrencyError> {
        let currency: Currency = code
            .parse()
            .map_err(|_| CurrencyError::Unsupported(code.to_string()))?;
        self.ensure_allowed(currency)?;
        Ok(currency)
    }

    /// Checks an already-typed currency against the allow-list.
    ///
    /// # Errors
    ///
    /// `NotAllowed` when the currency is disabled.
    pub fn ensure_allowed(&self, currency: Currency) -> Result<(), CurrencyError> {
        if self.allows(currency) {
            Ok(())
        } else {
            Err(CurrencyError::NotAllowed(currency))
        }
    }
}

impl Default for CurrencyPolicy {
    fn default() -> Self {
        Self::new(&Currency::ALL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allows_everything() {
        let policy = CurrencyPolicy::default();
        for currency in Currency::ALL {
            assert!(policy.allows(currency));
        }
    }

    #[test]
    fn test_parse_rejects_unknown_code() {
        let policy = CurrencyPolicy::default();
        assert_eq!(
            policy.parse("GBP"),
            Err(CurrencyError::Unsupported("GBP".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_disabled_currency() {
        let policy = CurrencyPolicy::new(&[Currency::Uah]);
        assert_eq!(policy.parse("uah"), Ok(Currency::Uah));
        assert_eq!(
            policy.parse("EUR"),
            Err(CurrencyError::NotAllowed(Currency::Eur))
        );
    }

    #[test]
    fn test_duplicates_are_dropped() {
        let policy = CurrencyPolicy::new(&[Currency::Eur, Currency::Usd, Currency::Eur]);
        assert_eq!(policy.allowed(), &[Currency::Usd, Currency::Eur]);
    }
}
