//! Running and historical balance calculations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Balance before and after one posting.
///
/// `current == previous + amount`; the next posting's `previous` is this
/// posting's `current`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalance {
    /// Balance before the posting.
    pub previous: Decimal,
    /// Signed amount posted.
    pub amount: Decimal,
    /// Balance after the posting.
    pub current: Decimal,
}

impl RunningBalance {
    /// Applies `amount` on top of `previous`, or `None` on overflow.
    #[must_use]
    pub fn apply(previous: Decimal, amount: Decimal) -> Option<Self> {
        Some(Self {
            previous,
            amount,
            current: previous.checked_add(amount)?,
        })
    }
}

/// Sums signed transaction amounts.
///
/// An account's balance at any moment is the sum of the amounts of its
/// transactions recorded up to that moment.
#[must_use]
pub fn sum_amounts<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().fold(Decimal::ZERO, |acc, amount| acc + amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_running_balance_chain() {
        let first = RunningBalance::apply(Decimal::ZERO, dec!(100.00)).unwrap();
        let second = RunningBalance::apply(first.current, dec!(-40.50)).unwrap();

        assert_eq!(first.current, dec!(100.00));
        assert_eq!(second.previous, first.current);
        assert_eq!(second.current, dec!(59.50));
    }

    #[test]
    fn test_running_balance_overflow() {
        assert_eq!(RunningBalance::apply(dec!(100.00), Decimal::MAX), None);
    }

    #[test]
    fn test_sum_amounts() {
        assert_eq!(sum_amounts([]), Decimal::ZERO);
        assert_eq!(
            sum_amounts([dec!(100.00), dec!(45.00), dec!(-100.00)]),
            dec!(45.00)
        );
    }
}
