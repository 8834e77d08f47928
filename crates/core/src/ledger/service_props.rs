//! Property-based tests for LedgerService.
//!
//! - Balance equals the sum of accepted postings
//! - Rejected postings leave the balance untouched
//! - The balance never goes negative

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::balance::sum_amounts;
use super::error::LedgerError;
use super::service::LedgerService;
use super::types::{AccountState, PostingShift, TransactionKind};
use crate::shift::ShiftStatus;
use aerodesk_shared::types::Currency;

/// Strategy to generate positive decimal amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a transaction kind.
fn kind_strategy() -> impl Strategy<Value = TransactionKind> {
    prop_oneof![
        Just(TransactionKind::Sale),
        Just(TransactionKind::Refund),
        Just(TransactionKind::Deposit),
        Just(TransactionKind::Withdrawal),
    ]
}

fn fixture() -> (PostingShift, AccountState) {
    let shift = PostingShift {
        id: Uuid::new_v4(),
        cash_desk_id: Uuid::new_v4(),
        status: ShiftStatus::Open,
    };
    let account = AccountState {
        id: Uuid::new_v4(),
        cash_desk_id: shift.cash_desk_id,
        currency: Currency::Uah,
        balance: Decimal::ZERO,
    };
    (shift, account)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* sequence of postings, the cached balance SHALL equal the sum
    /// of the accepted amounts and SHALL never be negative.
    #[test]
    fn prop_balance_equals_sum_of_accepted(
        postings in prop::collection::vec((kind_strategy(), positive_amount()), 1..50),
    ) {
        let (shift, mut account) = fixture();
        let mut accepted = Vec::new();

        for (kind, magnitude) in postings {
            let amount = kind.signed(magnitude);
            match LedgerService::check_posting(&shift, &account, kind, amount) {
                Ok(running) => {
                    prop_assert_eq!(running.previous, account.balance);
                    account.balance = running.current;
                    accepted.push(amount);
                }
                Err(LedgerError::InsufficientFunds { balance, .. }) => {
                    prop_assert!(!kind.is_inflow());
                    prop_assert_eq!(balance, account.balance);
                }
                Err(other) => prop_assert!(false, "unexpected error {other}"),
            }
            prop_assert!(account.balance >= Decimal::ZERO);
            prop_assert_eq!(account.balance, sum_amounts(accepted.iter().copied()));
        }
    }

    /// *For any* outflow larger than the balance, the posting SHALL fail.
    #[test]
    fn prop_overdraft_rejected(balance in positive_amount(), extra in positive_amount()) {
        let (shift, mut account) = fixture();
        account.balance = balance;
        let result = LedgerService::check_posting(
            &shift,
            &account,
            TransactionKind::Withdrawal,
            -(balance + extra),
        );
        let is_insufficient = matches!(result, Err(LedgerError::InsufficientFunds { .. }));
        prop_assert!(is_insufficient);
    }

    /// *For any* kind, an amount with the wrong sign SHALL be rejected.
    #[test]
    fn prop_wrong_sign_rejected(kind in kind_strategy(), magnitude in positive_amount()) {
        let wrong = -kind.signed(magnitude);
        let result = LedgerService::check_amount(kind, wrong);
        let is_mismatch = matches!(result, Err(LedgerError::SignMismatch { .. }));
        prop_assert!(is_mismatch);
    }
}
