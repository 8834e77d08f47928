//! Multi-currency cash ledger.
//!
//! This module implements the cash-desk ledger rules:
//! - Transaction kinds and their sign conventions
//! - Typed references from a transaction to what caused it
//! - Posting validation (open shift, desk ownership, funds)
//! - Running and historical balance calculations
//! - Error types for ledger operations

pub mod balance;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use balance::{RunningBalance, sum_amounts};
pub use error::LedgerError;
pub use service::LedgerService;
pub use types::{AccountState, PostingShift, TransactionKind, TransactionReference};
