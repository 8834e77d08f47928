//! Cashier shift lifecycle.
//!
//! A shift pairs one cashier with one cash desk. Under normal operation it
//! moves `open -> closed` once; an admin may reopen a closed shift as a
//! compensating action under the same uniqueness rules as opening.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod props;

pub use error::{DeskUnavailableReason, ShiftError};
pub use service::ShiftService;
pub use types::{CashDeskProfile, CashierProfile, ShiftState, ShiftStatus};
