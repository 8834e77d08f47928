//! Ticket sales and refunds.
//!
//! A sale allocates a fare seat, prices it in the cashier's currency and
//! posts the cash to the ledger. A refund reverses all three.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod props;

pub use error::SaleError;
pub use service::SalesService;
pub use types::{FareState, SaleQuote, TicketState, TicketStatus};
