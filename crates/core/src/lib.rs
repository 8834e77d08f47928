//! Core business logic for `AeroDesk`.
//!
//! This crate holds the ground-office rules with no web or database
//! dependencies. Repositories load state, ask these services whether an
//! operation is allowed, and persist the outcome.
//!
//! # Modules
//!
//! - `auth` - Roles, permissions and password hashing
//! - `shift` - Opening, closing and reopening cashier shifts
//! - `ledger` - Cash desk accounts and running balances
//! - `sales` - Ticket sale and refund rules
//! - `catalog` - Flights and fares
//! - `currency` - Supported currencies and exchange rates
//! - `directory` - Users, airports and cash desks

pub mod auth;
pub mod catalog;
pub mod currency;
pub mod directory;
pub mod ledger;
pub mod sales;
pub mod shift;
