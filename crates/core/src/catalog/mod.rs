//! Flights and fares offered for sale.

pub mod error;
pub mod service;

pub use error::CatalogError;
pub use service::{CatalogService, NewFare, NewFlight};
