//! Multi-currency handling and exchange rates.

pub mod error;
pub mod exchange;
pub mod policy;
pub mod service;

#[cfg(test)]
mod props;

pub use error::CurrencyError;
pub use exchange::ExchangeRate;
pub use policy::CurrencyPolicy;
pub use service::CurrencyService;
