//! Common types used across the application.

pub mod money;
pub mod pagination;

pub use money::{Currency, MAX_MONEY, MAX_RATE, MONEY_SCALE, RATE_SCALE, round_money, round_rate};
pub use pagination::{PageRequest, PageResponse};
