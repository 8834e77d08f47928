//! Users, airports and cash desks.

pub mod error;
pub mod service;

pub use error::DirectoryError;
pub use service::{DirectoryService, NewUser};
