//! Shared types, errors, and configuration for AeroDesk.
//!
//! This crate provides common types used across all other crates:
//! - Currencies and decimal rounding rules
//! - Pagination types for list endpoints
//! - The error taxonomy shared by every layer
//! - Configuration management
//! - JWT claims and token service

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::AppConfig;
pub use error::{DomainError, ErrorKind};
pub use jwt::{JwtError, JwtService};
