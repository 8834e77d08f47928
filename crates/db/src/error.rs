//! Repository error type.

use aerodesk_core::{
    catalog::CatalogError, currency::CurrencyError, directory::DirectoryError,
    ledger::LedgerError, sales::SaleError, shift::ShiftError,
};
use aerodesk_shared::{DomainError, ErrorKind};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Error returned by every repository operation: a domain rule violation or
/// a database failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Shift lifecycle rule.
    #[error(transparent)]
    Shift(#[from] ShiftError),

    /// Ledger rule.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Sale or refund rule.
    #[error(transparent)]
    Sale(#[from] SaleError),

    /// Flight or fare rule.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// User, airport or cash desk rule.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// Currency rule.
    #[error(transparent)]
    Currency(#[from] CurrencyError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Result alias for repository operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl DomainError for StoreError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Shift(e) => e.kind(),
            Self::Ledger(e) => e.kind(),
            Self::Sale(e) => e.kind(),
            Self::Catalog(e) => e.kind(),
            Self::Directory(e) => e.kind(),
            Self::Currency(e) => e.kind(),
            Self::Database(_) => ErrorKind::Infrastructure,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Shift(e) => e.error_code(),
            Self::Ledger(e) => e.error_code(),
            Self::Sale(e) => e.error_code(),
            Self::Catalog(e) => e.error_code(),
            Self::Directory(e) => e.error_code(),
            Self::Currency(e) => e.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// Returns the driver message when `err` is a unique constraint violation.
pub(crate) fn unique_violation(err: &DbErr) -> Option<String> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) => Some(message),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_kind_delegates_to_domain_error() {
        let err = StoreError::from(ShiftError::NoOpenShift(Uuid::nil()));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.error_code(), "NO_OPEN_SHIFT");
    }

    #[test]
    fn test_database_error_is_infrastructure() {
        let err = StoreError::from(DbErr::Custom("boom".to_string()));
        assert_eq!(err.kind(), ErrorKind::Infrastructure);
        assert!(!err.kind().is_business());
    }

    #[test]
    fn test_custom_error_is_not_unique_violation() {
        assert!(unique_violation(&DbErr::Custom("boom".to_string())).is_none());
    }
}
