//! Application-wide error types.
//!
//! Every layer reports failures as one of a small set of [`ErrorKind`]s.
//! Domain errors from the core implement [`DomainError`] so that callers can
//! map them to a response without matching on each variant.

/// Error taxonomy shared by all layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller is not authenticated.
    Unauthorized,
    /// The caller's role does not allow the operation.
    Forbidden,
    /// A referenced entity does not exist.
    NotFound,
    /// Malformed amount, currency, date or other input.
    InvalidInput,
    /// A uniqueness or state invariant would be violated.
    Conflict,
    /// The account balance cannot cover the movement.
    InsufficientFunds,
    /// No exchange rate is known for the currency pair.
    RateNotFound,
    /// Database or other infrastructure failure.
    Infrastructure,
}

impl ErrorKind {
    /// Returns the HTTP status code for this kind.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::InvalidInput => 400,
            Self::Conflict => 409,
            Self::InsufficientFunds | Self::RateNotFound => 422,
            Self::Infrastructure => 500,
        }
    }

    /// Returns true if the caller can recover by changing the request.
    #[must_use]
    pub const fn is_business(self) -> bool {
        !matches!(self, Self::Infrastructure)
    }
}

/// Implemented by every error that crosses a crate boundary.
pub trait DomainError: std::error::Error {
    /// Returns the taxonomy kind of this error.
    fn kind(&self) -> ErrorKind;

    /// Returns a stable, machine-readable error code.
    fn error_code(&self) -> &'static str;
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
