//! Directory errors.

use aerodesk_shared::{DomainError, ErrorKind};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while managing users, airports and cash desks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// User does not exist.
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    /// Email already registered.
    #[error("Email already registered: {0}")]
    EmailTaken(String),

    /// Email is malformed.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Name is empty or too long.
    #[error("{field} must be 1 to {max} characters")]
    InvalidName {
        /// Which name.
        field: &'static str,
        /// Maximum length.
        max: usize,
    },

    /// Role tag is not recognised.
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// Cashiers need a home airport.
    #[error("Cashiers must be assigned to an airport")]
    AirportRequired,

    /// Password too short.
    #[error("Password must be at least {0} characters")]
    WeakPassword(usize),

    /// Email/password pair does not match.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Current password does not match on self-service change.
    #[error("Current password is incorrect")]
    WrongCurrentPassword,

    /// Hashing failed.
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    /// Airport does not exist.
    #[error("Airport not found: {0}")]
    AirportNotFound(Uuid),

    /// Airport code is not three letters.
    #[error("Invalid airport code: {0:?}")]
    InvalidAirportCode(String),

    /// Airport code already used.
    #[error("Airport code already exists: {0}")]
    DuplicateAirportCode(String),

    /// Cash desk does not exist.
    #[error("Cash desk not found: {0}")]
    CashDeskNotFound(Uuid),

    /// Cash desk name already used.
    #[error("Cash desk name already exists: {0}")]
    DuplicateCashDeskName(String),
}

impl DomainError for DirectoryError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::UserNotFound(_) | Self::AirportNotFound(_) | Self::CashDeskNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::EmailTaken(_) | Self::DuplicateAirportCode(_) | Self::DuplicateCashDeskName(_) => {
                ErrorKind::Conflict
            }
            Self::InvalidEmail(_)
            | Self::InvalidName { .. }
            | Self::UnknownRole(_)
            | Self::AirportRequired
            | Self::WeakPassword(_)
            | Self::InvalidAirportCode(_)
            | Self::WrongCurrentPassword => ErrorKind::InvalidInput,
            Self::InvalidCredentials => ErrorKind::Unauthorized,
            Self::PasswordHash(_) => ErrorKind::Infrastructure,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::EmailTaken(_) => "EMAIL_TAKEN",
            Self::InvalidEmail(_) => "INVALID_EMAIL",
            Self::InvalidName { .. } => "INVALID_NAME",
            Self::UnknownRole(_) => "UNKNOWN_ROLE",
            Self::AirportRequired => "AIRPORT_REQUIRED",
            Self::WeakPassword(_) => "WEAK_PASSWORD",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::WrongCurrentPassword => "WRONG_CURRENT_PASSWORD",
            Self::PasswordHash(_) => "PASSWORD_HASH_ERROR",
            Self::AirportNotFound(_) => "AIRPORT_NOT_FOUND",
            Self::InvalidAirportCode(_) => "INVALID_AIRPORT_CODE",
            Self::DuplicateAirportCode(_) => "DUPLICATE_AIRPORT_CODE",
            Self::CashDeskNotFound(_) => "CASH_DESK_NOT_FOUND",
            Self::DuplicateCashDeskName(_) => "DUPLICATE_CASH_DESK_NAME",
        }
    }
}
