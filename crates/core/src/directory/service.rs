//! Input normalisation for directory records.

use uuid::Uuid;

use super::error::DirectoryError;
use crate::auth::{PasswordError, Role, hash_password, validate_password_policy};

/// Longest accepted person, airport or desk name.
pub const MAX_NAME_LENGTH: usize = 100;

/// A validated user ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Lower-cased email.
    pub email: String,
    /// Argon2 PHC hash.
    pub password_hash: String,
    /// Role.
    pub role: Role,
    /// Home airport.
    pub airport_id: Option<Uuid>,
}

/// Directory rules.
pub struct DirectoryService;

impl DirectoryService {
    /// Validates a new user and hashes the password.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field; `AirportRequired` for cashiers
    /// without an airport.
    pub fn prepare_user(
        name: &str,
        email: &str,
        password: &str,
        role: &str,
        airport_id: Option<Uuid>,
    ) -> Result<NewUser, DirectoryError> {
        let name = Self::normalize_name("name", name)?;
        let email = Self::normalize_email(email)?;
        let role: Role = role
            .parse()
            .map_err(|_| DirectoryError::UnknownRole(role.to_string()))?;
        if role.requires_airport() && airport_id.is_none() {
            return Err(DirectoryError::AirportRequired);
        }
        let password_hash = Self::hash_new_password(password)?;
        Ok(NewUser {
            name,
            email,
            password_hash,
            role,
            airport_id,
        })
    }

    /// Checks the password policy and hashes the password.
    ///
    /// # Errors
    ///
    /// `WeakPassword` or `PasswordHash`.
    pub fn hash_new_password(password: &str) -> Result<String, DirectoryError> {
        validate_password_policy(password).map_err(|e| match e {
            PasswordError::TooShort => {
                DirectoryError::WeakPassword(crate::auth::MIN_PASSWORD_LENGTH)
            }
            other => DirectoryError::PasswordHash(other.to_string()),
        })?;
        hash_password(password).map_err(|e| DirectoryError::PasswordHash(e.to_string()))
    }

    /// Trims and lower-cases an email and checks its shape.
    ///
    /// # Errors
    ///
    /// `InvalidEmail`.
    pub fn normalize_email(email: &str) -> Result<String, DirectoryError> {
        let email = email.trim().to_lowercase();
        let valid = match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
                    && !domain.contains('@')
                    && !email.chars().any(char::is_whitespace)
            }
            None => false,
        };
        if valid {
            Ok(email)
        } else {
            Err(DirectoryError::InvalidEmail(email))
        }
    }

    /// Trims a name and checks its length.
    ///
    /// # Errors
    ///
    /// `InvalidName`.
    pub fn normalize_name(field: &'static str, name: &str) -> Result<String, DirectoryError> {
        let name = name.trim();
        if name.is_empty() || name.chars().count() > MAX_NAME_LENGTH {
            return Err(DirectoryError::InvalidName {
                field,
                max: MAX_NAME_LENGTH,
            });
        }
        Ok(name.to_string())
    }

    /// Upper-cases a three-letter IATA airport code.
    ///
    /// # Errors
    ///
    /// `InvalidAirportCode`.
    pub fn normalize_airport_code(code: &str) -> Result<String, DirectoryError> {
        let code = code.trim().to_uppercase();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase()) {
            Ok(code)
        } else {
            Err(DirectoryError::InvalidAirportCode(code))
        }
    }
}
