//! Roles, permissions and password hashing.
//!
//! Every authorization decision goes through [`Role::allows`]; handlers never
//! compare role strings themselves.

mod password;

pub use password::{
    MIN_PASSWORD_LENGTH, PasswordError, hash_password, validate_password_policy, verify_password,
};

use aerodesk_shared::{DomainError, ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Staff roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Works a cash desk: opens shifts, sells and refunds tickets.
    Cashier,
    /// Manages users, desks and airports; may reopen shifts.
    Admin,
    /// Audits the ledger and maintains exchange rates.
    Accountant,
    /// Maintains the flight and fare catalog.
    SalesManager,
}

/// Actions guarded by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Create users and reset their passwords.
    ManageUsers,
    /// Create airports.
    ManageAirports,
    /// Create and update cash desks and their accounts.
    ManageCashDesks,
    /// Create flights and fares.
    ManageCatalog,
    /// Read flights and fares.
    ViewCatalog,
    /// Record exchange rates.
    ManageExchangeRates,
    /// Open and close own shift.
    OperateShift,
    /// Reopen a closed shift.
    ReopenShift,
    /// Sell tickets on own open shift.
    SellTickets,
    /// Refund tickets.
    RefundTickets,
    /// Deposit or withdraw cash on own open shift.
    MoveCash,
    /// Read balances, transactions and shift history.
    ViewLedger,
}

impl Role {
    /// Every role.
    pub const ALL: [Self; 4] = [Self::Cashier, Self::Admin, Self::Accountant, Self::SalesManager];

    /// Returns true if this role may perform `permission`.
    #[must_use]
    pub const fn allows(self, permission: Permission) -> bool {
        use Permission as P;

        match permission {
            P::ManageUsers | P::ManageAirports | P::ManageCashDesks | P::ReopenShift => {
                matches!(self, Self::Admin)
            }
            P::ManageCatalog => matches!(self, Self::Admin | Self::SalesManager),
            P::ViewCatalog => true,
            P::ManageExchangeRates | P::ViewLedger => matches!(self, Self::Admin | Self::Accountant),
            P::OperateShift | P::SellTickets | P::RefundTickets | P::MoveCash => {
                matches!(self, Self::Cashier)
            }
        }
    }

    /// Checks `permission`, returning an error naming the role on refusal.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` when the role lacks the permission.
    pub const fn authorize(self, permission: Permission) -> Result<(), AccessDenied> {
        if self.allows(permission) {
            Ok(())
        } else {
            Err(AccessDenied {
                role: self,
                permission,
            })
        }
    }

    /// Returns the stored tag for this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cashier => "cashier",
            Self::Admin => "admin",
            Self::Accountant => "accountant",
            Self::SalesManager => "sales_manager",
        }
    }

    /// Cashiers are bound to a home airport; other roles are not.
    #[must_use]
    pub const fn requires_airport(self) -> bool {
        matches!(self, Self::Cashier)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("Unknown role: {s}"))
    }
}

/// A role attempted an action it is not allowed to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("role '{role}' may not perform {permission:?}")]
pub struct AccessDenied {
    /// The acting role.
    pub role: Role,
    /// The refused permission.
    pub permission: Permission,
}

impl DomainError for AccessDenied {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Forbidden
    }

    fn error_code(&self) -> &'static str {
        "FORBIDDEN"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case(Role::Cashier, Permission::SellTickets, true)]
    #[case(Role::Cashier, Permission::RefundTickets, true)]
    #[case(Role::Cashier, Permission::MoveCash, true)]
    #[case(Role::Cashier, Permission::ReopenShift, false)]
    #[case(Role::Cashier, Permission::ViewLedger, false)]
    #[case(Role::Admin, Permission::ReopenShift, true)]
    #[case(Role::Admin, Permission::SellTickets, false)]
    #[case(Role::Admin, Permission::ManageCatalog, true)]
    #[case(Role::Accountant, Permission::ManageExchangeRates, true)]
    #[case(Role::Accountant, Permission::ManageUsers, false)]
    #[case(Role::SalesManager, Permission::ManageCatalog, true)]
    #[case(Role::SalesManager, Permission::ManageExchangeRates, false)]
    fn test_role_permissions(
        #[case] role: Role,
        #[case] permission: Permission,
        #[case] allowed: bool,
    ) {
        assert_eq!(role.allows(permission), allowed);
        assert_eq!(role.authorize(permission).is_ok(), allowed);
    }

    #[test]
    fn test_every_role_can_view_catalog() {
        for role in Role::ALL {
            assert!(role.allows(Permission::ViewCatalog));
        }
    }

    #[test]
    fn test_only_cashier_operates_shift() {
        let operators: Vec<Role> = Role::ALL
            .into_iter()
            .filter(|r| r.allows(Permission::OperateShift))
            .collect();
        assert_eq!(operators, vec![Role::Cashier]);
    }

    #[test]
    fn test_role_round_trips_through_str() {
        for role in Role::ALL {
            assert_eq!(Role::from_str(role.as_str()).unwrap(), role);
        }
        assert!(Role::from_str("owner").is_err());
        assert!(Role::from_str("Cashier").is_err());
    }

    #[test]
    fn test_access_denied_is_forbidden() {
        let err = Role::Accountant.authorize(Permission::SellTickets).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert_eq!(err.to_string(), "role 'accountant' may not perform SellTickets");
    }

    #[test]
    fn test_only_cashier_requires_airport() {
        assert!(Role::Cashier.requires_airport());
        assert!(!Role::Admin.requires_airport());
    }
}
