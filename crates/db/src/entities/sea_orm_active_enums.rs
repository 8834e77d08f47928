//! String-backed enums stored in the database, with conversions to the
//! core domain types.

use aerodesk_core::{
    auth::Role,
    ledger::TransactionKind as CoreTransactionKind,
    sales::TicketStatus as CoreTicketStatus,
    shift::ShiftStatus as CoreShiftStatus,
};
use aerodesk_shared::types::Currency;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `users.role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Cashier.
    #[sea_orm(string_value = "cashier")]
    Cashier,
    /// Administrator.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Accountant.
    #[sea_orm(string_value = "accountant")]
    Accountant,
    /// Sales manager.
    #[sea_orm(string_value = "sales_manager")]
    SalesManager,
}

impl From<UserRole> for Role {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Cashier => Self::Cashier,
            UserRole::Admin => Self::Admin,
            UserRole::Accountant => Self::Accountant,
            UserRole::SalesManager => Self::SalesManager,
        }
    }
}

impl From<Role> for UserRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Cashier => Self::Cashier,
            Role::Admin => Self::Admin,
            Role::Accountant => Self::Accountant,
            Role::SalesManager => Self::SalesManager,
        }
    }
}

/// `shifts.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    /// Open.
    #[sea_orm(string_value = "open")]
    Open,
    /// Closed.
    #[sea_orm(string_value = "closed")]
    Closed,
}

impl From<ShiftStatus> for CoreShiftStatus {
    fn from(status: ShiftStatus) -> Self {
        match status {
            ShiftStatus::Open => Self::Open,
            ShiftStatus::Closed => Self::Closed,
        }
    }
}

/// `tickets.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Sold.
    #[sea_orm(string_value = "sold")]
    Sold,
    /// Refunded.
    #[sea_orm(string_value = "refunded")]
    Refunded,
}

impl From<TicketStatus> for CoreTicketStatus {
    fn from(status: TicketStatus) -> Self {
        match status {
            TicketStatus::Sold => Self::Sold,
            TicketStatus::Refunded => Self::Refunded,
        }
    }
}

/// `transactions.kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Ticket sale.
    #[sea_orm(string_value = "sale")]
    Sale,
    /// Ticket refund.
    #[sea_orm(string_value = "refund")]
    Refund,
    /// Cash deposit.
    #[sea_orm(string_value = "deposit")]
    Deposit,
    /// Cash withdrawal.
    #[sea_orm(string_value = "withdrawal")]
    Withdrawal,
}

impl From<TransactionKind> for CoreTransactionKind {
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Sale => Self::Sale,
            TransactionKind::Refund => Self::Refund,
            TransactionKind::Deposit => Self::Deposit,
            TransactionKind::Withdrawal => Self::Withdrawal,
        }
    }
}

impl From<CoreTransactionKind> for TransactionKind {
    fn from(kind: CoreTransactionKind) -> Self {
        match kind {
            CoreTransactionKind::Sale => Self::Sale,
            CoreTransactionKind::Refund => Self::Refund,
            CoreTransactionKind::Deposit => Self::Deposit,
            CoreTransactionKind::Withdrawal => Self::Withdrawal,
        }
    }
}

/// ISO 4217 code columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(3))")]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    /// US dollar.
    #[sea_orm(string_value = "USD")]
    Usd,
    /// Euro.
    #[sea_orm(string_value = "EUR")]
    Eur,
    /// Ukrainian hryvnia.
    #[sea_orm(string_value = "UAH")]
    Uah,
}

impl From<CurrencyCode> for Currency {
    fn from(code: CurrencyCode) -> Self {
        match code {
            CurrencyCode::Usd => Self::Usd,
            CurrencyCode::Eur => Self::Eur,
            CurrencyCode::Uah => Self::Uah,
        }
    }
}

impl From<Currency> for CurrencyCode {
    fn from(currency: Currency) -> Self {
        match currency {
            Currency::Usd => Self::Usd,
            Currency::Eur => Self::Eur,
            Currency::Uah => Self::Uah,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveEnum;

    #[test]
    fn test_stored_values() {
        assert_eq!(ShiftStatus::Open.to_value(), "open");
        assert_eq!(TicketStatus::Sold.to_value(), "sold");
        assert_eq!(UserRole::SalesManager.to_value(), "sales_manager");
        assert_eq!(CurrencyCode::Uah.to_value(), "UAH");
    }

    #[test]
    fn test_role_conversion() {
        for role in Role::ALL {
            assert_eq!(Role::from(UserRole::from(role)), role);
        }
    }

    #[test]
    fn test_currency_conversion() {
        for currency in Currency::ALL {
            assert_eq!(Currency::from(CurrencyCode::from(currency)), currency);
        }
    }
}
