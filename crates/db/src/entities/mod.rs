//! `SeaORM` entity definitions.

pub mod prelude;

pub mod airports;
pub mod cash_desk_accounts;
pub mod cash_desks;
pub mod exchange_rates;
pub mod flight_fares;
pub mod flights;
pub mod sea_orm_active_enums;
pub mod shifts;
pub mod tickets;
pub mod transactions;
pub mod users;
