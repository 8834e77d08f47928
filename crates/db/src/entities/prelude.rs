//! Entity re-exports.

pub use super::airports::Entity as Airports;
pub use super::cash_desk_accounts::Entity as CashDeskAccounts;
pub use super::cash_desks::Entity as CashDesks;
pub use super::exchange_rates::Entity as ExchangeRates;
pub use super::flight_fares::Entity as FlightFares;
pub use super::flights::Entity as Flights;
pub use super::shifts::Entity as Shifts;
pub use super::tickets::Entity as Tickets;
pub use super::transactions::Entity as Transactions;
pub use super::users::Entity as Users;
