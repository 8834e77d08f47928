//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod airport;
pub mod cash_desk;
pub mod exchange_rate;
pub mod flight;
pub mod ledger;
pub mod shift;
pub mod ticket;
pub mod user;

pub use airport::AirportRepository;
pub use cash_desk::{CashDeskRepository, UpdateCashDeskInput};
pub use exchange_rate::ExchangeRateRepository;
pub use flight::{CreateFareInput, CreateFlightInput, FlightRepository};
pub use ledger::{LedgerRepository, PostingInput};
pub use shift::{ShiftFilter, ShiftRepository};
pub use ticket::{SellTicketInput, TicketRepository};
pub use user::{CreateUserInput, UserRepository};
