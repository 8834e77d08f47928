//! Sales domain types.

use aerodesk_shared::types::Currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ticket status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Seat is held by the passenger.
    Sold,
    /// Ticket was refunded; the seat is free again.
    Refunded,
}

/// A fare as seen by the sale rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FareState {
    /// Fare ID.
    pub id: Uuid,
    /// Flight the fare belongs to.
    pub flight_id: Uuid,
    /// Price in the fare's base currency.
    pub base_price: Decimal,
    /// Currency of `base_price`.
    pub base_currency: Currency,
    /// Seats this fare may sell.
    pub seat_limit: i32,
    /// Seats sold so far.
    pub seats_sold: i32,
}

impl FareState {
    /// Seats still available.
    #[must_use]
    pub const fn seats_left(&self) -> i32 {
        self.seat_limit - self.seats_sold
    }
}

/// A ticket as seen by the refund rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketState {
    /// Ticket ID.
    pub id: Uuid,
    /// Shift the ticket was sold on.
    pub shift_id: Uuid,
    /// Current status.
    pub status: TicketStatus,
}

/// Price of a sale, frozen on the ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SaleQuote {
    /// Price charged, two decimals.
    pub price: Decimal,
    /// Currency charged.
    pub currency: Currency,
    /// Fare price in its base currency.
    pub price_in_base: Decimal,
    /// Rate applied, base to sale currency.
    pub exchange_rate: Decimal,
}
