//! Ticket sales repository.
//!
//! A sale or refund touches the shift, the fare, the ticket and the ledger
//! account in one database transaction. Shift, fare and account rows are
//! locked in that order by every path, so concurrent sales queue on the fare
//! rather than deadlock.

use aerodesk_core::{
    ledger::{LedgerError, TransactionReference},
    sales::{FareState, SaleError, SalesService, TicketState},
};
use aerodesk_shared::types::Currency;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::exchange_rate::ExchangeRateRepository;
use super::ledger::{LedgerRepository, PostingInput};
use crate::entities::{
    flight_fares, sea_orm_active_enums::TicketStatus, shifts, tickets,
};
use crate::error::{StoreResult, unique_violation};

/// Input for selling a ticket.
#[derive(Debug, Clone)]
pub struct SellTicketInput {
    /// Shift the sale is made on.
    pub shift_id: Uuid,
    /// Flight.
    pub flight_id: Uuid,
    /// Fare of the flight.
    pub fare_id: Uuid,
    /// Passenger full name.
    pub passenger_name: String,
    /// Seat, e.g. `12A`.
    pub seat_number: String,
    /// Currency the passenger pays in.
    pub currency: Currency,
}

/// Ticket repository.
#[derive(Debug, Clone)]
pub struct TicketRepository {
    db: DatabaseConnection,
}

impl TicketRepository {
    /// Creates a new ticket repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Sells a ticket.
    ///
    /// Checks run in order: shift open, fare belongs to the flight, fare not
    /// sold out, seat free, rate available, desk account exists. On success
    /// the fare's `seats_sold` is incremented, the ticket is stored with its
    /// price frozen, and a sale transaction is posted to the account.
    ///
    /// # Errors
    ///
    /// `InvalidPassengerName`/`InvalidSeatNumber`, `ShiftNotFound`,
    /// `ShiftNotOpen`, `FareNotFound`, `FareMismatch`, `SoldOut`, `SeatTaken`,
    /// `RateNotFound`, `AccountNotFound`.
    pub async fn sell(&self, input: SellTicketInput) -> StoreResult<tickets::Model> {
        let passenger_name = SalesService::normalize_passenger_name(&input.passenger_name)?;
        let seat_number = SalesService::normalize_seat_number(&input.seat_number)?;

        let txn = self.db.begin().await?;

        let shift = shifts::Entity::find_by_id(input.shift_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(SaleError::ShiftNotFound(input.shift_id))?;
        SalesService::check_shift(shift.id, shift.status.into())?;

        let fare = flight_fares::Entity::find_by_id(input.fare_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(SaleError::FareNotFound(input.fare_id))?;
        let fare_state = fare_state(&fare);
        if let Err(e) = SalesService::check_fare(&fare_state, input.flight_id) {
            warn!(fare_id = %fare.id, flight_id = %input.flight_id, error = %e, "Sale rejected");
            return Err(e.into());
        }

        let taken = tickets::Entity::find()
            .filter(tickets::Column::FlightId.eq(input.flight_id))
            .filter(tickets::Column::SeatNumber.eq(&seat_number))
            .filter(tickets::Column::Status.eq(TicketStatus::Sold))
            .count(&txn)
            .await?;
        SalesService::check_seat(input.flight_id, &seat_number, taken > 0)?;

        let latest_rate = if fare_state.base_currency == input.currency {
            None
        } else {
            ExchangeRateRepository::latest_value_in(
                &txn,
                fare_state.base_currency,
                input.currency,
                Utc::now(),
            )
            .await?
        };
        let quote = SalesService::quote(&fare_state, input.currency, latest_rate)?;

        let account = LedgerRepository::find_account(&txn, shift.cash_desk_id, input.currency)
            .await?
            .ok_or(LedgerError::AccountNotFound {
                cash_desk_id: shift.cash_desk_id,
                currency: input.currency,
            })?;

        let seats_sold = fare.seats_sold + 1;
        let mut active_fare: flight_fares::ActiveModel = fare.into();
        active_fare.seats_sold = Set(seats_sold);
        active_fare.update(&txn).await?;

        let ticket_id = Uuid::new_v4();
        let ticket = tickets::ActiveModel {
            id: Set(ticket_id),
            flight_id: Set(input.flight_id),
            fare_id: Set(input.fare_id),
            shift_id: Set(shift.id),
            passenger_name: Set(passenger_name),
            seat_number: Set(seat_number.clone()),
            price: Set(quote.price),
            currency: Set(quote.currency.into()),
            price_in_base: Set(quote.price_in_base),
            exchange_rate: Set(quote.exchange_rate),
            status: Set(TicketStatus::Sold),
            sold_at: Set(Utc::now().into()),
            refunded_at: Set(None),
        };
        let ticket = match ticket.insert(&txn).await {
            Ok(ticket) => ticket,
            Err(e) if unique_violation(&e).is_some() => {
                warn!(flight_id = %input.flight_id, seat = %seat_number, "Seat taken by a concurrent sale");
                return Err(SaleError::SeatTaken {
                    flight_id: input.flight_id,
                    seat_number,
                }
                .into());
            }
            Err(e) => return Err(e.into()),
        };

        LedgerRepository::apply_in(
            &txn,
            &shift,
            PostingInput {
                account_id: account.id,
                shift_id: shift.id,
                reference: TransactionReference::Sale { ticket_id },
                amount: quote.price,
                description: Some(format!("Ticket {} seat {}", ticket.id, ticket.seat_number)),
            },
        )
        .await?;
        txn.commit().await?;

        info!(
            ticket_id = %ticket.id,
            shift_id = %ticket.shift_id,
            flight_id = %ticket.flight_id,
            price = %ticket.price,
            currency = %quote.currency,
            "Ticket sold"
        );
        Ok(ticket)
    }

    /// Refunds a sold ticket on behalf of the cashier who sold it.
    ///
    /// The ticket is marked refunded, its fare seat released and the price
    /// posted back out of the account the sale went into.
    ///
    /// # Errors
    ///
    /// `TicketNotFound`, `NotShiftOwner`, `NotRefundable`, `ShiftNotOpen`,
    /// `InsufficientFunds`.
    pub async fn refund(&self, ticket_id: Uuid, cashier_id: Uuid) -> StoreResult<tickets::Model> {
        let txn = self.db.begin().await?;

        let ticket = tickets::Entity::find_by_id(ticket_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(SaleError::TicketNotFound(ticket_id))?;
        let shift = shifts::Entity::find_by_id(ticket.shift_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(SaleError::ShiftNotFound(ticket.shift_id))?;
        if let Err(e) = SalesService::check_owner(ticket.id, shift.cashier_id, cashier_id) {
            warn!(ticket_id = %ticket_id, cashier_id = %cashier_id, "Refund of a foreign ticket rejected");
            return Err(e.into());
        }

        let state = TicketState {
            id: ticket.id,
            shift_id: ticket.shift_id,
            status: ticket.status.into(),
        };
        if let Err(e) = SalesService::check_refund(&state, shift.status.into()) {
            warn!(ticket_id = %ticket_id, error = %e, "Refund rejected");
            return Err(e.into());
        }

        let fare = flight_fares::Entity::find_by_id(ticket.fare_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(SaleError::FareNotFound(ticket.fare_id))?;

        let currency: Currency = ticket.currency.into();
        let account = LedgerRepository::find_account(&txn, shift.cash_desk_id, currency)
            .await?
            .ok_or(LedgerError::AccountNotFound {
                cash_desk_id: shift.cash_desk_id,
                currency,
            })?;

        let seats_sold = (fare.seats_sold - 1).max(0);
        let mut active_fare: flight_fares::ActiveModel = fare.into();
        active_fare.seats_sold = Set(seats_sold);
        active_fare.update(&txn).await?;

        let price = ticket.price;
        let mut active: tickets::ActiveModel = ticket.into();
        active.status = Set(TicketStatus::Refunded);
        active.refunded_at = Set(Some(Utc::now().into()));
        let ticket = active.update(&txn).await?;

        LedgerRepository::apply_in(
            &txn,
            &shift,
            PostingInput {
                account_id: account.id,
                shift_id: shift.id,
                reference: TransactionReference::Refund {
                    ticket_id: ticket.id,
                },
                amount: -price,
                description: Some(format!("Refund of ticket {}", ticket.id)),
            },
        )
        .await?;
        txn.commit().await?;

        info!(ticket_id = %ticket.id, shift_id = %shift.id, price = %price, "Ticket refunded");
        Ok(ticket)
    }

    /// Gets a ticket by ID.
    ///
    /// # Errors
    ///
    /// `TicketNotFound`.
    pub async fn get(&self, ticket_id: Uuid) -> StoreResult<tickets::Model> {
        tickets::Entity::find_by_id(ticket_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| SaleError::TicketNotFound(ticket_id).into())
    }

    /// Lists the tickets sold on a shift, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_shift(&self, shift_id: Uuid) -> StoreResult<Vec<tickets::Model>> {
        Ok(tickets::Entity::find()
            .filter(tickets::Column::ShiftId.eq(shift_id))
            .order_by_asc(tickets::Column::SoldAt)
            .all(&self.db)
            .await?)
    }
}

fn fare_state(fare: &flight_fares::Model) -> FareState {
    FareState {
        id: fare.id,
        flight_id: fare.flight_id,
        base_price: fare.base_price,
        base_currency: fare.base_currency.into(),
        seat_limit: fare.seat_limit,
        seats_sold: fare.seats_sold,
    }
}
