//! Ticket sales and refunds through the ledger.

mod common;

use aerodesk_core::{
    ledger::LedgerError,
    sales::SaleError,
};
use aerodesk_db::{
    LedgerRepository, ShiftRepository, StoreError, TicketRepository,
    entities::sea_orm_active_enums::{CurrencyCode, TicketStatus, TransactionKind},
    repositories::{FlightRepository, SellTicketInput},
};
use aerodesk_shared::types::{Currency, PageRequest};
use chrono::Duration;
use rust_decimal_macros::dec;
use uuid::Uuid;

use common::{Fixture, airport, cash_desk, fare, fixture, flight, rate, user};

fn sale(f: &Fixture, seat: &str, currency: Currency) -> SellTicketInput {
    SellTicketInput {
        shift_id: f.shift_id,
        flight_id: f.flight_id,
        fare_id: f.fare_id,
        passenger_name: "Olena Kovalenko".to_string(),
        seat_number: seat.to_string(),
        currency,
    }
}

async fn seats_sold(f: &Fixture) -> i32 {
    FlightRepository::new(f.db.clone())
        .list_fares(f.flight_id)
        .await
        .unwrap()
        .into_iter()
        .find(|fare| fare.id == f.fare_id)
        .map(|fare| fare.seats_sold)
        .unwrap()
}

#[tokio::test]
async fn test_usd_sale_and_refund() {
    let f = fixture().await;
    let tickets = TicketRepository::new(f.db.clone());
    let ledger = LedgerRepository::new(f.db.clone());

    let ticket = tickets.sell(sale(&f, "12a", Currency::Usd)).await.unwrap();
    assert_eq!(ticket.seat_number, "12A");
    assert_eq!(ticket.price, dec!(100.00));
    assert_eq!(ticket.currency, CurrencyCode::Usd);
    assert_eq!(ticket.exchange_rate, dec!(1));
    assert_eq!(ticket.status, TicketStatus::Sold);
    assert_eq!(seats_sold(&f).await, 1);
    assert_eq!(
        ledger.get_account(f.usd_account_id).await.unwrap().balance,
        dec!(100.00)
    );

    let refunded = tickets.refund(ticket.id, f.cashier_id).await.unwrap();
    assert_eq!(refunded.status, TicketStatus::Refunded);
    assert!(refunded.refunded_at.is_some());
    assert_eq!(seats_sold(&f).await, 0);
    assert_eq!(
        ledger.get_account(f.usd_account_id).await.unwrap().balance,
        dec!(0.00)
    );

    let (rows, total) = ledger
        .list_transactions(f.usd_account_id, &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(total, 2);
    let kinds: Vec<_> = rows.iter().map(|t| t.kind).collect();
    assert!(kinds.contains(&TransactionKind::Sale));
    assert!(kinds.contains(&TransactionKind::Refund));
    assert!(rows.iter().all(|t| t.reference_id == Some(ticket.id)));
}

#[tokio::test]
async fn test_eur_sale_freezes_price() {
    let f = fixture().await;
    let tickets = TicketRepository::new(f.db.clone());
    let eur_fare = fare(&f.db, f.flight_id, "Saver", dec!(50), Currency::Usd, 5).await;
    rate(&f.db, Currency::Usd, Currency::Eur, dec!(0.90), Duration::hours(2)).await;

    let ticket = tickets
        .sell(SellTicketInput {
            fare_id: eur_fare,
            ..sale(&f, "3C", Currency::Eur)
        })
        .await
        .unwrap();
    assert_eq!(ticket.price, dec!(45.00));
    assert_eq!(ticket.price_in_base, dec!(50));
    assert_eq!(ticket.exchange_rate, dec!(0.9000));

    let balance = LedgerRepository::new(f.db.clone())
        .get_account(f.eur_account_id)
        .await
        .unwrap()
        .balance;
    assert_eq!(balance, dec!(45.00));

    rate(&f.db, Currency::Usd, Currency::Eur, dec!(0.95), Duration::hours(1)).await;
    let stored = tickets.get(ticket.id).await.unwrap();
    assert_eq!(stored.price, dec!(45.00));
    assert_eq!(stored.exchange_rate, dec!(0.9000));

    let next = tickets
        .sell(SellTicketInput {
            fare_id: eur_fare,
            ..sale(&f, "3D", Currency::Eur)
        })
        .await
        .unwrap();
    assert_eq!(next.price, dec!(47.50));
}

#[tokio::test]
async fn test_missing_rate() {
    let f = fixture().await;
    let err = TicketRepository::new(f.db.clone())
        .sell(sale(&f, "1A", Currency::Eur))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Sale(SaleError::RateNotFound {
            base: Currency::Usd,
            target: Currency::Eur
        })
    ));
    assert_eq!(seats_sold(&f).await, 0);
}

#[tokio::test]
async fn test_missing_account() {
    let f = fixture().await;
    rate(&f.db, Currency::Usd, Currency::Uah, dec!(41.25), Duration::hours(1)).await;

    let err = TicketRepository::new(f.db.clone())
        .sell(sale(&f, "1A", Currency::Uah))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Ledger(LedgerError::AccountNotFound {
            currency: Currency::Uah,
            ..
        })
    ));
    assert_eq!(seats_sold(&f).await, 0);
}

#[tokio::test]
async fn test_sold_out_leaves_counter_unchanged() {
    let f = fixture().await;
    let tickets = TicketRepository::new(f.db.clone());
    tickets.sell(sale(&f, "1A", Currency::Usd)).await.unwrap();
    tickets.sell(sale(&f, "1B", Currency::Usd)).await.unwrap();

    let err = tickets.sell(sale(&f, "1C", Currency::Usd)).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Sale(SaleError::SoldOut { seat_limit: 2, .. })
    ));
    assert_eq!(seats_sold(&f).await, 2);
}

#[tokio::test]
async fn test_seat_taken_until_refunded() {
    let f = fixture().await;
    let tickets = TicketRepository::new(f.db.clone());
    let first = tickets.sell(sale(&f, "7F", Currency::Usd)).await.unwrap();

    let err = tickets.sell(sale(&f, "7f", Currency::Usd)).await.unwrap_err();
    assert!(matches!(err, StoreError::Sale(SaleError::SeatTaken { .. })));

    tickets.refund(first.id, f.cashier_id).await.unwrap();
    let again = tickets.sell(sale(&f, "7F", Currency::Usd)).await.unwrap();
    assert_eq!(again.seat_number, "7F");
}

#[tokio::test]
async fn test_fare_of_other_flight() {
    let f = fixture().await;
    let other_flight = flight(&f.db, "PS202", 100).await;

    let err = TicketRepository::new(f.db.clone())
        .sell(SellTicketInput {
            flight_id: other_flight,
            ..sale(&f, "1A", Currency::Usd)
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Sale(SaleError::FareMismatch { .. })));
}

#[tokio::test]
async fn test_sale_on_closed_shift() {
    let f = fixture().await;
    ShiftRepository::new(f.db.clone())
        .close(f.cashier_id)
        .await
        .unwrap();

    let err = TicketRepository::new(f.db.clone())
        .sell(sale(&f, "1A", Currency::Usd))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Sale(SaleError::ShiftNotOpen(_))));
}

#[tokio::test]
async fn test_invalid_passenger_and_seat() {
    let f = fixture().await;
    let tickets = TicketRepository::new(f.db.clone());

    let err = tickets
        .sell(SellTicketInput {
            passenger_name: "   ".to_string(),
            ..sale(&f, "1A", Currency::Usd)
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Sale(SaleError::InvalidPassengerName { .. })));

    let err = tickets.sell(sale(&f, "  ", Currency::Usd)).await.unwrap_err();
    assert!(matches!(err, StoreError::Sale(SaleError::InvalidSeatNumber(_))));
}

#[tokio::test]
async fn test_double_refund_adds_no_rows() {
    let f = fixture().await;
    let tickets = TicketRepository::new(f.db.clone());
    let ledger = LedgerRepository::new(f.db.clone());
    let ticket = tickets.sell(sale(&f, "2B", Currency::Usd)).await.unwrap();
    tickets.refund(ticket.id, f.cashier_id).await.unwrap();

    let err = tickets.refund(ticket.id, f.cashier_id).await.unwrap_err();
    assert!(matches!(err, StoreError::Sale(SaleError::NotRefundable(_))));

    let (_, total) = ledger
        .list_transactions(f.usd_account_id, &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(seats_sold(&f).await, 0);
}

#[tokio::test]
async fn test_refund_needs_cash_in_drawer() {
    let f = fixture().await;
    let tickets = TicketRepository::new(f.db.clone());
    let ledger = LedgerRepository::new(f.db.clone());
    let ticket = tickets.sell(sale(&f, "4A", Currency::Usd)).await.unwrap();
    ledger
        .withdraw(f.cashier_id, f.usd_account_id, dec!(60), None)
        .await
        .unwrap();

    let err = tickets.refund(ticket.id, f.cashier_id).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Ledger(LedgerError::InsufficientFunds { .. })
    ));

    let stored = tickets.get(ticket.id).await.unwrap();
    assert_eq!(stored.status, TicketStatus::Sold);
    assert_eq!(seats_sold(&f).await, 1);
}

#[tokio::test]
async fn test_refund_after_shift_closed() {
    let f = fixture().await;
    let tickets = TicketRepository::new(f.db.clone());
    let ticket = tickets.sell(sale(&f, "5A", Currency::Usd)).await.unwrap();
    ShiftRepository::new(f.db.clone())
        .close(f.cashier_id)
        .await
        .unwrap();

    let err = tickets.refund(ticket.id, f.cashier_id).await.unwrap_err();
    assert!(matches!(err, StoreError::Sale(SaleError::ShiftNotOpen(_))));
}

#[tokio::test]
async fn test_refund_by_another_cashier_is_refused() {
    let f = fixture().await;
    let tickets = TicketRepository::new(f.db.clone());
    let ledger = LedgerRepository::new(f.db.clone());
    let ticket = tickets.sell(sale(&f, "6C", Currency::Usd)).await.unwrap();

    let lwo = airport(&f.db, "LWO").await;
    let other_desk = cash_desk(&f.db, lwo).await;
    let other_cashier = user(&f.db, "cashier", Some(lwo)).await;
    ShiftRepository::new(f.db.clone())
        .open(other_cashier, other_desk)
        .await
        .unwrap();

    let err = tickets.refund(ticket.id, other_cashier).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Sale(SaleError::NotShiftOwner { cashier_id, .. }) if cashier_id == other_cashier
    ));

    let stored = tickets.get(ticket.id).await.unwrap();
    assert_eq!(stored.status, TicketStatus::Sold);
    assert_eq!(seats_sold(&f).await, 1);
    assert_eq!(
        ledger.get_account(f.usd_account_id).await.unwrap().balance,
        dec!(100.00)
    );
}

#[tokio::test]
async fn test_unknown_ticket() {
    let f = fixture().await;
    let err = TicketRepository::new(f.db.clone())
        .refund(Uuid::new_v4(), f.cashier_id)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Sale(SaleError::TicketNotFound(_))));
}

#[tokio::test]
async fn test_list_for_shift() {
    let f = fixture().await;
    let tickets = TicketRepository::new(f.db.clone());
    tickets.sell(sale(&f, "9A", Currency::Usd)).await.unwrap();
    tickets.sell(sale(&f, "9B", Currency::Usd)).await.unwrap();

    let sold = tickets.list_for_shift(f.shift_id).await.unwrap();
    assert_eq!(sold.len(), 2);
}
