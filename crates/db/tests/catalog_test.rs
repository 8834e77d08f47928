//! Flights, fares and exchange rates.

mod common;

use aerodesk_core::{catalog::CatalogError, currency::CurrencyError};
use aerodesk_db::{
    ExchangeRateRepository, FlightRepository, StoreError,
    repositories::{CreateFareInput, CreateFlightInput},
};
use aerodesk_shared::types::Currency;
use chrono::{Duration, Utc};
use rust_decimal_macros::dec;

use common::{fare, flight, rate, setup_db};

#[tokio::test]
async fn test_duplicate_flight_number() {
    let db = setup_db().await;
    flight(&db, "PS101", 180).await;

    let departure_time = Utc::now() + Duration::days(10);
    let err = FlightRepository::new(db.clone())
        .create(CreateFlightInput {
            flight_number: "ps101".to_string(),
            origin: "KBP".to_string(),
            destination: "LHR".to_string(),
            departure_time,
            arrival_time: departure_time + Duration::hours(3),
            seat_capacity: 120,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Catalog(CatalogError::DuplicateFlight { .. })));
}

#[tokio::test]
async fn test_list_upcoming_skips_departed() {
    let db = setup_db().await;
    let upcoming = flight(&db, "PS101", 180).await;
    let departed = Utc::now() - Duration::days(1);
    FlightRepository::new(db.clone())
        .create(CreateFlightInput {
            flight_number: "PS900".to_string(),
            origin: "KBP".to_string(),
            destination: "IST".to_string(),
            departure_time: departed,
            arrival_time: departed + Duration::hours(2),
            seat_capacity: 50,
        })
        .await
        .unwrap();

    let flights = FlightRepository::new(db.clone())
        .list_upcoming(Utc::now())
        .await
        .unwrap();
    assert_eq!(flights.len(), 1);
    assert_eq!(flights[0].id, upcoming);
}

#[tokio::test]
async fn test_fares_cannot_exceed_capacity() {
    let db = setup_db().await;
    let flight_id = flight(&db, "PS101", 100).await;
    fare(&db, flight_id, "Economy", dec!(120), Currency::Usd, 90).await;

    let repo = FlightRepository::new(db.clone());
    let err = repo
        .create_fare(
            flight_id,
            CreateFareInput {
                name: "Business".to_string(),
                base_price: dec!(400),
                base_currency: Currency::Eur,
                seat_limit: 11,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Catalog(CatalogError::CapacityExceeded {
            requested: 11,
            available: 10
        })
    ));

    let business = repo
        .create_fare(
            flight_id,
            CreateFareInput {
                name: "Business".to_string(),
                base_price: dec!(400),
                base_currency: Currency::Eur,
                seat_limit: 10,
            },
        )
        .await
        .unwrap();
    assert_eq!(business.seats_sold, 0);
    assert_eq!(repo.list_fares(flight_id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_duplicate_fare_name() {
    let db = setup_db().await;
    let flight_id = flight(&db, "PS101", 100).await;
    fare(&db, flight_id, "Economy", dec!(120), Currency::Usd, 10).await;

    let err = FlightRepository::new(db.clone())
        .create_fare(
            flight_id,
            CreateFareInput {
                name: "economy".to_string(),
                base_price: dec!(99),
                base_currency: Currency::Usd,
                seat_limit: 10,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Catalog(CatalogError::DuplicateFareName { .. })));
}

#[tokio::test]
async fn test_latest_rate_wins() {
    let db = setup_db().await;
    rate(&db, Currency::Usd, Currency::Uah, dec!(41.10), Duration::days(2)).await;
    rate(&db, Currency::Usd, Currency::Uah, dec!(41.35), Duration::days(1)).await;
    rate(&db, Currency::Usd, Currency::Eur, dec!(0.92), Duration::days(1)).await;
    let repo = ExchangeRateRepository::new(db.clone());

    let latest = repo.latest(Currency::Usd, Currency::Uah, Utc::now()).await.unwrap();
    assert_eq!(latest.rate, dec!(41.35));

    let earlier = repo
        .latest(Currency::Usd, Currency::Uah, Utc::now() - Duration::hours(36))
        .await
        .unwrap();
    assert_eq!(earlier.rate, dec!(41.10));

    assert_eq!(repo.list(Some(Currency::Usd), Some(Currency::Uah)).await.unwrap().len(), 2);
    assert_eq!(repo.list(None, None).await.unwrap().len(), 3);

    let err = repo
        .latest(Currency::Eur, Currency::Usd, Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Currency(CurrencyError::RateNotFound { .. })));
}
