//! Shared setup for repository integration tests.
//!
//! Each test gets its own in-memory SQLite database with the migration
//! applied. The pool holds exactly one connection: the database lives as long
//! as that connection, and transactions from concurrent tasks queue on it.

#![allow(dead_code)]

use aerodesk_core::currency::{CurrencyPolicy, ExchangeRate};
use aerodesk_db::{
    AirportRepository, CashDeskRepository, ExchangeRateRepository, FlightRepository,
    LedgerRepository, ShiftRepository, UserRepository,
    migration::{Migrator, MigratorTrait},
    repositories::{CreateFareInput, CreateFlightInput, CreateUserInput},
};
use aerodesk_shared::types::Currency;
use chrono::{Duration, Utc};
use fake::{Fake, faker::name::en::Name};
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use uuid::Uuid;

pub const PASSWORD: &str = "correct-horse";

pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

/// A desk at an airport with a cashier on an open shift, USD and EUR
/// accounts, and one upcoming flight with a small USD fare.
pub struct Fixture {
    pub db: DatabaseConnection,
    pub airport_id: Uuid,
    pub cash_desk_id: Uuid,
    pub cashier_id: Uuid,
    pub admin_id: Uuid,
    pub shift_id: Uuid,
    pub usd_account_id: Uuid,
    pub eur_account_id: Uuid,
    pub flight_id: Uuid,
    pub fare_id: Uuid,
}

pub async fn airport(db: &DatabaseConnection, code: &str) -> Uuid {
    AirportRepository::new(db.clone())
        .create(code, &format!("{code} International"), "Kyiv")
        .await
        .expect("create airport")
        .id
}

pub async fn cash_desk(db: &DatabaseConnection, airport_id: Uuid) -> Uuid {
    CashDeskRepository::new(db.clone())
        .create(airport_id, &format!("Desk {}", &Uuid::new_v4().to_string()[..8]))
        .await
        .expect("create cash desk")
        .id
}

pub async fn user(db: &DatabaseConnection, role: &str, airport_id: Option<Uuid>) -> Uuid {
    UserRepository::new(db.clone())
        .create(CreateUserInput {
            name: Name().fake(),
            email: format!("{role}-{}@aerodesk.test", Uuid::new_v4().simple()),
            password: PASSWORD.to_string(),
            role: role.to_string(),
            airport_id,
        })
        .await
        .expect("create user")
        .id
}

pub async fn flight(db: &DatabaseConnection, flight_number: &str, seat_capacity: i32) -> Uuid {
    let departure_time = Utc::now() + Duration::days(3);
    FlightRepository::new(db.clone())
        .create(CreateFlightInput {
            flight_number: flight_number.to_string(),
            origin: "KBP".to_string(),
            destination: "WAW".to_string(),
            departure_time,
            arrival_time: departure_time + Duration::minutes(95),
            seat_capacity,
        })
        .await
        .expect("create flight")
        .id
}

pub async fn fare(
    db: &DatabaseConnection,
    flight_id: Uuid,
    name: &str,
    base_price: Decimal,
    base_currency: Currency,
    seat_limit: i32,
) -> Uuid {
    FlightRepository::new(db.clone())
        .create_fare(
            flight_id,
            CreateFareInput {
                name: name.to_string(),
                base_price,
                base_currency,
                seat_limit,
            },
        )
        .await
        .expect("create fare")
        .id
}

pub async fn account(db: &DatabaseConnection, cash_desk_id: Uuid, currency: Currency) -> Uuid {
    LedgerRepository::new(db.clone())
        .get_or_create_account(cash_desk_id, currency, &CurrencyPolicy::default())
        .await
        .expect("create account")
        .id
}

pub async fn rate(db: &DatabaseConnection, base: Currency, target: Currency, rate: Decimal, age: Duration) {
    let rate = ExchangeRate::new(base, target, rate, Utc::now() - age).expect("valid rate");
    ExchangeRateRepository::new(db.clone())
        .record(rate, None)
        .await
        .expect("record rate");
}

pub async fn fixture() -> Fixture {
    let db = setup_db().await;
    let airport_id = airport(&db, "KBP").await;
    let cash_desk_id = cash_desk(&db, airport_id).await;
    let cashier_id = user(&db, "cashier", Some(airport_id)).await;
    let admin_id = user(&db, "admin", None).await;
    let usd_account_id = account(&db, cash_desk_id, Currency::Usd).await;
    let eur_account_id = account(&db, cash_desk_id, Currency::Eur).await;
    let flight_id = flight(&db, "PS101", 180).await;
    let fare_id = fare(&db, flight_id, "Economy", Decimal::new(10000, 2), Currency::Usd, 2).await;
    let shift_id = ShiftRepository::new(db.clone())
        .open(cashier_id, cash_desk_id)
        .await
        .expect("open shift")
        .id;

    Fixture {
        db,
        airport_id,
        cash_desk_id,
        cashier_id,
        admin_id,
        shift_id,
        usd_account_id,
        eur_account_id,
        flight_id,
        fare_id,
    }
}
