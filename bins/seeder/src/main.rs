//! Database seeder for AeroDesk development and testing.
//!
//! Seeds airports, cash desks with their currency accounts, one user per
//! role, upcoming flights with fares, and a week of exchange rates.
//! Running it against an already seeded database does nothing.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use aerodesk_core::currency::{CurrencyPolicy, ExchangeRate};
use aerodesk_db::{
    AirportRepository, CashDeskRepository, ExchangeRateRepository, FlightRepository,
    LedgerRepository, UserRepository,
    repositories::{CreateFareInput, CreateFlightInput, CreateUserInput},
};
use aerodesk_shared::{config::DatabaseConfig, types::Currency};

/// Password of every seeded user.
const SEED_PASSWORD: &str = "aerodesk-dev";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = aerodesk_db::connect(&DatabaseConfig {
        url,
        max_connections: 2,
        min_connections: 1,
        sqlx_logging: false,
    })
    .await
    .context("Failed to connect to database")?;

    if !AirportRepository::new(db.clone()).list().await?.is_empty() {
        println!("Database already seeded, skipping.");
        return Ok(());
    }

    println!("Seeding airports and cash desks...");
    let kbp = seed_airport(
        &db,
        ("KBP", "Boryspil International", "Kyiv"),
        &["KBP Terminal D / 1", "KBP Terminal D / 2"],
    )
    .await?;
    let lwo = seed_airport(
        &db,
        ("LWO", "Lviv Danylo Halytskyi", "Lviv"),
        &["LWO Main Hall"],
    )
    .await?;

    println!("Seeding users...");
    seed_user(&db, "Admin", "admin@aerodesk.dev", "admin", None).await?;
    seed_user(&db, "Accountant", "accountant@aerodesk.dev", "accountant", None).await?;
    seed_user(&db, "Sales Manager", "sales@aerodesk.dev", "sales_manager", None).await?;
    seed_user(&db, "Kyiv Cashier", "cashier.kbp@aerodesk.dev", "cashier", Some(kbp)).await?;
    seed_user(&db, "Lviv Cashier", "cashier.lwo@aerodesk.dev", "cashier", Some(lwo)).await?;

    println!("Seeding flights and fares...");
    seed_flights(&db).await?;

    println!("Seeding exchange rates...");
    seed_exchange_rates(&db).await?;

    println!("Seeding complete! Every user's password is {SEED_PASSWORD:?}.");
    Ok(())
}

/// Creates an airport and its desks, each with an account per currency.
async fn seed_airport(
    db: &DatabaseConnection,
    (code, name, city): (&str, &str, &str),
    desks: &[&str],
) -> anyhow::Result<Uuid> {
    let airport = AirportRepository::new(db.clone())
        .create(code, name, city)
        .await?;
    let desk_repo = CashDeskRepository::new(db.clone());
    let ledger = LedgerRepository::new(db.clone());
    let policy = CurrencyPolicy::default();

    for desk_name in desks {
        let desk = desk_repo.create(airport.id, desk_name).await?;
        for currency in Currency::ALL {
            ledger
                .get_or_create_account(desk.id, currency, &policy)
                .await?;
        }
        println!("  {code}: {desk_name}");
    }
    Ok(airport.id)
}

async fn seed_user(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    role: &str,
    airport_id: Option<Uuid>,
) -> anyhow::Result<()> {
    UserRepository::new(db.clone())
        .create(CreateUserInput {
            name: name.to_string(),
            email: email.to_string(),
            password: SEED_PASSWORD.to_string(),
            role: role.to_string(),
            airport_id,
        })
        .await?;
    println!("  {role}: {email}");
    Ok(())
}

/// Seeds flights departing over the next days, each with two fares.
async fn seed_flights(db: &DatabaseConnection) -> anyhow::Result<()> {
    let flights = [
        ("PS101", "KBP", "WAW", 2, 95, 180),
        ("PS205", "KBP", "LWO", 3, 70, 72),
        ("PS301", "LWO", "VIE", 4, 110, 150),
    ];
    let repo = FlightRepository::new(db.clone());

    for (number, origin, destination, days_ahead, minutes, capacity) in flights {
        let departure_time = Utc::now() + Duration::days(days_ahead);
        let flight = repo
            .create(CreateFlightInput {
                flight_number: number.to_string(),
                origin: origin.to_string(),
                destination: destination.to_string(),
                departure_time,
                arrival_time: departure_time + Duration::minutes(minutes),
                seat_capacity: capacity,
            })
            .await?;

        let business_seats = capacity / 6;
        let fares = [
            ("Economy", dec!(120.00), Currency::Usd, capacity - business_seats),
            ("Business", dec!(380.00), Currency::Eur, business_seats),
        ];
        for (name, base_price, base_currency, seat_limit) in fares {
            repo.create_fare(
                flight.id,
                CreateFareInput {
                    name: name.to_string(),
                    base_price,
                    base_currency,
                    seat_limit,
                },
            )
            .await?;
        }
        println!("  {number} {origin}->{destination}");
    }
    Ok(())
}

/// Seeds a week of daily rates for every currency pair.
async fn seed_exchange_rates(db: &DatabaseConnection) -> anyhow::Result<()> {
    let rates: [(Currency, Currency, Decimal); 6] = [
        (Currency::Usd, Currency::Eur, dec!(0.9200)),
        (Currency::Usd, Currency::Uah, dec!(41.3500)),
        (Currency::Eur, Currency::Usd, dec!(1.0870)),
        (Currency::Eur, Currency::Uah, dec!(44.9500)),
        (Currency::Uah, Currency::Usd, dec!(0.0242)),
        (Currency::Uah, Currency::Eur, dec!(0.0222)),
    ];
    let repo = ExchangeRateRepository::new(db.clone());

    for days_ago in (0..7).rev() {
        let valid_at = Utc::now() - Duration::days(days_ago);
        // Small daily drift so history is distinguishable.
        let drift = Decimal::new(days_ago, 3);
        for (base, target, rate) in rates {
            let rate = ExchangeRate::new(base, target, rate + rate * drift, valid_at)?;
            repo.record(rate, None).await?;
        }
    }
    println!("  {} rates", rates.len() * 7);
    Ok(())
}
