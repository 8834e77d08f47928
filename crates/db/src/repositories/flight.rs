//! Flight and fare repository.

use aerodesk_core::catalog::{CatalogError, CatalogService};
use aerodesk_shared::types::Currency;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::{flight_fares, flights};
use crate::error::{StoreResult, unique_violation};

/// Input for scheduling a flight.
#[derive(Debug, Clone)]
pub struct CreateFlightInput {
    /// Flight number, e.g. `PS101`.
    pub flight_number: String,
    /// Origin IATA code.
    pub origin: String,
    /// Destination IATA code.
    pub destination: String,
    /// Scheduled departure.
    pub departure_time: DateTime<Utc>,
    /// Scheduled arrival.
    pub arrival_time: DateTime<Utc>,
    /// Seats on the aircraft.
    pub seat_capacity: i32,
}

/// Input for adding a fare to a flight.
#[derive(Debug, Clone)]
pub struct CreateFareInput {
    /// Fare class name.
    pub name: String,
    /// Price in `base_currency`.
    pub base_price: Decimal,
    /// Currency the fare is priced in.
    pub base_currency: Currency,
    /// Seats this fare may sell.
    pub seat_limit: i32,
}

/// Flight and fare repository.
#[derive(Debug, Clone)]
pub struct FlightRepository {
    db: DatabaseConnection,
}

impl FlightRepository {
    /// Creates a new flight repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Schedules a flight.
    ///
    /// # Errors
    ///
    /// The rules of [`CatalogService::prepare_flight`], or `DuplicateFlight`.
    pub async fn create(&self, input: CreateFlightInput) -> StoreResult<flights::Model> {
        let new_flight = CatalogService::prepare_flight(
            &input.flight_number,
            &input.origin,
            &input.destination,
            input.departure_time,
            input.arrival_time,
            input.seat_capacity,
        )?;
        let flight_number = new_flight.flight_number.clone();

        let txn = self.db.begin().await?;
        let taken = flights::Entity::find()
            .filter(flights::Column::FlightNumber.eq(&flight_number))
            .count(&txn)
            .await?;
        if taken > 0 {
            return Err(CatalogError::DuplicateFlight { flight_number }.into());
        }

        let flight = flights::ActiveModel {
            id: Set(Uuid::new_v4()),
            flight_number: Set(new_flight.flight_number),
            origin: Set(new_flight.origin),
            destination: Set(new_flight.destination),
            departure_time: Set(new_flight.departure_time.into()),
            arrival_time: Set(new_flight.arrival_time.into()),
            seat_capacity: Set(new_flight.seat_capacity),
            created_at: Set(Utc::now().into()),
        };
        let flight = match flight.insert(&txn).await {
            Ok(flight) => flight,
            Err(e) if unique_violation(&e).is_some() => {
                return Err(CatalogError::DuplicateFlight { flight_number }.into());
            }
            Err(e) => return Err(e.into()),
        };
        txn.commit().await?;

        info!(flight_id = %flight.id, flight_number = %flight.flight_number, "Flight created");
        Ok(flight)
    }

    /// Flights departing after `now`, soonest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_upcoming(&self, now: DateTime<Utc>) -> StoreResult<Vec<flights::Model>> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = now.into();
        Ok(flights::Entity::find()
            .filter(flights::Column::DepartureTime.gt(now))
            .order_by_asc(flights::Column::DepartureTime)
            .all(&self.db)
            .await?)
    }

    /// Gets a flight by ID.
    ///
    /// # Errors
    ///
    /// `FlightNotFound`.
    pub async fn get(&self, flight_id: Uuid) -> StoreResult<flights::Model> {
        flights::Entity::find_by_id(flight_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CatalogError::FlightNotFound(flight_id).into())
    }

    /// Adds a fare to a flight.
    ///
    /// The flight row is locked so concurrent fare creation cannot
    /// over-allocate its seats.
    ///
    /// # Errors
    ///
    /// `FlightNotFound`, `DuplicateFareName`, or the rules of
    /// [`CatalogService::prepare_fare`].
    pub async fn create_fare(
        &self,
        flight_id: Uuid,
        input: CreateFareInput,
    ) -> StoreResult<flight_fares::Model> {
        let txn = self.db.begin().await?;
        let flight = flights::Entity::find_by_id(flight_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(CatalogError::FlightNotFound(flight_id))?;

        let fares = flight_fares::Entity::find()
            .filter(flight_fares::Column::FlightId.eq(flight_id))
            .all(&txn)
            .await?;
        let allocated: i32 = fares.iter().map(|f| f.seat_limit).sum();

        let new_fare = CatalogService::prepare_fare(
            &input.name,
            input.base_price,
            input.base_currency,
            input.seat_limit,
            flight.seat_capacity,
            allocated,
        )?;
        if fares.iter().any(|f| f.name.eq_ignore_ascii_case(&new_fare.name)) {
            return Err(CatalogError::DuplicateFareName {
                flight_id,
                name: new_fare.name,
            }
            .into());
        }

        let name = new_fare.name.clone();
        let fare = flight_fares::ActiveModel {
            id: Set(Uuid::new_v4()),
            flight_id: Set(flight_id),
            name: Set(new_fare.name),
            base_price: Set(new_fare.base_price),
            base_currency: Set(new_fare.base_currency.into()),
            seat_limit: Set(new_fare.seat_limit),
            seats_sold: Set(0),
        };
        let fare = match fare.insert(&txn).await {
            Ok(fare) => fare,
            Err(e) if unique_violation(&e).is_some() => {
                return Err(CatalogError::DuplicateFareName { flight_id, name }.into());
            }
            Err(e) => return Err(e.into()),
        };
        txn.commit().await?;

        info!(fare_id = %fare.id, flight_id = %flight_id, seat_limit = fare.seat_limit, "Fare created");
        Ok(fare)
    }

    /// Lists a flight's fares by name.
    ///
    /// # Errors
    ///
    /// `FlightNotFound`.
    pub async fn list_fares(&self, flight_id: Uuid) -> StoreResult<Vec<flight_fares::Model>> {
        self.get(flight_id).await?;
        Ok(flight_fares::Entity::find()
            .filter(flight_fares::Column::FlightId.eq(flight_id))
            .order_by_asc(flight_fares::Column::Name)
            .all(&self.db)
            .await?)
    }
}
