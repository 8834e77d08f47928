//! `SeaORM` Entity for tickets table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{CurrencyCode, TicketStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub flight_id: Uuid,
    pub fare_id: Uuid,
    pub shift_id: Uuid,
    pub passenger_name: String,
    pub seat_number: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    pub currency: CurrencyCode,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price_in_base: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 4)))")]
    pub exchange_rate: Decimal,
    pub status: TicketStatus,
    pub sold_at: DateTimeWithTimeZone,
    pub refunded_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::flights::Entity",
        from = "Column::FlightId",
        to = "super::flights::Column::Id"
    )]
    Flights,
    #[sea_orm(
        belongs_to = "super::flight_fares::Entity",
        from = "Column::FareId",
        to = "super::flight_fares::Column::Id"
    )]
    FlightFares,
    #[sea_orm(
        belongs_to = "super::shifts::Entity",
        from = "Column::ShiftId",
        to = "super::shifts::Column::Id"
    )]
    Shifts,
}

impl Related<super::flights::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Flights.def()
    }
}

impl Related<super::flight_fares::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FlightFares.def()
    }
}

impl Related<super::shifts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shifts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
