//! `SeaORM` Entity for cash_desks table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_desks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub airport_id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::airports::Entity",
        from = "Column::AirportId",
        to = "super::airports::Column::Id"
    )]
    Airports,
    #[sea_orm(has_many = "super::cash_desk_accounts::Entity")]
    CashDeskAccounts,
    #[sea_orm(has_many = "super::shifts::Entity")]
    Shifts,
}

impl Related<super::airports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Airports.def()
    }
}

impl Related<super::cash_desk_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashDeskAccounts.def()
    }
}

impl Related<super::shifts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shifts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
