//! `SeaORM` Entity for cash_desk_accounts table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::CurrencyCode;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_desk_accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub cash_desk_id: Uuid,
    pub currency: CurrencyCode,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub balance: Decimal,
    pub last_updated: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cash_desks::Entity",
        from = "Column::CashDeskId",
        to = "super::cash_desks::Column::Id"
    )]
    CashDesks,
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::cash_desks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashDesks.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
