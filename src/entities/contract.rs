use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_PLANNED: &str = "planned";
pub const STATUS_EXPIRED: &str = "expired";

/// Commercial contract for a client, valid over `[start_date, end_date]`.
/// An absent `end_date` means the contract is open-ended. Date ranges of a
/// client's contracts may overlap; the resolver's tie-break picks one.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contracts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub client_id: i64,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
    #[sea_orm(has_many = "super::kitchen_period::Entity")]
    KitchenPeriods,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::kitchen_period::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::KitchenPeriods.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
