use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Dated interval during which one kitchen produces a contract's orders.
/// An absent `end_date` closes at the owning contract's `end_date`, or never
/// if that is also absent.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "kitchen_periods")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub contract_id: i64,
    pub kitchen_id: i64,
    pub start_date: Date,
    pub end_date: Option<Date>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::contract::Entity",
        from = "Column::ContractId",
        to = "super::contract::Column::Id"
    )]
    Contract,
    #[sea_orm(
        belongs_to = "super::kitchen::Entity",
        from = "Column::KitchenId",
        to = "super::kitchen::Column::Id"
    )]
    Kitchen,
}

impl Related<super::contract::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contract.def()
    }
}

impl Related<super::kitchen::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Kitchen.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
