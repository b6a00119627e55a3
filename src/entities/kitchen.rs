use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "kitchens")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::kitchen_period::Entity")]
    KitchenPeriods,
}

impl Related<super::kitchen_period::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::KitchenPeriods.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
