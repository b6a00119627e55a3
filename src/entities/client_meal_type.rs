use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-client overlay over the global meal-type dictionary.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "client_meal_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub client_id: i64,
    pub meal_type_id: Option<i64>,
    pub custom_name: Option<String>,
    pub custom_short_name: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
    #[sea_orm(
        belongs_to = "super::meal_type::Entity",
        from = "Column::MealTypeId",
        to = "super::meal_type::Column::Id"
    )]
    MealType,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::meal_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MealType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
