use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-client overlay over the global diet dictionary.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "client_diets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub client_id: i64,
    pub diet_id: Option<i64>,
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
        belongs_to = "super::diet::Entity",
        from = "Column::DietId",
        to = "super::diet::Column::Id"
    )]
    Diet,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::diet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Diet.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
