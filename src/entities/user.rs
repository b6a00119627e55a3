use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Back-office operator. Consulted only to render `cutoff_decision_by` as a
/// display name; a missing row falls back to `"#<id>"`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    pub display_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
