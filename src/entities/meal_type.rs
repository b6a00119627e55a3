use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Global meal-type dictionary. `cutoff_time` is the per-type deadline after
/// which order changes become corrections; the ordering process stamps the
/// concrete `cutoff_at` instant onto each ledger row from it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meal_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub cutoff_time: Option<Time>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
