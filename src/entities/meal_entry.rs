use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Correction lifecycle statuses. Only meaningful on rows with
/// `is_after_cutoff = true`; pre-cutoff rows carry no status at all.
pub const STATUS_PENDING_APPROVAL: &str = "pending_approval";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_REJECTED: &str = "rejected";

/// One submission in the meal-order ledger.
///
/// The ledger is append-style: every write for a key tuple
/// (meal_date, client, department, diet, meal type) creates a new row. The
/// committed value for a key is the latest `(updated_at, id)` row with
/// `is_after_cutoff = false`; later after-cutoff rows are corrections that go
/// through the approval workflow. `department_id`, `diet_id` and
/// `meal_type_id` are client-local overlay ids, so they only identify
/// anything together with `client_id`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meal_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub meal_date: Date,
    pub client_id: i64,
    pub department_id: i64,
    pub diet_id: i64,
    pub meal_type_id: i64,
    pub quantity: i32,
    pub is_after_cutoff: bool,
    pub status: Option<String>,
    pub cutoff_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub cutoff_decision_by: Option<i64>,
    pub cutoff_decision_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
