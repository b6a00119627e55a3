use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::{
    db::DbPool,
    entities::{
        client_department, client_diet, client_meal_type, contract, kitchen_period, meal_entry,
        user,
    },
    errors::ServiceError,
};

/// Statuses governed by the approval workflow. Rows outside this set (or with
/// `is_after_cutoff = false`) never enter the projection.
pub const GOVERNED_STATUSES: &[&str] = &[
    meal_entry::STATUS_PENDING_APPROVAL,
    meal_entry::STATUS_APPROVED,
    meal_entry::STATUS_REJECTED,
];

/// One after-cutoff ledger row enriched with its prior value, diff, and the
/// contract/kitchen in effect on the meal date.
///
/// Client-local ids are carried for display-name overlay in the UI; the
/// resolved global ids allow cross-client filtering. Any of the resolved
/// fields may be absent when the reference data has no match; such rows are
/// still surfaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderCorrection {
    /// Id of the after-cutoff ledger row
    pub after_id: i64,
    /// Id of the matched committed row, absent when the key was never
    /// ordered before cutoff
    pub before_id: Option<i64>,
    pub meal_date: NaiveDate,
    pub client_id: i64,
    /// Client-local department id
    pub department_id: i64,
    /// Client-local diet id
    pub diet_id: i64,
    /// Client-local meal-type id
    pub meal_type_id: i64,
    pub global_department_id: Option<i64>,
    pub global_diet_id: Option<i64>,
    pub global_meal_type_id: Option<i64>,
    pub contract_id: Option<i64>,
    pub kitchen_id: Option<i64>,
    pub qty_before: i32,
    pub qty_after: i32,
    pub qty_diff: i32,
    pub status: String,
    pub updated_at: DateTime<Utc>,
    pub cutoff_at: DateTime<Utc>,
    pub minutes_after_cutoff: i64,
    pub cutoff_decision_by: Option<i64>,
    pub cutoff_decision_by_name: Option<String>,
    pub cutoff_decision_at: Option<DateTime<Utc>>,
}

/// The ledger key: one (date, client, department, diet, meal type) order line.
/// Department/diet/meal-type components are client-local ids.
pub(crate) fn entry_key(e: &meal_entry::Model) -> (NaiveDate, i64, i64, i64, i64) {
    (
        e.meal_date,
        e.client_id,
        e.department_id,
        e.diet_id,
        e.meal_type_id,
    )
}

/// Picks the committed (pre-cutoff) value an after-cutoff submission is
/// diffed against: the row with the greatest `(updated_at, id)` among
/// committed rows sharing the exact key tuple.
pub fn pick_prior<'a>(
    committed: &'a [meal_entry::Model],
    after: &meal_entry::Model,
) -> Option<&'a meal_entry::Model> {
    committed
        .iter()
        .filter(|c| !c.is_after_cutoff && entry_key(c) == entry_key(after))
        .max_by_key(|c| (c.updated_at, c.id))
}

/// Picks the contract in effect for a client on a date. Only active and
/// planned contracts qualify; overlapping ranges are broken by preferring
/// active over planned, then the later start date, then the larger id.
pub fn pick_contract<'a>(
    contracts: &'a [contract::Model],
    client_id: i64,
    meal_date: NaiveDate,
) -> Option<&'a contract::Model> {
    contracts
        .iter()
        .filter(|c| c.client_id == client_id)
        .filter(|c| {
            c.status == contract::STATUS_ACTIVE || c.status == contract::STATUS_PLANNED
        })
        .filter(|c| c.start_date <= meal_date && c.end_date.map_or(true, |end| meal_date <= end))
        .max_by_key(|c| (c.status == contract::STATUS_ACTIVE, c.start_date, c.id))
}

/// Picks the kitchen assignment period in effect under a contract on a date.
/// A period with no end date closes at the owning contract's end date (never,
/// if that is also open). Overlaps are broken by the later start date, then
/// the larger id.
pub fn pick_kitchen_period<'a>(
    periods: &'a [kitchen_period::Model],
    owner: &contract::Model,
    meal_date: NaiveDate,
) -> Option<&'a kitchen_period::Model> {
    periods
        .iter()
        .filter(|p| p.contract_id == owner.id)
        .filter(|p| p.start_date <= meal_date)
        .filter(|p| {
            p.end_date
                .or(owner.end_date)
                .map_or(true, |end| meal_date <= end)
        })
        .max_by_key(|p| (p.start_date, p.id))
}

/// Whole minutes between the submission and its cutoff boundary. Negative
/// only under clock skew.
pub fn minutes_after_cutoff(updated_at: DateTime<Utc>, cutoff_at: DateTime<Utc>) -> i64 {
    (updated_at - cutoff_at).num_minutes()
}

/// Entity Resolver over the meal-order ledger.
///
/// Stateless and read-only: every call re-queries the ledger and the
/// reference tables, so a polling caller always sees an eventually-consistent
/// snapshot. Reference rows that vanished or never existed resolve to `None`
/// rather than failing the projection.
#[derive(Clone)]
pub struct CorrectionsService {
    db: Arc<DbPool>,
}

impl CorrectionsService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Returns the full resolved/diffed projection of after-cutoff rows,
    /// newest-first. Unfiltered; callers filter client-side.
    #[instrument(skip(self))]
    pub async fn list_pending_corrections(&self) -> Result<Vec<OrderCorrection>, ServiceError> {
        let db = &*self.db;

        let after_rows = meal_entry::Entity::find()
            .filter(meal_entry::Column::IsAfterCutoff.eq(true))
            .filter(meal_entry::Column::Status.is_in(GOVERNED_STATUSES.iter().copied()))
            .order_by_desc(meal_entry::Column::MealDate)
            .order_by_desc(meal_entry::Column::UpdatedAt)
            .order_by_desc(meal_entry::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if after_rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut client_ids: Vec<i64> = after_rows.iter().map(|a| a.client_id).collect();
        client_ids.sort_unstable();
        client_ids.dedup();

        let mut meal_dates: Vec<NaiveDate> = after_rows.iter().map(|a| a.meal_date).collect();
        meal_dates.sort_unstable();
        meal_dates.dedup();

        let committed = meal_entry::Entity::find()
            .filter(meal_entry::Column::IsAfterCutoff.eq(false))
            .filter(meal_entry::Column::ClientId.is_in(client_ids.clone()))
            .filter(meal_entry::Column::MealDate.is_in(meal_dates))
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        // Overlay tables, keyed by (client_id, local_id). A local id alone is
        // meaningless across clients.
        let dept_map: HashMap<(i64, i64), Option<i64>> = client_department::Entity::find()
            .filter(client_department::Column::ClientId.is_in(client_ids.clone()))
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .into_iter()
            .map(|row| ((row.client_id, row.id), row.department_id))
            .collect();

        let diet_map: HashMap<(i64, i64), Option<i64>> = client_diet::Entity::find()
            .filter(client_diet::Column::ClientId.is_in(client_ids.clone()))
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .into_iter()
            .map(|row| ((row.client_id, row.id), row.diet_id))
            .collect();

        let meal_type_map: HashMap<(i64, i64), Option<i64>> = client_meal_type::Entity::find()
            .filter(client_meal_type::Column::ClientId.is_in(client_ids.clone()))
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .into_iter()
            .map(|row| ((row.client_id, row.id), row.meal_type_id))
            .collect();

        let contracts = contract::Entity::find()
            .filter(contract::Column::ClientId.is_in(client_ids))
            .filter(
                contract::Column::Status
                    .is_in([contract::STATUS_ACTIVE, contract::STATUS_PLANNED]),
            )
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let periods = if contracts.is_empty() {
            Vec::new()
        } else {
            kitchen_period::Entity::find()
                .filter(
                    kitchen_period::Column::ContractId
                        .is_in(contracts.iter().map(|c| c.id).collect::<Vec<_>>()),
                )
                .all(db)
                .await
                .map_err(ServiceError::DatabaseError)?
        };

        let mut decider_ids: Vec<i64> = after_rows
            .iter()
            .filter_map(|a| a.cutoff_decision_by)
            .collect();
        decider_ids.sort_unstable();
        decider_ids.dedup();

        let user_names: HashMap<i64, String> = if decider_ids.is_empty() {
            HashMap::new()
        } else {
            user::Entity::find()
                .filter(user::Column::Id.is_in(decider_ids))
                .all(db)
                .await
                .map_err(ServiceError::DatabaseError)?
                .into_iter()
                .map(|u| (u.id, u.display_name))
                .collect()
        };

        let corrections: Vec<OrderCorrection> = after_rows
            .iter()
            .map(|after| {
                let prior = pick_prior(&committed, after);
                let resolved_contract = pick_contract(&contracts, after.client_id, after.meal_date);
                let kitchen = resolved_contract
                    .and_then(|c| pick_kitchen_period(&periods, c, after.meal_date));

                let qty_before = prior.map(|p| p.quantity).unwrap_or(0);

                let decision_name = after.cutoff_decision_by.map(|id| {
                    user_names
                        .get(&id)
                        .cloned()
                        .unwrap_or_else(|| format!("#{}", id))
                });

                OrderCorrection {
                    after_id: after.id,
                    before_id: prior.map(|p| p.id),
                    meal_date: after.meal_date,
                    client_id: after.client_id,
                    department_id: after.department_id,
                    diet_id: after.diet_id,
                    meal_type_id: after.meal_type_id,
                    global_department_id: dept_map
                        .get(&(after.client_id, after.department_id))
                        .copied()
                        .flatten(),
                    global_diet_id: diet_map
                        .get(&(after.client_id, after.diet_id))
                        .copied()
                        .flatten(),
                    global_meal_type_id: meal_type_map
                        .get(&(after.client_id, after.meal_type_id))
                        .copied()
                        .flatten(),
                    contract_id: resolved_contract.map(|c| c.id),
                    kitchen_id: kitchen.map(|p| p.kitchen_id),
                    qty_before,
                    qty_after: after.quantity,
                    qty_diff: after.quantity - qty_before,
                    status: after.status.clone().unwrap_or_default(),
                    updated_at: after.updated_at,
                    cutoff_at: after.cutoff_at,
                    minutes_after_cutoff: minutes_after_cutoff(after.updated_at, after.cutoff_at),
                    cutoff_decision_by: after.cutoff_decision_by,
                    cutoff_decision_by_name: decision_name,
                    cutoff_decision_at: after.cutoff_decision_at,
                }
            })
            .collect();

        info!(count = corrections.len(), "Resolved after-cutoff corrections");

        Ok(corrections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn entry(
        id: i64,
        quantity: i32,
        is_after_cutoff: bool,
        updated_secs: i64,
    ) -> meal_entry::Model {
        meal_entry::Model {
            id,
            meal_date: date(2025, 2, 10),
            client_id: 7,
            department_id: 3,
            diet_id: 1,
            meal_type_id: 2,
            quantity,
            is_after_cutoff,
            status: is_after_cutoff.then(|| meal_entry::STATUS_PENDING_APPROVAL.to_string()),
            cutoff_at: ts(0),
            updated_at: ts(updated_secs),
            cutoff_decision_by: None,
            cutoff_decision_at: None,
        }
    }

    fn contract_row(
        id: i64,
        client_id: i64,
        status: &str,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> contract::Model {
        contract::Model {
            id,
            client_id,
            start_date: start,
            end_date: end,
            status: status.to_string(),
        }
    }

    fn period_row(
        id: i64,
        contract_id: i64,
        kitchen_id: i64,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> kitchen_period::Model {
        kitchen_period::Model {
            id,
            contract_id,
            kitchen_id,
            start_date: start,
            end_date: end,
        }
    }

    #[test]
    fn prior_is_latest_committed_row_for_the_key() {
        let committed = vec![entry(1, 30, false, 10), entry(2, 40, false, 20)];
        let after = entry(9, 55, true, 100);

        let prior = pick_prior(&committed, &after).expect("prior expected");
        assert_eq!(prior.id, 2);
        assert_eq!(prior.quantity, 40);
    }

    #[test]
    fn prior_ties_on_updated_at_break_by_larger_id() {
        let committed = vec![entry(5, 30, false, 20), entry(4, 35, false, 20)];
        let after = entry(9, 55, true, 100);

        assert_eq!(pick_prior(&committed, &after).unwrap().id, 5);
    }

    #[test]
    fn prior_ignores_other_keys_and_after_cutoff_rows() {
        let mut other_key = entry(3, 99, false, 500);
        other_key.department_id = 8;
        let committed = vec![other_key, entry(2, 12, true, 400)];
        let after = entry(9, 55, true, 600);

        assert!(pick_prior(&committed, &after).is_none());
    }

    // active beats planned, then later start date, then larger id
    #[rstest]
    #[case(
        contract_row(1, 7, contract::STATUS_ACTIVE, date(2024, 1, 1), None),
        contract_row(2, 7, contract::STATUS_PLANNED, date(2025, 2, 1), None),
        1
    )]
    #[case(
        contract_row(9, 7, contract::STATUS_ACTIVE, date(2024, 1, 1), None),
        contract_row(3, 7, contract::STATUS_ACTIVE, date(2025, 1, 1), None),
        3
    )]
    #[case(
        contract_row(3, 7, contract::STATUS_ACTIVE, date(2025, 1, 1), None),
        contract_row(8, 7, contract::STATUS_ACTIVE, date(2025, 1, 1), None),
        8
    )]
    fn overlapping_contracts_break_ties_in_order(
        #[case] a: contract::Model,
        #[case] b: contract::Model,
        #[case] winner: i64,
    ) {
        let meal_date = date(2025, 2, 10);

        let forward_rows = [a.clone(), b.clone()];
        let forward = pick_contract(&forward_rows, 7, meal_date).unwrap();
        assert_eq!(forward.id, winner);

        let reversed_rows = [b, a];
        let reversed = pick_contract(&reversed_rows, 7, meal_date).unwrap();
        assert_eq!(reversed.id, winner);
    }

    #[test]
    fn expired_and_out_of_range_contracts_are_skipped() {
        let meal_date = date(2025, 2, 10);
        let expired = contract_row(1, 7, contract::STATUS_EXPIRED, date(2024, 1, 1), None);
        let ended = contract_row(
            2,
            7,
            contract::STATUS_ACTIVE,
            date(2024, 1, 1),
            Some(date(2025, 1, 31)),
        );
        let not_started =
            contract_row(3, 7, contract::STATUS_ACTIVE, date(2025, 3, 1), None);
        let other_client = contract_row(4, 8, contract::STATUS_ACTIVE, date(2024, 1, 1), None);

        assert!(pick_contract(&[expired, ended, not_started, other_client], 7, meal_date).is_none());
    }

    #[test]
    fn contract_end_date_is_inclusive() {
        let end = date(2025, 2, 10);
        let c = contract_row(1, 7, contract::STATUS_ACTIVE, date(2024, 1, 1), Some(end));
        assert!(pick_contract(std::slice::from_ref(&c), 7, end).is_some());
        assert!(pick_contract(std::slice::from_ref(&c), 7, date(2025, 2, 11)).is_none());
    }

    #[test]
    fn open_period_under_open_contract_matches_any_date_from_start() {
        let owner = contract_row(1, 7, contract::STATUS_ACTIVE, date(2024, 1, 1), None);
        let periods = vec![period_row(10, 1, 5, date(2024, 6, 1), None)];

        assert!(pick_kitchen_period(&periods, &owner, date(2030, 1, 1)).is_some());
        assert!(pick_kitchen_period(&periods, &owner, date(2024, 5, 31)).is_none());
    }

    #[test]
    fn open_period_closes_at_contract_end() {
        let owner = contract_row(
            1,
            7,
            contract::STATUS_ACTIVE,
            date(2024, 1, 1),
            Some(date(2025, 2, 28)),
        );
        let periods = vec![period_row(10, 1, 5, date(2024, 6, 1), None)];

        assert!(pick_kitchen_period(&periods, &owner, date(2025, 2, 28)).is_some());
        assert!(pick_kitchen_period(&periods, &owner, date(2025, 3, 1)).is_none());
    }

    // later start date wins, then larger id
    #[rstest]
    #[case(
        period_row(10, 1, 5, date(2024, 1, 1), None),
        period_row(11, 1, 6, date(2025, 1, 1), None),
        11
    )]
    #[case(
        period_row(10, 1, 5, date(2025, 1, 1), None),
        period_row(12, 1, 6, date(2025, 1, 1), None),
        12
    )]
    fn overlapping_periods_break_ties_in_order(
        #[case] a: kitchen_period::Model,
        #[case] b: kitchen_period::Model,
        #[case] winner: i64,
    ) {
        let owner = contract_row(1, 7, contract::STATUS_ACTIVE, date(2024, 1, 1), None);
        let meal_date = date(2025, 2, 10);

        let forward_rows = [a.clone(), b.clone()];
        let forward = pick_kitchen_period(&forward_rows, &owner, meal_date).unwrap();
        assert_eq!(forward.id, winner);

        let reversed_rows = [b, a];
        let reversed = pick_kitchen_period(&reversed_rows, &owner, meal_date).unwrap();
        assert_eq!(reversed.id, winner);
    }

    #[test]
    fn periods_of_other_contracts_are_ignored() {
        let owner = contract_row(1, 7, contract::STATUS_ACTIVE, date(2024, 1, 1), None);
        let periods = vec![period_row(10, 99, 5, date(2024, 1, 1), None)];

        assert!(pick_kitchen_period(&periods, &owner, date(2025, 2, 10)).is_none());
    }

    #[test]
    fn minutes_after_cutoff_truncates_to_whole_minutes() {
        assert_eq!(minutes_after_cutoff(ts(125), ts(0)), 2);
        assert_eq!(minutes_after_cutoff(ts(0), ts(60)), -1);
    }
}
