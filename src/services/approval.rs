use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::{
    db::DbPool,
    entities::meal_entry,
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Operator decision on an after-cutoff correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DecisionAction {
    Approve,
    Reject,
}

impl DecisionAction {
    /// Parses the wire form of an action. Anything but the two known verbs
    /// is rejected before storage is touched.
    pub fn parse(raw: &str) -> Result<Self, ServiceError> {
        match raw {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            other => Err(ServiceError::InvalidInput(format!(
                "Unknown decision action '{}'; expected 'approve' or 'reject'",
                other
            ))),
        }
    }

    pub fn target_status(self) -> &'static str {
        match self {
            Self::Approve => meal_entry::STATUS_APPROVED,
            Self::Reject => meal_entry::STATUS_REJECTED,
        }
    }
}

impl std::fmt::Display for DecisionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approve => f.write_str("approve"),
            Self::Reject => f.write_str("reject"),
        }
    }
}

/// The fresh state of a ledger row after a successful decision.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DecisionOutcome {
    pub id: i64,
    pub status: String,
    pub updated_at: DateTime<Utc>,
    pub cutoff_decision_by: Option<i64>,
    pub cutoff_decision_at: Option<DateTime<Utc>>,
}

/// Approval state machine over after-cutoff ledger rows.
///
/// `pending_approval` is the only non-terminal state; `approved` and
/// `rejected` are terminal. The sole guard against double decisions is the
/// conditional update predicate, so a lost race surfaces as a conflict, not a
/// silent overwrite.
#[derive(Clone)]
pub struct ApprovalService {
    db: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl ApprovalService {
    pub fn new(db: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self { db, event_sender }
    }

    /// Records an operator decision on a pending correction.
    ///
    /// The write is a single atomic conditional update: the row must still be
    /// `is_after_cutoff = true` and `pending_approval` at write time. Zero
    /// affected rows means the correction was already decided, was never
    /// after-cutoff, or does not exist; reported as a conflict and never
    /// retried here. Deliberately not idempotent: a repeat call fails once
    /// the first one commits.
    #[instrument(skip(self), fields(entry_id = entry_id, action = %action))]
    pub async fn decide(
        &self,
        entry_id: i64,
        action: DecisionAction,
        acting_user_id: Option<i64>,
    ) -> Result<DecisionOutcome, ServiceError> {
        if entry_id <= 0 {
            return Err(ServiceError::InvalidInput(format!(
                "Entry id must be positive, got {}",
                entry_id
            )));
        }

        let db = &*self.db;
        let now = Utc::now();

        let result = meal_entry::Entity::update_many()
            .col_expr(meal_entry::Column::Status, Expr::value(action.target_status()))
            .col_expr(
                meal_entry::Column::CutoffDecisionBy,
                Expr::value(acting_user_id),
            )
            .col_expr(meal_entry::Column::CutoffDecisionAt, Expr::value(Some(now)))
            .col_expr(meal_entry::Column::UpdatedAt, Expr::value(now))
            .filter(meal_entry::Column::Id.eq(entry_id))
            .filter(meal_entry::Column::IsAfterCutoff.eq(true))
            .filter(meal_entry::Column::Status.eq(meal_entry::STATUS_PENDING_APPROVAL))
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if result.rows_affected == 0 {
            warn!(
                entry_id = entry_id,
                "Decision lost: correction already resolved or not found"
            );
            return Err(ServiceError::Conflict(format!(
                "Correction {} was already resolved or does not exist",
                entry_id
            )));
        }

        let fresh = meal_entry::Entity::find_by_id(entry_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "Entry {} vanished after a successful decision",
                    entry_id
                ))
            })?;

        info!(
            entry_id = entry_id,
            status = fresh.status.as_deref().unwrap_or(""),
            decided_by = ?acting_user_id,
            "Correction decided"
        );

        if let Some(event_sender) = &self.event_sender {
            let event = match action {
                DecisionAction::Approve => Event::CorrectionApproved {
                    entry_id,
                    decided_by: acting_user_id,
                    decided_at: now,
                },
                DecisionAction::Reject => Event::CorrectionRejected {
                    entry_id,
                    decided_by: acting_user_id,
                    decided_at: now,
                },
            };
            if let Err(e) = event_sender.send(event).await {
                warn!(entry_id = entry_id, error = %e, "Failed to send decision event");
            }
        }

        Ok(DecisionOutcome {
            id: fresh.id,
            status: fresh.status.unwrap_or_default(),
            updated_at: fresh.updated_at,
            cutoff_decision_by: fresh.cutoff_decision_by,
            cutoff_decision_at: fresh.cutoff_decision_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DatabaseConnection;

    #[test]
    fn action_parsing_accepts_only_known_verbs() {
        assert_eq!(DecisionAction::parse("approve").unwrap(), DecisionAction::Approve);
        assert_eq!(DecisionAction::parse("reject").unwrap(), DecisionAction::Reject);
        assert!(matches!(
            DecisionAction::parse("Approve"),
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            DecisionAction::parse("delete"),
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[test]
    fn target_statuses_match_the_terminal_states() {
        assert_eq!(
            DecisionAction::Approve.target_status(),
            meal_entry::STATUS_APPROVED
        );
        assert_eq!(
            DecisionAction::Reject.target_status(),
            meal_entry::STATUS_REJECTED
        );
    }

    #[tokio::test]
    async fn non_positive_id_is_rejected_before_storage() {
        let service = ApprovalService::new(Arc::new(DatabaseConnection::Disconnected), None);

        for bad_id in [0, -5] {
            let err = service
                .decide(bad_id, DecisionAction::Approve, Some(1))
                .await
                .expect_err("must fail");
            assert!(matches!(err, ServiceError::InvalidInput(_)));
        }
    }
}
