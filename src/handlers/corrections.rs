use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::services::approval::{DecisionAction, DecisionOutcome};
use crate::services::corrections::OrderCorrection;
use crate::{errors::ServiceError, ApiResponse, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_corrections))
        .route("/{id}/decide", post(decide_correction))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DecideRequest {
    /// "approve" or "reject"
    #[validate(length(min = 1, message = "Action is required"))]
    pub action: String,
    /// Operator recording the decision; absent for anonymous callers
    pub acting_user_id: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/v1/corrections",
    responses(
        (status = 200, description = "Resolved after-cutoff corrections, newest first", body = [OrderCorrection])
    ),
    tag = "Corrections"
)]
pub async fn list_corrections(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<OrderCorrection>>>, ServiceError> {
    let corrections = state.services.corrections.list_pending_corrections().await?;
    Ok(Json(ApiResponse::success(corrections)))
}

#[utoipa::path(
    post,
    path = "/api/v1/corrections/{id}/decide",
    params(
        ("id" = i64, Path, description = "Id of the after-cutoff ledger row")
    ),
    request_body = DecideRequest,
    responses(
        (status = 200, description = "Decision recorded", body = DecisionOutcome),
        (status = 400, description = "Malformed id or action", body = crate::errors::ErrorResponse),
        (status = 409, description = "Correction already resolved or not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Corrections"
)]
pub async fn decide_correction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<DecideRequest>,
) -> Result<Json<ApiResponse<DecisionOutcome>>, ServiceError> {
    request
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let action = DecisionAction::parse(&request.action)?;
    let outcome = state
        .services
        .approval
        .decide(id, action, request.acting_user_id)
        .await?;

    Ok(Json(ApiResponse::success(outcome)))
}
