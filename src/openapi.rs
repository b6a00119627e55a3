use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::errors::ErrorResponse;
use crate::handlers::corrections::DecideRequest;
use crate::services::approval::{DecisionAction, DecisionOutcome};
use crate::services::corrections::OrderCorrection;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "MealDesk API",
        description = "Meal-order cutoff reconciliation and correction approval"
    ),
    paths(
        crate::handlers::corrections::list_corrections,
        crate::handlers::corrections::decide_correction,
    ),
    components(schemas(
        OrderCorrection,
        DecisionAction,
        DecisionOutcome,
        DecideRequest,
        ErrorResponse,
    )),
    tags(
        (name = "Corrections", description = "After-cutoff meal-order corrections")
    )
)]
pub struct ApiDoc;

/// Swagger UI serving the generated document.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
