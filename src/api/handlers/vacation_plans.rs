//! Vacation plan request handlers.
//!
//! Every route here sits behind the bearer token middleware.

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use validator::Validate;

use crate::api::doc::VACATION_PLAN_TAG;
use crate::api::dto::{
    ApiResponse, CreateVacationPlanRequest, ErrorResponse, PaginationMeta, PaginationParams,
    PaginationQuery, UnauthenticatedResponse, UpdateVacationPlanRequest, VacationPlanResponse,
};
use crate::error::{AppError, AppResult};
use crate::services::AuthUser;
use crate::state::AppState;
use crate::utils::{PlanId, ValidatedJson};

/// Creates vacation plan routes.
///
/// Routes:
/// - GET /vacation-plan                     - List plans, paginated
/// - POST /vacation-plan                    - Create a plan
/// - GET /vacation-plan/{id}                - Get a plan
/// - PUT /vacation-plan/{id}                - Update a plan
/// - DELETE /vacation-plan/{id}             - Delete a plan
/// - GET /vacation-plan/{id}/generate-pdf   - Download a plan as PDF
pub fn vacation_plan_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_plans, create_plan))
        .routes(routes!(get_plan, update_plan, delete_plan))
        .routes(routes!(generate_pdf))
}

/// GET /api/vacation-plan - List plans
#[utoipa::path(
    get,
    path = "/vacation-plan",
    tag = VACATION_PLAN_TAG,
    params(PaginationQuery),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Vacation plans retrieved", body = ApiResponse<Vec<VacationPlanResponse>>),
        (status = 401, description = "Missing or invalid token", body = UnauthenticatedResponse),
        (status = 404, description = "No plans on the requested page", body = ErrorResponse),
        (status = 422, description = "Invalid pagination parameters", body = ErrorResponse)
    )
)]
async fn list_plans(
    State(state): State<AppState>,
    params: PaginationParams,
) -> AppResult<Json<ApiResponse<Vec<VacationPlanResponse>>>> {
    let page = state
        .services
        .vacation_plans
        .list_plans(params.page, params.per_page)
        .await?;

    let meta = PaginationMeta::from(&page);
    let plans = page.items.into_iter().map(VacationPlanResponse::from).collect();

    Ok(Json(
        ApiResponse::ok(plans, "Vacation plans retrieved successfully.").with_meta(meta),
    ))
}

/// POST /api/vacation-plan - Create a plan
#[utoipa::path(
    post,
    path = "/vacation-plan",
    tag = VACATION_PLAN_TAG,
    request_body = CreateVacationPlanRequest,
    security(("bearerAuth" = [])),
    responses(
        (status = 201, description = "Vacation plan created", body = ApiResponse<VacationPlanResponse>),
        (status = 400, description = "Vacation plan not created", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = UnauthenticatedResponse),
        (status = 422, description = "Invalid plan data", body = ErrorResponse)
    )
)]
async fn create_plan(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<CreateVacationPlanRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<VacationPlanResponse>>)> {
    let new_plan = payload
        .into_new_plan()
        .ok_or_else(|| AppError::validation("body", "The request could not be converted."))?;

    let plan = state.services.vacation_plans.create_plan(new_plan).await?;
    tracing::debug!(plan_id = plan.id, user_id = caller.id, "Plan created by user");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            VacationPlanResponse::from(plan),
            "Vacation plan created successfully.",
        )),
    ))
}

/// GET /api/vacation-plan/{id} - Get a plan
#[utoipa::path(
    get,
    path = "/vacation-plan/{id}",
    tag = VACATION_PLAN_TAG,
    params(("id" = i32, Path, description = "Vacation plan id")),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Vacation plan retrieved", body = ApiResponse<VacationPlanResponse>),
        (status = 401, description = "Missing or invalid token", body = UnauthenticatedResponse),
        (status = 404, description = "Vacation plan not found", body = ErrorResponse)
    )
)]
async fn get_plan(
    State(state): State<AppState>,
    PlanId(id): PlanId,
) -> AppResult<Json<ApiResponse<VacationPlanResponse>>> {
    let plan = state.services.vacation_plans.get_plan(id).await?;
    Ok(Json(ApiResponse::ok(
        VacationPlanResponse::from(plan),
        "Vacation plan retrieved successfully.",
    )))
}

/// PUT /api/vacation-plan/{id} - Update a plan
///
/// Only the fields present in the body are changed.
#[utoipa::path(
    put,
    path = "/vacation-plan/{id}",
    tag = VACATION_PLAN_TAG,
    params(("id" = i32, Path, description = "Vacation plan id")),
    request_body = UpdateVacationPlanRequest,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Vacation plan updated", body = ApiResponse<VacationPlanResponse>),
        (status = 400, description = "Vacation plan not updated", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = UnauthenticatedResponse),
        (status = 404, description = "Vacation plan not found", body = ErrorResponse),
        (status = 422, description = "Invalid plan data", body = ErrorResponse)
    )
)]
async fn update_plan(
    State(state): State<AppState>,
    PlanId(id): PlanId,
    payload: Result<Json<UpdateVacationPlanRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<VacationPlanResponse>>> {
    // An unknown id answers 404 whatever the body holds.
    state.services.vacation_plans.get_plan(id).await?;

    let Json(payload) = payload?;
    payload.validate()?;

    let plan = state
        .services
        .vacation_plans
        .update_plan(id, payload.into_changes())
        .await?;

    Ok(Json(ApiResponse::ok(
        VacationPlanResponse::from(plan),
        "Vacation plan updated successfully.",
    )))
}

/// DELETE /api/vacation-plan/{id} - Delete a plan
///
/// Returns 204 No Content on success.
#[utoipa::path(
    delete,
    path = "/vacation-plan/{id}",
    tag = VACATION_PLAN_TAG,
    params(("id" = i32, Path, description = "Vacation plan id")),
    security(("bearerAuth" = [])),
    responses(
        (status = 204, description = "Vacation plan deleted"),
        (status = 400, description = "Vacation plan not deleted", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = UnauthenticatedResponse),
        (status = 404, description = "Vacation plan not found", body = ErrorResponse)
    )
)]
async fn delete_plan(State(state): State<AppState>, PlanId(id): PlanId) -> AppResult<StatusCode> {
    state.services.vacation_plans.delete_plan(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/vacation-plan/{id}/generate-pdf - Download a plan as PDF
#[utoipa::path(
    get,
    path = "/vacation-plan/{id}/generate-pdf",
    tag = VACATION_PLAN_TAG,
    params(("id" = i32, Path, description = "Vacation plan id")),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "PDF document", content_type = "application/pdf", body = Vec<u8>),
        (status = 401, description = "Missing or invalid token", body = UnauthenticatedResponse),
        (status = 404, description = "Vacation plan not found", body = ErrorResponse)
    )
)]
async fn generate_pdf(State(state): State<AppState>, PlanId(id): PlanId) -> AppResult<Response> {
    let document = state.services.vacation_plans.render_plan_pdf(id).await?;

    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        document.filename
    ))
    .map_err(|e| AppError::Internal {
        source: anyhow::Error::from(e),
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.bytes,
    )
        .into_response())
}
