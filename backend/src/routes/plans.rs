//! Workout plan API routes

use crate::error::ApiError;
use crate::services::PlanService;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use fitness_analytics_shared::{AdjustPlanRequest, AdjustPlanResponse, PlanSummary, WorkoutPlan};
use uuid::Uuid;
use validator::Validate;

/// Create plan routes (nested under `/users/:user_id`)
pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/plans/history", get(plan_history))
        .route("/plans/default", post(create_default_plan))
        .route("/plans/:plan_id/adjust", post(adjust_plan))
}

/// POST /api/v1/users/:user_id/plans/:plan_id/adjust
///
/// An empty body is accepted and means "no feedback". Anything else must
/// be a well-formed `AdjustPlanRequest`.
async fn adjust_plan(
    State(state): State<AppState>,
    Path((user_id, plan_id)): Path<(Uuid, Uuid)>,
    body: Bytes,
) -> Result<Json<AdjustPlanResponse>, ApiError> {
    let req = parse_adjust_request(&body)?;
    req.validate()?;

    let today = Utc::now().date_naive();
    let response = PlanService::adjust(&state, user_id, plan_id, req.feedback, today).await?;
    Ok(Json(response))
}

/// GET /api/v1/users/:user_id/plans/history
async fn plan_history(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<PlanSummary>>, ApiError> {
    let today = Utc::now().date_naive();
    Ok(Json(PlanService::history(&state, user_id, today).await?))
}

/// POST /api/v1/users/:user_id/plans/default - Create a starter plan from the profile
async fn create_default_plan(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<(StatusCode, Json<WorkoutPlan>), ApiError> {
    let plan = PlanService::create_default(&state, user_id, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

fn parse_adjust_request(body: &[u8]) -> Result<AdjustPlanRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(AdjustPlanRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid adjust request body: {}", e)))
}
