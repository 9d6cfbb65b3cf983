//! Analysis API routes

use crate::error::ApiError;
use crate::services::AnalysisService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use fitness_analytics_shared::{
    AnalysisSnapshot, ProgressTracking, WeightHistory, WindowQuery, WorkoutHeatmap,
};
use uuid::Uuid;
use validator::Validate;

/// Create analysis routes (nested under `/users/:user_id`)
pub fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/analysis", post(generate_snapshot))
        .route("/analysis/latest", get(latest_snapshot))
        .route("/heatmap", get(heatmap))
        .route("/weight-history", get(weight_history))
        .route("/progress", get(progress))
}

/// POST /api/v1/users/:user_id/analysis - Generate and persist today's snapshot
async fn generate_snapshot(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<AnalysisSnapshot>, ApiError> {
    let now = Utc::now();
    let snapshot =
        AnalysisService::generate_snapshot(&state, user_id, now.date_naive(), now).await?;
    Ok(Json(snapshot))
}

/// GET /api/v1/users/:user_id/analysis/latest
async fn latest_snapshot(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<AnalysisSnapshot>, ApiError> {
    Ok(Json(AnalysisService::latest(&state, user_id).await?))
}

/// GET /api/v1/users/:user_id/heatmap?days=N
async fn heatmap(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<WorkoutHeatmap>, ApiError> {
    query.validate()?;
    let today = Utc::now().date_naive();
    Ok(Json(
        AnalysisService::heatmap(&state, user_id, today, query.days).await?,
    ))
}

/// GET /api/v1/users/:user_id/weight-history?days=N
async fn weight_history(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<WeightHistory>, ApiError> {
    query.validate()?;
    let today = Utc::now().date_naive();
    Ok(Json(
        AnalysisService::weight_history(&state, user_id, today, query.days).await?,
    ))
}

/// GET /api/v1/users/:user_id/progress - Last 7 days against the previous 7
async fn progress(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ProgressTracking>, ApiError> {
    let today = Utc::now().date_naive();
    Ok(Json(AnalysisService::progress(&state, user_id, today).await?))
}
