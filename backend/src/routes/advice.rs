//! Advice API routes

use crate::error::ApiError;
use crate::services::AdviceService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use fitness_analytics_shared::AdviceResponse;
use uuid::Uuid;

pub fn advice_routes() -> Router<AppState> {
    Router::new().route("/advice", post(request_advice))
}

/// POST /api/v1/users/:user_id/advice
async fn request_advice(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<AdviceResponse>, ApiError> {
    let today = Utc::now().date_naive();
    Ok(Json(AdviceService::advise(&state, user_id, today).await?))
}
