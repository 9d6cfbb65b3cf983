//! Member tier API routes

use crate::error::ApiError;
use crate::services::MemberService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use fitness_analytics_shared::MemberInfo;
use uuid::Uuid;

/// Create member routes (nested under `/users/:user_id`)
pub fn member_routes() -> Router<AppState> {
    Router::new()
        .route("/member", get(member_info))
        .route("/member/refresh", post(refresh_tier))
}

/// GET /api/v1/users/:user_id/member - Recompute and return the member tier
async fn member_info(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<MemberInfo>, ApiError> {
    let now = Utc::now();
    Ok(Json(
        MemberService::member_info(&state, user_id, now.date_naive(), now).await?,
    ))
}

/// POST /api/v1/users/:user_id/member/refresh - Login hook
async fn refresh_tier(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<MemberInfo>, ApiError> {
    let now = Utc::now();
    Ok(Json(
        MemberService::refresh(&state, user_id, now.date_naive(), now).await?,
    ))
}
