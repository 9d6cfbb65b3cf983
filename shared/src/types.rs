//! API request and response types

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::adherence::AdjustmentOutcome;
use crate::models::WorkoutPlan;

/// `?days=N` query for windowed views
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct WindowQuery {
    #[validate(range(min = 1, max = 365))]
    pub days: Option<i64>,
}

/// Plan adjustment request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AdjustPlanRequest {
    #[validate(length(max = 500, message = "Feedback must be at most 500 characters"))]
    pub feedback: Option<String>,
}

/// Adjusted plan plus what changed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustPlanResponse {
    pub plan: WorkoutPlan,
    pub outcome: AdjustmentOutcome,
}

/// Generated advice text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdviceResponse {
    pub advice: String,
    pub model: String,
}
