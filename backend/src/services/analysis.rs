//! Analysis service
//!
//! Generates and persists the daily snapshot, and serves the standalone
//! heatmap, weight history and progress views.

use crate::error::ApiError;
use crate::observability::{PROGRESS_SCORE, SNAPSHOTS_GENERATED};
use crate::services::aggregator::WindowAggregator;
use crate::state::AppState;
use chrono::{DateTime, NaiveDate, Utc};
use fitness_analytics_shared::snapshot::weight_curve;
use fitness_analytics_shared::validation::validate_window_days;
use fitness_analytics_shared::{
    build_snapshot, heatmap, progress, AnalysisSnapshot, ProgressTracking, WeightHistory,
    WorkoutHeatmap,
};
use tracing::{info, instrument};
use uuid::Uuid;

/// Analysis service for business logic
pub struct AnalysisService;

impl AnalysisService {
    /// Build today's snapshot from the analysis window and upsert it
    ///
    /// Regenerating on the same day overwrites the earlier snapshot.
    #[instrument(skip(state))]
    pub async fn generate_snapshot(
        state: &AppState,
        user_id: Uuid,
        today: NaiveDate,
        generated_at: DateTime<Utc>,
    ) -> Result<AnalysisSnapshot, ApiError> {
        let days = state.config().analytics.analysis_window_days;
        let aggregate = WindowAggregator::aggregate(state.store(), user_id, today, days).await?;

        let snapshot = build_snapshot(
            user_id,
            today,
            &aggregate,
            &state.classification,
            generated_at,
        );
        state.store().save_snapshot(&snapshot).await?;

        metrics::counter!(SNAPSHOTS_GENERATED).increment(1);
        metrics::histogram!(PROGRESS_SCORE).record(snapshot.progress_score);
        info!(
            user_id = %user_id,
            score = snapshot.progress_score,
            level = snapshot.progress_level.as_str(),
            warnings = snapshot.risk_warnings.len(),
            "Analysis snapshot generated"
        );

        Ok(snapshot)
    }

    /// Most recent persisted snapshot
    pub async fn latest(state: &AppState, user_id: Uuid) -> Result<AnalysisSnapshot, ApiError> {
        WindowAggregator::ensure_user(state.store(), user_id).await?;
        state
            .store()
            .latest_snapshot(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("No analysis snapshot yet".to_string()))
    }

    /// Date and body-part heatmaps over `days` (configured default when absent)
    pub async fn heatmap(
        state: &AppState,
        user_id: Uuid,
        today: NaiveDate,
        days: Option<i64>,
    ) -> Result<WorkoutHeatmap, ApiError> {
        let days = days.unwrap_or(state.config().analytics.heatmap_window_days);
        validate_window_days(days).map_err(|m| ApiError::invalid_field("days", m))?;

        let aggregate = WindowAggregator::aggregate(state.store(), user_id, today, days).await?;
        Ok(heatmap::build(&aggregate.workouts, &state.classification, days))
    }

    /// Date-sorted weight points over `days` (configured default when absent)
    pub async fn weight_history(
        state: &AppState,
        user_id: Uuid,
        today: NaiveDate,
        days: Option<i64>,
    ) -> Result<WeightHistory, ApiError> {
        let days = days.unwrap_or(state.config().analytics.weight_history_days);
        validate_window_days(days).map_err(|m| ApiError::invalid_field("days", m))?;

        let aggregate = WindowAggregator::aggregate(state.store(), user_id, today, days).await?;
        Ok(WeightHistory {
            points: weight_curve(&aggregate.measurements),
            days,
        })
    }

    /// Last 7 days against the 7 before them
    pub async fn progress(
        state: &AppState,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Result<ProgressTracking, ApiError> {
        let days = state.config().analytics.analysis_window_days;
        let aggregate = WindowAggregator::aggregate(state.store(), user_id, today, days).await?;
        Ok(progress::track(&aggregate, today))
    }
}
