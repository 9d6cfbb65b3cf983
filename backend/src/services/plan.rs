//! Workout plan service
//!
//! Adjusts plans from recent adherence, summarises plan history and creates
//! starter plans. Adjustment reads a plan, mutates it and writes it back, so
//! calls for the same plan are serialized on a per-plan lock.

use crate::error::ApiError;
use crate::observability::PLAN_ADJUSTMENTS;
use crate::services::aggregator::WindowAggregator;
use crate::state::AppState;
use chrono::{DateTime, NaiveDate, Utc};
use fitness_analytics_shared::plan::{bind_items, default_plan, summarize};
use fitness_analytics_shared::validation::validate_feedback;
use fitness_analytics_shared::{AdjustPlanResponse, DateWindow, PlanSummary, WorkoutPlan};
use tracing::{info, instrument};
use uuid::Uuid;

/// Plan service for business logic
pub struct PlanService;

impl PlanService {
    /// Adjust a plan from its adherence over the configured window
    #[instrument(skip(state, feedback))]
    pub async fn adjust(
        state: &AppState,
        user_id: Uuid,
        plan_id: Uuid,
        feedback: Option<String>,
        today: NaiveDate,
    ) -> Result<AdjustPlanResponse, ApiError> {
        if let Some(text) = feedback.as_deref() {
            validate_feedback(text).map_err(|m| ApiError::invalid_field("feedback", m))?;
        }
        WindowAggregator::ensure_user(state.store(), user_id).await?;

        let lock = state.plan_locks.for_plan(plan_id);
        let _guard = lock.lock().await;

        let mut plan = Self::owned_plan(state, user_id, plan_id).await?;

        let window = DateWindow::trailing(today, state.config().analytics.adherence_window_days);
        let completed = state
            .store()
            .list_plan_workouts(plan_id, window.start, window.end)
            .await?
            .iter()
            .filter(|w| window.contains(w.date()))
            .count();

        let outcome = state.policy.apply(&mut plan, completed, feedback.as_deref());
        bind_items(&mut plan.items);
        state.store().save_plan(&plan).await?;

        let band = outcome.band.map(|b| b.as_str()).unwrap_or("none");
        metrics::counter!(PLAN_ADJUSTMENTS, "band" => band).increment(1);
        info!(
            plan_id = %plan_id,
            completed,
            adherence = ?outcome.adherence,
            band,
            fatigue = outcome.fatigue_override,
            "Plan adjusted"
        );

        Ok(AdjustPlanResponse { plan, outcome })
    }

    /// Summaries of every plan the user owns, oldest first
    pub async fn history(
        state: &AppState,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Result<Vec<PlanSummary>, ApiError> {
        WindowAggregator::ensure_user(state.store(), user_id).await?;

        let plans = state.store().list_plans(user_id).await?;
        let mut summaries = Vec::with_capacity(plans.len());
        for plan in &plans {
            let since = plan.created_at.date_naive().min(today);
            let records = state.store().list_plan_workouts(plan.id, since, today).await?;
            summaries.push(summarize(plan, &records, today));
        }

        Ok(summaries)
    }

    /// Create and persist a starter plan from the user's profile
    pub async fn create_default(
        state: &AppState,
        user_id: Uuid,
        created_at: DateTime<Utc>,
    ) -> Result<WorkoutPlan, ApiError> {
        WindowAggregator::ensure_user(state.store(), user_id).await?;

        let profile = state.store().get_profile(user_id).await?;
        let plan = default_plan(user_id, profile.as_ref(), created_at);
        state.store().save_plan(&plan).await?;

        info!(
            user_id = %user_id,
            plan_id = %plan.id,
            items = plan.items.len(),
            "Default plan created"
        );
        Ok(plan)
    }

    async fn owned_plan(
        state: &AppState,
        user_id: Uuid,
        plan_id: Uuid,
    ) -> Result<WorkoutPlan, ApiError> {
        let plan = state
            .store()
            .get_plan(plan_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Plan {} not found", plan_id)))?;

        if plan.user_id != user_id {
            return Err(ApiError::Forbidden(
                "Plan belongs to another user".to_string(),
            ));
        }
        Ok(plan)
    }
}
