//! Member tier service

use crate::error::ApiError;
use crate::observability::MEMBER_TIER_REFRESHES;
use crate::state::AppState;
use chrono::{DateTime, NaiveDate, Utc};
use fitness_analytics_shared::{DateWindow, MemberInfo};
use tracing::{info, instrument};
use uuid::Uuid;

/// Member service for business logic
pub struct MemberService;

impl MemberService {
    /// Recompute the tier and cache it on the user
    ///
    /// The stored tier is never trusted; every call recomputes it from the
    /// trailing window and the user's total consumption.
    #[instrument(skip(state))]
    pub async fn refresh(
        state: &AppState,
        user_id: Uuid,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<MemberInfo, ApiError> {
        let account = state
            .store()
            .get_member_account(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("User {} not found", user_id)))?;

        let window = DateWindow::trailing(today, state.config().analytics.tier_window_days);
        let (workouts, nutrition) = tokio::try_join!(
            state.store().list_workouts(user_id, window.start, window.end),
            state.store().list_nutrition(user_id, window.start, window.end),
        )?;
        let workout_count = workouts.iter().filter(|w| window.contains(w.date())).count();
        let nutrition_count = nutrition
            .iter()
            .filter(|n| window.contains(n.record_date))
            .count();

        let info = MemberInfo::compute(workout_count, nutrition_count, account.total_consumption);
        let monthly = u32::try_from(info.monthly_workout_count).unwrap_or(u32::MAX);
        state
            .store()
            .save_member_tier(user_id, info.tier, monthly, now)
            .await?;

        metrics::counter!(MEMBER_TIER_REFRESHES, "tier" => info.tier.as_str()).increment(1);
        if account.cached_tier != info.tier {
            info!(
                user_id = %user_id,
                from = %account.cached_tier,
                to = %info.tier,
                score = info.composite_score,
                "Member tier changed"
            );
        }

        Ok(info)
    }

    /// Member info for display; recomputes like a refresh
    pub async fn member_info(
        state: &AppState,
        user_id: Uuid,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<MemberInfo, ApiError> {
        Self::refresh(state, user_id, today, now).await
    }
}
