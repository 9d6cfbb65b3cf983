//! Window aggregation over the record store

use crate::error::ApiError;
use crate::repositories::RecordStore;
use chrono::NaiveDate;
use fitness_analytics_shared::{DateWindow, WindowAggregate};
use tracing::{debug, instrument};
use uuid::Uuid;

/// Pulls a user's records for a trailing window
pub struct WindowAggregator;

impl WindowAggregator {
    /// Fail with `NotFound` for an unknown user
    pub async fn ensure_user(store: &dyn RecordStore, user_id: Uuid) -> Result<(), ApiError> {
        if store.user_exists(user_id).await? {
            Ok(())
        } else {
            Err(ApiError::NotFound(format!("User {} not found", user_id)))
        }
    }

    /// Aggregate workouts, nutrition, measurements and profile for `[today - days, today]`
    ///
    /// The four reads are independent and run concurrently.
    #[instrument(skip(store))]
    pub async fn aggregate(
        store: &dyn RecordStore,
        user_id: Uuid,
        today: NaiveDate,
        days: i64,
    ) -> Result<WindowAggregate, ApiError> {
        Self::ensure_user(store, user_id).await?;

        let window = DateWindow::trailing(today, days);
        let (workouts, nutrition, measurements, profile) = tokio::try_join!(
            store.list_workouts(user_id, window.start, window.end),
            store.list_nutrition(user_id, window.start, window.end),
            store.list_measurements(user_id, window.start, window.end),
            store.get_profile(user_id),
        )?;

        debug!(
            workouts = workouts.len(),
            nutrition = nutrition.len(),
            measurements = measurements.len(),
            has_profile = profile.is_some(),
            "Loaded window records"
        );

        Ok(WindowAggregate::clipped(
            window,
            workouts,
            nutrition,
            measurements,
            profile,
        ))
    }
}
