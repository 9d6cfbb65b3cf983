//! Advice service: structured prompt in, free-form advice out

use crate::error::ApiError;
use crate::observability::ADVICE_REQUESTS;
use crate::services::aggregator::WindowAggregator;
use crate::state::AppState;
use chrono::NaiveDate;
use fitness_analytics_shared::{AdvicePrompt, AdviceResponse};
use tracing::{instrument, warn};
use uuid::Uuid;

/// Advice service for business logic
pub struct AdviceService;

impl AdviceService {
    #[instrument(skip(state))]
    pub async fn advise(
        state: &AppState,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Result<AdviceResponse, ApiError> {
        let days = state.config().analytics.analysis_window_days;
        let aggregate = WindowAggregator::aggregate(state.store(), user_id, today, days).await?;
        let prompt = AdvicePrompt::build(&aggregate, today);

        match state.text.generate(&prompt).await {
            Ok(advice) => {
                metrics::counter!(ADVICE_REQUESTS, "outcome" => "ok").increment(1);
                Ok(AdviceResponse {
                    advice,
                    model: state.text.model().to_string(),
                })
            }
            Err(e) => {
                metrics::counter!(ADVICE_REQUESTS, "outcome" => "error").increment(1);
                warn!(user_id = %user_id, error = %e, "Advice generation failed");
                Err(e)
            }
        }
    }
}
