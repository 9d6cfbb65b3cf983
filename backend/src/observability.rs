//! Prometheus metrics recorder and metric names
//!
//! The recorder is process-global, so it is installed at most once and the
//! handle is shared by every router built afterwards.

use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

pub const SNAPSHOTS_GENERATED: &str = "analysis_snapshots_generated_total";
pub const PROGRESS_SCORE: &str = "analysis_progress_score";
pub const PLAN_ADJUSTMENTS: &str = "plan_adjustments_total";
pub const MEMBER_TIER_REFRESHES: &str = "member_tier_refreshes_total";
pub const ADVICE_REQUESTS: &str = "advice_requests_total";

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder, or return the already installed handle
pub fn install() -> Result<PrometheusHandle> {
    let handle = HANDLE.get_or_try_init(|| PrometheusBuilder::new().install_recorder())?;
    Ok(handle.clone())
}
