//! Fitness Analytics Engine
//!
//! Pure, synchronous computations that turn raw workout, nutrition and
//! body-measurement logs into scores, warnings, recommendations, heatmaps,
//! progress deltas, plan adjustments and member tiers. Nothing in this crate
//! performs I/O; callers hand in materialised records and an explicit
//! "today".

pub mod adherence;
pub mod errors;
pub mod heatmap;
pub mod messages;
pub mod models;
pub mod plan;
pub mod progress;
pub mod prompt;
pub mod recommendations;
pub mod risk;
pub mod scoring;
pub mod snapshot;
pub mod tier;
pub mod types;
pub mod validation;
pub mod window;

// Re-export commonly used items
pub use adherence::{adherence_ratio, AdjustmentBand, AdjustmentOutcome, AdjustmentPolicy};
pub use errors::*;
pub use heatmap::{BodyPartHeatmap, ClassificationRule, ClassificationTable, WorkoutHeatmap};
pub use messages::NamedMessages;
pub use models::*;
pub use plan::{PlanSummary, PlanTrend};
pub use progress::ProgressTracking;
pub use prompt::AdvicePrompt;
pub use scoring::{ProgressLevel, ProgressScore};
pub use snapshot::{build_snapshot, AnalysisSnapshot, ChartPayload, WeightHistory, WeightPoint};
pub use tier::{MemberInfo, MemberTier};
pub use types::*;
pub use window::{DateWindow, WindowAggregate, ANALYSIS_WINDOW_DAYS};
