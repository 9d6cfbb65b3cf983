//! Plan adherence and the adjustment feedback loop
//!
//! Adherence compares the sessions logged against a plan over a trailing
//! 14-day window with the number the plan asked for:
//!
//! ```text
//! adherence = min(1.0, round(completed / (weekly_frequency * 2), 2))
//! ```
//!
//! The ratio selects an [`AdjustmentBand`] which is applied to the plan in
//! place. The transition only looks at the current window, so repeated
//! adjustments may move a plan up and down across successive windows.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{DifficultyTier, WorkoutPlan};

/// Trailing window adherence is measured over
pub const ADHERENCE_WINDOW_DAYS: i64 = 14;

/// Ratio at or above which a plan is made harder
pub const RAISE_THRESHOLD: f64 = 0.85;
/// Ratio below which a plan is made easier
pub const LOWER_THRESHOLD: f64 = 0.6;

pub const MIN_WEEKLY_FREQUENCY: u32 = 2;
pub const MIN_SETS: u32 = 2;
pub const MIN_REPS: u32 = 8;
pub const MIN_DURATION_SECONDS: u32 = 15;

const SETS_STEP: u32 = 1;
const REPS_STEP: u32 = 2;
const DURATION_STEP_SECONDS: u32 = 5;

/// Keywords that mark feedback as a fatigue signal
pub const DEFAULT_FATIGUE_KEYWORDS: &[&str] = &["fatigue", "fatigued", "tired", "exhausted", "疲劳"];

/// Completion ratio over the adherence window
///
/// Returns `None` when the plan targets zero sessions a week, in which case
/// adherence is not applicable.
pub fn adherence_ratio(completed_sessions: usize, weekly_frequency: u32) -> Option<f64> {
    if weekly_frequency == 0 {
        return None;
    }
    let target = f64::from(weekly_frequency) * 2.0;
    let ratio = ((completed_sessions as f64 / target) * 100.0).round() / 100.0;
    Some(ratio.min(1.0))
}

/// Which way a plan moves for a given ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentBand {
    Raise,
    Hold,
    Lower,
}

impl AdjustmentBand {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= RAISE_THRESHOLD {
            AdjustmentBand::Raise
        } else if ratio >= LOWER_THRESHOLD {
            AdjustmentBand::Hold
        } else {
            AdjustmentBand::Lower
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentBand::Raise => "raise",
            AdjustmentBand::Hold => "hold",
            AdjustmentBand::Lower => "lower",
        }
    }

    /// Difficulty a plan lands on in this band
    pub fn difficulty(&self) -> DifficultyTier {
        match self {
            AdjustmentBand::Raise => DifficultyTier::Advanced,
            AdjustmentBand::Hold => DifficultyTier::Intermediate,
            AdjustmentBand::Lower => DifficultyTier::Beginner,
        }
    }
}

impl fmt::Display for AdjustmentBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an adjustment did to a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentOutcome {
    pub adherence: Option<f64>,
    pub band: Option<AdjustmentBand>,
    pub fatigue_override: bool,
    pub difficulty: Option<DifficultyTier>,
    pub weekly_frequency: Option<u32>,
}

/// Adjustment rules with a configurable fatigue vocabulary
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustmentPolicy {
    fatigue_keywords: Vec<String>,
}

impl Default for AdjustmentPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_FATIGUE_KEYWORDS.iter().map(|k| k.to_string()))
    }
}

impl AdjustmentPolicy {
    pub fn new(fatigue_keywords: impl IntoIterator<Item = String>) -> Self {
        Self {
            fatigue_keywords: fatigue_keywords
                .into_iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Whether free-text feedback reports fatigue
    pub fn signals_fatigue(&self, feedback: Option<&str>) -> bool {
        let Some(feedback) = feedback else {
            return false;
        };
        let feedback = feedback.to_lowercase();
        self.fatigue_keywords.iter().any(|k| feedback.contains(k.as_str()))
    }

    /// Apply the adjustment for `completed_sessions` to `plan` in place
    pub fn apply(
        &self,
        plan: &mut WorkoutPlan,
        completed_sessions: usize,
        feedback: Option<&str>,
    ) -> AdjustmentOutcome {
        let frequency = plan.effective_weekly_frequency();
        let adherence = adherence_ratio(completed_sessions, frequency);
        let band = adherence.map(AdjustmentBand::from_ratio);

        if let Some(band) = band {
            plan.difficulty = Some(band.difficulty());
            match band {
                AdjustmentBand::Raise => plan.weekly_frequency = Some(frequency + 1),
                AdjustmentBand::Lower => {
                    plan.weekly_frequency =
                        Some(frequency.saturating_sub(1).max(MIN_WEEKLY_FREQUENCY))
                }
                AdjustmentBand::Hold => {}
            }
            adjust_items(plan, band);
        }

        let fatigue_override = self.signals_fatigue(feedback);
        if fatigue_override {
            plan.difficulty = Some(DifficultyTier::Beginner);
        }

        plan.description = Some(adjustment_description(
            plan.description.as_deref(),
            adherence,
            feedback,
        ));

        AdjustmentOutcome {
            adherence,
            band,
            fatigue_override,
            difficulty: plan.difficulty,
            weekly_frequency: plan.weekly_frequency,
        }
    }
}

fn step(value: Option<u32>, band: AdjustmentBand, delta: u32, floor: u32) -> Option<u32> {
    value.map(|v| match band {
        AdjustmentBand::Raise => (v + delta).max(floor),
        AdjustmentBand::Lower => v.saturating_sub(delta).max(floor),
        AdjustmentBand::Hold => v,
    })
}

fn adjust_items(plan: &mut WorkoutPlan, band: AdjustmentBand) {
    for item in &mut plan.items {
        item.sets = step(item.sets, band, SETS_STEP, MIN_SETS);
        item.reps = step(item.reps, band, REPS_STEP, MIN_REPS);
        item.duration_seconds = step(item.duration_seconds, band, DURATION_STEP_SECONDS, MIN_DURATION_SECONDS);
    }
}

/// Append the adjustment note to a plan description
pub fn adjustment_description(
    existing: Option<&str>,
    adherence: Option<f64>,
    feedback: Option<&str>,
) -> String {
    let mut parts = Vec::new();
    if let Some(existing) = existing.filter(|d| !d.trim().is_empty()) {
        parts.push(existing.to_string());
    }
    parts.push(match adherence {
        Some(ratio) => format!("Recent adherence: {}%", (ratio * 100.0).round() as u32),
        None => "Recent adherence: n/a".to_string(),
    });
    if let Some(feedback) = feedback.filter(|f| !f.trim().is_empty()) {
        parts.push(format!("Feedback: {}", feedback.trim()));
    }
    parts.push("Auto-optimized from progress".to_string());
    parts.join(" | ")
}
