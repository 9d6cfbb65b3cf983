//! Progress scoring
//!
//! Combines up to three independent factors into a single 0-100 score.
//! Each factor contributes only when its data is present; an absent signal
//! adds nothing rather than pulling an average down.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::window::WindowAggregate;

/// Cap for the workout-frequency factor
pub const WORKOUT_FACTOR_CAP: f64 = 40.0;
/// Cap for the nutrition-logging factor
pub const NUTRITION_FACTOR_CAP: f64 = 30.0;
/// Cap for the body-measurement factor
pub const BODY_FACTOR_CAP: f64 = 30.0;

/// Qualitative band derived from the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressLevel {
    #[serde(rename = "excellent")]
    Excellent,
    #[serde(rename = "good")]
    Good,
    #[serde(rename = "fair")]
    Fair,
    #[serde(rename = "needs improvement")]
    NeedsImprovement,
}

impl ProgressLevel {
    /// Map a score onto its band (breakpoints 80 / 60 / 40, inclusive)
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ProgressLevel::Excellent
        } else if score >= 60.0 {
            ProgressLevel::Good
        } else if score >= 40.0 {
            ProgressLevel::Fair
        } else {
            ProgressLevel::NeedsImprovement
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressLevel::Excellent => "excellent",
            ProgressLevel::Good => "good",
            ProgressLevel::Fair => "fair",
            ProgressLevel::NeedsImprovement => "needs improvement",
        }
    }
}

impl fmt::Display for ProgressLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score with its per-factor breakdown
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressScore {
    pub score: f64,
    pub level: ProgressLevel,
    pub workout_factor: Option<f64>,
    pub nutrition_factor: Option<f64>,
    pub body_factor: Option<f64>,
}

/// `min(count / 30 * 10, 40)`, absent when there are no workouts
pub fn workout_factor(workout_count: usize) -> Option<f64> {
    (workout_count > 0)
        .then(|| (workout_count as f64 / 30.0 * 10.0).min(WORKOUT_FACTOR_CAP))
}

/// `min(count / 90 * 30, 30)`, absent when there are no nutrition records
pub fn nutrition_factor(nutrition_count: usize) -> Option<f64> {
    (nutrition_count > 0)
        .then(|| (nutrition_count as f64 / 90.0 * 30.0).min(NUTRITION_FACTOR_CAP))
}

/// `max(0, (1 - |latest - target| / target) * 30)`
///
/// Absent without a latest weight, without a target, or with a non-positive
/// target (the ratio is undefined there).
pub fn body_factor(latest_weight: Option<f64>, target_weight: Option<f64>) -> Option<f64> {
    match (latest_weight, target_weight) {
        (Some(latest), Some(target)) if target > 0.0 => {
            let progress = 1.0 - (latest - target).abs() / target;
            Some((progress * BODY_FACTOR_CAP).max(0.0))
        }
        _ => None,
    }
}

/// Sum the present factors, clamped to [0, 100]
pub fn total_from_factors(workout: Option<f64>, nutrition: Option<f64>, body: Option<f64>) -> f64 {
    [workout, nutrition, body]
        .into_iter()
        .flatten()
        .sum::<f64>()
        .clamp(0.0, 100.0)
}

/// Score from raw window counts and weights
pub fn score_counts(
    workout_count: usize,
    nutrition_count: usize,
    latest_weight: Option<f64>,
    target_weight: Option<f64>,
) -> f64 {
    total_from_factors(
        workout_factor(workout_count),
        nutrition_factor(nutrition_count),
        body_factor(latest_weight, target_weight),
    )
}

/// Score an aggregate
pub fn score(aggregate: &WindowAggregate) -> ProgressScore {
    let workout = workout_factor(aggregate.workout_count());
    let nutrition = nutrition_factor(aggregate.nutrition_count());
    let body = body_factor(aggregate.latest_weight(), aggregate.target_weight());
    let total = total_from_factors(workout, nutrition, body);

    ProgressScore {
        score: total,
        level: ProgressLevel::from_score(total),
        workout_factor: workout,
        nutrition_factor: nutrition,
        body_factor: body,
    }
}
