//! Week-over-week progress tracking
//!
//! The last 14 days are split into a recent half `[today-7, today]` and a
//! previous half `[today-14, today-7)`. Each half reports its own workout
//! count, calories burned and latest weight; the tracker emits both halves
//! plus `recent - previous` deltas.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::window::WindowAggregate;

/// Length of each half in days
pub const HALF_WINDOW_DAYS: i64 = 7;

/// Figures for one half of the comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub workouts: usize,
    pub calories_burned: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressTracking {
    pub recent: PeriodSummary,
    pub previous: PeriodSummary,
    pub workout_change: i64,
    pub calorie_change: i64,
    /// Absent when either half has no weighed measurement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_change: Option<f64>,
}

/// Summarise the records whose date satisfies `in_half`
fn summarise(aggregate: &WindowAggregate, in_half: impl Fn(NaiveDate) -> bool) -> PeriodSummary {
    let workouts: Vec<_> = aggregate
        .workouts
        .iter()
        .filter(|w| in_half(w.date()))
        .collect();

    // measurements are kept oldest first, so the last hit is the latest
    let weight = aggregate
        .measurements
        .iter()
        .filter(|m| in_half(m.measured_on))
        .filter_map(|m| m.weight_kg)
        .last();

    PeriodSummary {
        workouts: workouts.len(),
        calories_burned: workouts.iter().map(|w| w.calories()).sum(),
        weight,
    }
}

/// Compare the last seven days against the seven before them
pub fn track(aggregate: &WindowAggregate, today: NaiveDate) -> ProgressTracking {
    let boundary = today - Duration::days(HALF_WINDOW_DAYS);
    let earliest = today - Duration::days(HALF_WINDOW_DAYS * 2);

    let recent = summarise(aggregate, |d| d >= boundary && d <= today);
    let previous = summarise(aggregate, |d| d >= earliest && d < boundary);

    let weight_change = match (recent.weight, previous.weight) {
        (Some(now), Some(before)) => Some(now - before),
        _ => None,
    };

    ProgressTracking {
        workout_change: recent.workouts as i64 - previous.workouts as i64,
        calorie_change: recent.calories_burned - previous.calories_burned,
        weight_change,
        recent,
        previous,
    }
}
