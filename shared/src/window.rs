//! Trailing date windows and the aggregate every analysis runs over
//!
//! A window is an inclusive calendar range `[today - days, today]`. Records
//! are matched on their calendar date, so a workout that starts at 23:59 on
//! the first day of the window is inside it.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{BodyMeasurement, HealthProfile, NutritionRecord, WorkoutRecord};

/// Default window for a full analysis
pub const ANALYSIS_WINDOW_DAYS: i64 = 30;

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Window of `days` days ending on `today` (`[today - days, today]`)
    ///
    /// Negative lengths are treated as zero so the window always contains `today`.
    pub fn trailing(today: NaiveDate, days: i64) -> Self {
        Self {
            start: today - Duration::days(days.max(0)),
            end: today,
        }
    }

    /// Whether `date` falls inside the window (both ends inclusive)
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of days between start and end
    pub fn length_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Everything the analysis components need for one user and one window
#[derive(Debug, Clone, Default)]
pub struct WindowAggregate {
    pub workouts: Vec<WorkoutRecord>,
    pub nutrition: Vec<NutritionRecord>,
    /// Sorted by measurement date, oldest first
    pub measurements: Vec<BodyMeasurement>,
    pub profile: Option<HealthProfile>,
}

impl WindowAggregate {
    /// Build an aggregate clipped to `window`
    ///
    /// The store is asked for the same range, but clipping again here keeps the
    /// components correct even when a collaborator returns a wider slice.
    pub fn clipped(
        window: DateWindow,
        workouts: Vec<WorkoutRecord>,
        nutrition: Vec<NutritionRecord>,
        measurements: Vec<BodyMeasurement>,
        profile: Option<HealthProfile>,
    ) -> Self {
        let workouts: Vec<WorkoutRecord> = workouts
            .into_iter()
            .filter(|w| window.contains(w.date()))
            .collect();
        let nutrition: Vec<NutritionRecord> = nutrition
            .into_iter()
            .filter(|n| window.contains(n.record_date))
            .collect();
        let mut measurements: Vec<BodyMeasurement> = measurements
            .into_iter()
            .filter(|m| window.contains(m.measured_on))
            .collect();
        measurements.sort_by_key(|m| m.measured_on);

        Self {
            workouts,
            nutrition,
            measurements,
            profile,
        }
    }

    pub fn workout_count(&self) -> usize {
        self.workouts.len()
    }

    pub fn nutrition_count(&self) -> usize {
        self.nutrition.len()
    }

    pub fn total_calories_burned(&self) -> i64 {
        self.workouts.iter().map(WorkoutRecord::calories).sum()
    }

    /// Most recent measurement that carries a weight
    pub fn latest_weight(&self) -> Option<f64> {
        self.measurements.iter().rev().find_map(|m| m.weight_kg)
    }

    /// Target weight from the profile, if any
    pub fn target_weight(&self) -> Option<f64> {
        self.profile.as_ref().and_then(|p| p.target_weight_kg)
    }

    /// Last minus first weight across the window
    ///
    /// `None` unless at least two measurements carry a weight.
    pub fn weight_change(&self) -> Option<f64> {
        series_change(self.measurements.iter().filter_map(|m| m.weight_kg))
    }

    /// Last minus first body-fat percentage across the window
    pub fn body_fat_change(&self) -> Option<f64> {
        series_change(self.measurements.iter().filter_map(|m| m.body_fat_percent))
    }
}

fn series_change(values: impl Iterator<Item = f64>) -> Option<f64> {
    let values: Vec<f64> = values.collect();
    match (values.first(), values.last()) {
        (Some(first), Some(last)) if values.len() >= 2 => Some(last - first),
        _ => None,
    }
}
