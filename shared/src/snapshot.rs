//! Snapshot assembly
//!
//! Fans the window aggregate out to every computation and folds the results
//! into one [`AnalysisSnapshot`] per user per day. Assembly is a pure function
//! of its inputs: the same aggregate, date and `generated_at` always produce
//! the same bytes once serialized.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::heatmap::{self, BodyPartHeatmap, ClassificationTable};
use crate::messages::NamedMessages;
use crate::models::BodyMeasurement;
use crate::progress::{self, ProgressTracking};
use crate::scoring::{self, ProgressLevel};
use crate::window::WindowAggregate;
use crate::{recommendations, risk};

/// One point on the weight curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightPoint {
    pub date: NaiveDate,
    pub weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_fat: Option<f64>,
}

/// Date-sorted weight points; measurements without a weight are skipped
pub fn weight_curve(measurements: &[BodyMeasurement]) -> Vec<WeightPoint> {
    let mut points: Vec<WeightPoint> = measurements
        .iter()
        .filter_map(|m| {
            m.weight_kg.map(|weight| WeightPoint {
                date: m.measured_on,
                weight,
                body_fat: m.body_fat_percent,
            })
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

/// Weight history view for a configurable window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightHistory {
    pub points: Vec<WeightPoint>,
    pub days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPayload {
    pub workout_heatmap: BTreeMap<String, i64>,
    pub body_part_heatmap: BodyPartHeatmap,
    pub weight_curve: Vec<WeightPoint>,
    pub progress_tracking: ProgressTracking,
}

/// Persisted analysis result for one (user, date)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSnapshot {
    pub user_id: Uuid,
    pub analysis_date: NaiveDate,
    pub progress_score: f64,
    pub progress_level: ProgressLevel,
    pub total_workouts: usize,
    pub total_calories_burned: i64,
    pub weight_change: Option<f64>,
    pub body_fat_change: Option<f64>,
    pub risk_warnings: NamedMessages,
    pub recommendations: NamedMessages,
    pub chart_data: ChartPayload,
    pub generated_at: DateTime<Utc>,
}

/// Assemble a snapshot from an already clipped 30-day aggregate
pub fn build_snapshot(
    user_id: Uuid,
    today: NaiveDate,
    aggregate: &WindowAggregate,
    table: &ClassificationTable,
    generated_at: DateTime<Utc>,
) -> AnalysisSnapshot {
    let score = scoring::score(aggregate);

    AnalysisSnapshot {
        user_id,
        analysis_date: today,
        progress_score: score.score,
        progress_level: score.level,
        total_workouts: aggregate.workout_count(),
        total_calories_burned: aggregate.total_calories_burned(),
        weight_change: aggregate.weight_change(),
        body_fat_change: aggregate.body_fat_change(),
        risk_warnings: risk::detect(aggregate, today),
        recommendations: recommendations::recommend(aggregate),
        chart_data: ChartPayload {
            workout_heatmap: heatmap::date_heatmap(&aggregate.workouts),
            body_part_heatmap: heatmap::body_part_heatmap(&aggregate.workouts, table),
            weight_curve: weight_curve(&aggregate.measurements),
            progress_tracking: progress::track(aggregate, today),
        },
        generated_at,
    }
}
