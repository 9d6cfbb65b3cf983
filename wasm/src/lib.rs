//! Fitness Analytics WASM Module
//!
//! WebAssembly bindings for the cheap engine computations so the browser can
//! preview scores, tiers and classifications without a round trip.

use fitness_analytics_shared::adherence::adherence_ratio;
use fitness_analytics_shared::scoring::score_counts;
use fitness_analytics_shared::tier::composite_score;
use fitness_analytics_shared::{ClassificationTable, MemberTier, ProgressLevel};
use std::sync::OnceLock;
use wasm_bindgen::prelude::*;

fn seed_table() -> &'static ClassificationTable {
    static TABLE: OnceLock<ClassificationTable> = OnceLock::new();
    TABLE.get_or_init(ClassificationTable::seed)
}

/// Progress score (0-100) from window counts and weights
#[wasm_bindgen]
pub fn progress_score(
    workouts: usize,
    nutrition_records: usize,
    latest_weight: Option<f64>,
    target_weight: Option<f64>,
) -> f64 {
    score_counts(workouts, nutrition_records, latest_weight, target_weight)
}

/// Qualitative level for a score
#[wasm_bindgen]
pub fn progress_level(score: f64) -> String {
    ProgressLevel::from_score(score).as_str().to_string()
}

/// Member tier name for 30-day activity and total spend
#[wasm_bindgen]
pub fn member_tier(workouts: usize, nutrition_records: usize, total_consumption: f64) -> String {
    MemberTier::from_score(composite_score(workouts, nutrition_records, total_consumption))
        .as_str()
        .to_string()
}

/// Body part for a free-text exercise name, using the built-in table
#[wasm_bindgen]
pub fn classify_exercise(name: &str) -> String {
    seed_table().classify(name).to_string()
}

/// Plan adherence over 14 days; `undefined` when the plan targets no sessions
#[wasm_bindgen]
pub fn plan_adherence(completed_sessions: usize, weekly_frequency: u32) -> Option<f64> {
    adherence_ratio(completed_sessions, weekly_frequency)
}
