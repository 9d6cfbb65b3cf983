//! Threshold-based risk detection
//!
//! Each rule is evaluated independently over the analysis window and emits at
//! most one named warning. Rule names are unique, so no rule can shadow
//! another through the last-write-wins map.

use chrono::{Duration, NaiveDate};

use crate::messages::NamedMessages;
use crate::window::WindowAggregate;

pub const LOW_TRAINING_FREQUENCY: &str = "low_training_frequency";
pub const SPARSE_NUTRITION_LOGGING: &str = "sparse_nutrition_logging";
pub const LARGE_WEIGHT_SWING: &str = "large_weight_swing";
pub const RAPID_WEIGHT_DROP: &str = "rapid_weight_drop";
pub const NEAR_MAX_HEART_RATE: &str = "near_max_heart_rate";
pub const SUSTAINED_HIGH_HEART_RATE: &str = "sustained_high_heart_rate";

/// Fewer workouts than this in 30 days is flagged
const MIN_WORKOUTS: usize = 8;
/// Fewer nutrition records than this in 30 days is flagged
const MIN_NUTRITION_RECORDS: usize = 30;
/// Absolute 30-day weight change above this (kg) is flagged
const MAX_WEIGHT_SWING_KG: f64 = 5.0;
/// A 7-day change below this (kg) is flagged
const RAPID_DROP_KG: f64 = -2.0;
const RAPID_DROP_DAYS: i64 = 7;
/// Fraction of age-predicted max HR any single workout may reach
const PEAK_HR_FRACTION: f64 = 0.95;
/// Fraction of age-predicted max HR the mean peak may reach
const SUSTAINED_HR_FRACTION: f64 = 0.90;

/// Age-predicted maximum heart rate (`220 - age`)
pub fn age_predicted_max_hr(age_years: u32) -> f64 {
    220.0 - f64::from(age_years)
}

/// Evaluate every rule and collect the warnings that fired
pub fn detect(aggregate: &WindowAggregate, today: NaiveDate) -> NamedMessages {
    let mut warnings = NamedMessages::new();

    if aggregate.workout_count() < MIN_WORKOUTS {
        warnings.put(
            LOW_TRAINING_FREQUENCY,
            format!(
                "Only {} workouts in the last 30 days; consider training more often",
                aggregate.workout_count()
            ),
        );
    }

    if aggregate.nutrition_count() < MIN_NUTRITION_RECORDS {
        warnings.put(
            SPARSE_NUTRITION_LOGGING,
            "Nutrition logging is incomplete; keep recording your meals",
        );
    }

    if let Some(change) = aggregate.weight_change() {
        if change.abs() > MAX_WEIGHT_SWING_KG {
            warnings.put(
                LARGE_WEIGHT_SWING,
                format!(
                    "Weight changed by {:.2} kg within 30 days; keep an eye on your health",
                    change
                ),
            );
        }
    }

    if let Some(change) = seven_day_weight_change(aggregate, today) {
        if change < RAPID_DROP_KG {
            warnings.put(
                RAPID_WEIGHT_DROP,
                format!(
                    "Weight dropped {:.2} kg within 7 days, which is faster than recommended",
                    change.abs()
                ),
            );
        }
    }

    if let Some(age) = aggregate.profile.as_ref().and_then(|p| p.age_on(today)) {
        let max_hr = age_predicted_max_hr(age);
        let peaks: Vec<f64> = aggregate
            .workouts
            .iter()
            .filter_map(|w| w.max_heart_rate)
            .collect();

        if let Some(peak) = peaks.iter().copied().find(|hr| *hr > max_hr * PEAK_HR_FRACTION) {
            warnings.put(
                NEAR_MAX_HEART_RATE,
                format!(
                    "Peak heart rate reached {:.0} bpm, close to your safe maximum; moderate the intensity",
                    peak
                ),
            );
        }

        if !peaks.is_empty() {
            let mean_peak = peaks.iter().sum::<f64>() / peaks.len() as f64;
            if mean_peak > max_hr * SUSTAINED_HR_FRACTION {
                warnings.put(
                    SUSTAINED_HIGH_HEART_RATE,
                    "Average peak heart rate across workouts is high; consider lowering training intensity",
                );
            }
        }
    }

    warnings
}

/// Change between the latest weight on/after `today - 7` and the latest on/before it
///
/// A measurement taken exactly on the boundary day qualifies for both sides.
pub fn seven_day_weight_change(aggregate: &WindowAggregate, today: NaiveDate) -> Option<f64> {
    let boundary = today - Duration::days(RAPID_DROP_DAYS);
    let weighed = || {
        aggregate
            .measurements
            .iter()
            .filter_map(|m| m.weight_kg.map(|w| (m.measured_on, w)))
    };

    let recent = weighed()
        .filter(|(date, _)| *date >= boundary)
        .max_by_key(|(date, _)| *date)?;
    let previous = weighed()
        .filter(|(date, _)| *date <= boundary)
        .max_by_key(|(date, _)| *date)?;

    Some(recent.1 - previous.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HealthProfile;
    use crate::window::fixtures::*;
    use rstest::rstest;

    fn profile_aged(age: i32) -> Option<HealthProfile> {
        Some(HealthProfile {
            birth_date: Some(today() - Duration::days(i64::from(age) * 366)),
            ..Default::default()
        })
    }

    fn with_peak_hr(date: NaiveDate, max_hr: f64) -> crate::models::WorkoutRecord {
        let mut workout = workout_on(date, 300);
        workout.max_heart_rate = Some(max_hr);
        workout
    }

    #[rstest]
    #[case(5, true)]
    #[case(7, true)]
    #[case(8, false)]
    #[case(15, false)]
    fn test_low_frequency_rule(#[case] count: usize, #[case] fires: bool) {
        let warnings = detect(&aggregate(workouts(count), meals(40), vec![], None), today());
        assert_eq!(warnings.contains(LOW_TRAINING_FREQUENCY), fires);
    }

    #[rstest]
    #[case(0, true)]
    #[case(29, true)]
    #[case(30, false)]
    fn test_sparse_nutrition_rule(#[case] count: usize, #[case] fires: bool) {
        let warnings = detect(&aggregate(workouts(10), meals(count), vec![], None), today());
        assert_eq!(warnings.contains(SPARSE_NUTRITION_LOGGING), fires);
    }

    #[rstest]
    #[case(84.0, false)]
    #[case(85.0, false)]
    #[case(86.0, true)]
    #[case(74.0, true)]
    fn test_weight_swing_rule(#[case] latest: f64, #[case] fires: bool) {
        let measurements = vec![weighed(days_ago(29), 80.0), weighed(today(), latest)];
        let warnings = detect(&aggregate(vec![], vec![], measurements, None), today());
        assert_eq!(warnings.contains(LARGE_WEIGHT_SWING), fires);
    }

    #[test]
    fn test_rapid_drop_fires_below_two_kg() {
        let measurements = vec![weighed(days_ago(10), 90.0), weighed(days_ago(2), 87.0)];
        let agg = aggregate(vec![], vec![], measurements, None);
        assert_eq!(seven_day_weight_change(&agg, today()), Some(-3.0));
        assert!(detect(&agg, today()).contains(RAPID_WEIGHT_DROP));
    }

    #[test]
    fn test_rapid_drop_ignores_small_drop() {
        let measurements = vec![weighed(days_ago(10), 90.0), weighed(days_ago(2), 88.5)];
        let agg = aggregate(vec![], vec![], measurements, None);
        assert!(!detect(&agg, today()).contains(RAPID_WEIGHT_DROP));
    }

    #[test]
    fn test_rapid_drop_needs_both_sides() {
        let only_recent = vec![weighed(days_ago(3), 90.0), weighed(days_ago(1), 85.0)];
        let agg = aggregate(vec![], vec![], only_recent, None);
        assert_eq!(seven_day_weight_change(&agg, today()), None);
    }

    #[test]
    fn test_boundary_measurement_counts_on_both_sides() {
        let agg = aggregate(vec![], vec![], vec![weighed(days_ago(7), 90.0)], None);
        assert_eq!(seven_day_weight_change(&agg, today()), Some(0.0));
    }

    #[test]
    fn test_heart_rate_rules_skipped_without_birth_date() {
        let agg = aggregate(vec![with_peak_hr(days_ago(1), 230.0)], vec![], vec![], None);
        let warnings = detect(&agg, today());
        assert!(!warnings.contains(NEAR_MAX_HEART_RATE));
        assert!(!warnings.contains(SUSTAINED_HIGH_HEART_RATE));
    }

    #[test]
    fn test_near_max_heart_rate_single_workout() {
        // age 30 -> max 190; 95% = 180.5, 90% = 171
        let agg = aggregate(
            vec![
                with_peak_hr(days_ago(1), 185.0),
                with_peak_hr(days_ago(2), 140.0),
                with_peak_hr(days_ago(3), 140.0),
            ],
            vec![],
            vec![],
            profile_aged(30),
        );
        let warnings = detect(&agg, today());
        assert!(warnings.contains(NEAR_MAX_HEART_RATE));
        assert!(!warnings.contains(SUSTAINED_HIGH_HEART_RATE));
    }

    #[test]
    fn test_sustained_high_heart_rate_mean() {
        let agg = aggregate(
            vec![with_peak_hr(days_ago(1), 175.0), with_peak_hr(days_ago(2), 176.0)],
            vec![],
            vec![],
            profile_aged(30),
        );
        let warnings = detect(&agg, today());
        assert!(warnings.contains(SUSTAINED_HIGH_HEART_RATE));
        assert!(!warnings.contains(NEAR_MAX_HEART_RATE));
    }

    #[test]
    fn test_rule_names_are_unique() {
        let names = [
            LOW_TRAINING_FREQUENCY,
            SPARSE_NUTRITION_LOGGING,
            LARGE_WEIGHT_SWING,
            RAPID_WEIGHT_DROP,
            NEAR_MAX_HEART_RATE,
            SUSTAINED_HIGH_HEART_RATE,
        ];
        let unique: std::collections::BTreeSet<&str> = names.iter().copied().collect();
        assert_eq!(unique.len(), names.len());
    }
}
