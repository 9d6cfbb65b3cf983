//! Workout heatmaps
//!
//! Two views over the same workout list: calories per calendar day, and
//! frequency/intensity per body part. Exercise names are free text, so body
//! parts are inferred through an ordered classification table:
//!
//! 1. exact phrases, matched on whole words with an optional plural ending
//!    (`"leg curl"` before `"curl"`, `"squat"` also hits `"squats"`)
//! 2. keyword fallbacks, matched as plain substrings (`"forearm"` hits `"arm"`)
//! 3. anything else lands in [`OTHER`]
//!
//! Order within each list is significant and preserved from the source data.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::{EngineError, EngineResult};
use crate::models::{ExerciseEntry, WorkoutRecord};

/// Bucket for names no rule matched
pub const OTHER: &str = "other";

/// Endings accepted after an exact phrase
const PLURAL_SUFFIXES: &[&str] = &["", "s", "es"];

/// Built-in exact phrases, most specific first
const SEED_EXACT: &[(&str, &str)] = &[
    ("leg curl", "legs"),
    ("leg press", "legs"),
    ("leg extension", "legs"),
    ("calf raise", "legs"),
    ("bench press", "chest"),
    ("push up", "chest"),
    ("pushup", "chest"),
    ("chest fly", "chest"),
    ("dumbbell fly", "chest"),
    ("overhead press", "shoulders"),
    ("shoulder press", "shoulders"),
    ("military press", "shoulders"),
    ("lateral raise", "shoulders"),
    ("deadlift", "back"),
    ("pull up", "back"),
    ("pullup", "back"),
    ("chin up", "back"),
    ("lat pulldown", "back"),
    ("row", "back"),
    ("squat", "legs"),
    ("lunge", "legs"),
    ("crunch", "abs"),
    ("sit up", "abs"),
    ("plank", "core"),
    ("tricep dip", "arms"),
    ("skull crusher", "arms"),
    ("curl", "arms"),
];

/// Built-in keyword fallbacks
const SEED_KEYWORDS: &[(&str, &str)] = &[
    ("chest", "chest"),
    ("pec", "chest"),
    ("back", "back"),
    ("shoulder", "shoulders"),
    ("delt", "shoulders"),
    ("leg", "legs"),
    ("quad", "legs"),
    ("glute", "legs"),
    ("hamstring", "legs"),
    ("calf", "legs"),
    ("arm", "arms"),
    ("bicep", "arms"),
    ("tricep", "arms"),
    ("abdominal", "abs"),
    ("abs", "abs"),
    ("core", "core"),
];

/// One (pattern, body part) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRule {
    pub pattern: String,
    pub body_part: String,
}

impl ClassificationRule {
    fn new(pattern: &str, body_part: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            body_part: body_part.to_string(),
        }
    }
}

/// Ordered exercise-name classification table
///
/// Loaded from TOML:
///
/// ```toml
/// [[exact]]
/// pattern = "hip thrust"
/// body_part = "legs"
///
/// [[keyword]]
/// pattern = "trap"
/// body_part = "back"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationTable {
    #[serde(default)]
    pub exact: Vec<ClassificationRule>,
    #[serde(default, rename = "keyword")]
    pub keywords: Vec<ClassificationRule>,
}

impl Default for ClassificationTable {
    fn default() -> Self {
        Self::seed()
    }
}

impl ClassificationTable {
    /// The built-in table
    pub fn seed() -> Self {
        Self {
            exact: SEED_EXACT
                .iter()
                .map(|(p, b)| ClassificationRule::new(p, b))
                .collect(),
            keywords: SEED_KEYWORDS
                .iter()
                .map(|(p, b)| ClassificationRule::new(p, b))
                .collect(),
        }
    }

    /// Parse a table from TOML, rejecting blank patterns or body parts
    pub fn from_toml_str(source: &str) -> EngineResult<Self> {
        let table: Self =
            toml::from_str(source).map_err(|e| EngineError::InvalidTable(e.to_string()))?;

        for rule in table.exact.iter().chain(table.keywords.iter()) {
            if normalize(&rule.pattern).is_empty() {
                return Err(EngineError::InvalidTable(format!(
                    "rule for '{}' has an empty pattern",
                    rule.body_part
                )));
            }
            if rule.body_part.trim().is_empty() {
                return Err(EngineError::InvalidTable(format!(
                    "pattern '{}' has an empty body part",
                    rule.pattern
                )));
            }
        }

        Ok(table)
    }

    /// Put this table's rules ahead of `base`, keeping both orders intact
    pub fn layered_over(mut self, base: ClassificationTable) -> Self {
        self.exact.extend(base.exact);
        self.keywords.extend(base.keywords);
        self
    }

    /// Classify a free-text exercise name into a body part
    pub fn classify(&self, exercise_name: &str) -> &str {
        let name = normalize(exercise_name);
        if name.is_empty() {
            return OTHER;
        }
        let padded = format!(" {} ", name);

        let exact = self.exact.iter().find(|rule| {
            let phrase = normalize(&rule.pattern);
            !phrase.is_empty()
                && PLURAL_SUFFIXES
                    .iter()
                    .any(|suffix| padded.contains(&format!(" {}{} ", phrase, suffix)))
        });
        if let Some(rule) = exact {
            return &rule.body_part;
        }

        let keyword = self.keywords.iter().find(|rule| {
            let keyword = normalize(&rule.pattern);
            !keyword.is_empty() && name.contains(&keyword)
        });
        match keyword {
            Some(rule) => &rule.body_part,
            None => OTHER,
        }
    }
}

/// Lowercase, strip punctuation, and collapse whitespace
fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Training load of one exercise entry
///
/// `weight * sets * reps` when all three are known, otherwise minutes of
/// work as a proxy, otherwise zero.
pub fn exercise_intensity(entry: &ExerciseEntry) -> f64 {
    match (entry.weight_kg, entry.sets, entry.reps) {
        (Some(weight), Some(sets), Some(reps)) => weight * f64::from(sets) * f64::from(reps),
        _ => entry
            .duration_seconds
            .map(|secs| f64::from(secs) / 60.0)
            .unwrap_or(0.0),
    }
}

/// Per-body-part frequency and accumulated intensity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyPartHeatmap {
    pub frequency: BTreeMap<String, u32>,
    pub intensity: BTreeMap<String, f64>,
}

/// Date (`YYYY-MM-DD`) -> calories burned that day
pub fn date_heatmap(workouts: &[WorkoutRecord]) -> BTreeMap<String, i64> {
    let mut heatmap = BTreeMap::new();
    for workout in workouts {
        *heatmap.entry(workout.date().to_string()).or_insert(0) += workout.calories();
    }
    heatmap
}

/// Aggregate every exercise entry of every workout by body part
pub fn body_part_heatmap(workouts: &[WorkoutRecord], table: &ClassificationTable) -> BodyPartHeatmap {
    let mut heatmap = BodyPartHeatmap::default();
    for entry in workouts.iter().flat_map(|w| w.exercises.iter()) {
        let part = table.classify(&entry.name).to_string();
        *heatmap.frequency.entry(part.clone()).or_insert(0) += 1;
        *heatmap.intensity.entry(part).or_insert(0.0) += exercise_intensity(entry);
    }
    heatmap
}

/// Heatmap view returned for a configurable window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutHeatmap {
    pub date_heatmap: BTreeMap<String, i64>,
    pub body_part_heatmap: BodyPartHeatmap,
    pub days: i64,
}

/// Build both heatmaps for a window of `days`
pub fn build(workouts: &[WorkoutRecord], table: &ClassificationTable, days: i64) -> WorkoutHeatmap {
    WorkoutHeatmap {
        date_heatmap: date_heatmap(workouts),
        body_part_heatmap: body_part_heatmap(workouts, table),
        days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::fixtures::*;
    use rstest::rstest;

    fn entry(name: &str) -> ExerciseEntry {
        ExerciseEntry {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[rstest]
    #[case("Barbell Bench Press", "chest")]
    #[case("Incline bench-press", "chest")]
    #[case("Back Squat", "legs")]
    #[case("Seated Leg Curl", "legs")]
    #[case("Hammer Curl", "arms")]
    #[case("Romanian Deadlift", "back")]
    #[case("Push-Up", "chest")]
    #[case("Forearm Stretch", "arms")]
    #[case("Glute Bridge", "legs")]
    #[case("Core Activation", "core")]
    #[case("Zumba Flow", "other")]
    #[case("", "other")]
    #[case("   ", "other")]
    fn test_seed_classification(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(ClassificationTable::seed().classify(name), expected);
    }

    #[rstest]
    #[case("Squats", "legs")]
    #[case("Barbell Squats", "legs")]
    #[case("Lunges", "legs")]
    #[case("Deadlifts", "back")]
    #[case("Dumbbell Rows", "back")]
    #[case("Planks", "core")]
    #[case("Push-ups", "chest")]
    #[case("Pull-ups", "back")]
    #[case("Crunches", "abs")]
    #[case("Bench Presses", "chest")]
    #[case("Leg Curls", "legs")]
    fn test_plural_names_classify(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(ClassificationTable::seed().classify(name), expected);
    }

    #[test]
    fn test_exact_phrases_match_whole_words_only() {
        // "row" must not hit inside "narrow", "throw" or "rowing"
        let table = ClassificationTable::seed();
        assert_eq!(table.classify("Narrow Stance Throw"), OTHER);
        assert_eq!(table.classify("Rowing Intervals"), OTHER);
        assert_eq!(table.classify("Cable Row"), "back");
    }

    #[test]
    fn test_exact_match_wins_over_keyword() {
        // "leg" keyword would say legs, but the exact phrase is checked first
        let table = ClassificationTable {
            exact: vec![ClassificationRule::new("leg raise", "abs")],
            keywords: vec![ClassificationRule::new("leg", "legs")],
        };
        assert_eq!(table.classify("Hanging Leg Raise"), "abs");
        assert_eq!(table.classify("Leg Day Circuit"), "legs");
    }

    #[test]
    fn test_table_from_toml_layers_over_seed() {
        let custom = ClassificationTable::from_toml_str(
            r#"
            [[exact]]
            pattern = "zumba"
            body_part = "cardio"

            [[keyword]]
            pattern = "trap"
            body_part = "back"
            "#,
        )
        .unwrap()
        .layered_over(ClassificationTable::seed());

        assert_eq!(custom.classify("Zumba Flow"), "cardio");
        assert_eq!(custom.classify("Trap Shrug"), "back");
        assert_eq!(custom.classify("Barbell Bench Press"), "chest");
        assert_eq!(custom.exact[0].pattern, "zumba");
    }

    #[test]
    fn test_table_rejects_blank_rules() {
        let err = ClassificationTable::from_toml_str(
            r#"
            [[exact]]
            pattern = " - "
            body_part = "legs"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidTable(_)));

        assert!(ClassificationTable::from_toml_str("exact = 5").is_err());
    }

    #[rstest]
    #[case(Some(100.0), Some(5), Some(5), None, 2500.0)]
    #[case(Some(100.0), None, Some(5), Some(600), 10.0)]
    #[case(None, None, None, Some(90), 1.5)]
    #[case(None, Some(3), Some(10), None, 0.0)]
    fn test_exercise_intensity(
        #[case] weight: Option<f64>,
        #[case] sets: Option<u32>,
        #[case] reps: Option<u32>,
        #[case] duration: Option<u32>,
        #[case] expected: f64,
    ) {
        let e = ExerciseEntry {
            weight_kg: weight,
            sets,
            reps,
            duration_seconds: duration,
            ..entry("x")
        };
        assert!((exercise_intensity(&e) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_date_heatmap_sums_same_day() {
        let workouts = vec![
            workout_on(days_ago(1), 200),
            workout_on(days_ago(1), 150),
            workout_on(days_ago(3), 400),
        ];
        let heatmap = date_heatmap(&workouts);
        assert_eq!(heatmap.len(), 2);
        assert_eq!(heatmap[&days_ago(1).to_string()], 350);
        assert_eq!(heatmap[&days_ago(3).to_string()], 400);
    }

    #[test]
    fn test_body_part_heatmap_keeps_unmatched_entries() {
        let bench = ExerciseEntry {
            weight_kg: Some(60.0),
            sets: Some(3),
            reps: Some(10),
            ..entry("Bench Press")
        };
        let zumba = ExerciseEntry {
            duration_seconds: Some(1800),
            ..entry("Zumba Flow")
        };
        let workouts = vec![
            workout_with_exercises(days_ago(1), vec![bench.clone(), zumba]),
            workout_with_exercises(days_ago(2), vec![bench]),
        ];

        let heatmap = body_part_heatmap(&workouts, &ClassificationTable::seed());
        assert_eq!(heatmap.frequency["chest"], 2);
        assert_eq!(heatmap.frequency[OTHER], 1);
        assert!((heatmap.intensity["chest"] - 3600.0).abs() < 1e-9);
        assert!((heatmap.intensity[OTHER] - 30.0).abs() < 1e-9);
    }
}
