//! Read models consumed by the analytics engine
//!
//! All records are owned by the record store and handed to the engine as
//! materialized lists. The engine only ever mutates a [`WorkoutPlan`]: its
//! difficulty, frequency and item volume, plus the adjustment note appended
//! to its description.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::EngineError;

// ============================================================================
// Workouts
// ============================================================================

/// Lifecycle state of a logged workout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkoutStatus {
    InProgress,
    Paused,
    #[default]
    Completed,
    Cancelled,
}

impl WorkoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutStatus::InProgress => "IN_PROGRESS",
            WorkoutStatus::Paused => "PAUSED",
            WorkoutStatus::Completed => "COMPLETED",
            WorkoutStatus::Cancelled => "CANCELLED",
        }
    }
}

impl FromStr for WorkoutStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "IN_PROGRESS" => Ok(WorkoutStatus::InProgress),
            "PAUSED" => Ok(WorkoutStatus::Paused),
            "COMPLETED" => Ok(WorkoutStatus::Completed),
            "CANCELLED" => Ok(WorkoutStatus::Cancelled),
            other => Err(EngineError::Validation(format!(
                "Unknown workout status: {}",
                other
            ))),
        }
    }
}

/// One exercise performed within a workout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    pub name: String,
    pub sets: Option<u32>,
    pub reps: Option<u32>,
    /// Load in kilograms
    pub weight_kg: Option<f64>,
    pub duration_seconds: Option<u32>,
    pub completed_sets: Option<u32>,
    pub completed_reps: Option<u32>,
    pub is_completed: bool,
}

/// A logged training session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Option<Uuid>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub duration_seconds: Option<u32>,
    pub calories_burned: Option<i32>,
    pub avg_heart_rate: Option<f64>,
    pub min_heart_rate: Option<f64>,
    pub max_heart_rate: Option<f64>,
    pub status: WorkoutStatus,
    /// Exercises in performed order
    pub exercises: Vec<ExerciseEntry>,
}

impl WorkoutRecord {
    /// Calendar date the workout started on
    pub fn date(&self) -> NaiveDate {
        self.started_at.date_naive()
    }

    /// Calories burned, treating a missing value as zero
    pub fn calories(&self) -> i64 {
        i64::from(self.calories_burned.unwrap_or(0))
    }
}

// ============================================================================
// Nutrition
// ============================================================================

/// Meal slot of a nutrition record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "BREAKFAST",
            MealType::Lunch => "LUNCH",
            MealType::Dinner => "DINNER",
            MealType::Snack => "SNACK",
        }
    }
}

impl FromStr for MealType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BREAKFAST" => Ok(MealType::Breakfast),
            "LUNCH" => Ok(MealType::Lunch),
            "DINNER" => Ok(MealType::Dinner),
            "SNACK" => Ok(MealType::Snack),
            other => Err(EngineError::Validation(format!("Unknown meal type: {}", other))),
        }
    }
}

/// A logged meal or food item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub record_date: NaiveDate,
    pub meal_type: MealType,
    pub calories: Option<i32>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub fiber_g: Option<f64>,
    pub is_ai_recognized: bool,
}

// ============================================================================
// Body measurements and profile
// ============================================================================

/// A body measurement taken on a given day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyMeasurement {
    pub id: Uuid,
    pub user_id: Uuid,
    pub measured_on: NaiveDate,
    pub weight_kg: Option<f64>,
    pub body_fat_percent: Option<f64>,
    pub muscle_mass_kg: Option<f64>,
    pub chest_cm: Option<f64>,
    pub waist_cm: Option<f64>,
    pub hip_cm: Option<f64>,
    pub arm_cm: Option<f64>,
    pub thigh_cm: Option<f64>,
}

/// Gender as recorded on the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::Other => "OTHER",
        }
    }
}

impl FromStr for Gender {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MALE" => Ok(Gender::Male),
            "FEMALE" => Ok(Gender::Female),
            "OTHER" => Ok(Gender::Other),
            other => Err(EngineError::Validation(format!("Unknown gender: {}", other))),
        }
    }
}

/// Self-reported activity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtraActive,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::LightlyActive => "lightly_active",
            ActivityLevel::ModeratelyActive => "moderately_active",
            ActivityLevel::VeryActive => "very_active",
            ActivityLevel::ExtraActive => "extra_active",
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "lightly_active" => Ok(ActivityLevel::LightlyActive),
            "moderately_active" => Ok(ActivityLevel::ModeratelyActive),
            "very_active" => Ok(ActivityLevel::VeryActive),
            "extra_active" => Ok(ActivityLevel::ExtraActive),
            other => Err(EngineError::Validation(format!(
                "Unknown activity level: {}",
                other
            ))),
        }
    }
}

/// Per-user health profile (at most one per user)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthProfile {
    pub user_id: Uuid,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub target_weight_kg: Option<f64>,
    pub target_calories: Option<i32>,
    pub activity_level: Option<ActivityLevel>,
    pub fitness_goal: Option<String>,
    pub medical_history: Option<String>,
    pub allergies: Option<String>,
    pub dietary_restrictions: Option<String>,
}

impl HealthProfile {
    /// Age in whole years on `today`, if a birth date is known
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        self.birth_date.and_then(|dob| today.years_since(dob))
    }
}

// ============================================================================
// Workout plans
// ============================================================================

/// Difficulty tier of a plan, ordered from easiest to hardest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTier {
    Beginner,
    Intermediate,
    Advanced,
}

impl DifficultyTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::Beginner => "beginner",
            DifficultyTier::Intermediate => "intermediate",
            DifficultyTier::Advanced => "advanced",
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyTier {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(DifficultyTier::Beginner),
            "intermediate" => Ok(DifficultyTier::Intermediate),
            "advanced" => Ok(DifficultyTier::Advanced),
            other => Err(EngineError::Validation(format!(
                "Unknown difficulty tier: {}",
                other
            ))),
        }
    }
}

/// One scheduled exercise in a plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanItem {
    /// 1 = Monday .. 7 = Sunday
    pub day_of_week: u8,
    pub exercise_name: String,
    pub exercise_type: Option<String>,
    pub sets: Option<u32>,
    pub reps: Option<u32>,
    pub weight_kg: Option<f64>,
    pub duration_seconds: Option<u32>,
    pub rest_seconds: Option<u32>,
    pub order_index: Option<u32>,
}

/// A training plan owned by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: Option<String>,
    pub description: Option<String>,
    pub goal: Option<String>,
    /// Plan length in days
    pub duration_days: Option<u32>,
    pub weekly_frequency: Option<u32>,
    pub difficulty: Option<DifficultyTier>,
    pub is_active: bool,
    pub is_ai_generated: bool,
    pub items: Vec<PlanItem>,
    pub created_at: DateTime<Utc>,
}

impl WorkoutPlan {
    /// Weekly frequency the plan targets when none has been set
    pub const DEFAULT_WEEKLY_FREQUENCY: u32 = 3;

    pub fn effective_weekly_frequency(&self) -> u32 {
        self.weekly_frequency
            .unwrap_or(Self::DEFAULT_WEEKLY_FREQUENCY)
    }
}
