//! Workout record repository

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use fitness_analytics_shared::{ExerciseEntry, WorkoutRecord, WorkoutStatus};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use super::{decimal_to_f64, to_u32, utc_day_range};

/// Workout row from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WorkoutRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Option<Uuid>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub duration_seconds: Option<i32>,
    pub calories_burned: Option<i32>,
    pub avg_heart_rate: Option<Decimal>,
    pub min_heart_rate: Option<Decimal>,
    pub max_heart_rate: Option<Decimal>,
    pub status: String,
}

/// Exercise row from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExerciseRow {
    pub workout_id: Uuid,
    pub exercise_name: String,
    pub sets: Option<i32>,
    pub reps: Option<i32>,
    pub weight_kg: Option<Decimal>,
    pub duration_seconds: Option<i32>,
    pub completed_sets: Option<i32>,
    pub completed_reps: Option<i32>,
    pub is_completed: bool,
}

impl From<ExerciseRow> for ExerciseEntry {
    fn from(row: ExerciseRow) -> Self {
        ExerciseEntry {
            name: row.exercise_name,
            sets: to_u32(row.sets),
            reps: to_u32(row.reps),
            weight_kg: decimal_to_f64(row.weight_kg),
            duration_seconds: to_u32(row.duration_seconds),
            completed_sets: to_u32(row.completed_sets),
            completed_reps: to_u32(row.completed_reps),
            is_completed: row.is_completed,
        }
    }
}

impl WorkoutRow {
    fn into_record(self, exercises: Vec<ExerciseEntry>) -> Result<WorkoutRecord> {
        Ok(WorkoutRecord {
            id: self.id,
            user_id: self.user_id,
            plan_id: self.plan_id,
            started_at: self.started_at,
            ended_at: self.ended_at,
            duration_seconds: to_u32(self.duration_seconds),
            calories_burned: self.calories_burned,
            avg_heart_rate: decimal_to_f64(self.avg_heart_rate),
            min_heart_rate: decimal_to_f64(self.min_heart_rate),
            max_heart_rate: decimal_to_f64(self.max_heart_rate),
            status: self.status.parse::<WorkoutStatus>()?,
            exercises,
        })
    }
}

const WORKOUT_COLUMNS: &str = "id, user_id, plan_id, started_at, ended_at, duration_seconds, \
     calories_burned, avg_heart_rate, min_heart_rate, max_heart_rate, status";

/// Workout repository for database operations
pub struct WorkoutRepository;

impl WorkoutRepository {
    /// Workouts a user started within the inclusive date range
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<WorkoutRecord>> {
        let (start, end) = utc_day_range(from, to);
        let rows = sqlx::query_as::<_, WorkoutRow>(&format!(
            r#"
            SELECT {WORKOUT_COLUMNS}
            FROM workout_records
            WHERE user_id = $1 AND started_at >= $2 AND started_at < $3
            ORDER BY started_at ASC
            "#
        ))
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

        Self::with_exercises(pool, rows).await
    }

    /// Workouts recorded against a plan within the inclusive date range
    pub async fn list_for_plan(
        pool: &PgPool,
        plan_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<WorkoutRecord>> {
        let (start, end) = utc_day_range(from, to);
        let rows = sqlx::query_as::<_, WorkoutRow>(&format!(
            r#"
            SELECT {WORKOUT_COLUMNS}
            FROM workout_records
            WHERE plan_id = $1 AND started_at >= $2 AND started_at < $3
            ORDER BY started_at ASC
            "#
        ))
        .bind(plan_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

        Self::with_exercises(pool, rows).await
    }

    /// Load exercise entries for all rows in one query and attach them in order
    async fn with_exercises(pool: &PgPool, rows: Vec<WorkoutRow>) -> Result<Vec<WorkoutRecord>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let exercise_rows = sqlx::query_as::<_, ExerciseRow>(
            r#"
            SELECT workout_id, exercise_name, sets, reps, weight_kg, duration_seconds,
                   completed_sets, completed_reps, is_completed
            FROM workout_exercise_records
            WHERE workout_id = ANY($1)
            ORDER BY workout_id, position ASC
            "#,
        )
        .bind(&ids)
        .fetch_all(pool)
        .await?;

        let mut by_workout: HashMap<Uuid, Vec<ExerciseEntry>> = HashMap::new();
        for row in exercise_rows {
            by_workout.entry(row.workout_id).or_default().push(row.into());
        }

        rows.into_iter()
            .map(|row| {
                let exercises = by_workout.remove(&row.id).unwrap_or_default();
                row.into_record(exercises)
            })
            .collect()
    }
}
