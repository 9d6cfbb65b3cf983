//! Workout plan repository

use anyhow::Result;
use chrono::{DateTime, Utc};
use fitness_analytics_shared::{DifficultyTier, PlanItem, WorkoutPlan};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use super::{decimal_to_f64, f64_to_decimal, to_i32, to_u32};

/// Plan row from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlanRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: Option<String>,
    pub description: Option<String>,
    pub goal: Option<String>,
    pub duration_days: Option<i32>,
    pub weekly_frequency: Option<i32>,
    pub difficulty: Option<String>,
    pub is_active: bool,
    pub is_ai_generated: bool,
    pub created_at: DateTime<Utc>,
}

/// Plan item row from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlanItemRow {
    pub plan_id: Uuid,
    pub day_of_week: i16,
    pub exercise_name: String,
    pub exercise_type: Option<String>,
    pub sets: Option<i32>,
    pub reps: Option<i32>,
    pub weight_kg: Option<Decimal>,
    pub duration_seconds: Option<i32>,
    pub rest_seconds: Option<i32>,
    pub order_index: i32,
}

impl From<PlanItemRow> for PlanItem {
    fn from(row: PlanItemRow) -> Self {
        PlanItem {
            day_of_week: u8::try_from(row.day_of_week).unwrap_or(1),
            exercise_name: row.exercise_name,
            exercise_type: row.exercise_type,
            sets: to_u32(row.sets),
            reps: to_u32(row.reps),
            weight_kg: decimal_to_f64(row.weight_kg),
            duration_seconds: to_u32(row.duration_seconds),
            rest_seconds: to_u32(row.rest_seconds),
            order_index: to_u32(Some(row.order_index)),
        }
    }
}

impl PlanRow {
    fn into_plan(self, items: Vec<PlanItem>) -> Result<WorkoutPlan> {
        Ok(WorkoutPlan {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            description: self.description,
            goal: self.goal,
            duration_days: to_u32(self.duration_days),
            weekly_frequency: to_u32(self.weekly_frequency),
            difficulty: self
                .difficulty
                .as_deref()
                .map(str::parse::<DifficultyTier>)
                .transpose()?,
            is_active: self.is_active,
            is_ai_generated: self.is_ai_generated,
            items,
            created_at: self.created_at,
        })
    }
}

const PLAN_COLUMNS: &str = "id, user_id, name, description, goal, duration_days, weekly_frequency, \
     difficulty, is_active, is_ai_generated, created_at";

/// Plan repository for database operations
pub struct PlanRepository;

impl PlanRepository {
    /// Get a plan with its items
    pub async fn get(pool: &PgPool, plan_id: Uuid) -> Result<Option<WorkoutPlan>> {
        let row = sqlx::query_as::<_, PlanRow>(&format!(
            "SELECT {PLAN_COLUMNS} FROM workout_plans WHERE id = $1"
        ))
        .bind(plan_id)
        .fetch_optional(pool)
        .await?;

        match row {
            Some(row) => Ok(Self::with_items(pool, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// All plans of a user, oldest first
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<WorkoutPlan>> {
        let rows = sqlx::query_as::<_, PlanRow>(&format!(
            "SELECT {PLAN_COLUMNS} FROM workout_plans WHERE user_id = $1 ORDER BY created_at ASC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Self::with_items(pool, rows).await
    }

    async fn with_items(pool: &PgPool, rows: Vec<PlanRow>) -> Result<Vec<WorkoutPlan>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let item_rows = sqlx::query_as::<_, PlanItemRow>(
            r#"
            SELECT plan_id, day_of_week, exercise_name, exercise_type, sets, reps, weight_kg,
                   duration_seconds, rest_seconds, order_index
            FROM workout_plan_items
            WHERE plan_id = ANY($1)
            ORDER BY plan_id, order_index ASC
            "#,
        )
        .bind(&ids)
        .fetch_all(pool)
        .await?;

        let mut by_plan: HashMap<Uuid, Vec<PlanItem>> = HashMap::new();
        for row in item_rows {
            by_plan.entry(row.plan_id).or_default().push(row.into());
        }

        rows.into_iter()
            .map(|row| {
                let items = by_plan.remove(&row.id).unwrap_or_default();
                row.into_plan(items)
            })
            .collect()
    }

    /// Upsert the plan and replace its items in one transaction
    pub async fn save(pool: &PgPool, plan: &WorkoutPlan) -> Result<()> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO workout_plans
                (id, user_id, name, description, goal, duration_days, weekly_frequency,
                 difficulty, is_active, is_ai_generated, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                goal = EXCLUDED.goal,
                duration_days = EXCLUDED.duration_days,
                weekly_frequency = EXCLUDED.weekly_frequency,
                difficulty = EXCLUDED.difficulty,
                is_active = EXCLUDED.is_active,
                is_ai_generated = EXCLUDED.is_ai_generated,
                updated_at = NOW()
            "#,
        )
        .bind(plan.id)
        .bind(plan.user_id)
        .bind(&plan.name)
        .bind(&plan.description)
        .bind(&plan.goal)
        .bind(to_i32(plan.duration_days))
        .bind(to_i32(plan.weekly_frequency))
        .bind(plan.difficulty.map(|d| d.as_str()))
        .bind(plan.is_active)
        .bind(plan.is_ai_generated)
        .bind(plan.created_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM workout_plan_items WHERE plan_id = $1")
            .bind(plan.id)
            .execute(&mut *tx)
            .await?;

        for (position, item) in plan.items.iter().enumerate() {
            let order_index = item.order_index.unwrap_or(position as u32 + 1);
            sqlx::query(
                r#"
                INSERT INTO workout_plan_items
                    (plan_id, day_of_week, exercise_name, exercise_type, sets, reps, weight_kg,
                     duration_seconds, rest_seconds, order_index)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(plan.id)
            .bind(i16::from(item.day_of_week))
            .bind(&item.exercise_name)
            .bind(&item.exercise_type)
            .bind(to_i32(item.sets))
            .bind(to_i32(item.reps))
            .bind(f64_to_decimal(item.weight_kg))
            .bind(to_i32(item.duration_seconds))
            .bind(to_i32(item.rest_seconds))
            .bind(to_i32(Some(order_index)))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
