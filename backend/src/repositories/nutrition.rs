//! Nutrition record repository

use anyhow::Result;
use chrono::NaiveDate;
use fitness_analytics_shared::{MealType, NutritionRecord};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::decimal_to_f64;

/// Nutrition row from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NutritionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub record_date: NaiveDate,
    pub meal_type: String,
    pub calories: Option<i32>,
    pub protein_g: Option<Decimal>,
    pub carbs_g: Option<Decimal>,
    pub fat_g: Option<Decimal>,
    pub fiber_g: Option<Decimal>,
    pub is_ai_recognized: bool,
}

impl TryFrom<NutritionRow> for NutritionRecord {
    type Error = anyhow::Error;

    fn try_from(row: NutritionRow) -> Result<Self> {
        Ok(NutritionRecord {
            id: row.id,
            user_id: row.user_id,
            record_date: row.record_date,
            meal_type: row.meal_type.parse::<MealType>()?,
            calories: row.calories,
            protein_g: decimal_to_f64(row.protein_g),
            carbs_g: decimal_to_f64(row.carbs_g),
            fat_g: decimal_to_f64(row.fat_g),
            fiber_g: decimal_to_f64(row.fiber_g),
            is_ai_recognized: row.is_ai_recognized,
        })
    }
}

/// Nutrition repository for database operations
pub struct NutritionRepository;

impl NutritionRepository {
    /// Records dated within the inclusive range
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NutritionRecord>> {
        let rows = sqlx::query_as::<_, NutritionRow>(
            r#"
            SELECT id, user_id, record_date, meal_type, calories, protein_g, carbs_g, fat_g,
                   fiber_g, is_ai_recognized
            FROM nutrition_records
            WHERE user_id = $1 AND record_date >= $2 AND record_date <= $3
            ORDER BY record_date ASC, created_at ASC
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;

        rows.into_iter().map(NutritionRecord::try_from).collect()
    }
}
