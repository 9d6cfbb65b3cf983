//! Health profile repository

use anyhow::Result;
use chrono::NaiveDate;
use fitness_analytics_shared::{ActivityLevel, Gender, HealthProfile};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::decimal_to_f64;

/// Health profile row from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRow {
    pub user_id: Uuid,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub height_cm: Option<Decimal>,
    pub weight_kg: Option<Decimal>,
    pub target_weight_kg: Option<Decimal>,
    pub target_calories: Option<i32>,
    pub activity_level: Option<String>,
    pub fitness_goal: Option<String>,
    pub medical_history: Option<String>,
    pub allergies: Option<String>,
    pub dietary_restrictions: Option<String>,
}

impl TryFrom<ProfileRow> for HealthProfile {
    type Error = anyhow::Error;

    fn try_from(row: ProfileRow) -> Result<Self> {
        Ok(HealthProfile {
            user_id: row.user_id,
            birth_date: row.birth_date,
            gender: row.gender.as_deref().map(str::parse::<Gender>).transpose()?,
            height_cm: decimal_to_f64(row.height_cm),
            weight_kg: decimal_to_f64(row.weight_kg),
            target_weight_kg: decimal_to_f64(row.target_weight_kg),
            target_calories: row.target_calories,
            activity_level: row
                .activity_level
                .as_deref()
                .map(str::parse::<ActivityLevel>)
                .transpose()?,
            fitness_goal: row.fitness_goal,
            medical_history: row.medical_history,
            allergies: row.allergies,
            dietary_restrictions: row.dietary_restrictions,
        })
    }
}

/// Profile repository for database operations
pub struct ProfileRepository;

impl ProfileRepository {
    /// The user's profile, if one has been created
    pub async fn get(pool: &PgPool, user_id: Uuid) -> Result<Option<HealthProfile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT user_id, birth_date, gender, height_cm, weight_kg, target_weight_kg,
                   target_calories, activity_level, fitness_goal, medical_history, allergies,
                   dietary_restrictions
            FROM health_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        row.map(HealthProfile::try_from).transpose()
    }
}
