//! Body measurement repository

use anyhow::Result;
use chrono::NaiveDate;
use fitness_analytics_shared::BodyMeasurement;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::decimal_to_f64;

/// Body measurement row from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MeasurementRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub measured_on: NaiveDate,
    pub weight_kg: Option<Decimal>,
    pub body_fat_percent: Option<Decimal>,
    pub muscle_mass_kg: Option<Decimal>,
    pub chest_cm: Option<Decimal>,
    pub waist_cm: Option<Decimal>,
    pub hip_cm: Option<Decimal>,
    pub arm_cm: Option<Decimal>,
    pub thigh_cm: Option<Decimal>,
}

impl From<MeasurementRow> for BodyMeasurement {
    fn from(row: MeasurementRow) -> Self {
        BodyMeasurement {
            id: row.id,
            user_id: row.user_id,
            measured_on: row.measured_on,
            weight_kg: decimal_to_f64(row.weight_kg),
            body_fat_percent: decimal_to_f64(row.body_fat_percent),
            muscle_mass_kg: decimal_to_f64(row.muscle_mass_kg),
            chest_cm: decimal_to_f64(row.chest_cm),
            waist_cm: decimal_to_f64(row.waist_cm),
            hip_cm: decimal_to_f64(row.hip_cm),
            arm_cm: decimal_to_f64(row.arm_cm),
            thigh_cm: decimal_to_f64(row.thigh_cm),
        }
    }
}

/// Measurement repository for database operations
pub struct MeasurementRepository;

impl MeasurementRepository {
    /// Measurements within the inclusive range, oldest first
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<BodyMeasurement>> {
        let rows = sqlx::query_as::<_, MeasurementRow>(
            r#"
            SELECT id, user_id, measured_on, weight_kg, body_fat_percent, muscle_mass_kg,
                   chest_cm, waist_cm, hip_cm, arm_cm, thigh_cm
            FROM body_measurements
            WHERE user_id = $1 AND measured_on >= $2 AND measured_on <= $3
            ORDER BY measured_on ASC, created_at ASC
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(BodyMeasurement::from).collect())
    }
}
