//! Analysis snapshot repository

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use fitness_analytics_shared::{
    AnalysisSnapshot, ChartPayload, NamedMessages, ProgressLevel,
};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

/// Snapshot row from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SnapshotRow {
    pub user_id: Uuid,
    pub analysis_date: NaiveDate,
    pub progress_score: f64,
    pub total_workouts: i32,
    pub total_calories_burned: i64,
    pub weight_change: Option<f64>,
    pub body_fat_change: Option<f64>,
    pub risk_warnings: Json<NamedMessages>,
    pub recommendations: Json<NamedMessages>,
    pub chart_data: Json<ChartPayload>,
    pub generated_at: DateTime<Utc>,
}

impl From<SnapshotRow> for AnalysisSnapshot {
    fn from(row: SnapshotRow) -> Self {
        AnalysisSnapshot {
            user_id: row.user_id,
            analysis_date: row.analysis_date,
            progress_score: row.progress_score,
            // level is derived from the score, never trusted from storage
            progress_level: ProgressLevel::from_score(row.progress_score),
            total_workouts: usize::try_from(row.total_workouts).unwrap_or(0),
            total_calories_burned: row.total_calories_burned,
            weight_change: row.weight_change,
            body_fat_change: row.body_fat_change,
            risk_warnings: row.risk_warnings.0,
            recommendations: row.recommendations.0,
            chart_data: row.chart_data.0,
            generated_at: row.generated_at,
        }
    }
}

/// Snapshot repository for database operations
pub struct SnapshotRepository;

impl SnapshotRepository {
    /// Insert or overwrite the snapshot for (user, analysis date)
    pub async fn upsert(pool: &PgPool, snapshot: &AnalysisSnapshot) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO analysis_snapshots
                (user_id, analysis_date, progress_score, progress_level, total_workouts,
                 total_calories_burned, weight_change, body_fat_change, risk_warnings,
                 recommendations, chart_data, generated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (user_id, analysis_date) DO UPDATE SET
                progress_score = EXCLUDED.progress_score,
                progress_level = EXCLUDED.progress_level,
                total_workouts = EXCLUDED.total_workouts,
                total_calories_burned = EXCLUDED.total_calories_burned,
                weight_change = EXCLUDED.weight_change,
                body_fat_change = EXCLUDED.body_fat_change,
                risk_warnings = EXCLUDED.risk_warnings,
                recommendations = EXCLUDED.recommendations,
                chart_data = EXCLUDED.chart_data,
                generated_at = EXCLUDED.generated_at
            "#,
        )
        .bind(snapshot.user_id)
        .bind(snapshot.analysis_date)
        .bind(snapshot.progress_score)
        .bind(snapshot.progress_level.as_str())
        .bind(i32::try_from(snapshot.total_workouts).unwrap_or(i32::MAX))
        .bind(snapshot.total_calories_burned)
        .bind(snapshot.weight_change)
        .bind(snapshot.body_fat_change)
        .bind(Json(&snapshot.risk_warnings))
        .bind(Json(&snapshot.recommendations))
        .bind(Json(&snapshot.chart_data))
        .bind(snapshot.generated_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Most recent snapshot by analysis date
    pub async fn latest(pool: &PgPool, user_id: Uuid) -> Result<Option<AnalysisSnapshot>> {
        let row = sqlx::query_as::<_, SnapshotRow>(
            r#"
            SELECT user_id, analysis_date, progress_score, total_workouts, total_calories_burned,
                   weight_change, body_fat_change, risk_warnings, recommendations, chart_data,
                   generated_at
            FROM analysis_snapshots
            WHERE user_id = $1
            ORDER BY analysis_date DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(AnalysisSnapshot::from))
    }
}
