//! User repository: existence checks and the cached member tier

use anyhow::Result;
use chrono::{DateTime, Utc};
use fitness_analytics_shared::MemberTier;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::{decimal_to_f64, MemberAccount};

/// Member account columns of the users table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MemberAccountRow {
    pub id: Uuid,
    pub total_consumption: Decimal,
    pub member_tier: String,
    pub monthly_workout_count: i32,
    pub tier_refreshed_at: Option<DateTime<Utc>>,
}

impl TryFrom<MemberAccountRow> for MemberAccount {
    type Error = anyhow::Error;

    fn try_from(row: MemberAccountRow) -> Result<Self> {
        Ok(MemberAccount {
            user_id: row.id,
            total_consumption: decimal_to_f64(Some(row.total_consumption)).unwrap_or(0.0),
            cached_tier: row.member_tier.parse::<MemberTier>()?,
            monthly_workout_count: u32::try_from(row.monthly_workout_count).unwrap_or(0),
            tier_refreshed_at: row.tier_refreshed_at,
        })
    }
}

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    pub async fn exists(pool: &PgPool, user_id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
        Ok(exists)
    }

    pub async fn get_member_account(pool: &PgPool, user_id: Uuid) -> Result<Option<MemberAccount>> {
        let row = sqlx::query_as::<_, MemberAccountRow>(
            r#"
            SELECT id, total_consumption, member_tier, monthly_workout_count, tier_refreshed_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        row.map(MemberAccount::try_from).transpose()
    }

    /// Cache the result of the latest tier computation
    pub async fn save_member_tier(
        pool: &PgPool,
        user_id: Uuid,
        tier: MemberTier,
        monthly_workout_count: u32,
        refreshed_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET member_tier = $2, monthly_workout_count = $3, tier_refreshed_at = $4,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(tier.as_str())
        .bind(i32::try_from(monthly_workout_count).unwrap_or(i32::MAX))
        .bind(refreshed_at)
        .execute(pool)
        .await?;

        Ok(())
    }
}
