//! Record store
//!
//! The analytics services read and write through the [`RecordStore`] trait.
//! [`PgRecordStore`] implements it over PostgreSQL with one repository per
//! table family; tests substitute an in-memory store.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use fitness_analytics_shared::{
    AnalysisSnapshot, BodyMeasurement, HealthProfile, MemberTier, NutritionRecord, WorkoutPlan,
    WorkoutRecord,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

pub mod analysis;
pub mod measurement;
pub mod nutrition;
pub mod plan;
pub mod profile;
pub mod user;
pub mod workout;

pub use analysis::SnapshotRepository;
pub use measurement::MeasurementRepository;
pub use nutrition::NutritionRepository;
pub use plan::PlanRepository;
pub use profile::ProfileRepository;
pub use user::UserRepository;
pub use workout::WorkoutRepository;

/// Loyalty data kept on the user row
#[derive(Debug, Clone, PartialEq)]
pub struct MemberAccount {
    pub user_id: Uuid,
    pub total_consumption: f64,
    /// Tier from the last recomputation
    pub cached_tier: MemberTier,
    pub monthly_workout_count: u32,
    pub tier_refreshed_at: Option<DateTime<Utc>>,
}

/// Storage collaborator for the analytics services
///
/// Date ranges are inclusive calendar dates.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Cheap connectivity probe for readiness checks
    async fn ping(&self) -> Result<()>;

    async fn user_exists(&self, user_id: Uuid) -> Result<bool>;

    async fn list_workouts(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<WorkoutRecord>>;

    async fn list_nutrition(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NutritionRecord>>;

    async fn list_measurements(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<BodyMeasurement>>;

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<HealthProfile>>;

    async fn get_plan(&self, plan_id: Uuid) -> Result<Option<WorkoutPlan>>;

    async fn list_plans(&self, user_id: Uuid) -> Result<Vec<WorkoutPlan>>;

    /// Workouts recorded against one plan
    async fn list_plan_workouts(
        &self,
        plan_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<WorkoutRecord>>;

    /// Insert or fully replace a plan and its items
    async fn save_plan(&self, plan: &WorkoutPlan) -> Result<()>;

    /// Upsert on (user, analysis date); the last write wins
    async fn save_snapshot(&self, snapshot: &AnalysisSnapshot) -> Result<()>;

    async fn latest_snapshot(&self, user_id: Uuid) -> Result<Option<AnalysisSnapshot>>;

    async fn get_member_account(&self, user_id: Uuid) -> Result<Option<MemberAccount>>;

    async fn save_member_tier(
        &self,
        user_id: Uuid,
        tier: MemberTier,
        monthly_workout_count: u32,
        refreshed_at: DateTime<Utc>,
    ) -> Result<()>;
}

/// PostgreSQL-backed record store
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn ping(&self) -> Result<()> {
        crate::db::health_check(&self.pool).await
    }

    async fn user_exists(&self, user_id: Uuid) -> Result<bool> {
        UserRepository::exists(&self.pool, user_id).await
    }

    async fn list_workouts(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<WorkoutRecord>> {
        WorkoutRepository::list_for_user(&self.pool, user_id, from, to).await
    }

    async fn list_nutrition(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NutritionRecord>> {
        NutritionRepository::list_for_user(&self.pool, user_id, from, to).await
    }

    async fn list_measurements(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<BodyMeasurement>> {
        MeasurementRepository::list_for_user(&self.pool, user_id, from, to).await
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<HealthProfile>> {
        ProfileRepository::get(&self.pool, user_id).await
    }

    async fn get_plan(&self, plan_id: Uuid) -> Result<Option<WorkoutPlan>> {
        PlanRepository::get(&self.pool, plan_id).await
    }

    async fn list_plans(&self, user_id: Uuid) -> Result<Vec<WorkoutPlan>> {
        PlanRepository::list_for_user(&self.pool, user_id).await
    }

    async fn list_plan_workouts(
        &self,
        plan_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<WorkoutRecord>> {
        WorkoutRepository::list_for_plan(&self.pool, plan_id, from, to).await
    }

    async fn save_plan(&self, plan: &WorkoutPlan) -> Result<()> {
        PlanRepository::save(&self.pool, plan).await
    }

    async fn save_snapshot(&self, snapshot: &AnalysisSnapshot) -> Result<()> {
        SnapshotRepository::upsert(&self.pool, snapshot).await
    }

    async fn latest_snapshot(&self, user_id: Uuid) -> Result<Option<AnalysisSnapshot>> {
        SnapshotRepository::latest(&self.pool, user_id).await
    }

    async fn get_member_account(&self, user_id: Uuid) -> Result<Option<MemberAccount>> {
        UserRepository::get_member_account(&self.pool, user_id).await
    }

    async fn save_member_tier(
        &self,
        user_id: Uuid,
        tier: MemberTier,
        monthly_workout_count: u32,
        refreshed_at: DateTime<Utc>,
    ) -> Result<()> {
        UserRepository::save_member_tier(&self.pool, user_id, tier, monthly_workout_count, refreshed_at)
            .await
    }
}

// ============================================================================
// Row conversion helpers
// ============================================================================

/// Half-open UTC range covering the inclusive calendar dates `from..=to`
pub(crate) fn utc_day_range(from: NaiveDate, to: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = from.and_time(NaiveTime::MIN).and_utc();
    let end = (to + Duration::days(1)).and_time(NaiveTime::MIN).and_utc();
    (start, end)
}

pub(crate) fn decimal_to_f64(value: Option<Decimal>) -> Option<f64> {
    value.and_then(|d| d.to_f64())
}

pub(crate) fn f64_to_decimal(value: Option<f64>) -> Option<Decimal> {
    value.and_then(|v| Decimal::try_from(v).ok())
}

/// Non-negative integer column to `u32`; negative values are treated as unset
pub(crate) fn to_u32(value: Option<i32>) -> Option<u32> {
    value.and_then(|v| u32::try_from(v).ok())
}

pub(crate) fn to_i32(value: Option<u32>) -> Option<i32> {
    value.and_then(|v| i32::try_from(v).ok())
}
