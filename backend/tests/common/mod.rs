//! Common test utilities for integration tests
//!
//! Tests run against an in-memory record store so the router and services can
//! be exercised without PostgreSQL.

#![allow(dead_code)]

use anyhow::{bail, Result};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use fitness_analytics_backend::{
    config::AppConfig,
    repositories::{MemberAccount, RecordStore},
    routes,
    services::{DisabledTextGenerator, TextGenerator},
    state::AppState,
};
use fitness_analytics_shared::{
    AnalysisSnapshot, BodyMeasurement, ExerciseEntry, HealthProfile, MealType, MemberTier,
    NutritionRecord, PlanItem, WorkoutPlan, WorkoutRecord, WorkoutStatus,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

#[derive(Default)]
struct Records {
    accounts: HashMap<Uuid, MemberAccount>,
    workouts: Vec<WorkoutRecord>,
    nutrition: Vec<NutritionRecord>,
    measurements: Vec<BodyMeasurement>,
    profiles: HashMap<Uuid, HealthProfile>,
    plans: HashMap<Uuid, WorkoutPlan>,
    snapshots: BTreeMap<(Uuid, NaiveDate), AnalysisSnapshot>,
}

/// Record store kept in process memory
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: Mutex<Records>,
    offline: AtomicBool,
}

impl InMemoryRecordStore {
    fn records(&self) -> std::sync::MutexGuard<'_, Records> {
        self.records.lock().unwrap()
    }

    /// Make `ping` fail, as if the database went away
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn add_user(&self, total_consumption: f64) -> Uuid {
        let user_id = Uuid::new_v4();
        self.records().accounts.insert(
            user_id,
            MemberAccount {
                user_id,
                total_consumption,
                cached_tier: MemberTier::Bronze,
                monthly_workout_count: 0,
                tier_refreshed_at: None,
            },
        );
        user_id
    }

    pub fn add_workout(&self, workout: WorkoutRecord) {
        self.records().workouts.push(workout);
    }

    pub fn add_nutrition(&self, record: NutritionRecord) {
        self.records().nutrition.push(record);
    }

    pub fn add_measurement(&self, measurement: BodyMeasurement) {
        self.records().measurements.push(measurement);
    }

    pub fn set_profile(&self, profile: HealthProfile) {
        self.records().profiles.insert(profile.user_id, profile);
    }

    pub fn add_plan(&self, plan: WorkoutPlan) {
        self.records().plans.insert(plan.id, plan);
    }

    pub fn plan(&self, plan_id: Uuid) -> Option<WorkoutPlan> {
        self.records().plans.get(&plan_id).cloned()
    }

    pub fn account(&self, user_id: Uuid) -> Option<MemberAccount> {
        self.records().accounts.get(&user_id).cloned()
    }

    pub fn snapshot_count(&self, user_id: Uuid) -> usize {
        self.records()
            .snapshots
            .keys()
            .filter(|(owner, _)| *owner == user_id)
            .count()
    }
}

fn in_range(date: NaiveDate, from: NaiveDate, to: NaiveDate) -> bool {
    date >= from && date <= to
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn ping(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            bail!("connection refused");
        }
        Ok(())
    }

    async fn user_exists(&self, user_id: Uuid) -> Result<bool> {
        Ok(self.records().accounts.contains_key(&user_id))
    }

    async fn list_workouts(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<WorkoutRecord>> {
        Ok(self
            .records()
            .workouts
            .iter()
            .filter(|w| w.user_id == user_id && in_range(w.date(), from, to))
            .cloned()
            .collect())
    }

    async fn list_nutrition(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NutritionRecord>> {
        Ok(self
            .records()
            .nutrition
            .iter()
            .filter(|n| n.user_id == user_id && in_range(n.record_date, from, to))
            .cloned()
            .collect())
    }

    async fn list_measurements(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<BodyMeasurement>> {
        Ok(self
            .records()
            .measurements
            .iter()
            .filter(|m| m.user_id == user_id && in_range(m.measured_on, from, to))
            .cloned()
            .collect())
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<HealthProfile>> {
        Ok(self.records().profiles.get(&user_id).cloned())
    }

    async fn get_plan(&self, plan_id: Uuid) -> Result<Option<WorkoutPlan>> {
        Ok(self.records().plans.get(&plan_id).cloned())
    }

    async fn list_plans(&self, user_id: Uuid) -> Result<Vec<WorkoutPlan>> {
        let mut plans: Vec<WorkoutPlan> = self
            .records()
            .plans
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        plans.sort_by_key(|p| p.created_at);
        Ok(plans)
    }

    async fn list_plan_workouts(
        &self,
        plan_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<WorkoutRecord>> {
        Ok(self
            .records()
            .workouts
            .iter()
            .filter(|w| w.plan_id == Some(plan_id) && in_range(w.date(), from, to))
            .cloned()
            .collect())
    }

    async fn save_plan(&self, plan: &WorkoutPlan) -> Result<()> {
        self.records().plans.insert(plan.id, plan.clone());
        Ok(())
    }

    async fn save_snapshot(&self, snapshot: &AnalysisSnapshot) -> Result<()> {
        self.records()
            .snapshots
            .insert((snapshot.user_id, snapshot.analysis_date), snapshot.clone());
        Ok(())
    }

    async fn latest_snapshot(&self, user_id: Uuid) -> Result<Option<AnalysisSnapshot>> {
        Ok(self
            .records()
            .snapshots
            .iter()
            .filter(|((owner, _), _)| *owner == user_id)
            .max_by_key(|((_, date), _)| *date)
            .map(|(_, snapshot)| snapshot.clone()))
    }

    async fn get_member_account(&self, user_id: Uuid) -> Result<Option<MemberAccount>> {
        Ok(self.records().accounts.get(&user_id).cloned())
    }

    async fn save_member_tier(
        &self,
        user_id: Uuid,
        tier: MemberTier,
        monthly_workout_count: u32,
        refreshed_at: DateTime<Utc>,
    ) -> Result<()> {
        if let Some(account) = self.records().accounts.get_mut(&user_id) {
            account.cached_tier = tier;
            account.monthly_workout_count = monthly_workout_count;
            account.tier_refreshed_at = Some(refreshed_at);
        }
        Ok(())
    }
}

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub store: Arc<InMemoryRecordStore>,
}

impl TestApp {
    /// Application backed by an empty in-memory store with AI disabled
    pub fn new() -> Self {
        Self::with_text_generator(Arc::new(DisabledTextGenerator))
    }

    pub fn with_text_generator(text: Arc<dyn TextGenerator>) -> Self {
        Self::with_config(AppConfig::default(), text)
    }

    pub fn with_config(config: AppConfig, text: Arc<dyn TextGenerator>) -> Self {
        let store = Arc::new(InMemoryRecordStore::default());
        let state = AppState::with_text_generator(store.clone(), config, text)
            .expect("Failed to build test state");
        let app = routes::create_router(state.clone());

        Self { app, state, store }
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        self.send(request).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.send(request).await
    }

    /// Make a POST request without a body
    pub async fn post_empty(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }
}

// ============================================================================
// Record builders
// ============================================================================

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn days_ago(days: i64) -> NaiveDate {
    today() - Duration::days(days)
}

pub fn noon(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap()).and_utc()
}

pub fn workout(user_id: Uuid, date: NaiveDate, calories: i32) -> WorkoutRecord {
    WorkoutRecord {
        id: Uuid::new_v4(),
        user_id,
        plan_id: None,
        started_at: noon(date),
        ended_at: Some(noon(date) + Duration::minutes(45)),
        duration_seconds: Some(2700),
        calories_burned: Some(calories),
        avg_heart_rate: Some(130.0),
        min_heart_rate: Some(90.0),
        max_heart_rate: Some(160.0),
        status: WorkoutStatus::Completed,
        exercises: Vec::new(),
    }
}

pub fn exercise(name: &str, sets: u32, reps: u32, weight_kg: f64) -> ExerciseEntry {
    ExerciseEntry {
        name: name.to_string(),
        sets: Some(sets),
        reps: Some(reps),
        weight_kg: Some(weight_kg),
        is_completed: true,
        ..Default::default()
    }
}

pub fn meal(user_id: Uuid, date: NaiveDate, calories: i32) -> NutritionRecord {
    NutritionRecord {
        id: Uuid::new_v4(),
        user_id,
        record_date: date,
        meal_type: MealType::Lunch,
        calories: Some(calories),
        protein_g: Some(30.0),
        carbs_g: Some(60.0),
        fat_g: Some(15.0),
        fiber_g: Some(8.0),
        is_ai_recognized: false,
    }
}

pub fn weighed(user_id: Uuid, date: NaiveDate, weight_kg: f64) -> BodyMeasurement {
    BodyMeasurement {
        id: Uuid::new_v4(),
        user_id,
        measured_on: date,
        weight_kg: Some(weight_kg),
        ..Default::default()
    }
}

pub fn plan(user_id: Uuid, weekly_frequency: u32) -> WorkoutPlan {
    WorkoutPlan {
        id: Uuid::new_v4(),
        user_id,
        name: Some("Strength block".to_string()),
        description: Some("Base phase".to_string()),
        goal: Some("muscle_gain".to_string()),
        duration_days: Some(28),
        weekly_frequency: Some(weekly_frequency),
        difficulty: None,
        is_active: true,
        is_ai_generated: false,
        items: vec![
            PlanItem {
                day_of_week: 1,
                exercise_name: "Squat".to_string(),
                sets: Some(4),
                reps: Some(10),
                order_index: Some(2),
                ..Default::default()
            },
            PlanItem {
                day_of_week: 1,
                exercise_name: "Bench Press".to_string(),
                sets: Some(3),
                reps: Some(10),
                order_index: Some(1),
                ..Default::default()
            },
        ],
        created_at: noon(days_ago(20)),
    }
}
