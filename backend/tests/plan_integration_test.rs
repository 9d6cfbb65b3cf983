//! Integration tests for plan adjustment, history and starter plans

mod common;

use axum::http::StatusCode;
use common::*;
use fitness_analytics_backend::services::PlanService;
use fitness_analytics_shared::{ActivityLevel, DifficultyTier, HealthProfile};
use serde_json::{json, Value};
use uuid::Uuid;

fn parse(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}

fn log_plan_sessions(app: &TestApp, user_id: Uuid, plan_id: Uuid, days: &[i64]) {
    for day in days {
        let mut session = workout(user_id, days_ago(*day), 300);
        session.plan_id = Some(plan_id);
        app.store.add_workout(session);
    }
}

#[tokio::test]
async fn test_full_adherence_raises_plan() {
    let app = TestApp::new();
    let user_id = app.store.add_user(0.0);
    let plan = plan(user_id, 4);
    let plan_id = plan.id;
    app.store.add_plan(plan);
    log_plan_sessions(&app, user_id, plan_id, &[0, 1, 3, 5, 7, 9, 11, 13]);

    let (status, body) = app
        .post(
            &format!("/api/v1/users/{}/plans/{}/adjust", user_id, plan_id),
            &json!({}).to_string(),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let response = parse(&body);
    assert_eq!(response["outcome"]["adherence"], 1.0);
    assert_eq!(response["outcome"]["band"], "raise");
    assert_eq!(response["plan"]["difficulty"], "advanced");
    assert_eq!(response["plan"]["weekly_frequency"], 5);

    let stored = app.store.plan(plan_id).unwrap();
    assert_eq!(stored.difficulty, Some(DifficultyTier::Advanced));
    assert_eq!(stored.weekly_frequency, Some(5));
    // items are renumbered in order-index order and volume goes up
    assert_eq!(stored.items[0].exercise_name, "Bench Press");
    assert_eq!(stored.items[0].order_index, Some(1));
    assert_eq!(stored.items[0].sets, Some(4));
    assert_eq!(stored.items[1].order_index, Some(2));
    assert_eq!(stored.items[1].reps, Some(12));
    assert!(stored
        .description
        .unwrap()
        .contains("Recent adherence: 100%"));
}

#[tokio::test]
async fn test_low_adherence_lowers_plan() {
    let app = TestApp::new();
    let user_id = app.store.add_user(0.0);
    let plan = plan(user_id, 3);
    let plan_id = plan.id;
    app.store.add_plan(plan);
    // one session inside the window, one outside it
    log_plan_sessions(&app, user_id, plan_id, &[2, 20]);

    let (status, body) = app
        .post_empty(&format!("/api/v1/users/{}/plans/{}/adjust", user_id, plan_id))
        .await;

    assert_eq!(status, StatusCode::OK);
    let response = parse(&body);
    assert_eq!(response["outcome"]["adherence"], 0.17);
    assert_eq!(response["plan"]["difficulty"], "beginner");
    assert_eq!(response["plan"]["weekly_frequency"], 2);
}

#[tokio::test]
async fn test_fatigue_feedback_forces_beginner() {
    let app = TestApp::new();
    let user_id = app.store.add_user(0.0);
    let plan = plan(user_id, 2);
    let plan_id = plan.id;
    app.store.add_plan(plan);
    log_plan_sessions(&app, user_id, plan_id, &[1, 3, 5, 8]);

    let (status, body) = app
        .post(
            &format!("/api/v1/users/{}/plans/{}/adjust", user_id, plan_id),
            &json!({ "feedback": "Feeling really tired this week" }).to_string(),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let response = parse(&body);
    assert_eq!(response["outcome"]["fatigue_override"], true);
    assert_eq!(response["plan"]["difficulty"], "beginner");
    assert!(response["plan"]["description"]
        .as_str()
        .unwrap()
        .contains("Feedback: Feeling really tired this week"));
}

#[tokio::test]
async fn test_adjust_rejects_long_feedback() {
    let app = TestApp::new();
    let user_id = app.store.add_user(0.0);
    let plan = plan(user_id, 3);
    let plan_id = plan.id;
    app.store.add_plan(plan);

    let (status, body) = app
        .post(
            &format!("/api/v1/users/{}/plans/{}/adjust", user_id, plan_id),
            &json!({ "feedback": "x".repeat(501) }).to_string(),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse(&body)["error"]["field"], "feedback");
    assert_eq!(app.store.plan(plan_id).unwrap().difficulty, None);
}

#[tokio::test]
async fn test_adjust_rejects_malformed_body() {
    let app = TestApp::new();
    let user_id = app.store.add_user(0.0);
    let plan = plan(user_id, 4);
    let plan_id = plan.id;
    app.store.add_plan(plan);
    log_plan_sessions(&app, user_id, plan_id, &[0, 2, 4, 6, 8, 10]);

    for body in [r#"{"feedback": "so tired""#, r#"{"feedback": 7}"#] {
        let (status, response) = app
            .post(
                &format!("/api/v1/users/{}/plans/{}/adjust", user_id, plan_id),
                body,
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(parse(&response)["error"]["code"], "BAD_REQUEST");
    }

    let stored = app.store.plan(plan_id).unwrap();
    assert_eq!(stored.difficulty, None);
    assert_eq!(stored.description.as_deref(), Some("Base phase"));
}

#[tokio::test]
async fn test_adjust_unknown_plan_is_not_found() {
    let app = TestApp::new();
    let user_id = app.store.add_user(0.0);

    let (status, _) = app
        .post_empty(&format!(
            "/api/v1/users/{}/plans/{}/adjust",
            user_id,
            Uuid::new_v4()
        ))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_adjust_plan_of_other_user_is_forbidden() {
    let app = TestApp::new();
    let owner = app.store.add_user(0.0);
    let intruder = app.store.add_user(0.0);
    let plan = plan(owner, 3);
    let plan_id = plan.id;
    app.store.add_plan(plan);

    let (status, body) = app
        .post_empty(&format!("/api/v1/users/{}/plans/{}/adjust", intruder, plan_id))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(parse(&body)["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_concurrent_adjustments_are_serialized() {
    let app = TestApp::new();
    let user_id = app.store.add_user(0.0);
    let plan = plan(user_id, 4);
    let plan_id = plan.id;
    app.store.add_plan(plan);
    log_plan_sessions(&app, user_id, plan_id, &[0, 1, 2, 3, 4, 5, 6, 7]);

    let today = today();
    let (first, second) = tokio::join!(
        PlanService::adjust(&app.state, user_id, plan_id, None, today),
        PlanService::adjust(&app.state, user_id, plan_id, None, today),
    );
    first.unwrap();
    second.unwrap();

    // 8 sessions against 4/week, then 8 against 5/week: 4 -> 5 -> 5
    let stored = app.store.plan(plan_id).unwrap();
    assert_eq!(stored.weekly_frequency, Some(5));
    assert_eq!(stored.description.unwrap().matches("Auto-optimized").count(), 2);
    assert!(app.state.plan_locks.is_empty());
}

#[tokio::test]
async fn test_plan_history() {
    let app = TestApp::new();
    let user_id = app.store.add_user(0.0);
    let plan = plan(user_id, 4);
    let plan_id = plan.id;
    app.store.add_plan(plan);
    log_plan_sessions(&app, user_id, plan_id, &[1, 2, 4, 6, 8, 10, 15]);

    let (status, body) = app
        .get(&format!("/api/v1/users/{}/plans/history", user_id))
        .await;

    assert_eq!(status, StatusCode::OK);
    let history = parse(&body);
    let summaries = history.as_array().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0]["total_workouts"], 7);
    assert_eq!(summaries[0]["total_calories"], 2100);
    assert_eq!(summaries[0]["adherence"], 0.75);
    assert_eq!(summaries[0]["trend"], "steady");
}

#[tokio::test]
async fn test_create_default_plan_from_profile() {
    let app = TestApp::new();
    let user_id = app.store.add_user(0.0);
    app.store.set_profile(HealthProfile {
        user_id,
        activity_level: Some(ActivityLevel::VeryActive),
        fitness_goal: Some("muscle_gain".to_string()),
        ..Default::default()
    });

    let (status, body) = app
        .post_empty(&format!("/api/v1/users/{}/plans/default", user_id))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let plan = parse(&body);
    assert_eq!(plan["difficulty"], "advanced");
    assert_eq!(plan["weekly_frequency"], 5);
    assert_eq!(plan["duration_days"], 28);
    assert_eq!(plan["items"].as_array().unwrap().len(), 5);

    let plan_id: Uuid = plan["id"].as_str().unwrap().parse().unwrap();
    assert!(app.store.plan(plan_id).is_some());
}

#[tokio::test]
async fn test_create_default_plan_for_unknown_user() {
    let app = TestApp::new();

    let (status, _) = app
        .post_empty(&format!("/api/v1/users/{}/plans/default", Uuid::new_v4()))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
