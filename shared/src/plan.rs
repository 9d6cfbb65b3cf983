//! Plan helpers: item binding, starter plans and history summaries

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::adherence::{adherence_ratio, ADHERENCE_WINDOW_DAYS};
use crate::models::{ActivityLevel, DifficultyTier, HealthProfile, PlanItem, WorkoutPlan, WorkoutRecord};

/// Length of a generated starter plan
pub const DEFAULT_PLAN_DURATION_DAYS: u32 = 28;

/// Order items by their existing index (unset last, stable) and renumber 1..n
pub fn bind_items(items: &mut [PlanItem]) {
    items.sort_by_key(|item| (item.order_index.is_none(), item.order_index));
    for (index, item) in items.iter_mut().enumerate() {
        item.order_index = Some(index as u32 + 1);
    }
}

/// Broad goal family used to pick starter exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalKind {
    FatLoss,
    MuscleGain,
    General,
}

impl GoalKind {
    pub fn from_goal(goal: Option<&str>) -> Self {
        let goal = goal.unwrap_or_default().to_lowercase();
        if ["fat", "lose", "loss", "cut", "减脂"].iter().any(|k| goal.contains(k)) {
            GoalKind::FatLoss
        } else if ["muscle", "gain", "bulk", "增肌"].iter().any(|k| goal.contains(k)) {
            GoalKind::MuscleGain
        } else {
            GoalKind::General
        }
    }

    fn item(&self, day_of_week: u8) -> PlanItem {
        let base = PlanItem {
            day_of_week,
            order_index: Some(u32::from(day_of_week)),
            ..Default::default()
        };
        match self {
            GoalKind::FatLoss => PlanItem {
                exercise_name: "Interval Cardio + Core".to_string(),
                exercise_type: Some("cardio".to_string()),
                duration_seconds: Some(30 * 60),
                rest_seconds: Some(60),
                ..base
            },
            GoalKind::MuscleGain => PlanItem {
                exercise_name: "Full-Body Strength".to_string(),
                exercise_type: Some("strength".to_string()),
                sets: Some(4),
                reps: Some(10),
                rest_seconds: Some(90),
                ..base
            },
            GoalKind::General => PlanItem {
                exercise_name: "General Conditioning".to_string(),
                exercise_type: Some("mixed".to_string()),
                sets: Some(3),
                reps: Some(12),
                rest_seconds: Some(75),
                ..base
            },
        }
    }
}

pub fn derive_difficulty(level: Option<ActivityLevel>) -> DifficultyTier {
    match level {
        Some(ActivityLevel::VeryActive | ActivityLevel::ExtraActive) => DifficultyTier::Advanced,
        Some(ActivityLevel::ModeratelyActive) => DifficultyTier::Intermediate,
        _ => DifficultyTier::Beginner,
    }
}

pub fn derive_frequency(level: Option<ActivityLevel>) -> u32 {
    match level {
        Some(ActivityLevel::VeryActive | ActivityLevel::ExtraActive) => 5,
        Some(ActivityLevel::ModeratelyActive) => 4,
        Some(ActivityLevel::LightlyActive) => 3,
        _ => 2,
    }
}

/// Build a starter plan from whatever the profile tells us
pub fn default_plan(
    user_id: Uuid,
    profile: Option<&HealthProfile>,
    created_at: DateTime<Utc>,
) -> WorkoutPlan {
    let level = profile.and_then(|p| p.activity_level);
    let goal = profile.and_then(|p| p.fitness_goal.clone());
    let frequency = derive_frequency(level);
    let kind = GoalKind::from_goal(goal.as_deref());

    let mut items: Vec<PlanItem> = (1..=frequency.min(7) as u8).map(|day| kind.item(day)).collect();
    bind_items(&mut items);

    WorkoutPlan {
        id: Uuid::new_v4(),
        user_id,
        name: Some("Starter plan".to_string()),
        description: None,
        goal,
        duration_days: Some(DEFAULT_PLAN_DURATION_DAYS),
        weekly_frequency: Some(frequency),
        difficulty: Some(derive_difficulty(level)),
        is_active: true,
        is_ai_generated: false,
        items,
        created_at,
    }
}

/// Qualitative label for a plan's recent adherence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanTrend {
    #[serde(rename = "strong")]
    Strong,
    #[serde(rename = "steady")]
    Steady,
    #[serde(rename = "needs improvement")]
    NeedsImprovement,
}

impl PlanTrend {
    pub fn from_adherence(ratio: f64) -> Self {
        if ratio >= 0.8 {
            PlanTrend::Strong
        } else if ratio >= 0.5 {
            PlanTrend::Steady
        } else {
            PlanTrend::NeedsImprovement
        }
    }
}

/// One row of a user's plan history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub plan_id: Uuid,
    pub name: Option<String>,
    pub goal: Option<String>,
    pub duration_days: Option<u32>,
    pub weekly_frequency: Option<u32>,
    pub difficulty: Option<DifficultyTier>,
    pub is_active: bool,
    pub is_ai_generated: bool,
    pub created_at: DateTime<Utc>,
    pub total_workouts: usize,
    pub total_calories: i64,
    pub adherence: Option<f64>,
    pub trend: Option<PlanTrend>,
}

/// Summarise a plan from every workout recorded against it
pub fn summarize(plan: &WorkoutPlan, records: &[WorkoutRecord], today: NaiveDate) -> PlanSummary {
    let since = today - Duration::days(ADHERENCE_WINDOW_DAYS);
    let recent = records
        .iter()
        .filter(|r| r.date() >= since && r.date() <= today)
        .count();
    let adherence = adherence_ratio(recent, plan.effective_weekly_frequency());

    PlanSummary {
        plan_id: plan.id,
        name: plan.name.clone(),
        goal: plan.goal.clone(),
        duration_days: plan.duration_days,
        weekly_frequency: plan.weekly_frequency,
        difficulty: plan.difficulty,
        is_active: plan.is_active,
        is_ai_generated: plan.is_ai_generated,
        created_at: plan.created_at,
        total_workouts: records.len(),
        total_calories: records.iter().map(|r| r.calories()).sum(),
        adherence,
        trend: adherence.map(PlanTrend::from_adherence),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::fixtures::*;
    use rstest::rstest;

    fn named(name: &str, order: Option<u32>) -> PlanItem {
        PlanItem {
            exercise_name: name.to_string(),
            order_index: order,
            ..Default::default()
        }
    }

    #[test]
    fn test_bind_items_orders_and_renumbers() {
        let mut items = vec![
            named("c", None),
            named("b", Some(7)),
            named("a", Some(2)),
            named("d", None),
        ];
        bind_items(&mut items);

        let names: Vec<_> = items.iter().map(|i| i.exercise_name.as_str()).collect();
        let order: Vec<_> = items.iter().map(|i| i.order_index.unwrap()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
        assert_eq!(order, vec![1, 2, 3, 4]);
    }

    #[rstest]
    #[case(Some("Fat loss"), GoalKind::FatLoss)]
    #[case(Some("减脂"), GoalKind::FatLoss)]
    #[case(Some("muscle_gain"), GoalKind::MuscleGain)]
    #[case(Some("stay healthy"), GoalKind::General)]
    #[case(None, GoalKind::General)]
    fn test_goal_kind(#[case] goal: Option<&str>, #[case] kind: GoalKind) {
        assert_eq!(GoalKind::from_goal(goal), kind);
    }

    #[test]
    fn test_default_plan_from_active_profile() {
        let profile = HealthProfile {
            activity_level: Some(ActivityLevel::VeryActive),
            fitness_goal: Some("muscle gain".to_string()),
            ..Default::default()
        };
        let plan = default_plan(Uuid::nil(), Some(&profile), Utc::now());

        assert_eq!(plan.weekly_frequency, Some(5));
        assert_eq!(plan.difficulty, Some(DifficultyTier::Advanced));
        assert_eq!(plan.duration_days, Some(28));
        assert_eq!(plan.items.len(), 5);
        assert!(plan.items.iter().all(|i| i.sets == Some(4) && i.reps == Some(10)));
        assert_eq!(plan.items[4].day_of_week, 5);
        assert_eq!(plan.items[4].order_index, Some(5));
    }

    #[test]
    fn test_default_plan_without_profile() {
        let plan = default_plan(Uuid::nil(), None, Utc::now());
        assert_eq!(plan.weekly_frequency, Some(2));
        assert_eq!(plan.difficulty, Some(DifficultyTier::Beginner));
        assert_eq!(plan.items[0].exercise_name, "General Conditioning");
    }

    #[test]
    fn test_summary_counts_recent_sessions_for_adherence() {
        let plan = default_plan(Uuid::nil(), None, Utc::now());
        let records = vec![
            workout_on(days_ago(1), 300),
            workout_on(days_ago(5), 250),
            workout_on(days_ago(14), 200),
            workout_on(days_ago(40), 100),
        ];

        let summary = summarize(&plan, &records, today());
        assert_eq!(summary.total_workouts, 4);
        assert_eq!(summary.total_calories, 850);
        // 3 sessions against a target of 2/week * 2
        assert_eq!(summary.adherence, Some(0.75));
        assert_eq!(summary.trend, Some(PlanTrend::Steady));
    }

    #[test]
    fn test_trend_labels_serialize() {
        assert_eq!(PlanTrend::from_adherence(0.8), PlanTrend::Strong);
        assert_eq!(PlanTrend::from_adherence(0.49), PlanTrend::NeedsImprovement);
        assert_eq!(
            serde_json::to_string(&PlanTrend::NeedsImprovement).unwrap(),
            "\"needs improvement\""
        );
    }
}
