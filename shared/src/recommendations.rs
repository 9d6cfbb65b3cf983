//! Rule table mapping deficiencies and surpluses to advice

use crate::messages::NamedMessages;
use crate::window::WindowAggregate;

pub const TRAINING: &str = "training";
pub const NUTRITION: &str = "nutrition";
pub const WEIGHT_LOSS: &str = "weight_loss";
pub const WEIGHT_GAIN: &str = "weight_gain";

/// Fewer workouts than this in 30 days triggers the training advice
const TARGET_WORKOUTS: usize = 12;
/// Fewer nutrition records than this in 30 days triggers the logging advice
const TARGET_NUTRITION_RECORDS: usize = 60;

/// Evaluate the recommendation table over an aggregate
pub fn recommend(aggregate: &WindowAggregate) -> NamedMessages {
    let mut recommendations = NamedMessages::new();

    if aggregate.workout_count() < TARGET_WORKOUTS {
        recommendations.put(TRAINING, "Aim for at least 3-4 training sessions per week");
    }

    if aggregate.nutrition_count() < TARGET_NUTRITION_RECORDS {
        recommendations.put(NUTRITION, "Log all three main meals every day");
    }

    let trend = (
        aggregate.latest_weight(),
        aggregate.target_weight(),
        aggregate.weight_change(),
    );
    if let (Some(current), Some(target), Some(change)) = trend {
        if current > target && change > 0.0 {
            recommendations.put(
                WEIGHT_LOSS,
                "Weight is still rising; add more cardio and tighten your diet",
            );
        } else if current < target && change < 0.0 {
            recommendations.put(
                WEIGHT_GAIN,
                "Weight is falling; add strength training and increase your intake",
            );
        }
    }

    recommendations
}
