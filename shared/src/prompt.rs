//! Structured input for the advice text generator
//!
//! The engine only builds the prompt. Whatever prose comes back is passed
//! through to the caller untouched.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::messages::NamedMessages;
use crate::models::HealthProfile;
use crate::risk;
use crate::scoring::{self, ProgressLevel};
use crate::window::WindowAggregate;

/// What was eaten on the day advice is requested for
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyIntake {
    pub calories: i64,
    pub target_calories: Option<i32>,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl DailyIntake {
    /// Target minus intake: positive means calories remain, negative means over
    pub fn balance(&self) -> Option<i64> {
        self.target_calories.map(|t| i64::from(t) - self.calories)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvicePrompt {
    pub profile: Option<HealthProfile>,
    pub latest_weight: Option<f64>,
    pub workouts: usize,
    pub calories_burned: i64,
    pub nutrition_records: usize,
    pub progress_score: f64,
    pub progress_level: ProgressLevel,
    pub intake: DailyIntake,
    pub warnings: NamedMessages,
}

impl AdvicePrompt {
    /// Build the prompt from the 30-day aggregate, reading today's meals from it
    pub fn build(aggregate: &WindowAggregate, today: NaiveDate) -> Self {
        let todays_meals: Vec<_> = aggregate
            .nutrition
            .iter()
            .filter(|n| n.record_date == today)
            .collect();

        let intake = DailyIntake {
            calories: todays_meals
                .iter()
                .map(|n| i64::from(n.calories.unwrap_or(0)))
                .sum(),
            target_calories: aggregate.profile.as_ref().and_then(|p| p.target_calories),
            protein_g: todays_meals.iter().filter_map(|n| n.protein_g).sum(),
            carbs_g: todays_meals.iter().filter_map(|n| n.carbs_g).sum(),
            fat_g: todays_meals.iter().filter_map(|n| n.fat_g).sum(),
        };

        let score = scoring::score(aggregate);

        Self {
            profile: aggregate.profile.clone(),
            latest_weight: aggregate.latest_weight(),
            workouts: aggregate.workout_count(),
            calories_burned: aggregate.total_calories_burned(),
            nutrition_records: aggregate.nutrition_count(),
            progress_score: score.score,
            progress_level: score.level,
            intake,
            warnings: risk::detect(aggregate, today),
        }
    }

    fn write_profile(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "[Health profile]")?;
        let Some(profile) = &self.profile else {
            return writeln!(out, "- No profile on record");
        };

        if let Some(goal) = &profile.fitness_goal {
            writeln!(out, "- Fitness goal: {}", goal)?;
        }
        if let Some(level) = profile.activity_level {
            writeln!(out, "- Activity level: {}", level.as_str())?;
        }
        let weight = self.latest_weight.or(profile.weight_kg);
        if let (Some(height), Some(weight)) = (profile.height_cm, weight) {
            writeln!(out, "- Height: {:.1} cm, weight: {:.1} kg", height, weight)?;
            if height > 0.0 {
                let meters = height / 100.0;
                writeln!(out, "- BMI: {:.1}", weight / (meters * meters))?;
            }
        }
        if let Some(target) = profile.target_weight_kg {
            writeln!(out, "- Target weight: {:.1} kg", target)?;
        }
        for (label, value) in [
            ("Dietary restrictions", &profile.dietary_restrictions),
            ("Allergies", &profile.allergies),
            ("Medical history", &profile.medical_history),
        ] {
            if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
                writeln!(out, "- {}: {}", label, value)?;
            }
        }
        Ok(())
    }

    fn write_body(&self, out: &mut String) -> std::fmt::Result {
        writeln!(
            out,
            "You are a professional nutritionist and fitness coach. Give personalised, \
             practical advice based on the user data below."
        )?;
        writeln!(out)?;
        self.write_profile(out)?;

        writeln!(out)?;
        writeln!(out, "[Last 30 days]")?;
        writeln!(out, "- Workouts: {}", self.workouts)?;
        writeln!(out, "- Calories burned: {} kcal", self.calories_burned)?;
        writeln!(out, "- Nutrition records: {}", self.nutrition_records)?;
        writeln!(
            out,
            "- Progress score: {:.1} ({})",
            self.progress_score, self.progress_level
        )?;

        writeln!(out)?;
        writeln!(out, "[Today's intake]")?;
        writeln!(out, "- Calories eaten: {} kcal", self.intake.calories)?;
        if let Some(target) = self.intake.target_calories {
            writeln!(out, "- Target calories: {} kcal", target)?;
        }
        match self.intake.balance() {
            Some(remaining) if remaining > 0 => {
                writeln!(out, "- Remaining: {} kcal", remaining)?
            }
            Some(over) if over < 0 => writeln!(out, "- Over target by: {} kcal", -over)?,
            _ => {}
        }
        writeln!(out, "- Protein: {:.1} g", self.intake.protein_g)?;
        writeln!(out, "- Carbs: {:.1} g", self.intake.carbs_g)?;
        writeln!(out, "- Fat: {:.1} g", self.intake.fat_g)?;

        if !self.warnings.is_empty() {
            writeln!(out)?;
            writeln!(out, "[Current warnings]")?;
            for (_, message) in self.warnings.iter() {
                writeln!(out, "- {}", message)?;
            }
        }

        writeln!(out)?;
        writeln!(out, "[Please provide]")?;
        writeln!(out, "1. Diet advice for the user's goal, meal by meal")?;
        writeln!(out, "2. An assessment of today's intake")?;
        match self.intake.balance() {
            Some(balance) if balance < 0 => {
                writeln!(out, "3. How to compensate for the calorie surplus")?
            }
            Some(_) => writeln!(out, "3. How to spend the remaining calories")?,
            None => {}
        }
        writeln!(out, "4. Three to five recommended foods respecting restrictions and allergies")?;
        writeln!(out, "5. A sensible protein/carb/fat split")?;
        write!(out, "6. A concrete suggestion for the next meal")
    }

    /// Render the prompt text sent to the generator
    pub fn render(&self) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = self.write_body(&mut out);
        out
    }
}
