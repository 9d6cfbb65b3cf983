//! Member tiers
//!
//! A loyalty score over the trailing 30 days:
//! `workouts * 2.0 + nutrition_records * 0.5 + total_consumption / 500.0`,
//! mapped onto an ordered tier ladder. Tiers are always recomputed; any
//! stored tier is just the last result.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::EngineError;

/// Trailing window the composite is computed over
pub const TIER_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MemberTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

impl MemberTier {
    /// Highest tier first, with its inclusive minimum score
    const LADDER: [(MemberTier, f64); 4] = [
        (MemberTier::Diamond, 50.0),
        (MemberTier::Platinum, 35.0),
        (MemberTier::Gold, 20.0),
        (MemberTier::Silver, 10.0),
    ];

    pub fn from_score(score: f64) -> Self {
        Self::LADDER
            .iter()
            .find(|(_, min)| score >= *min)
            .map(|(tier, _)| *tier)
            .unwrap_or(MemberTier::Bronze)
    }

    /// Minimum composite score for this tier
    pub fn threshold(&self) -> f64 {
        Self::LADDER
            .iter()
            .find(|(tier, _)| tier == self)
            .map(|(_, min)| *min)
            .unwrap_or(0.0)
    }

    /// Points shown as the next goal; DIAMOND has no higher tier
    pub fn next_level_points(&self) -> f64 {
        match self {
            MemberTier::Bronze => 10.0,
            MemberTier::Silver => 20.0,
            MemberTier::Gold => 35.0,
            MemberTier::Platinum | MemberTier::Diamond => 50.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberTier::Bronze => "BRONZE",
            MemberTier::Silver => "SILVER",
            MemberTier::Gold => "GOLD",
            MemberTier::Platinum => "PLATINUM",
            MemberTier::Diamond => "DIAMOND",
        }
    }
}

impl fmt::Display for MemberTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberTier {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "BRONZE" => Ok(MemberTier::Bronze),
            "SILVER" => Ok(MemberTier::Silver),
            "GOLD" => Ok(MemberTier::Gold),
            "PLATINUM" => Ok(MemberTier::Platinum),
            "DIAMOND" => Ok(MemberTier::Diamond),
            other => Err(EngineError::Validation(format!("Unknown member tier: {}", other))),
        }
    }
}

pub fn composite_score(workouts: usize, nutrition_records: usize, total_consumption: f64) -> f64 {
    workouts as f64 * 2.0 + nutrition_records as f64 * 0.5 + total_consumption.max(0.0) / 500.0
}

/// Member info as shown to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberInfo {
    pub tier: MemberTier,
    pub composite_score: f64,
    /// Composite score truncated to whole points
    pub current_points: i64,
    pub next_level_points: i64,
    /// Percentage of `next_level_points` reached, capped at 100
    pub progress_percent: f64,
    pub monthly_workout_count: usize,
}

impl MemberInfo {
    pub fn compute(workouts: usize, nutrition_records: usize, total_consumption: f64) -> Self {
        let score = composite_score(workouts, nutrition_records, total_consumption);
        let tier = MemberTier::from_score(score);
        let next = tier.next_level_points();

        Self {
            tier,
            composite_score: score,
            current_points: score.trunc() as i64,
            next_level_points: next as i64,
            progress_percent: (score / next * 100.0).min(100.0),
            monthly_workout_count: workouts,
        }
    }
}
