//! Habit strength scoring
//!
//! Strength models diminishing marginal reinforcement: each completion adds
//! less than the one before, approaching but never reaching 100. The curve
//! depends only on how many times the habit was completed, never on when.

use super::snapshot::Snapshot;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Decay constant of the strength curve.
pub const STRENGTH_K: f64 = 0.05;

/// Behavioral phase a habit is in, derived from its rounded strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Building,
    Growing,
    Established,
    Automatic,
}

impl Phase {
    /// Returns the identifier used in JSON output
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Building => "building",
            Phase::Growing => "growing",
            Phase::Established => "established",
            Phase::Automatic => "automatic",
        }
    }

    /// Human-friendly label for display
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Building => "Building",
            Phase::Growing => "Growing",
            Phase::Established => "Established",
            Phase::Automatic => "Automatic",
        }
    }

    /// Classify a rounded strength percentage into a phase.
    pub fn for_strength(strength: u8) -> Phase {
        match strength {
            0..=19 => Phase::Building,
            20..=49 => Phase::Growing,
            50..=79 => Phase::Established,
            _ => Phase::Automatic,
        }
    }
}

impl std::str::FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "building" => Ok(Phase::Building),
            "growing" => Ok(Phase::Growing),
            "established" => Ok(Phase::Established),
            "automatic" => Ok(Phase::Automatic),
            _ => Err(format!("unknown phase: {}", s)),
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A habit's strength percentage with its phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrengthScore {
    /// 0-100, rounded to the nearest integer
    pub strength: u8,
    /// Phase derived from the rounded strength
    pub phase: Phase,
}

/// Compute a habit's strength from its total completion count.
///
/// `strength = 100 * (1 - e^(-0.05 * completions))`, rounded to the nearest
/// integer; the phase is classified from the rounded value. The habit's age
/// in days is accepted for signature stability but does not enter the
/// formula; repetition count is the only input the curve uses.
pub fn habit_strength(total_completions: usize, _days_since_created: i64) -> StrengthScore {
    let raw = 100.0 * (1.0 - (-STRENGTH_K * total_completions as f64).exp());
    let strength = raw.round() as u8;
    StrengthScore {
        strength,
        phase: Phase::for_strength(strength),
    }
}

/// One point on a strength-over-time chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrengthPoint {
    /// The day this point describes
    pub date: NaiveDate,
    /// Strength over all completions up to and including this day,
    /// rounded to one decimal for charting
    pub strength: f64,
}

/// Trailing strength series for the `days` days ending at `today`.
///
/// Each point evaluates the curve over the habit's cumulative completion
/// count as of that day, so the series rises on completed days and stays
/// flat otherwise. Points are oldest first.
pub fn strength_history(
    snapshot: &Snapshot,
    habit_id: &str,
    today: NaiveDate,
    days: usize,
) -> Vec<StrengthPoint> {
    if days == 0 {
        return Vec::new();
    }

    let completed: Vec<NaiveDate> = snapshot.completed_dates(habit_id).collect();
    let Some(start) = today.checked_sub_days(chrono::Days::new(days as u64 - 1)) else {
        return Vec::new();
    };

    start
        .iter_days()
        .take(days)
        .map(|date| {
            let count = completed.partition_point(|d| *d <= date);
            let raw = 100.0 * (1.0 - (-STRENGTH_K * count as f64).exp());
            StrengthPoint {
                date,
                strength: (raw * 10.0).round() / 10.0,
            }
        })
        .collect()
}
