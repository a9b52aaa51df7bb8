//! Dashboard analytics for the CLI today/stats views.
//!
//! Pulls the per-habit derived numbers (streaks, strength, today's state)
//! into one structure so list rendering needs no further queries.

use super::snapshot::Snapshot;
use super::strength::{habit_strength, Phase};
use super::streak::{current_streak, longest_streak};
use crate::db::Database;
use crate::error::Result;
use crate::types::HabitCategory;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One habit's row in the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitOverview {
    pub habit_id: String,
    pub name: String,
    /// Preset label, or the custom category name
    pub category: String,
    /// Human description of the schedule, e.g. "weekly on Mon, Wed"
    pub schedule: String,
    pub due_today: bool,
    pub completed_today: bool,
    pub streak: u32,
    pub longest_streak: u32,
    pub strength: u8,
    pub phase: Phase,
    pub total_completions: u32,
    /// Most recent weekly automaticity self-rating, if any
    pub latest_rating: Option<u8>,
}

/// Aggregate statistics across all habits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub today: NaiveDate,
    pub habit_count: usize,
    /// Habits scheduled on today
    pub due_today: usize,
    /// Habits with a completion logged today
    pub completed_today: usize,
    /// Rounded mean strength, 0 with no habits
    pub avg_strength: u8,
    /// Habits in the automatic phase
    pub automatic_count: usize,
    /// Best current streak across habits
    pub longest_current_streak: u32,
    /// Per-habit rows, in habit creation order
    pub habits: Vec<HabitOverview>,
}

impl DashboardStats {
    /// Short "done today" fraction for headers, e.g. "3/5".
    pub fn completion_summary(&self) -> String {
        format!("{}/{}", self.completed_today, self.due_today)
    }
}

/// Build the dashboard for `today` from everything in the database.
pub fn dashboard(db: &Database, today: NaiveDate) -> Result<DashboardStats> {
    let snapshot = Snapshot::load(db)?;

    // list_ratings is ordered oldest week first, so the last write wins
    let mut latest_ratings: HashMap<String, u8> = HashMap::new();
    for rating in db.list_ratings()? {
        latest_ratings.insert(rating.habit_id, rating.rating);
    }

    let mut habits = Vec::new();
    let mut strength_sum = 0u32;
    let mut automatic_count = 0;
    let mut due_today = 0;
    let mut completed_today = 0;
    let mut longest_current = 0;

    for habit in snapshot.habits() {
        let total = snapshot.total_completions(&habit.id);
        let score = habit_strength(total, habit.days_since_created(today));
        let streak = current_streak(&snapshot, &habit.id, today);
        let due = habit.schedule.is_scheduled_on(today);
        let completed = snapshot.is_completed(&habit.id, today);

        strength_sum += score.strength as u32;
        if score.phase == Phase::Automatic {
            automatic_count += 1;
        }
        if due {
            due_today += 1;
        }
        if completed {
            completed_today += 1;
        }
        longest_current = longest_current.max(streak);

        let category = match habit.category {
            HabitCategory::Custom => habit
                .custom_category
                .clone()
                .unwrap_or_else(|| "Custom".to_string()),
            preset => preset
                .preset_meta()
                .map(|meta| meta.label.to_string())
                .unwrap_or_else(|| preset.to_string()),
        };

        habits.push(HabitOverview {
            habit_id: habit.id.clone(),
            name: habit.name.clone(),
            category,
            schedule: habit.schedule.describe(),
            due_today: due,
            completed_today: completed,
            streak,
            longest_streak: longest_streak(&snapshot, &habit.id),
            strength: score.strength,
            phase: score.phase,
            total_completions: total as u32,
            latest_rating: latest_ratings.get(&habit.id).copied(),
        });
    }

    let habit_count = habits.len();
    let avg_strength = if habit_count == 0 {
        0
    } else {
        (strength_sum as f64 / habit_count as f64).round() as u8
    };

    Ok(DashboardStats {
        today,
        habit_count,
        due_today,
        completed_today,
        avg_strength,
        automatic_count,
        longest_current_streak: longest_current,
        habits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{parse_date, AutomaticityRating, Habit, Schedule};

    #[test]
    fn test_empty_dashboard() {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();

        let stats = dashboard(&db, parse_date("2025-03-10").unwrap()).unwrap();
        assert_eq!(stats.habit_count, 0);
        assert_eq!(stats.avg_strength, 0);
        assert_eq!(stats.longest_current_streak, 0);
        assert_eq!(stats.completion_summary(), "0/0");
    }

    #[test]
    fn test_dashboard_aggregates() {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        let today = parse_date("2025-03-10").unwrap();

        // Daily habit completed the last 3 days including today
        let run = Habit::new("Run", HabitCategory::Health, Schedule::Daily);
        db.upsert_habit(&run).unwrap();
        for d in ["2025-03-08", "2025-03-09", "2025-03-10"] {
            db.toggle_completion(&run.id, parse_date(d).unwrap()).unwrap();
        }

        // Weekly habit not due on a Monday, never completed
        let gym = Habit::new(
            "Gym",
            HabitCategory::Health,
            Schedule::Weekly {
                target_days: vec![3, 5],
            },
        );
        db.upsert_habit(&gym).unwrap();

        db.upsert_rating(&AutomaticityRating::new(
            &run.id,
            parse_date("2025-03-03").unwrap(),
            3,
        ))
        .unwrap();

        let stats = dashboard(&db, today).unwrap();
        assert_eq!(stats.habit_count, 2);
        // 2025-03-10 is a Monday: the weekly habit is not due
        assert_eq!(stats.due_today, 1);
        assert_eq!(stats.completed_today, 1);
        assert_eq!(stats.longest_current_streak, 3);

        let run_row = stats
            .habits
            .iter()
            .find(|h| h.habit_id == run.id)
            .unwrap();
        assert_eq!(run_row.streak, 3);
        assert_eq!(run_row.total_completions, 3);
        // 3 completions: 100 * (1 - e^-0.15) = 13.9 -> 14
        assert_eq!(run_row.strength, 14);
        assert_eq!(run_row.phase, Phase::Building);
        assert_eq!(run_row.latest_rating, Some(3));
        assert_eq!(run_row.category, "Health & Fitness");

        let gym_row = stats
            .habits
            .iter()
            .find(|h| h.habit_id == gym.id)
            .unwrap();
        assert!(!gym_row.due_today);
        assert_eq!(gym_row.strength, 0);

        // avg of 14 and 0
        assert_eq!(stats.avg_strength, 7);
    }
}
