//! Streak milestone detection
//!
//! Three streak lengths are worth celebrating: 5 days (habit forming), 21
//! days (the folk threshold), and 66 days (the average time to automaticity).
//! Detection is a pure check against the current streak; remembering which
//! celebrations already happened is the store's job, keyed by
//! `(habit_id, streak)`.

use super::snapshot::Snapshot;
use super::streak::current_streak;
use crate::db::Database;
use crate::error::Result;
use chrono::NaiveDate;
use serde::Serialize;

/// Streak lengths that trigger a celebration.
pub const MILESTONE_THRESHOLDS: [u32; 3] = [5, 21, 66];

/// A milestone a habit has just reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Milestone {
    pub habit_id: String,
    pub habit_name: String,
    /// The streak value that triggered it (5, 21, or 66)
    pub streak: u32,
    pub message: &'static str,
}

/// The canned message for a streak, if it sits exactly on a threshold.
///
/// Only exact matches fire; a streak of 6 is past the 5-day milestone, not
/// on it, so nothing repeats until the next threshold.
pub fn milestone_message(streak: u32) -> Option<&'static str> {
    match streak {
        5 => Some("5-day streak! 🎉"),
        21 => Some("21-day milestone! 🌟"),
        66 => Some("66-day automatic habit! 🏆"),
        _ => None,
    }
}

/// Milestones reached today that have not been celebrated yet.
///
/// Checks every habit's current streak against the thresholds and filters
/// out `(habit, streak)` pairs already recorded as seen. Callers celebrate
/// and then mark them seen so the same milestone never fires twice.
pub fn pending_milestones(
    db: &Database,
    snapshot: &Snapshot,
    today: NaiveDate,
) -> Result<Vec<Milestone>> {
    let mut pending = Vec::new();

    for habit in snapshot.habits() {
        let streak = current_streak(snapshot, &habit.id, today);
        let Some(message) = milestone_message(streak) else {
            continue;
        };
        if db.milestone_seen(&habit.id, streak)? {
            continue;
        }
        pending.push(Milestone {
            habit_id: habit.id.clone(),
            habit_name: habit.name.clone(),
            streak,
            message,
        });
    }

    Ok(pending)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{parse_date, CompletionLog, Habit, HabitCategory, Schedule};

    fn snapshot_with_streak(len: u32, today: NaiveDate) -> (Snapshot, Habit) {
        let habit = Habit::new("Run", HabitCategory::Health, Schedule::Daily);
        let id = habit.id.clone();
        let mut logs = Vec::new();
        let mut day = today;
        for _ in 0..len {
            logs.push(CompletionLog::completed(&id, day));
            day = day.pred_opt().unwrap();
        }
        (Snapshot::new(vec![habit.clone()], logs), habit)
    }

    #[test]
    fn test_messages_only_on_thresholds() {
        assert_eq!(milestone_message(5), Some("5-day streak! 🎉"));
        assert_eq!(milestone_message(21), Some("21-day milestone! 🌟"));
        assert_eq!(milestone_message(66), Some("66-day automatic habit! 🏆"));
        assert_eq!(milestone_message(0), None);
        assert_eq!(milestone_message(6), None);
        assert_eq!(milestone_message(20), None);
        assert_eq!(milestone_message(67), None);
    }

    #[test]
    fn test_pending_fires_once() {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();

        let today = parse_date("2025-03-10").unwrap();
        let (snapshot, habit) = snapshot_with_streak(5, today);
        db.upsert_habit(&habit).unwrap();

        let pending = pending_milestones(&db, &snapshot, today).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].streak, 5);
        assert_eq!(pending[0].message, "5-day streak! 🎉");

        // Celebrated; the same recomputation no longer returns it
        db.mark_milestone_seen(&habit.id, 5).unwrap();
        assert!(pending_milestones(&db, &snapshot, today).unwrap().is_empty());
    }

    #[test]
    fn test_next_threshold_fires_separately() {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();

        let today = parse_date("2025-03-10").unwrap();
        let (snapshot, habit) = snapshot_with_streak(21, today);
        db.upsert_habit(&habit).unwrap();
        db.mark_milestone_seen(&habit.id, 5).unwrap();

        let pending = pending_milestones(&db, &snapshot, today).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].streak, 21);
    }

    #[test]
    fn test_streak_between_thresholds_is_quiet() {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();

        let today = parse_date("2025-03-10").unwrap();
        let (snapshot, habit) = snapshot_with_streak(12, today);
        db.upsert_habit(&habit).unwrap();

        assert!(pending_milestones(&db, &snapshot, today).unwrap().is_empty());
    }
}
