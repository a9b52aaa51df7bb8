//! Immutable input snapshot for analytics
//!
//! Every analytics function works on a [`Snapshot`]: the habit set plus a
//! normalized view of the completion log. Normalization happens once here so
//! the computations downstream can assume clean input:
//!
//! - logs referencing a habit that no longer exists are dropped
//! - logs with `completed == false` are dropped (equivalent to absence)
//! - duplicate `(habit, date)` records collapse, completed winning over not
//!
//! A snapshot is cheap to rebuild and never mutated; recomputing after a
//! write means taking a fresh snapshot.

use crate::db::Database;
use crate::error::Result;
use crate::types::{CompletionLog, Habit};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Normalized view of habits and their completed days.
pub struct Snapshot {
    habits: Vec<Habit>,
    completed: BTreeMap<String, BTreeSet<NaiveDate>>,
}

impl Snapshot {
    /// Build a snapshot from raw records, applying normalization.
    pub fn new(habits: Vec<Habit>, logs: Vec<CompletionLog>) -> Self {
        let mut completed: BTreeMap<String, BTreeSet<NaiveDate>> = BTreeMap::new();
        for habit in &habits {
            completed.entry(habit.id.clone()).or_default();
        }

        for log in logs {
            if !log.completed {
                continue;
            }
            match completed.get_mut(&log.habit_id) {
                Some(dates) => {
                    dates.insert(log.date);
                }
                None => {
                    tracing::debug!(
                        habit_id = %log.habit_id,
                        date = %log.date,
                        "Ignoring completion log for unknown habit"
                    );
                }
            }
        }

        Self { habits, completed }
    }

    /// Load a snapshot of everything currently in the database.
    pub fn load(db: &Database) -> Result<Self> {
        let habits = db.list_habits()?;
        let logs = db.list_completions()?;
        Ok(Self::new(habits, logs))
    }

    /// All habits, in creation order.
    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    /// Look up one habit by id.
    pub fn habit(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    /// Whether the habit was completed on the given day.
    pub fn is_completed(&self, habit_id: &str, date: NaiveDate) -> bool {
        self.completed
            .get(habit_id)
            .map_or(false, |dates| dates.contains(&date))
    }

    /// The habit's completed days in ascending order.
    pub fn completed_dates(&self, habit_id: &str) -> impl Iterator<Item = NaiveDate> + '_ {
        self.completed
            .get(habit_id)
            .into_iter()
            .flatten()
            .copied()
    }

    /// Completed days within `[start, end]`, inclusive on both ends.
    pub fn completions_between(&self, habit_id: &str, start: NaiveDate, end: NaiveDate) -> usize {
        if start > end {
            return 0;
        }
        self.completed
            .get(habit_id)
            .map_or(0, |dates| dates.range(start..=end).count())
    }

    /// Total completed days over the habit's entire history.
    pub fn total_completions(&self, habit_id: &str) -> usize {
        self.completed.get(habit_id).map_or(0, |dates| dates.len())
    }
}
