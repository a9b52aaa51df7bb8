//! Weekly and monthly rollups
//!
//! Aggregates expected vs. completed occurrences over a calendar week or
//! month. Daily habits expect one occurrence per elapsed day; weekly and
//! monthly habits are evaluated at week granularity, expecting one occurrence
//! per week overlapping the period and completing a week with at least one
//! log in it. Weeks are Monday-aligned and independent of month boundaries.

use super::snapshot::Snapshot;
use crate::types::{week_start, Schedule};
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Rollup of one period across all habits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodSummary {
    /// First day of the period
    pub start: NaiveDate,
    /// Last day of the period
    pub end: NaiveDate,
    /// Expected occurrences summed over all habits
    pub expected: u32,
    /// Completed occurrences summed over all habits
    pub completed: u32,
    /// Percentage 0-100; 0 when nothing was expected
    pub rate: u32,
    /// Per-habit breakdown, in habit creation order
    pub habits: Vec<HabitPeriodSummary>,
    /// Longest run of days in the period on which every habit was completed
    pub best_streak: u32,
    /// The running all-habits streak, only if it reaches today
    pub current_streak: u32,
}

/// One habit's share of a period rollup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitPeriodSummary {
    pub habit_id: String,
    pub name: String,
    pub expected: u32,
    pub completed: u32,
    pub rate: u32,
}

/// One calendar week's rollup inside a larger period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekRow {
    /// Monday of the week
    pub start: NaiveDate,
    /// Sunday of the week
    pub end: NaiveDate,
    pub expected: u32,
    pub completed: u32,
    pub rate: u32,
}

/// Per-day completion counts for calendar rendering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DayCell {
    pub date: NaiveDate,
    /// Habits scheduled on this day
    pub due: u32,
    /// Habits completed on this day
    pub completed: u32,
}

/// `round(100 * completed / expected)`, defined as 0 when nothing was expected.
pub fn completion_rate(completed: u32, expected: u32) -> u32 {
    if expected == 0 {
        return 0;
    }
    (100.0 * completed as f64 / expected as f64).round() as u32
}

/// Monday and Sunday of the week containing `reference`.
pub fn week_bounds(reference: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = week_start(reference);
    let end = start + chrono::Days::new(6);
    (start, end)
}

/// First and last day of a calendar month, if the month is valid.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = start.checked_add_months(Months::new(1))?.pred_opt()?;
    Some((start, end))
}

/// Inclusive day count of `[start, end]`, 0 when the range is empty.
fn days_inclusive(start: NaiveDate, end: NaiveDate) -> u32 {
    if start > end {
        return 0;
    }
    ((end - start).num_days() + 1) as u32
}

/// Monday-aligned weeks overlapping `[start, end]`, unclipped.
fn weeks_overlapping(start: NaiveDate, end: NaiveDate) -> Vec<(NaiveDate, NaiveDate)> {
    let mut weeks = Vec::new();
    let mut monday = week_start(start);
    while monday <= end {
        weeks.push((monday, monday + chrono::Days::new(6)));
        monday = monday + chrono::Days::new(7);
    }
    weeks
}

/// Roll up `[start, end]` across all habits in the snapshot.
///
/// Expected counts never include days after `today` for daily habits; the
/// engine does not treat a day that has not happened as missed. Completed
/// counts span the whole period, so backfilled or imported future logs are
/// reported as written.
pub fn aggregate_period(
    snapshot: &Snapshot,
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> PeriodSummary {
    let weeks = weeks_overlapping(start, end);
    let mut habits = Vec::new();
    let mut expected_total = 0;
    let mut completed_total = 0;

    for habit in snapshot.habits() {
        let (expected, completed) = match &habit.schedule {
            Schedule::Daily => {
                let expected = days_inclusive(start, end.min(today));
                let completed = snapshot.completions_between(&habit.id, start, end) as u32;
                (expected, completed)
            }
            Schedule::Weekly { .. } | Schedule::Monthly { .. } => {
                let expected = weeks.len() as u32;
                let completed = weeks
                    .iter()
                    .filter(|(ws, we)| {
                        snapshot.completions_between(&habit.id, (*ws).max(start), (*we).min(end))
                            > 0
                    })
                    .count() as u32;
                (expected, completed)
            }
        };

        expected_total += expected;
        completed_total += completed;
        habits.push(HabitPeriodSummary {
            habit_id: habit.id.clone(),
            name: habit.name.clone(),
            expected,
            completed,
            rate: completion_rate(completed, expected),
        });
    }

    let (best_streak, current_streak) = joint_streaks(snapshot, start, end, today);

    PeriodSummary {
        start,
        end,
        expected: expected_total,
        completed: completed_total,
        rate: completion_rate(completed_total, expected_total),
        habits,
        best_streak,
        current_streak,
    }
}

/// Best and current all-habits streaks within `[start, end]`.
///
/// A day counts only when every defined habit has a completion; with no
/// habits defined, no day counts (the empty set does not vacuously pass).
/// The current value is the run that reaches today; when the period lies
/// behind today it is 0.
fn joint_streaks(
    snapshot: &Snapshot,
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> (u32, u32) {
    let habits = snapshot.habits();
    if habits.is_empty() {
        return (0, 0);
    }

    let last = end.min(today);
    if start > last {
        return (0, 0);
    }

    let mut best = 0;
    let mut run = 0;
    for day in start.iter_days().take_while(|d| *d <= last) {
        if habits.iter().all(|h| snapshot.is_completed(&h.id, day)) {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }

    let current = if last == today { run } else { 0 };
    (best, current)
}

/// Per-week breakdown of a period, one row per week that has started.
///
/// Week boundaries ignore the period boundary; each row only counts the days
/// inside both the week and the period, and daily denominators stop at today.
pub fn week_rows(
    snapshot: &Snapshot,
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Vec<WeekRow> {
    weeks_overlapping(start, end)
        .into_iter()
        .filter(|(ws, _)| *ws <= today)
        .map(|(ws, we)| {
            let lo = ws.max(start);
            let hi = we.min(end);
            let mut expected = 0;
            let mut completed = 0;

            for habit in snapshot.habits() {
                match &habit.schedule {
                    Schedule::Daily => {
                        expected += days_inclusive(lo, hi.min(today));
                        completed += snapshot.completions_between(&habit.id, lo, hi) as u32;
                    }
                    Schedule::Weekly { .. } | Schedule::Monthly { .. } => {
                        expected += 1;
                        if snapshot.completions_between(&habit.id, lo, hi) > 0 {
                            completed += 1;
                        }
                    }
                }
            }

            WeekRow {
                start: ws,
                end: we,
                expected,
                completed,
                rate: completion_rate(completed, expected),
            }
        })
        .collect()
}

/// Per-day due/completed counts over `[start, end]` for calendar rendering.
///
/// The only schedule-aware view: a weekly habit is due only on its target
/// days here, while rollups and streaks ignore target days entirely.
pub fn day_cells(snapshot: &Snapshot, start: NaiveDate, end: NaiveDate) -> Vec<DayCell> {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|date| {
            let mut due = 0;
            let mut completed = 0;
            for habit in snapshot.habits() {
                if habit.schedule.is_scheduled_on(date) {
                    due += 1;
                }
                if snapshot.is_completed(&habit.id, date) {
                    completed += 1;
                }
            }
            DayCell {
                date,
                due,
                completed,
            }
        })
        .collect()
}
