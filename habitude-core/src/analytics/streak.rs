//! Streak computation
//!
//! A streak is the number of consecutive calendar days a habit was completed,
//! ending at the evaluation date. The evaluation date is always an explicit
//! parameter; nothing here reads the clock.

use super::snapshot::Snapshot;
use chrono::NaiveDate;

/// Upper bound on the backward walk. A streak never reports longer than this.
pub const MAX_STREAK_DAYS: u32 = 365;

/// Current consecutive-day streak ending at `today`.
///
/// If `today` itself has no completion the chain is not broken; the walk
/// starts at yesterday instead, so "not done yet today" keeps yesterday's
/// streak alive. Any earlier gap ends the count. Streaks are not
/// schedule-aware: a weekly habit's off-days still break a daily chain.
pub fn current_streak(snapshot: &Snapshot, habit_id: &str, today: NaiveDate) -> u32 {
    let mut day = today;

    if !snapshot.is_completed(habit_id, day) {
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => return 0,
        }
    }

    let mut streak = 0;
    while streak < MAX_STREAK_DAYS {
        if !snapshot.is_completed(habit_id, day) {
            break;
        }
        streak += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }

    streak
}

/// Longest run of consecutive completed days anywhere in the habit's history.
///
/// Scans the full log rather than assuming the current streak is the best
/// one; an old 40-day run still counts after the habit lapses.
pub fn longest_streak(snapshot: &Snapshot, habit_id: &str) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;

    for date in snapshot.completed_dates(habit_id) {
        if prev.and_then(|p| p.succ_opt()) == Some(date) {
            run += 1;
        } else {
            run = 1;
        }
        longest = longest.max(run);
        prev = Some(date);
    }

    longest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{parse_date, CompletionLog, Habit, HabitCategory, Schedule};

    fn snapshot_with_days(days: &[&str]) -> (Snapshot, String) {
        let habit = Habit::new("Read", HabitCategory::Evening, Schedule::Daily);
        let id = habit.id.clone();
        let logs = days
            .iter()
            .map(|d| CompletionLog::completed(&id, parse_date(d).unwrap()))
            .collect();
        (Snapshot::new(vec![habit], logs), id)
    }

    #[test]
    fn test_no_logs_zero_streak() {
        let (snapshot, id) = snapshot_with_days(&[]);
        assert_eq!(
            current_streak(&snapshot, &id, parse_date("2025-03-10").unwrap()),
            0
        );
    }

    #[test]
    fn test_seven_day_streak() {
        // Completed every day of [today-6, today], nothing on today-7
        let (snapshot, id) = snapshot_with_days(&[
            "2025-03-04",
            "2025-03-05",
            "2025-03-06",
            "2025-03-07",
            "2025-03-08",
            "2025-03-09",
            "2025-03-10",
        ]);
        assert_eq!(
            current_streak(&snapshot, &id, parse_date("2025-03-10").unwrap()),
            7
        );
    }

    #[test]
    fn test_today_incomplete_does_not_break() {
        // Yesterday and the day before are done, today is not yet
        let (snapshot, id) = snapshot_with_days(&["2025-03-08", "2025-03-09"]);
        assert_eq!(
            current_streak(&snapshot, &id, parse_date("2025-03-10").unwrap()),
            2
        );
    }

    #[test]
    fn test_gap_before_yesterday_stops_walk() {
        // Today absent, yesterday done, day before absent -> streak 1
        let (snapshot, id) = snapshot_with_days(&["2025-03-09", "2025-03-07"]);
        assert_eq!(
            current_streak(&snapshot, &id, parse_date("2025-03-10").unwrap()),
            1
        );
    }

    #[test]
    fn test_today_only_is_one() {
        let (snapshot, id) = snapshot_with_days(&["2025-03-10"]);
        assert_eq!(
            current_streak(&snapshot, &id, parse_date("2025-03-10").unwrap()),
            1
        );
    }

    #[test]
    fn test_streak_capped_at_365() {
        let habit = Habit::new("Read", HabitCategory::Evening, Schedule::Daily);
        let id = habit.id.clone();
        let today = parse_date("2025-03-10").unwrap();

        // 400 consecutive completed days ending today
        let mut logs = Vec::new();
        let mut day = today;
        for _ in 0..400 {
            logs.push(CompletionLog::completed(&id, day));
            day = day.pred_opt().unwrap();
        }
        let snapshot = Snapshot::new(vec![habit], logs);

        assert_eq!(current_streak(&snapshot, &id, today), MAX_STREAK_DAYS);
        // The historical scan is not capped
        assert_eq!(longest_streak(&snapshot, &id), 400);
    }

    #[test]
    fn test_longest_streak_finds_old_run() {
        // A 3-day run in February beats the current 2-day run
        let (snapshot, id) = snapshot_with_days(&[
            "2025-02-01",
            "2025-02-02",
            "2025-02-03",
            "2025-03-09",
            "2025-03-10",
        ]);
        let today = parse_date("2025-03-10").unwrap();
        assert_eq!(current_streak(&snapshot, &id, today), 2);
        assert_eq!(longest_streak(&snapshot, &id), 3);
    }
}
