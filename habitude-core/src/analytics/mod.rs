//! Analytics for habit history.
//!
//! Derives everything the interfaces show from the raw completion log:
//! - Streaks (current and longest consecutive-day runs)
//! - Strength scores and formation phases
//! - Period aggregation (weekly/monthly completion rates)
//! - Milestone detection
//! - Dashboard statistics
//! - Week/month in review reports
//!
//! All computations run over a [`snapshot::Snapshot`] loaded once per
//! command, so a view never issues per-habit queries.

pub mod dashboard;
pub mod milestone;
pub mod period;
pub mod report;
pub mod snapshot;
pub mod streak;
pub mod strength;

pub use dashboard::{dashboard, DashboardStats, HabitOverview};
pub use milestone::{milestone_message, pending_milestones, Milestone, MILESTONE_THRESHOLDS};
pub use period::{
    aggregate_period, completion_rate, day_cells, month_bounds, week_bounds, week_rows, DayCell,
    HabitPeriodSummary, PeriodSummary, WeekRow,
};
pub use report::{
    due_report, generate_report, mark_report_checked, HabitReport, JournalHighlights,
    ReportOptions, ReportPeriod, TargetProgress, TrendComparison,
};
pub use snapshot::Snapshot;
pub use streak::{current_streak, longest_streak, MAX_STREAK_DAYS};
pub use strength::{habit_strength, strength_history, Phase, StrengthPoint, StrengthScore};
