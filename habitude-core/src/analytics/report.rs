//! Week and month in review reports.
//!
//! Builds period summaries from the completion history, with trend
//! comparison against the previous period and journal highlights.

use chrono::{Datelike, NaiveDate, Weekday};

use super::period::{
    aggregate_period, month_bounds, week_bounds, week_rows, HabitPeriodSummary, PeriodSummary,
    WeekRow,
};
use super::snapshot::Snapshot;
use crate::config::ReportConfig;
use crate::db::Database;
use crate::error::Result;
use crate::types::{week_start, Schedule, DATE_FORMAT};

/// Meta key recording when a report reminder was last offered.
pub const LAST_REPORT_CHECK_KEY: &str = "last_report_check";

/// Time period for a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    /// Monday-aligned week starting at this date
    Week(NaiveDate),
    /// Specific month (year, month 1-12)
    Month(i32, u32),
}

impl ReportPeriod {
    /// The week containing `date`.
    pub fn week_of(date: NaiveDate) -> Self {
        ReportPeriod::Week(week_start(date))
    }

    /// The month containing `date`.
    pub fn month_of(date: NaiveDate) -> Self {
        ReportPeriod::Month(date.year(), date.month())
    }

    /// Inclusive first and last day of this period.
    pub fn bounds(&self) -> (NaiveDate, NaiveDate) {
        match *self {
            ReportPeriod::Week(start) => week_bounds(start),
            // month is 1-12 by construction
            ReportPeriod::Month(year, month) => month_bounds(year, month).unwrap(),
        }
    }

    /// Get the previous period for trend comparison.
    pub fn previous(&self) -> Self {
        match *self {
            ReportPeriod::Week(start) => ReportPeriod::Week(start - chrono::Days::new(7)),
            ReportPeriod::Month(year, month) => {
                if month == 1 {
                    ReportPeriod::Month(year - 1, 12)
                } else {
                    ReportPeriod::Month(year, month - 1)
                }
            }
        }
    }

    /// Get display name for this period.
    pub fn display_name(&self) -> String {
        match *self {
            ReportPeriod::Week(start) => format!(
                "Week of {} {}, {}",
                month_name(start.month()),
                start.day(),
                start.year()
            ),
            ReportPeriod::Month(year, month) => format!("{} {}", month_name(month), year),
        }
    }
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

/// Configuration for report generation.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Include celebratory headline copy
    pub fun_mode: bool,
    /// Include trend comparison with previous period
    pub include_trends: bool,
    /// Number of top habits to include
    pub top_habits: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            fun_mode: true,
            include_trends: true,
            top_habits: 5,
        }
    }
}

impl ReportOptions {
    /// Create a "serious" config without fun elements.
    pub fn serious() -> Self {
        Self {
            fun_mode: false,
            ..Default::default()
        }
    }

    /// Build options from the config file section.
    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            fun_mode: config.fun_mode,
            include_trends: config.include_trends,
            top_habits: config.top_habits,
        }
    }
}

/// Complete report for a period.
#[derive(Debug, Clone)]
pub struct HabitReport {
    /// The time period this report covers
    pub period: ReportPeriod,
    /// Aggregate completion totals
    pub summary: PeriodSummary,
    /// Best-performing habits, highest rate first
    pub top_habits: Vec<HabitPeriodSummary>,
    /// Week-by-week breakdown (month reports only)
    pub weeks: Vec<WeekRow>,
    /// Monthly-target habits and their raw counts
    pub target_progress: Vec<TargetProgress>,
    /// Journal wins and misses recorded during the period
    pub journal: JournalHighlights,
    /// Celebratory one-liner (None if serious mode)
    pub headline: Option<&'static str>,
    /// Comparison with previous period (None if not requested or no data)
    pub trends: Option<TrendComparison>,
}

/// Raw completion count against a declared monthly target.
///
/// Informational only. Target counts never feed streaks or rates.
#[derive(Debug, Clone)]
pub struct TargetProgress {
    pub habit_id: String,
    pub name: String,
    /// Completions logged inside the period
    pub completed: u32,
    /// Declared per-month target
    pub target: u32,
}

impl TargetProgress {
    /// Format for display (e.g. "7/10").
    pub fn display(&self) -> String {
        format!("{}/{}", self.completed, self.target)
    }
}

/// Journal entries that fall inside the report period.
#[derive(Debug, Clone, Default)]
pub struct JournalHighlights {
    pub entry_count: usize,
    pub wins: Vec<String>,
    pub misses: Vec<String>,
}

impl JournalHighlights {
    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }
}

/// Trend comparison with previous period.
#[derive(Debug, Clone)]
pub struct TrendComparison {
    /// Completion rate change percentage
    pub rate_delta_pct: f64,
    /// Completed count change percentage
    pub completions_delta_pct: f64,
    /// Previous period summary (for context)
    pub previous: PeriodSummary,
}

impl TrendComparison {
    /// Calculate delta percentage between two values.
    pub fn calc_delta(current: i64, previous: i64) -> f64 {
        if previous == 0 {
            if current == 0 {
                0.0
            } else {
                100.0 // Infinite growth shown as 100%
            }
        } else {
            ((current - previous) as f64 / previous as f64) * 100.0
        }
    }

    /// Format delta for display (e.g., "+23%" or "-15%").
    pub fn format_delta(delta: f64) -> String {
        if delta >= 0.0 {
            format!("+{:.0}%", delta)
        } else {
            format!("{:.0}%", delta)
        }
    }
}

fn headline_for(rate: u32) -> &'static str {
    match rate {
        80..=100 => "Crushing it! 🏆",
        50..=79 => "Strong and steady 💪",
        20..=49 => "Momentum is building 🌱",
        _ => "Every day is a fresh start ✨",
    }
}

/// Generate a report for a period.
pub fn generate_report(
    db: &Database,
    period: ReportPeriod,
    options: &ReportOptions,
    today: NaiveDate,
) -> Result<HabitReport> {
    let snapshot = Snapshot::load(db)?;
    let (start, end) = period.bounds();
    let summary = aggregate_period(&snapshot, start, end, today);

    let mut top_habits: Vec<HabitPeriodSummary> = summary
        .habits
        .iter()
        .filter(|h| h.expected > 0)
        .cloned()
        .collect();
    top_habits.sort_by(|a, b| {
        b.rate
            .cmp(&a.rate)
            .then_with(|| b.completed.cmp(&a.completed))
            .then_with(|| a.name.cmp(&b.name))
    });
    top_habits.truncate(options.top_habits);

    let weeks = match period {
        ReportPeriod::Month(..) => week_rows(&snapshot, start, end, today),
        ReportPeriod::Week(_) => Vec::new(),
    };

    let mut target_progress = Vec::new();
    for habit in snapshot.habits() {
        if let Schedule::Monthly { target_count } = habit.schedule {
            target_progress.push(TargetProgress {
                habit_id: habit.id.clone(),
                name: habit.name.clone(),
                completed: snapshot.completions_between(&habit.id, start, end) as u32,
                target: target_count,
            });
        }
    }

    let journal = journal_highlights(db, start, end)?;

    let headline = if options.fun_mode {
        Some(headline_for(summary.rate))
    } else {
        None
    };

    // Calculate trends if requested
    let trends = if options.include_trends {
        let (prev_start, prev_end) = period.previous().bounds();
        let prev_summary = aggregate_period(&snapshot, prev_start, prev_end, today);

        // Only include trends if there's previous data
        if prev_summary.expected > 0 {
            Some(TrendComparison {
                rate_delta_pct: TrendComparison::calc_delta(
                    summary.rate as i64,
                    prev_summary.rate as i64,
                ),
                completions_delta_pct: TrendComparison::calc_delta(
                    summary.completed as i64,
                    prev_summary.completed as i64,
                ),
                previous: prev_summary,
            })
        } else {
            None
        }
    } else {
        None
    };

    Ok(HabitReport {
        period,
        summary,
        top_habits,
        weeks,
        target_progress,
        journal,
        headline,
        trends,
    })
}

fn journal_highlights(db: &Database, start: NaiveDate, end: NaiveDate) -> Result<JournalHighlights> {
    let mut highlights = JournalHighlights::default();
    // entries come back newest first, walk them in date order
    for entry in db.list_journal_entries()?.into_iter().rev() {
        if entry.date < start || entry.date > end {
            continue;
        }
        highlights.entry_count += 1;
        highlights.wins.extend(entry.wins.iter().cloned());
        highlights.misses.extend(entry.misses.iter().cloned());
    }
    Ok(highlights)
}

/// Check whether a review is due and has not been offered yet.
///
/// A month report is due on the first three days of the month; a week
/// report on Monday or Tuesday. The month report wins when both apply.
/// Each fires at most once per period, tracked via the meta table.
pub fn due_report(db: &Database, today: NaiveDate) -> Result<Option<ReportPeriod>> {
    let last_check = db
        .get_meta(LAST_REPORT_CHECK_KEY)?
        .and_then(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT).ok());

    let month_start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap();
    if today.day() <= 3 && last_check.map_or(true, |d| d < month_start) {
        return Ok(Some(ReportPeriod::month_of(today).previous()));
    }

    let this_week = week_start(today);
    let early_week = matches!(today.weekday(), Weekday::Mon | Weekday::Tue);
    if early_week && last_check.map_or(true, |d| d < this_week) {
        return Ok(Some(ReportPeriod::week_of(today).previous()));
    }

    Ok(None)
}

/// Record that the report reminder ran today.
pub fn mark_report_checked(db: &Database, today: NaiveDate) -> Result<()> {
    db.set_meta(
        LAST_REPORT_CHECK_KEY,
        &today.format(DATE_FORMAT).to_string(),
    )
}
