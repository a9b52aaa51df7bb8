//! Core domain types for habitude
//!
//! These types represent the canonical data model: what the user declared
//! (habits, categories) and what the user did (completion logs, automaticity
//! ratings, journal entries). Everything derived from these records lives in
//! [`crate::analytics`] and is recomputed on demand, never stored.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Habit** | A tracked behavior definition with a schedule and a category |
//! | **Schedule** | How often a habit is due: daily, weekly on given weekdays, or monthly with a target count |
//! | **Completion log** | One record per (habit, calendar day) marking a completion |
//! | **Streak** | Consecutive completed days ending at the evaluation date (derived, see analytics) |
//! | **Automaticity rating** | Weekly 1-5 self-report of how effortless a habit felt |
//! | **Journal entry** | Daily free-text reflection with win/miss lists |
//! | **Custom category** | A user-defined category beyond the fixed presets |
//!
//! All calendar dates are timezone-naive `YYYY-MM-DD` days ([`chrono::NaiveDate`]);
//! only record-creation timestamps carry a time of day.

use crate::error::{Error, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Storage and display format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` calendar date, failing fast on anything malformed.
///
/// Bad dates are a caller bug, not something to paper over: a log with an
/// unparseable date would silently distort streaks and rates if skipped.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| Error::InvalidDate(s.to_string()))
}

/// Monday of the ISO week containing `date`.
///
/// Used as the key for automaticity ratings and as the boundary for all
/// week-granularity analytics.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.week(Weekday::Mon).first_day()
}

// ============================================
// Categories
// ============================================

/// Habit category: a fixed preset or a user-defined custom category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitCategory {
    Morning,
    Health,
    Academics,
    Evening,
    Productivity,
    Wellness,
    Custom,
}

/// Display metadata for a preset category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryMeta {
    /// Human-friendly label
    pub label: &'static str,
    /// Icon name (lucide icon set)
    pub icon: &'static str,
    /// HSL color string
    pub color: &'static str,
}

impl HabitCategory {
    /// Returns the identifier used in database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitCategory::Morning => "morning",
            HabitCategory::Health => "health",
            HabitCategory::Academics => "academics",
            HabitCategory::Evening => "evening",
            HabitCategory::Productivity => "productivity",
            HabitCategory::Wellness => "wellness",
            HabitCategory::Custom => "custom",
        }
    }

    /// Display metadata for preset categories.
    ///
    /// `Custom` has none here; its label/color/icon live on the
    /// [`CustomCategory`] record the habit references by name.
    pub fn preset_meta(&self) -> Option<CategoryMeta> {
        let meta = match self {
            HabitCategory::Morning => CategoryMeta {
                label: "Morning Routine",
                icon: "Sunrise",
                color: "hsl(38 92% 50%)",
            },
            HabitCategory::Health => CategoryMeta {
                label: "Health & Fitness",
                icon: "Heart",
                color: "hsl(0 72% 51%)",
            },
            HabitCategory::Academics => CategoryMeta {
                label: "Academics & Learning",
                icon: "BookOpen",
                color: "hsl(217 91% 60%)",
            },
            HabitCategory::Evening => CategoryMeta {
                label: "Evening Routine",
                icon: "Moon",
                color: "hsl(262 83% 58%)",
            },
            HabitCategory::Productivity => CategoryMeta {
                label: "Productivity",
                icon: "Zap",
                color: "hsl(45 93% 47%)",
            },
            HabitCategory::Wellness => CategoryMeta {
                label: "Wellness & Self-Care",
                icon: "Sparkles",
                color: "hsl(152 69% 45%)",
            },
            HabitCategory::Custom => return None,
        };
        Some(meta)
    }

    /// All preset categories, in display order.
    pub fn presets() -> [HabitCategory; 6] {
        [
            HabitCategory::Morning,
            HabitCategory::Health,
            HabitCategory::Academics,
            HabitCategory::Evening,
            HabitCategory::Productivity,
            HabitCategory::Wellness,
        ]
    }
}

impl std::str::FromStr for HabitCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "morning" => Ok(HabitCategory::Morning),
            "health" => Ok(HabitCategory::Health),
            "academics" => Ok(HabitCategory::Academics),
            "evening" => Ok(HabitCategory::Evening),
            "productivity" => Ok(HabitCategory::Productivity),
            "wellness" => Ok(HabitCategory::Wellness),
            "custom" => Ok(HabitCategory::Custom),
            _ => Err(format!("unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for HabitCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user-defined category beyond the presets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomCategory {
    /// Unique identifier
    pub id: String,
    /// Category name (unique, referenced by habits)
    pub name: String,
    /// HSL or hex color string
    pub color: String,
    /// Optional icon name
    pub icon: Option<String>,
}

impl CustomCategory {
    /// Create a new custom category with a fresh id.
    pub fn new(name: impl Into<String>, color: impl Into<String>, icon: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            color: color.into(),
            icon,
        }
    }
}

// ============================================
// Schedule
// ============================================

/// How often a habit is due.
///
/// Weekday indices follow the original data model: 0 = Sunday .. 6 = Saturday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Schedule {
    /// Due every day
    Daily,
    /// Due on the listed weekdays
    Weekly { target_days: Vec<u8> },
    /// Due `target_count` times per month, on any days
    Monthly { target_count: u32 },
}

impl Schedule {
    /// Returns the identifier used in database storage
    pub fn kind(&self) -> &'static str {
        match self {
            Schedule::Daily => "daily",
            Schedule::Weekly { .. } => "weekly",
            Schedule::Monthly { .. } => "monthly",
        }
    }

    /// Whether the habit is due on the given day.
    ///
    /// Monthly habits count any day toward their target, so every day is
    /// a scheduled day for them.
    pub fn is_scheduled_on(&self, date: NaiveDate) -> bool {
        match self {
            Schedule::Daily => true,
            Schedule::Weekly { target_days } => {
                let weekday = date.weekday().num_days_from_sunday() as u8;
                target_days.contains(&weekday)
            }
            Schedule::Monthly { .. } => true,
        }
    }

    /// Short human description, e.g. "every day" or "weekly on Mon, Wed".
    pub fn describe(&self) -> String {
        match self {
            Schedule::Daily => "every day".to_string(),
            Schedule::Weekly { target_days } => {
                if target_days.is_empty() {
                    return "weekly".to_string();
                }
                let mut days: Vec<u8> = target_days.clone();
                days.sort_unstable();
                days.dedup();
                let names: Vec<&str> = days
                    .iter()
                    .filter_map(|d| weekday_short_name(*d))
                    .collect();
                format!("weekly on {}", names.join(", "))
            }
            Schedule::Monthly { target_count } => {
                format!("{}x per month", target_count)
            }
        }
    }
}

/// Short name for a 0=Sunday..6=Saturday weekday index.
pub fn weekday_short_name(index: u8) -> Option<&'static str> {
    match index {
        0 => Some("Sun"),
        1 => Some("Mon"),
        2 => Some("Tue"),
        3 => Some("Wed"),
        4 => Some("Thu"),
        5 => Some("Fri"),
        6 => Some("Sat"),
        _ => None,
    }
}

// ============================================
// Habit
// ============================================

/// A tracked behavior definition.
///
/// The stacking/two-minute/context fields are behavior-design prompts carried
/// through to display; no computation reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier, immutable after creation
    pub id: String,
    /// Display name
    pub name: String,
    /// Preset category, or `Custom` with `custom_category` set
    pub category: HabitCategory,
    /// Name of the referenced [`CustomCategory`] when `category` is `Custom`
    pub custom_category: Option<String>,
    /// How often the habit is due
    pub schedule: Schedule,
    /// Habit stacking trigger: "after I ..." (the existing anchor habit)
    pub stacking_cue: Option<String>,
    /// Habit stacking action: "... I will ..." (this habit, phrased as the follow-up)
    pub stacking_action: Option<String>,
    /// Two-minute entry version of the habit
    pub two_minute_action: Option<String>,
    /// Context cue, e.g. "in the kitchen after breakfast"
    pub context_cue: Option<String>,
    /// When the habit was created; never changes afterwards
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Create a new habit with a fresh id, stamped now.
    pub fn new(name: impl Into<String>, category: HabitCategory, schedule: Schedule) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            category,
            custom_category: None,
            schedule,
            stacking_cue: None,
            stacking_action: None,
            two_minute_action: None,
            context_cue: None,
            created_at: Utc::now(),
        }
    }

    /// Calendar days elapsed between creation and `today` (0 on the creation day).
    pub fn days_since_created(&self, today: NaiveDate) -> i64 {
        (today - self.created_at.date_naive()).num_days().max(0)
    }
}

// ============================================
// Completion Log
// ============================================

/// One record per (habit, calendar day) marking a completion.
///
/// A record with `completed == false` is equivalent to no record at all for
/// every analytics purpose; the store collapses "toggle off" to deletion, but
/// the engine tolerates explicit false records from other writers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionLog {
    /// The habit this log belongs to
    pub habit_id: String,
    /// The calendar day
    pub date: NaiveDate,
    /// Whether the habit was completed that day
    pub completed: bool,
}

impl CompletionLog {
    /// A completed log for the given habit and day.
    pub fn completed(habit_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            habit_id: habit_id.into(),
            date,
            completed: true,
        }
    }
}

// ============================================
// Automaticity Rating
// ============================================

/// Weekly 1-5 self-report of how automatic a habit felt.
///
/// Keyed by `(habit_id, week_start)` where `week_start` is the Monday of the
/// ISO week; a re-submission for the same week updates in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomaticityRating {
    /// Unique identifier
    pub id: String,
    /// The habit being rated
    pub habit_id: String,
    /// Monday of the rated week
    pub week_start: NaiveDate,
    /// 1 (very deliberate) to 5 (fully automatic)
    pub rating: u8,
    /// Optional free-text note about the week
    pub notes: Option<String>,
    /// When the rating was first submitted
    pub created_at: DateTime<Utc>,
}

impl AutomaticityRating {
    /// A new rating for the week starting at `week_start`.
    pub fn new(habit_id: impl Into<String>, week_start: NaiveDate, rating: u8) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            habit_id: habit_id.into(),
            week_start,
            rating,
            notes: None,
            created_at: Utc::now(),
        }
    }

    /// The 1-5 scale: (value, label, description).
    pub fn scale() -> &'static [(u8, &'static str, &'static str)] {
        &[
            (1, "Very Deliberate", "Required significant mental effort"),
            (2, "Deliberate", "Needed reminders and willpower"),
            (3, "Moderate", "Some effort but getting easier"),
            (4, "Mostly Automatic", "Did it with minimal thinking"),
            (5, "Fully Automatic", "Did it without thinking at all"),
        ]
    }

    /// Label for a rating value, if it is on the scale.
    pub fn label_for(rating: u8) -> Option<&'static str> {
        Self::scale()
            .iter()
            .find(|(value, _, _)| *value == rating)
            .map(|(_, label, _)| *label)
    }
}

// ============================================
// Journal Entry
// ============================================

/// Daily free-text reflection, one per calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier
    pub id: String,
    /// The day this entry reflects on (unique)
    pub date: NaiveDate,
    /// Free-text reflection
    pub content: String,
    /// Small wins to celebrate, in the order written
    pub wins: Vec<String>,
    /// Why habits were missed, in the order written
    pub misses: Vec<String>,
    /// When the entry was first written
    pub created_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Create a new entry with a fresh id, stamped now.
    pub fn new(date: NaiveDate, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            date,
            content: content.into(),
            wins: Vec::new(),
            misses: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_valid() {
        let date = parse_date("2025-03-09").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 9).unwrap());
    }

    #[test]
    fn test_parse_date_rejects_malformed() {
        assert!(parse_date("2025-13-40").is_err());
        assert!(parse_date("03/09/2025").is_err());
        assert!(parse_date("").is_err());

        let err = parse_date("not-a-date").unwrap_err();
        assert!(err.to_string().contains("not-a-date"));
    }

    #[test]
    fn test_week_start_is_monday() {
        // 2025-03-09 is a Sunday; its ISO week starts Monday 2025-03-03
        let sunday = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(
            week_start(sunday),
            NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
        );

        // A Monday is its own week start
        let monday = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        assert_eq!(week_start(monday), monday);
    }

    #[test]
    fn test_category_round_trip() {
        for category in HabitCategory::presets() {
            let parsed: HabitCategory = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
        assert_eq!("custom".parse::<HabitCategory>(), Ok(HabitCategory::Custom));
        assert!("unknown".parse::<HabitCategory>().is_err());
    }

    #[test]
    fn test_preset_meta() {
        let meta = HabitCategory::Morning.preset_meta().unwrap();
        assert_eq!(meta.label, "Morning Routine");
        assert!(HabitCategory::Custom.preset_meta().is_none());
    }

    #[test]
    fn test_schedule_daily_always_due() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        assert!(Schedule::Daily.is_scheduled_on(date));
    }

    #[test]
    fn test_schedule_weekly_target_days() {
        // 2025-06-15 is a Sunday (index 0), 2025-06-16 a Monday (index 1)
        let schedule = Schedule::Weekly {
            target_days: vec![1, 3, 5],
        };
        let sunday = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let monday = NaiveDate::from_ymd_opt(2025, 6, 16).unwrap();
        assert!(!schedule.is_scheduled_on(sunday));
        assert!(schedule.is_scheduled_on(monday));
    }

    #[test]
    fn test_schedule_describe() {
        assert_eq!(Schedule::Daily.describe(), "every day");
        assert_eq!(
            Schedule::Weekly {
                target_days: vec![3, 1]
            }
            .describe(),
            "weekly on Mon, Wed"
        );
        assert_eq!(
            Schedule::Monthly { target_count: 10 }.describe(),
            "10x per month"
        );
    }

    #[test]
    fn test_days_since_created() {
        let mut habit = Habit::new("Read", HabitCategory::Evening, Schedule::Daily);
        habit.created_at = "2025-01-01T08:30:00Z".parse().unwrap();

        let same_day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let later = NaiveDate::from_ymd_opt(2025, 1, 11).unwrap();
        assert_eq!(habit.days_since_created(same_day), 0);
        assert_eq!(habit.days_since_created(later), 10);
    }
}
