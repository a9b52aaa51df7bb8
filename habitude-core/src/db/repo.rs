//! Database repository layer
//!
//! Provides query and insert operations for all record types. The analytics
//! layer never touches SQL; it works on records loaded through this module.

use crate::error::{Error, Result};
use crate::types::*;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::PathBuf;
use std::sync::Mutex;

/// Database handle with connection pooling (single connection for now)
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Enable foreign keys and WAL mode for better concurrency
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA cache_size = -64000;  -- 64MB cache
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        super::schema::run_migrations(&conn)
    }

    /// Get the underlying connection (for advanced use)
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    // ============================================
    // Habit operations
    // ============================================

    /// Insert or update a habit
    ///
    /// `created_at` is write-once; updates keep the original timestamp.
    pub fn upsert_habit(&self, habit: &Habit) -> Result<()> {
        let (schedule_type, target_days, target_count) = schedule_columns(&habit.schedule)?;

        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO habits (id, name, category, custom_category, schedule_type, target_days,
                                target_count, stacking_cue, stacking_action, two_minute_action,
                                context_cue, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                category = excluded.category,
                custom_category = excluded.custom_category,
                schedule_type = excluded.schedule_type,
                target_days = excluded.target_days,
                target_count = excluded.target_count,
                stacking_cue = excluded.stacking_cue,
                stacking_action = excluded.stacking_action,
                two_minute_action = excluded.two_minute_action,
                context_cue = excluded.context_cue
            "#,
            params![
                habit.id,
                habit.name,
                habit.category.as_str(),
                habit.custom_category,
                schedule_type,
                target_days,
                target_count,
                habit.stacking_cue,
                habit.stacking_action,
                habit.two_minute_action,
                habit.context_cue,
                habit.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get a habit by ID
    pub fn get_habit(&self, id: &str) -> Result<Option<Habit>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT * FROM habits WHERE id = ?", [id], |row| {
            Self::row_to_habit(row)
        })
        .optional()
        .map_err(Error::from)
    }

    /// List all habits in creation order
    pub fn list_habits(&self) -> Result<Vec<Habit>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT * FROM habits ORDER BY created_at ASC, id ASC")?;

        let habits = stmt
            .query_map([], Self::row_to_habit)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(habits)
    }

    /// Delete a habit and, via cascade, its logs, ratings, and milestones
    pub fn delete_habit(&self, id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM habits WHERE id = ?", [id])?;
        if deleted == 0 {
            return Err(Error::HabitNotFound(id.to_string()));
        }
        tracing::info!(habit_id = id, "Deleted habit");
        Ok(())
    }

    fn row_to_habit(row: &Row) -> rusqlite::Result<Habit> {
        let category_str: String = row.get("category")?;
        let schedule_type: String = row.get("schedule_type")?;
        let target_days_str: Option<String> = row.get("target_days")?;
        let target_count: Option<i64> = row.get("target_count")?;
        let created_at_str: String = row.get("created_at")?;

        let schedule = match schedule_type.as_str() {
            "weekly" => Schedule::Weekly {
                target_days: target_days_str
                    .and_then(|s| serde_json::from_str(&s).ok())
                    .unwrap_or_default(),
            },
            "monthly" => Schedule::Monthly {
                target_count: target_count.unwrap_or(1).max(1) as u32,
            },
            _ => Schedule::Daily,
        };

        Ok(Habit {
            id: row.get("id")?,
            name: row.get("name")?,
            category: category_str.parse().unwrap_or(HabitCategory::Productivity),
            custom_category: row.get("custom_category")?,
            schedule,
            stacking_cue: row.get("stacking_cue")?,
            stacking_action: row.get("stacking_action")?,
            two_minute_action: row.get("two_minute_action")?,
            context_cue: row.get("context_cue")?,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }

    // ============================================
    // Completion log operations
    // ============================================

    /// Toggle a habit's completion for a day, returning the new state.
    ///
    /// Absent day becomes completed; a completed day is deleted outright; an
    /// explicit uncompleted record (from an importer) flips to completed.
    pub fn toggle_completion(&self, habit_id: &str, date: NaiveDate) -> Result<bool> {
        let conn = self.conn.lock().unwrap();

        let habit_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM habits WHERE id = ?",
            [habit_id],
            |r| r.get(0),
        )?;
        if habit_count == 0 {
            return Err(Error::HabitNotFound(habit_id.to_string()));
        }

        let date_str = date.format(DATE_FORMAT).to_string();
        let existing: Option<bool> = conn
            .query_row(
                "SELECT completed FROM completion_logs WHERE habit_id = ?1 AND date = ?2",
                params![habit_id, date_str],
                |r| r.get(0),
            )
            .optional()?;

        match existing {
            None => {
                conn.execute(
                    "INSERT INTO completion_logs (habit_id, date, completed) VALUES (?1, ?2, 1)",
                    params![habit_id, date_str],
                )?;
                Ok(true)
            }
            Some(true) => {
                conn.execute(
                    "DELETE FROM completion_logs WHERE habit_id = ?1 AND date = ?2",
                    params![habit_id, date_str],
                )?;
                Ok(false)
            }
            Some(false) => {
                conn.execute(
                    "UPDATE completion_logs SET completed = 1 WHERE habit_id = ?1 AND date = ?2",
                    params![habit_id, date_str],
                )?;
                Ok(true)
            }
        }
    }

    /// Insert or update a completion log verbatim (for importers and tests)
    pub fn upsert_completion(&self, log: &CompletionLog) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO completion_logs (habit_id, date, completed)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(habit_id, date) DO UPDATE SET
                completed = excluded.completed
            "#,
            params![
                log.habit_id,
                log.date.format(DATE_FORMAT).to_string(),
                log.completed,
            ],
        )?;
        Ok(())
    }

    /// Get all completion logs for one habit, oldest first
    pub fn get_habit_completions(&self, habit_id: &str) -> Result<Vec<CompletionLog>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT * FROM completion_logs WHERE habit_id = ? ORDER BY date ASC")?;

        let logs = stmt
            .query_map([habit_id], Self::row_to_completion)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(logs)
    }

    /// List every completion log, oldest first
    pub fn list_completions(&self) -> Result<Vec<CompletionLog>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT * FROM completion_logs ORDER BY date ASC, habit_id ASC")?;

        let logs = stmt
            .query_map([], Self::row_to_completion)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(logs)
    }

    fn row_to_completion(row: &Row) -> rusqlite::Result<CompletionLog> {
        let date_str: String = row.get("date")?;

        Ok(CompletionLog {
            habit_id: row.get("habit_id")?,
            date: parse_date_cell(&date_str)?,
            completed: row.get("completed")?,
        })
    }

    // ============================================
    // Automaticity rating operations
    // ============================================

    /// Insert or update the rating for a habit's week.
    ///
    /// Keyed by `(habit_id, week_start)`; resubmitting replaces the rating and
    /// notes while keeping the original id and created_at.
    pub fn upsert_rating(&self, rating: &AutomaticityRating) -> Result<()> {
        if !(1..=5).contains(&rating.rating) {
            return Err(Error::InvalidRating(rating.rating));
        }

        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO automaticity_ratings (id, habit_id, week_start, rating, notes, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(habit_id, week_start) DO UPDATE SET
                rating = excluded.rating,
                notes = excluded.notes
            "#,
            params![
                rating.id,
                rating.habit_id,
                rating.week_start.format(DATE_FORMAT).to_string(),
                rating.rating,
                rating.notes,
                rating.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get all ratings for one habit, oldest week first
    pub fn get_habit_ratings(&self, habit_id: &str) -> Result<Vec<AutomaticityRating>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT * FROM automaticity_ratings WHERE habit_id = ? ORDER BY week_start ASC",
        )?;

        let ratings = stmt
            .query_map([habit_id], Self::row_to_rating)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(ratings)
    }

    /// List every rating, oldest week first
    pub fn list_ratings(&self) -> Result<Vec<AutomaticityRating>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT * FROM automaticity_ratings ORDER BY week_start ASC, habit_id ASC")?;

        let ratings = stmt
            .query_map([], Self::row_to_rating)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(ratings)
    }

    fn row_to_rating(row: &Row) -> rusqlite::Result<AutomaticityRating> {
        let week_start_str: String = row.get("week_start")?;
        let created_at_str: String = row.get("created_at")?;

        Ok(AutomaticityRating {
            id: row.get("id")?,
            habit_id: row.get("habit_id")?,
            week_start: parse_date_cell(&week_start_str)?,
            rating: row.get("rating")?,
            notes: row.get("notes")?,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }

    // ============================================
    // Journal operations
    // ============================================

    /// Insert or update the journal entry for a day.
    ///
    /// One entry per date; rewriting a day replaces content, wins, and misses
    /// while keeping the original id and created_at.
    pub fn upsert_journal_entry(&self, entry: &JournalEntry) -> Result<()> {
        let wins = serde_json::to_string(&entry.wins)?;
        let misses = serde_json::to_string(&entry.misses)?;

        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO journal_entries (id, date, content, wins, misses, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(date) DO UPDATE SET
                content = excluded.content,
                wins = excluded.wins,
                misses = excluded.misses
            "#,
            params![
                entry.id,
                entry.date.format(DATE_FORMAT).to_string(),
                entry.content,
                wins,
                misses,
                entry.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get the journal entry for a day
    pub fn get_journal_entry(&self, date: NaiveDate) -> Result<Option<JournalEntry>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT * FROM journal_entries WHERE date = ?",
            [date.format(DATE_FORMAT).to_string()],
            Self::row_to_journal_entry,
        )
        .optional()
        .map_err(Error::from)
    }

    /// List journal entries, most recent day first
    pub fn list_journal_entries(&self) -> Result<Vec<JournalEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT * FROM journal_entries ORDER BY date DESC")?;

        let entries = stmt
            .query_map([], Self::row_to_journal_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    fn row_to_journal_entry(row: &Row) -> rusqlite::Result<JournalEntry> {
        let date_str: String = row.get("date")?;
        let wins_str: String = row.get("wins")?;
        let misses_str: String = row.get("misses")?;
        let created_at_str: String = row.get("created_at")?;

        Ok(JournalEntry {
            id: row.get("id")?,
            date: parse_date_cell(&date_str)?,
            content: row.get("content")?,
            wins: serde_json::from_str(&wins_str).unwrap_or_default(),
            misses: serde_json::from_str(&misses_str).unwrap_or_default(),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }

    // ============================================
    // Custom category operations
    // ============================================

    /// Add a custom category; names are unique
    pub fn add_custom_category(&self, category: &CustomCategory) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        let existing: i64 = conn.query_row(
            "SELECT COUNT(*) FROM custom_categories WHERE name = ?",
            [&category.name],
            |r| r.get(0),
        )?;
        if existing > 0 {
            return Err(Error::CategoryExists(category.name.clone()));
        }

        conn.execute(
            "INSERT INTO custom_categories (id, name, color, icon) VALUES (?1, ?2, ?3, ?4)",
            params![category.id, category.name, category.color, category.icon],
        )?;
        Ok(())
    }

    /// List custom categories by name
    pub fn list_custom_categories(&self) -> Result<Vec<CustomCategory>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT * FROM custom_categories ORDER BY name ASC")?;

        let categories = stmt
            .query_map([], Self::row_to_custom_category)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    /// Delete a custom category by name.
    ///
    /// Habits referencing it fall back to the productivity preset so no habit
    /// is ever left pointing at a category that no longer exists. Returns the
    /// number of habits reassigned.
    pub fn delete_custom_category(&self, name: &str) -> Result<usize> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        let deleted = tx.execute("DELETE FROM custom_categories WHERE name = ?", [name])?;
        if deleted == 0 {
            return Err(Error::CategoryNotFound(name.to_string()));
        }

        let reassigned = tx.execute(
            r#"
            UPDATE habits
            SET category = 'productivity', custom_category = NULL
            WHERE category = 'custom' AND custom_category = ?
            "#,
            [name],
        )?;

        tx.commit()?;

        tracing::info!(category = name, reassigned, "Deleted custom category");
        Ok(reassigned)
    }

    fn row_to_custom_category(row: &Row) -> rusqlite::Result<CustomCategory> {
        Ok(CustomCategory {
            id: row.get("id")?,
            name: row.get("name")?,
            color: row.get("color")?,
            icon: row.get("icon")?,
        })
    }

    // ============================================
    // Milestone bookkeeping
    // ============================================

    /// Whether a milestone was already celebrated for this habit
    pub fn milestone_seen(&self, habit_id: &str, streak: u32) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM seen_milestones WHERE habit_id = ?1 AND streak = ?2",
            params![habit_id, streak],
            |r| r.get(0),
        )?;
        Ok(count > 0)
    }

    /// Record a celebrated milestone; idempotent
    pub fn mark_milestone_seen(&self, habit_id: &str, streak: u32) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT OR IGNORE INTO seen_milestones (habit_id, streak, seen_at)
            VALUES (?1, ?2, ?3)
            "#,
            params![habit_id, streak, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    // ============================================
    // Meta key/value operations
    // ============================================

    /// Get a meta value by key
    pub fn get_meta(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT value FROM meta WHERE key = ?", [key], |r| r.get(0))
            .optional()
            .map_err(Error::from)
    }

    /// Set a meta value by key
    pub fn set_meta(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO meta (key, value)
            VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value
            "#,
            params![key, value],
        )?;
        Ok(())
    }
}

/// Split a schedule into its storage columns: (schedule_type, target_days, target_count)
fn schedule_columns(schedule: &Schedule) -> Result<(&'static str, Option<String>, Option<i64>)> {
    Ok(match schedule {
        Schedule::Daily => ("daily", None, None),
        Schedule::Weekly { target_days } => {
            ("weekly", Some(serde_json::to_string(target_days)?), None)
        }
        Schedule::Monthly { target_count } => ("monthly", None, Some(*target_count as i64)),
    })
}

/// Parse a date cell, surfacing corruption instead of skipping the row.
///
/// A log with an unreadable date would silently distort streaks and rates,
/// so the whole query fails and names the bad value.
fn parse_date_cell(s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    fn make_habit(name: &str) -> Habit {
        Habit::new(name, HabitCategory::Morning, Schedule::Daily)
    }

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_habit_crud() {
        let db = open_test_db();

        let mut habit = make_habit("Meditate");
        habit.two_minute_action = Some("Sit down and take one breath".to_string());
        db.upsert_habit(&habit).unwrap();

        let retrieved = db.get_habit(&habit.id).unwrap().unwrap();
        assert_eq!(retrieved.name, "Meditate");
        assert_eq!(retrieved.category, HabitCategory::Morning);
        assert_eq!(
            retrieved.two_minute_action.as_deref(),
            Some("Sit down and take one breath")
        );

        // Update through the same upsert
        habit.name = "Meditate 10 min".to_string();
        db.upsert_habit(&habit).unwrap();
        let updated = db.get_habit(&habit.id).unwrap().unwrap();
        assert_eq!(updated.name, "Meditate 10 min");
        assert_eq!(db.list_habits().unwrap().len(), 1);

        db.delete_habit(&habit.id).unwrap();
        assert!(db.get_habit(&habit.id).unwrap().is_none());
        assert!(matches!(
            db.delete_habit(&habit.id),
            Err(Error::HabitNotFound(_))
        ));
    }

    #[test]
    fn test_schedule_round_trip() {
        let db = open_test_db();

        let weekly = Habit::new(
            "Gym",
            HabitCategory::Health,
            Schedule::Weekly {
                target_days: vec![1, 3, 5],
            },
        );
        let monthly = Habit::new(
            "Deep clean",
            HabitCategory::Evening,
            Schedule::Monthly { target_count: 4 },
        );
        db.upsert_habit(&weekly).unwrap();
        db.upsert_habit(&monthly).unwrap();

        let retrieved = db.get_habit(&weekly.id).unwrap().unwrap();
        assert_eq!(
            retrieved.schedule,
            Schedule::Weekly {
                target_days: vec![1, 3, 5]
            }
        );

        let retrieved = db.get_habit(&monthly.id).unwrap().unwrap();
        assert_eq!(retrieved.schedule, Schedule::Monthly { target_count: 4 });
    }

    #[test]
    fn test_toggle_cycle() {
        let db = open_test_db();
        let habit = make_habit("Read");
        db.upsert_habit(&habit).unwrap();
        let day = date("2025-03-10");

        // Absent -> completed
        assert!(db.toggle_completion(&habit.id, day).unwrap());
        let logs = db.get_habit_completions(&habit.id).unwrap();
        assert_eq!(logs.len(), 1);
        assert!(logs[0].completed);

        // Completed -> record removed
        assert!(!db.toggle_completion(&habit.id, day).unwrap());
        assert!(db.get_habit_completions(&habit.id).unwrap().is_empty());

        // Explicit uncompleted record flips to completed
        db.upsert_completion(&CompletionLog {
            habit_id: habit.id.clone(),
            date: day,
            completed: false,
        })
        .unwrap();
        assert!(db.toggle_completion(&habit.id, day).unwrap());
        let logs = db.get_habit_completions(&habit.id).unwrap();
        assert_eq!(logs.len(), 1);
        assert!(logs[0].completed);
    }

    #[test]
    fn test_toggle_unknown_habit() {
        let db = open_test_db();
        let result = db.toggle_completion("no-such-habit", date("2025-03-10"));
        assert!(matches!(result, Err(Error::HabitNotFound(_))));
    }

    #[test]
    fn test_delete_habit_cascades() {
        let db = open_test_db();
        let habit = make_habit("Stretch");
        db.upsert_habit(&habit).unwrap();

        db.toggle_completion(&habit.id, date("2025-03-10")).unwrap();
        db.upsert_rating(&AutomaticityRating {
            id: uuid::Uuid::new_v4().to_string(),
            habit_id: habit.id.clone(),
            week_start: date("2025-03-10"),
            rating: 3,
            notes: None,
            created_at: Utc::now(),
        })
        .unwrap();
        db.mark_milestone_seen(&habit.id, 5).unwrap();

        db.delete_habit(&habit.id).unwrap();

        assert!(db.list_completions().unwrap().is_empty());
        assert!(db.list_ratings().unwrap().is_empty());
        assert!(!db.milestone_seen(&habit.id, 5).unwrap());
    }

    #[test]
    fn test_rating_upsert_by_week() {
        let db = open_test_db();
        let habit = make_habit("Journal");
        db.upsert_habit(&habit).unwrap();
        let monday = date("2025-03-03");

        let mut rating = AutomaticityRating {
            id: uuid::Uuid::new_v4().to_string(),
            habit_id: habit.id.clone(),
            week_start: monday,
            rating: 2,
            notes: Some("still needs the reminder".to_string()),
            created_at: Utc::now(),
        };
        db.upsert_rating(&rating).unwrap();

        // Resubmitting the same week replaces in place
        rating.id = uuid::Uuid::new_v4().to_string();
        rating.rating = 4;
        rating.notes = None;
        db.upsert_rating(&rating).unwrap();

        let ratings = db.get_habit_ratings(&habit.id).unwrap();
        assert_eq!(ratings.len(), 1);
        assert_eq!(ratings[0].rating, 4);
        assert!(ratings[0].notes.is_none());
    }

    #[test]
    fn test_rating_out_of_range() {
        let db = open_test_db();
        let habit = make_habit("Journal");
        db.upsert_habit(&habit).unwrap();

        let rating = AutomaticityRating {
            id: uuid::Uuid::new_v4().to_string(),
            habit_id: habit.id.clone(),
            week_start: date("2025-03-03"),
            rating: 6,
            notes: None,
            created_at: Utc::now(),
        };
        assert!(matches!(
            db.upsert_rating(&rating),
            Err(Error::InvalidRating(6))
        ));
    }

    #[test]
    fn test_journal_upsert_by_date() {
        let db = open_test_db();
        let day = date("2025-03-10");

        let mut entry = JournalEntry::new(day, "Rough start");
        entry.misses = vec!["slept through the alarm".to_string()];
        db.upsert_journal_entry(&entry).unwrap();
        let original_id = entry.id.clone();

        // Rewriting the same day keeps the original record
        let mut rewrite = JournalEntry::new(day, "Rough start, good finish");
        rewrite.wins = vec!["evening walk".to_string()];
        db.upsert_journal_entry(&rewrite).unwrap();

        let entries = db.list_journal_entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, original_id);
        assert_eq!(entries[0].content, "Rough start, good finish");
        assert_eq!(entries[0].wins, vec!["evening walk".to_string()]);

        let fetched = db.get_journal_entry(day).unwrap().unwrap();
        assert_eq!(fetched.id, original_id);
    }

    #[test]
    fn test_custom_category_delete_reassigns() {
        let db = open_test_db();

        db.add_custom_category(&CustomCategory::new("Guitar", "hsl(280 60% 50%)", None))
            .unwrap();

        let mut habit = Habit::new("Practice scales", HabitCategory::Custom, Schedule::Daily);
        habit.custom_category = Some("Guitar".to_string());
        db.upsert_habit(&habit).unwrap();

        let reassigned = db.delete_custom_category("Guitar").unwrap();
        assert_eq!(reassigned, 1);

        let habit = db.get_habit(&habit.id).unwrap().unwrap();
        assert_eq!(habit.category, HabitCategory::Productivity);
        assert!(habit.custom_category.is_none());

        assert!(matches!(
            db.delete_custom_category("Guitar"),
            Err(Error::CategoryNotFound(_))
        ));
    }

    #[test]
    fn test_custom_category_duplicate_name() {
        let db = open_test_db();
        db.add_custom_category(&CustomCategory::new("Guitar", "hsl(280 60% 50%)", None))
            .unwrap();
        let result =
            db.add_custom_category(&CustomCategory::new("Guitar", "hsl(10 60% 50%)", None));
        assert!(matches!(result, Err(Error::CategoryExists(_))));
    }

    #[test]
    fn test_milestone_seen_round_trip() {
        let db = open_test_db();
        let habit = make_habit("Run");
        db.upsert_habit(&habit).unwrap();

        assert!(!db.milestone_seen(&habit.id, 21).unwrap());
        db.mark_milestone_seen(&habit.id, 21).unwrap();
        assert!(db.milestone_seen(&habit.id, 21).unwrap());

        // Marking again is a no-op
        db.mark_milestone_seen(&habit.id, 21).unwrap();
        assert!(db.milestone_seen(&habit.id, 21).unwrap());
    }

    #[test]
    fn test_meta_round_trip() {
        let db = open_test_db();

        assert!(db.get_meta("last_report_check").unwrap().is_none());
        db.set_meta("last_report_check", "2025-03-10").unwrap();
        assert_eq!(
            db.get_meta("last_report_check").unwrap().as_deref(),
            Some("2025-03-10")
        );

        db.set_meta("last_report_check", "2025-03-17").unwrap();
        assert_eq!(
            db.get_meta("last_report_check").unwrap().as_deref(),
            Some("2025-03-17")
        );
    }
}
