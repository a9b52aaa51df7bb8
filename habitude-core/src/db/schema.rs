//! Database schema and migrations
//!
//! Uses SQLite with embedded migrations managed via PRAGMA user_version.
//!
//! Every table here is canonical user data. Streaks, strength scores, and
//! period rollups are never stored; the analytics layer recomputes them from
//! these records on demand.

use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// SQL migrations, indexed by version number
const MIGRATIONS: &[&str] = &[
    // Version 1: Initial schema
    r#"
    -- ============================================
    -- Habit definitions
    -- ============================================

    CREATE TABLE IF NOT EXISTS habits (
        id                TEXT PRIMARY KEY,
        name              TEXT NOT NULL,
        category          TEXT NOT NULL,      -- 'morning', 'health', ..., 'custom'
        custom_category   TEXT,               -- custom_categories.name when category = 'custom'
        schedule_type     TEXT NOT NULL,      -- 'daily', 'weekly', 'monthly'
        target_days       JSON,               -- weekly: array of weekday indices, 0 = Sunday
        target_count      INTEGER,            -- monthly: completions per month
        stacking_cue      TEXT,
        stacking_action   TEXT,
        two_minute_action TEXT,
        context_cue       TEXT,
        created_at        DATETIME NOT NULL
    );

    CREATE TABLE IF NOT EXISTS custom_categories (
        id               TEXT PRIMARY KEY,
        name             TEXT NOT NULL UNIQUE,
        color            TEXT NOT NULL,
        icon             TEXT
    );

    -- ============================================
    -- What the user did
    -- ============================================

    -- One row per (habit, day); a row means the day was logged.
    -- The `completed` flag exists for writers that record explicit misses,
    -- the toggle path deletes rows instead of flipping the flag to false.
    CREATE TABLE IF NOT EXISTS completion_logs (
        habit_id         TEXT NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
        date             TEXT NOT NULL,       -- YYYY-MM-DD
        completed        INTEGER NOT NULL DEFAULT 1,

        PRIMARY KEY (habit_id, date)
    );

    CREATE INDEX IF NOT EXISTS idx_completion_logs_date ON completion_logs(date);

    CREATE TABLE IF NOT EXISTS automaticity_ratings (
        id               TEXT PRIMARY KEY,
        habit_id         TEXT NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
        week_start       TEXT NOT NULL,       -- Monday of the rated week, YYYY-MM-DD
        rating           INTEGER NOT NULL,    -- 1 (deliberate) .. 5 (automatic)
        notes            TEXT,
        created_at       DATETIME NOT NULL,

        UNIQUE(habit_id, week_start)
    );

    CREATE TABLE IF NOT EXISTS journal_entries (
        id               TEXT PRIMARY KEY,
        date             TEXT NOT NULL UNIQUE, -- YYYY-MM-DD
        content          TEXT NOT NULL,
        wins             JSON NOT NULL,        -- array of strings
        misses           JSON NOT NULL,        -- array of strings
        created_at       DATETIME NOT NULL
    );

    -- ============================================
    -- Bookkeeping
    -- ============================================

    -- Milestones already celebrated, so each fires once per (habit, threshold)
    CREATE TABLE IF NOT EXISTS seen_milestones (
        habit_id         TEXT NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
        streak           INTEGER NOT NULL,
        seen_at          DATETIME NOT NULL,

        PRIMARY KEY (habit_id, streak)
    );

    -- Small key/value store, e.g. when the report prompt was last shown
    CREATE TABLE IF NOT EXISTS meta (
        key              TEXT PRIMARY KEY,
        value            TEXT NOT NULL
    );
    "#,
];

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> crate::error::Result<()> {
    let current_version: i32 = conn
        .query_row("PRAGMA user_version", [], |r| r.get(0))
        .unwrap_or(0);

    tracing::info!(
        current_version,
        target_version = SCHEMA_VERSION,
        "Checking database migrations"
    );

    for (i, migration) in MIGRATIONS.iter().enumerate() {
        let version = (i + 1) as i32;
        if version > current_version {
            tracing::info!(version, "Running migration");
            conn.execute_batch(migration)?;
            conn.execute(&format!("PRAGMA user_version = {}", version), [])?;
        }
    }

    if current_version < SCHEMA_VERSION {
        tracing::info!(
            from = current_version,
            to = SCHEMA_VERSION,
            "Migrations complete"
        );
    }

    Ok(())
}

/// Get the current schema version from the database
pub fn get_schema_version(conn: &Connection) -> crate::error::Result<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    Ok(version)
}
