//! # habitude-core
//!
//! Core library for habitude - a habit formation tracker.
//!
//! This library provides:
//! - Domain types for habits, schedules, completions, and journals
//! - Database storage layer with SQLite
//! - Streak, strength, and period analytics
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! The completion log is the single source of truth. Everything shown to
//! the user (streaks, strength scores, phases, rates, milestones) is
//! derived from it on demand and never stored, so a toggled day or an
//! edited schedule can never leave stale aggregates behind.
//!
//! ## Example
//!
//! ```rust,no_run
//! use habitude_core::{Config, Database};
//!
//! // Load configuration
//! let config = Config::load().expect("failed to load config");
//!
//! // Open database
//! let db = Database::open(&Config::database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod types;
