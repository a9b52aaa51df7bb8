//! Database layer for habitude
//!
//! This module provides the storage layer using SQLite with:
//! - Schema migrations
//! - Repository pattern for queries
//! - Cascade deletes so a removed habit takes its history with it

pub mod repo;
pub mod schema;

pub use repo::Database;
