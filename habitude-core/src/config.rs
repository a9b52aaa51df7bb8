//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/habitude/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/habitude/` (~/.config/habitude/)
//! - Data: `$XDG_DATA_HOME/habitude/` (~/.local/share/habitude/)
//! - State/Logs: `$XDG_STATE_HOME/habitude/` (~/.local/state/habitude/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Progress report configuration
    #[serde(default)]
    pub report: ReportConfig,
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

/// Progress report configuration
///
/// Controls the default presentation of `habitude-report`; every field can
/// still be overridden per-run with CLI flags.
#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    /// Playful headings and emoji in terminal output
    #[serde(default = "default_fun_mode")]
    pub fun_mode: bool,

    /// Include the comparison against the previous period
    #[serde(default = "default_include_trends")]
    pub include_trends: bool,

    /// How many habits to show in the "top habits" section
    #[serde(default = "default_top_habits")]
    pub top_habits: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            fun_mode: default_fun_mode(),
            include_trends: default_include_trends(),
            top_habits: default_top_habits(),
        }
    }
}

fn default_fun_mode() -> bool {
    true
}

fn default_include_trends() -> bool {
    true
}

fn default_top_habits() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/habitude/config.toml` (~/.config/habitude/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("habitude").join("config.toml")
    }

    /// Returns the data directory path (for SQLite database)
    ///
    /// `$XDG_DATA_HOME/habitude/` (~/.local/share/habitude/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("habitude")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/habitude/` (~/.local/state/habitude/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("habitude")
    }

    /// Returns the database file path
    ///
    /// `$XDG_DATA_HOME/habitude/data.db` (~/.local/share/habitude/data.db)
    pub fn database_path() -> PathBuf {
        Self::data_dir().join("data.db")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/habitude/habitude.log` (~/.local/state/habitude/habitude.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("habitude.log")
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// This is mainly for CLI binaries that want explicit, stable path behavior
    /// before invoking other components that read these env vars.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_DATA_HOME").is_err() {
            std::env::set_var("XDG_DATA_HOME", home.join(".local/share"));
        }

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.max_files, 5);
        assert!(config.report.fun_mode);
        assert!(config.report.include_trends);
        assert_eq!(config.report.top_habits, 5);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[logging]
level = "debug"

[report]
fun_mode = false
top_habits = 3
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.max_files, 5);
        assert!(!config.report.fun_mode);
        assert!(config.report.include_trends);
        assert_eq!(config.report.top_habits, 3);
    }

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.logging.level, "info");
        assert!(config.report.fun_mode);
    }
}
