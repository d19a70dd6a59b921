//! Process-wide site configuration.
//!
//! # Responsibility
//! - Resolve markup modes, logging and storage settings once at startup.
//! - Hand callers an immutable value instead of global mutable settings.
//!
//! # Invariants
//! - A `SiteConfig` is never mutated after construction.
//! - Contacts and projects have independent markup modes.

use crate::logging::default_log_level;
use crate::markup::MarkupMode;
use std::path::PathBuf;

pub const ENV_CONTACT_MARKUP: &str = "FUTUREGREEN_CONTACT_MARKUP";
pub const ENV_PROJECT_MARKUP: &str = "FUTUREGREEN_PROJECT_MARKUP";
pub const ENV_LOG_LEVEL: &str = "FUTUREGREEN_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "FUTUREGREEN_LOG_DIR";
pub const ENV_DB_PATH: &str = "FUTUREGREEN_DB_PATH";

/// Immutable settings read once per process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub contact_markup: MarkupMode,
    pub project_markup: MarkupMode,
    pub log_level: String,
    /// Absolute log directory; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    /// Database file; `None` selects an in-memory database.
    pub db_path: Option<PathBuf>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            contact_markup: MarkupMode::Markdown,
            project_markup: MarkupMode::Markdown,
            log_level: default_log_level().to_string(),
            log_dir: None,
            db_path: None,
        }
    }
}

impl SiteConfig {
    /// Reads settings from `FUTUREGREEN_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup.
    ///
    /// Missing or blank values keep their defaults. Unknown markup mode
    /// names resolve to [`MarkupMode::Plain`].
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(mode) = read(ENV_CONTACT_MARKUP) {
            config.contact_markup = MarkupMode::parse(&mode);
        }
        if let Some(mode) = read(ENV_PROJECT_MARKUP) {
            config.project_markup = MarkupMode::parse(&mode);
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        config.log_dir = read(ENV_LOG_DIR).map(PathBuf::from);
        config.db_path = read(ENV_DB_PATH).map(PathBuf::from);
        config
    }
}
