//! Persistent tool settings and logging setup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::util::Result;

/// Environment variable overriding [`Settings::log_filter`].
pub const LOG_ENV: &str = "PDEF_LOG";

/// Highest detail level a definition can ask for.
pub const MAX_DETAIL_LEVEL: usize = 3;

/// Settings that persist between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Logging
    pub log_filter: String,

    // Evaluation
    pub random_seed: u64,
    pub detail_level: usize, // 0 (highest) to 3
    pub particle_count: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: "warn".to_string(),
            random_seed: 0,
            detail_level: 0,
            particle_count: 1,
        }
    }
}

impl Settings {
    /// Default settings file location.
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("particle-def");
            p.push("settings.json");
            p
        })
    }

    /// Load from the default location; missing or unreadable files give
    /// the defaults.
    pub fn load() -> Self {
        Self::path()
            .and_then(|p| Self::load_from(p).ok())
            .unwrap_or_default()
    }

    /// Load from `path`.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut settings: Self = serde_json::from_str(&text)?;
        settings.validate();
        Ok(settings)
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<()> {
        match Self::path() {
            Some(path) => self.save_to(path),
            None => Ok(()),
        }
    }

    /// Save to `path`, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    fn validate(&mut self) {
        if self.detail_level > MAX_DETAIL_LEVEL {
            tracing::debug!("detail level {} clamped to {MAX_DETAIL_LEVEL}", self.detail_level);
            self.detail_level = MAX_DETAIL_LEVEL;
        }
    }

    /// Log filter in effect: `PDEF_LOG` if set, else the configured one.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_new(&self.log_filter))
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

/// Install a stderr `fmt` subscriber. Does nothing if one is already set.
pub fn init_tracing(settings: &Settings) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(settings.env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            log_filter: "particle_def=debug".into(),
            random_seed: 42,
            detail_level: 2,
            particle_count: 16,
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"random_seed": 9, "detail_level": 12}"#).unwrap();
        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.random_seed, 9);
        assert_eq!(settings.detail_level, MAX_DETAIL_LEVEL);
        assert_eq!(settings.log_filter, "warn");
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Settings::load_from(dir.path().join("absent.json")).is_err());

        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{").unwrap();
        assert!(matches!(Settings::load_from(&path), Err(crate::Error::Json(_))));
    }
}
