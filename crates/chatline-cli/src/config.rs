//! Tool configuration (RON).
//!
//! Looked up at `$XDG_CONFIG_HOME/chatline/config.ron` unless `--config` names
//! a file. A missing default file means defaults; a missing explicit file is
//! an error.
//!
//! ```ron
//! (
//!     timeline: (
//!         date_headers: true,
//!         utc_offset_minutes: -300,
//!     ),
//! )
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use chatline_types::TimelinePolicy;

/// Config file name under the chatline config directory.
pub const CONFIG_FILE: &str = "config.ron";

/// Settings for the `chatline` tool.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Header placement for dumped timelines.
    pub timeline: TimelinePolicy,
}

impl Config {
    /// `$XDG_CONFIG_HOME/chatline/config.ron`, if a config dir exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("chatline").join(CONFIG_FILE))
    }

    /// Parse config text.
    pub fn parse(content: &str) -> Result<Self> {
        ron::from_str(content).context("invalid config RON")
    }

    /// Load from an explicit path, or the default location.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_file(&path),
                _ => {
                    tracing::debug!("no config file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("failed to load config {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(Config::parse("()").unwrap(), Config::default());
    }

    #[test]
    fn test_parse_timeline_policy() {
        let config =
            Config::parse("(timeline: (date_headers: false, utc_offset_minutes: 120))").unwrap();
        assert!(!config.timeline.date_headers);
        assert_eq!(config.timeline.utc_offset_minutes, 120);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Config::parse("(timeline: 3)").is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "(timeline: (utc_offset_minutes: 60))").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.timeline.utc_offset_minutes, 60);
        assert!(config.timeline.date_headers);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.ron"))).unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }
}
