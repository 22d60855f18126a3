//! Configuration loading for the `what` tool.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The events file used when nothing else names one.
pub const DEFAULT_EVENTS_FILE: &str = "what.txt";

/// Days before today the default report window starts.
pub const DEFAULT_DAYS_BEFORE: u32 = 1;

/// Days after today the default report window ends.
pub const DEFAULT_DAYS_AFTER: u32 = 28;

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub events_file: Option<PathBuf>,
    pub window: Option<WindowConfig>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct WindowConfig {
    pub days_before: Option<u32>,
    pub days_after: Option<u32>,
}

impl Config {
    /// Gets the events file to read, preferring one given explicitly (on the command line or
    /// through the environment) over the configured one.
    pub fn events_file(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.events_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EVENTS_FILE))
    }

    pub fn days_before(&self) -> u32 {
        self.window
            .as_ref()
            .and_then(|window| window.days_before)
            .unwrap_or(DEFAULT_DAYS_BEFORE)
    }

    pub fn days_after(&self) -> u32 {
        self.window
            .as_ref()
            .and_then(|window| window.days_after)
            .unwrap_or(DEFAULT_DAYS_AFTER)
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "whatwhen").context("Could not determine config directory")?;
    Ok(dirs.config_dir().join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::debug!("no config file at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&contents)
        .with_context(|| format!("Failed to load config file: {}", path.display()))
}

pub fn parse_config(contents: &str) -> Result<Config> {
    let config: Config =
        toml::from_str(contents).context("Failed to parse config file as TOML")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.days_before(), 1);
        assert_eq!(config.days_after(), 28);
        assert_eq!(config.events_file(None), PathBuf::from("what.txt"));
    }

    #[test]
    fn test_missing_config_file() {
        let config = load_config(Path::new("/nonexistent/whatwhen/config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_config() {
        let config = parse_config(
            r#"
events_file = "/home/me/events.txt"

[window]
days_after = 7
"#,
        )
        .unwrap();
        assert_eq!(config.days_before(), 1);
        assert_eq!(config.days_after(), 7);
        assert_eq!(
            config.events_file(None),
            PathBuf::from("/home/me/events.txt")
        );
    }

    #[test]
    fn test_explicit_events_file_wins() {
        let config = Config {
            events_file: Some(PathBuf::from("configured.txt")),
            ..Default::default()
        };
        assert_eq!(
            config.events_file(Some(Path::new("given.txt"))),
            PathBuf::from("given.txt")
        );
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(parse_config("days = 3").is_err());
    }
}
