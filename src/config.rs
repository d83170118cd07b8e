use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Capacity of the parser and controller queues
pub const DEFAULT_CHANNEL_BUFFER: usize = 100;

/// Longest accepted input line (1 MiB)
pub const DEFAULT_MAX_LINE_BYTES: usize = 1024 * 1024;

/// Text width of the container list
pub const DEFAULT_SIDE_PANEL_WIDTH: u16 = 25;

const APP_DIR: &str = "pretty-output";

/// Configuration for pretty-output
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Capacity of the bounded queues between parser, ingest and UI
    pub channel_capacity: usize,
    /// Lines longer than this end input consumption
    pub max_line_bytes: usize,
    /// Width of the container list text area
    pub side_panel_width: u16,
    /// Theme name, see [`crate::theme::Theme::by_name`]
    pub theme: String,
    /// Leave the UI as soon as the input stream ends
    pub exit_on_eof: bool,
    /// Interrupt the process group on exit so upstream producers stop
    pub signal_group_on_exit: bool,
    /// `EnvFilter` directive; logging is off when unset
    pub log_level: Option<String>,
    /// Log file location, defaults to the user cache directory
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_BUFFER,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
            side_panel_width: DEFAULT_SIDE_PANEL_WIDTH,
            theme: "default".to_string(),
            exit_on_eof: false,
            signal_group_on_exit: true,
            log_level: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Defaults, then the user config file, then environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// `<config dir>/pretty-output/config.toml`
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Read a TOML config file; a missing file yields the defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };

        let mut config: Self =
            toml::from_str(&raw).with_context(|| format!("invalid config file {}", path.display()))?;
        config.normalize();
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `PRETTY_OUTPUT_*` overrides from `lookup`; unparsable values are ignored
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(theme) = lookup("PRETTY_OUTPUT_THEME") {
            self.theme = theme;
        }
        if let Some(n) = lookup("PRETTY_OUTPUT_CHANNEL_CAPACITY").and_then(|s| s.parse().ok()) {
            self.channel_capacity = n;
        }
        if let Some(n) = lookup("PRETTY_OUTPUT_MAX_LINE_BYTES").and_then(|s| s.parse().ok()) {
            self.max_line_bytes = n;
        }
        if let Some(level) = lookup("PRETTY_OUTPUT_LOG").filter(|s| !s.is_empty()) {
            self.log_level = Some(level);
        }
        self.normalize();
    }

    fn normalize(&mut self) {
        // tokio rejects zero-capacity channels
        self.channel_capacity = self.channel_capacity.max(1);
        self.max_line_bytes = self.max_line_bytes.max(1);
    }

    /// Where log output goes when logging is enabled
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| dirs::cache_dir().map(|dir| dir.join(APP_DIR).join("pretty-output.log")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.channel_capacity, DEFAULT_CHANNEL_BUFFER);
        assert_eq!(config.max_line_bytes, DEFAULT_MAX_LINE_BYTES);
        assert!(config.signal_group_on_exit);
        assert!(!config.exit_on_eof);
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "theme = \"dracula\"\nchannel_capacity = 0\nexit_on_eof = true").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.theme, "dracula");
        assert_eq!(config.channel_capacity, 1);
        assert!(config.exit_on_eof);
        assert_eq!(config.side_panel_width, DEFAULT_SIDE_PANEL_WIDTH);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "channel_capacity = \"lots\"").unwrap();
        assert!(Config::from_file(file.path()).is_err());
    }

    #[test]
    fn environment_overrides_apply_and_bad_numbers_are_ignored() {
        let env: HashMap<&str, &str> = [
            ("PRETTY_OUTPUT_THEME", "mono"),
            ("PRETTY_OUTPUT_CHANNEL_CAPACITY", "not-a-number"),
            ("PRETTY_OUTPUT_MAX_LINE_BYTES", "4096"),
            ("PRETTY_OUTPUT_LOG", "debug"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.theme, "mono");
        assert_eq!(config.channel_capacity, DEFAULT_CHANNEL_BUFFER);
        assert_eq!(config.max_line_bytes, 4096);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }
}
