//! Optional file logging.
//!
//! The terminal belongs to the UI, so `tracing` output only goes to a file and
//! only when a level is configured.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Install the global subscriber.
///
/// Returns the log file path, or `None` when logging is disabled.
pub fn init(config: &Config) -> Result<Option<PathBuf>> {
    let Some(level) = config.log_level.as_deref() else {
        return Ok(None);
    };
    let path = config
        .log_path()
        .context("no log file configured and no cache directory available")?;

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let filter = EnvFilter::try_new(level).with_context(|| format!("invalid log level {level:?}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install logger: {e}"))?;

    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_without_level() {
        assert_eq!(init(&Config::default()).unwrap(), None);
    }

    #[test]
    fn invalid_level_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            log_level: Some("pretty_output=loud".to_string()),
            log_file: Some(dir.path().join("out.log")),
            ..Config::default()
        };
        assert!(init(&config).is_err());
    }
}
