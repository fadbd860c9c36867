//! Tracing setup. The terminal belongs to the UI, so events go to a log file.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use dirs_next::data_dir;
use tracing_subscriber::filter::LevelFilter;

use crate::infra::config::Logging;

/// Default log location: `<data dir>/tabpad/tabpad.log`, or the working directory when the
/// platform has no data directory.
pub fn default_log_path() -> PathBuf {
    data_dir()
        .map(|dir| dir.join("tabpad"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tabpad.log")
}

/// Parse a level name such as `debug`; `off` disables logging.
pub fn parse_level(level: &str) -> Result<LevelFilter> {
    LevelFilter::from_str(level.trim())
        .with_context(|| format!("invalid log level '{level}'"))
}

/// Install the global subscriber. `override_path` wins over the configured file.
pub fn init(settings: &Logging, override_path: Option<&Path>) -> Result<()> {
    let level = parse_level(&settings.level)?;
    let path = override_path
        .map(Path::to_path_buf)
        .or_else(|| settings.file.clone())
        .unwrap_or_else(default_log_path);

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_levels() {
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::DEBUG);
        assert_eq!(parse_level(" WARN ").unwrap(), LevelFilter::WARN);
        assert_eq!(parse_level("off").unwrap(), LevelFilter::OFF);
        assert!(parse_level("chatty").is_err());
    }

    #[test]
    fn default_path_ends_with_log_file() {
        assert!(default_log_path().ends_with("tabpad.log"));
    }
}
