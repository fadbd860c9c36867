pub mod app;
pub mod cli;
pub mod domain;
pub mod infra;
pub mod ui;

use std::path::Path;

use anyhow::Result;

use crate::infra::config::Config;

/// Install logging for the configured level and destination.
pub fn init(config: &Config, log_file: Option<&Path>) -> Result<()> {
    infra::logging::init(&config.logging, log_file)
}
