//! Command implementations.

mod run;
mod validate;

pub use run::run_relay;
pub use validate::run_validate;

use anyhow::{Context, Result};
use std::path::PathBuf;

use config_loader::ConfigLoader;
use contracts::RelayConfig;

use crate::cli::ConfigOverrides;

/// Assemble the final configuration: file first, then flag/env overrides,
/// then validation of the merged value.
pub(crate) fn build_config(
    config_path: &Option<PathBuf>,
    overrides: &ConfigOverrides,
) -> Result<RelayConfig> {
    let mut cfg = match config_path {
        Some(path) => ConfigLoader::parse_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => RelayConfig::default(),
    };

    if let Some(topic) = &overrides.topic {
        cfg.topic = topic.clone();
    }
    if let Some(addr) = &overrides.nsqd_tcp_address {
        cfg.nsqd_addr = addr.clone();
    }
    if let Some(regex) = &overrides.regex_filter {
        cfg.regex = Some(regex.clone());
    }
    if let Some(contains) = &overrides.contains_filter {
        cfg.contains = Some(contains.clone());
    }
    if overrides.print_log {
        cfg.stderr_mirror = true;
    }
    if overrides.echo {
        cfg.debug_echo = true;
    }

    config_loader::validate(&cfg).context("Configuration validation failed")?;
    Ok(cfg)
}
