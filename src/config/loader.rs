//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::domain::rules::RuleTables;

use super::{AppConfig, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};

/// Config path from `LISTING_SIM_CONFIG`, else `config.toml`.
pub fn config_path() -> String {
  std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)?;

  info!(
    name = %config.app.name,
    bind_address = %config.server.bind_address,
    data_dir = %config.persistence.data_dir,
    rule_overrides = !config.rules.is_empty(),
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig = toml::from_str(content).context("Failed to parse config.toml")?;
  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Non-empty service name and data directory
/// - A parseable bind address
/// - Rule overrides that produce consistent tables
fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(
    !config.app.name.trim().is_empty(),
    "app.name must not be empty"
  );
  anyhow::ensure!(
    config.server.bind_address.parse::<SocketAddr>().is_ok(),
    "server.bind_address is not a socket address: {}",
    config.server.bind_address
  );
  anyhow::ensure!(
    !config.persistence.data_dir.trim().is_empty(),
    "persistence.data_dir must not be empty"
  );

  RuleTables::with_overrides(&config.rules).context("Invalid [rules] overrides")?;

  Ok(())
}
