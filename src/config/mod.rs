//! Configuration Module - TOML-based Service Configuration
//!
//! Loads and validates configuration from `config.toml`. The path can be
//! overridden with the `LISTING_SIM_CONFIG` environment variable. Fee
//! rates and shipping tables live in the rule tables; `[rules]` only
//! carries overrides on top of the built-in catalog.

pub mod loader;

use serde::Deserialize;

use crate::domain::rules::RuleOverrides;

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "LISTING_SIM_CONFIG";

/// Config file used when `LISTING_SIM_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Top-level service configuration.
///
/// Loaded from `config.toml` at startup. All fields are validated
/// before the server binds.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Service identity and logging.
  pub app: AppSection,
  /// HTTP server settings.
  #[serde(default)]
  pub server: ServerConfig,
  /// Listing snapshot location.
  #[serde(default)]
  pub persistence: PersistenceConfig,
  /// Rule table overrides applied over the built-in catalog.
  #[serde(default)]
  pub rules: RuleOverrides,
}

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
  /// Human-readable service name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  /// Socket address the API listens on.
  #[serde(default = "default_bind_address")]
  pub bind_address: String,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      bind_address: default_bind_address(),
    }
  }
}

/// Persistence configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PersistenceConfig {
  /// Directory holding `listings.json`.
  #[serde(default = "default_data_dir")]
  pub data_dir: String,
}

impl Default for PersistenceConfig {
  fn default() -> Self {
    Self {
      data_dir: default_data_dir(),
    }
  }
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_bind_address() -> String {
  "0.0.0.0:8080".to_string()
}

fn default_data_dir() -> String {
  "data".to_string()
}
