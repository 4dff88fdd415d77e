//! Loading client configuration (backend URL, timeouts, notification lifetime) from TOML.
//!
//! Precedence: defaults < TOML file at RETOS_CONFIG_PATH < RETOS_API_URL < `--api-url`.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info};

use crate::error::{ClientError, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
  /// Base URL of the retos backend, without trailing slash.
  pub api_url: String,
  pub timeout_secs: u64,
  /// How long a notification stays visible.
  pub notification_ttl_ms: u64,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      api_url: DEFAULT_API_URL.into(),
      timeout_secs: 20,
      notification_ttl_ms: 3000,
    }
  }
}

impl ClientConfig {
  pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }

  pub fn notification_ttl(&self) -> Duration { Duration::from_millis(self.notification_ttl_ms) }

  /// Replace the base URL, dropping any trailing slash so paths can be appended.
  pub fn with_api_url(mut self, url: &str) -> Self {
    self.api_url = url.trim().trim_end_matches('/').to_string();
    self
  }

  pub fn from_toml_str(s: &str) -> Result<Self> {
    let cfg: ClientConfig = toml::from_str(s).map_err(|e| ClientError::Config(e.to_string()))?;
    let url = cfg.api_url.clone();
    Ok(cfg.with_api_url(&url))
  }

  pub fn from_file(path: &Path) -> Result<Self> {
    let s = std::fs::read_to_string(path)
      .map_err(|e| ClientError::Config(format!("{}: {}", path.display(), e)))?;
    Self::from_toml_str(&s)
  }
}

/// Load configuration from RETOS_CONFIG_PATH and RETOS_API_URL.
/// A broken config file is logged and the defaults are used instead.
pub fn load_config_from_env() -> ClientConfig {
  let mut cfg = match std::env::var("RETOS_CONFIG_PATH") {
    Ok(path) => match ClientConfig::from_file(Path::new(&path)) {
      Ok(cfg) => {
        info!(target: "retos_client", %path, "Loaded client config (TOML)");
        cfg
      }
      Err(e) => {
        error!(target: "retos_client", %path, error = %e, "Failed to load TOML config; using defaults");
        ClientConfig::default()
      }
    },
    Err(_) => ClientConfig::default(),
  };

  if let Ok(url) = std::env::var("RETOS_API_URL") {
    if !url.trim().is_empty() {
      cfg = cfg.with_api_url(&url);
    }
  }
  cfg
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn partial_toml_keeps_defaults() {
    let cfg = ClientConfig::from_toml_str("api_url = \"http://retos.local:8000/\"").unwrap();
    assert_eq!(cfg.api_url, "http://retos.local:8000");
    assert_eq!(cfg.timeout_secs, 20);
    assert_eq!(cfg.notification_ttl(), Duration::from_millis(3000));
  }

  #[test]
  fn invalid_toml_is_a_config_error() {
    let err = ClientConfig::from_toml_str("timeout_secs = \"soon\"").unwrap_err();
    assert!(matches!(err, ClientError::Config(_)));
  }

  #[test]
  fn missing_file_is_a_config_error() {
    let err = ClientConfig::from_file(Path::new("/definitely/not/here.toml")).unwrap_err();
    assert!(matches!(err, ClientError::Config(_)));
  }
}
