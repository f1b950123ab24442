//! Configuration loader and validator for the artfund site core.
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::catalog::{Catalog, CatalogError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub store: Store,
    pub submission: Submission,
    pub donate: Donate,
}

/// Art store settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Store {
    /// YAML artwork list replacing the built-in sample.
    #[serde(default)]
    pub catalog: Option<String>,
}

/// Where finished applications go.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Submission {
    /// Unset means submissions are simulated.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub token: String,
    pub timeout_ms: u64,
    pub simulated_delay_ms: u64,
}

/// Third-party donation widget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Donate {
    pub widget_base_url: String,
    pub widget_id: String,
}

impl Submission {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Config {
    /// The configured catalog, or the built-in sample when none is set.
    pub fn catalog(&self) -> Result<Catalog, CatalogError> {
        match self.store.catalog.as_deref() {
            Some(path) => Catalog::from_yaml_file(Path::new(path)),
            None => Ok(Catalog::sample()),
        }
    }
}

/// Load configuration from a YAML file and validate it.
/// - If `path` is None, uses `config.yaml` in the current working directory.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let content = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    validate(&cfg)?;
    Ok(cfg)
}

fn is_http_url(value: &str) -> bool {
    Url::parse(value)
        .map(|u| u.scheme() == "http" || u.scheme() == "https")
        .unwrap_or(false)
}

/// Validate a configuration instance.
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(catalog) = &cfg.store.catalog {
        if catalog.trim().is_empty() {
            return Err(ConfigError::Invalid("store.catalog must be non-empty when set"));
        }
    }

    if let Some(endpoint) = &cfg.submission.endpoint {
        if !is_http_url(endpoint) {
            return Err(ConfigError::Invalid("submission.endpoint must be an http(s) URL"));
        }
    }
    if cfg.submission.timeout_ms == 0 {
        return Err(ConfigError::Invalid("submission.timeout_ms must be > 0"));
    }
    // simulated_delay_ms may be 0

    if !is_http_url(&cfg.donate.widget_base_url) {
        return Err(ConfigError::Invalid("donate.widget_base_url must be an http(s) URL"));
    }
    if cfg.donate.widget_id.trim().is_empty() {
        return Err(ConfigError::Invalid("donate.widget_id must be non-empty"));
    }

    Ok(())
}

/// Returns the canonical example YAML content.
pub fn example() -> &'static str {
    r#"store:
  # Path to a YAML artwork list; null keeps the built-in sample.
  catalog: null

submission:
  endpoint: "https://apply.example.org/v1/applications"
  token: "YOUR_SUBMISSION_TOKEN"
  timeout_ms: 15000
  simulated_delay_ms: 2000

donate:
  widget_base_url: "https://flipcause.com/widget/widget_loader/"
  widget_id: "YOURWIDGETID"
"#
}
