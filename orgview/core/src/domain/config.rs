// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Store Configuration
//
// Defines the configuration file consumed by the CLI and by
// `StoreContext::from_config`:
// - Backend endpoint, token and request timeout
// - Fetch policy for overlapping entity reads
// - Event bus sizing and event journaling

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_PATH_ENV: &str = "ORGVIEW_CONFIG_PATH";
pub const BASE_URL_ENV: &str = "ORGVIEW_BASE_URL";
pub const API_TOKEN_ENV: &str = "ORGVIEW_API_TOKEN";
pub const FETCH_POLICY_ENV: &str = "ORGVIEW_FETCH_POLICY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// How an entity store applies responses of overlapping fetches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchPolicy {
    /// Responses are applied in arrival order; a slow earlier response can
    /// overwrite a newer one.
    #[default]
    LastArrivalWins,
    /// Responses older than the newest applied one are discarded.
    DiscardStale,
}

impl std::str::FromStr for FetchPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "last_arrival_wins" => Ok(FetchPolicy::LastArrivalWins),
            "discard_stale" => Ok(FetchPolicy::DiscardStale),
            other => Err(ConfigError::Invalid(format!(
                "unknown fetch policy '{}', expected last_arrival_wins|discard_stale",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub store: StoreSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the REST service, e.g. `http://localhost:5000/service`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token sent with every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// Per-request timeout enforced by the HTTP client
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_token: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub fetch_policy: FetchPolicy,

    /// Buffered events per async receiver before it lags
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,

    /// Record every published event in the work log
    #[serde(default)]
    pub journal_events: bool,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            fetch_policy: FetchPolicy::default(),
            event_capacity: default_event_capacity(),
            journal_events: false,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000/service".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_event_capacity() -> usize {
    256
}

impl StoreConfig {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Discover configuration file using precedence order
    /// 1. ORGVIEW_CONFIG_PATH environment variable
    /// 2. ./orgview-config.yaml (working directory)
    /// 3. ~/.orgview/config.yaml (user home)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./orgview-config.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".orgview").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            Self::from_yaml_file(&path)?
        } else if let Some(path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", path);
            Self::from_yaml_file(&path)?
        } else {
            tracing::debug!("No configuration file found in standard locations. Using defaults.");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides on top of the file
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            tracing::info!("Environment override: {}={}", BASE_URL_ENV, url);
            self.backend.base_url = url;
        }

        if let Ok(token) = std::env::var(API_TOKEN_ENV) {
            tracing::info!("Environment override: {} set", API_TOKEN_ENV);
            self.backend.api_token = Some(token);
        }

        if let Ok(val) = std::env::var(FETCH_POLICY_ENV) {
            match val.parse::<FetchPolicy>() {
                Ok(policy) => {
                    tracing::info!("Environment override: {}={:?}", FETCH_POLICY_ENV, policy);
                    self.store.fetch_policy = policy;
                }
                Err(e) => {
                    tracing::warn!("Ignoring {}: {}", FETCH_POLICY_ENV, e);
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.backend.base_url).map_err(|e| {
            ConfigError::Invalid(format!("backend.base_url '{}': {}", self.backend.base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "backend.base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.backend.timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "backend.timeout_seconds must be greater than zero".to_string(),
            ));
        }

        if self.store.event_capacity == 0 {
            return Err(ConfigError::Invalid(
                "store.event_capacity must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
