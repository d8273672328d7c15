//! Service configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! TOML file, then `ANDON_*` environment variables. Nested keys use a
//! double underscore, e.g. `ANDON_API__BASE_URL` or
//! `ANDON_POLLER__TELEMETRY_INTERVAL_MS`.

use alerting::AlertConfig;
use andon_protocol::ClientConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use line_poller::PollerConfig;
use serde::Deserialize;
use std::path::Path;

const ENV_PREFIX: &str = "ANDON";

/// All service settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ClientConfig,
    pub poller: PollerConfig,
    pub alerting: AlertConfig,
    pub server: ServerConfig,
    pub dashboard: DashboardConfig,
}

/// Local HTTP listener
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Presentation thresholds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Balance strictly above this is shown as healthy
    pub balance_healthy_threshold: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            balance_healthy_threshold: 500.0,
        }
    }
}

impl Settings {
    /// Load from an optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        Self::from_builder(builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        ))
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}
