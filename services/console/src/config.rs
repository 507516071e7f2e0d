//! Configuration types for the console service

use serde::{Deserialize, Serialize};
use std::path::Path;

use ttn_client::ConfigOverrides;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    #[serde(default = "default_health_interval_ms")]
    pub health_interval_ms: u64,
    #[serde(default = "default_message_limit")]
    pub message_limit: usize,
    #[serde(default = "default_auto_refresh")]
    pub auto_refresh: bool,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub ttn: TtnConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_interval_ms(),
            health_interval_ms: default_health_interval_ms(),
            message_limit: default_message_limit(),
            auto_refresh: default_auto_refresh(),
            timezone: default_timezone(),
            ttn: TtnConfig::default(),
            dashboard: DashboardConfig::default(),
        }
    }
}

/// Overrides applied on top of the client's built-in server addresses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TtnConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub identity_server: Option<String>,
    #[serde(default)]
    pub application_server: Option<String>,
    #[serde(default)]
    pub network_server: Option<String>,
    #[serde(default)]
    pub application_id: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl TtnConfig {
    pub fn into_overrides(self) -> ConfigOverrides {
        ConfigOverrides {
            base_url: self.base_url,
            identity_server: self.identity_server,
            application_server: self.application_server,
            network_server: self.network_server,
            application_id: self.application_id,
            api_key: self.api_key,
        }
    }
}

/// Dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_dashboard_port")]
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_dashboard_port(),
        }
    }
}

fn default_refresh_interval_ms() -> u64 {
    30_000
}

fn default_health_interval_ms() -> u64 {
    60_000
}

fn default_message_limit() -> usize {
    100
}

fn default_auto_refresh() -> bool {
    true
}

fn default_timezone() -> String {
    "America/New_York".to_string()
}

fn default_true() -> bool {
    true
}

fn default_dashboard_port() -> u16 {
    8080
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::ConsoleError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}

impl Config {
    /// Apply environment overrides on top of file values
    pub fn apply_env(&mut self) {
        if let Ok(value) = std::env::var("CONSOLE_AUTO_REFRESH_INTERVAL_MS") {
            match value.parse() {
                Ok(ms) => self.refresh_interval_ms = ms,
                Err(e) => tracing::warn!(
                    "Ignoring invalid CONSOLE_AUTO_REFRESH_INTERVAL_MS '{}': {}",
                    value,
                    e
                ),
            }
        }
        if let Ok(value) = std::env::var("CONSOLE_TIMEZONE") {
            self.timezone = value;
        }
    }
}
