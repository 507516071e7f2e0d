//! Client configuration

use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://nam1.cloud.thethings.network/api/v3";
const DEFAULT_IDENTITY_SERVER: &str = "https://nam1.cloud.thethings.network/api/v3/users";
const DEFAULT_APPLICATION_SERVER: &str = "https://nam1.cloud.thethings.network/api/v3/applications";
const DEFAULT_NETWORK_SERVER: &str = "https://nam1.cloud.thethings.network/api/v3/gateways";

/// Base URLs and default credentials for the TTN v3 API.
///
/// URLs are taken as given; no well-formedness validation is performed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    pub identity_server: String,
    pub application_server: String,
    pub network_server: String,
    #[serde(default)]
    pub application_id: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            identity_server: DEFAULT_IDENTITY_SERVER.to_string(),
            application_server: DEFAULT_APPLICATION_SERVER.to_string(),
            network_server: DEFAULT_NETWORK_SERVER.to_string(),
            application_id: None,
            api_key: None,
        }
    }
}

impl ClientConfig {
    /// Build a configuration from `TTN_*` environment variables, falling back to
    /// the public nam1 cluster URLs.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env_or("TTN_API_BASE_URL", defaults.base_url),
            identity_server: env_or("TTN_IDENTITY_SERVER", defaults.identity_server),
            application_server: env_or("TTN_APPLICATION_SERVER", defaults.application_server),
            network_server: env_or("TTN_NETWORK_SERVER", defaults.network_server),
            application_id: std::env::var("TTN_APPLICATION_ID").ok(),
            api_key: std::env::var("TTN_API_KEY").ok(),
        }
    }

    /// Merge `Some` fields of the overrides into this configuration
    pub fn merge(&mut self, overrides: ConfigOverrides) {
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        if let Some(identity_server) = overrides.identity_server {
            self.identity_server = identity_server;
        }
        if let Some(application_server) = overrides.application_server {
            self.application_server = application_server;
        }
        if let Some(network_server) = overrides.network_server {
            self.network_server = network_server;
        }
        if let Some(application_id) = overrides.application_id {
            self.application_id = Some(application_id);
        }
        if let Some(api_key) = overrides.api_key {
            self.api_key = Some(api_key);
        }
    }
}

/// Partial configuration for merging into a live [`ClientConfig`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigOverrides {
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

fn env_or(name: &str, default: String) -> String {
    std::env::var(name).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_nam1_cluster() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://nam1.cloud.thethings.network/api/v3");
        assert!(config.application_server.ends_with("/applications"));
        assert!(config.network_server.ends_with("/gateways"));
        assert!(config.application_id.is_none());
        assert!(config.api_key.is_none());
    }

    #[test]
    fn merge_applies_only_some_fields() {
        let mut config = ClientConfig::default();
        config.merge(ConfigOverrides {
            base_url: Some("https://eu1.cloud.thethings.network/api/v3".to_string()),
            application_id: Some("farm-sensors".to_string()),
            ..Default::default()
        });

        assert_eq!(config.base_url, "https://eu1.cloud.thethings.network/api/v3");
        assert_eq!(config.application_id.as_deref(), Some("farm-sensors"));
        // untouched fields keep their previous values
        assert_eq!(
            config.identity_server,
            "https://nam1.cloud.thethings.network/api/v3/users"
        );
        assert!(config.api_key.is_none());
    }

    #[test]
    fn merge_empty_overrides_is_identity() {
        let mut config = ClientConfig::default();
        let before = config.clone();
        config.merge(ConfigOverrides::default());
        assert_eq!(config.base_url, before.base_url);
        assert_eq!(config.application_id, before.application_id);
    }

    #[test]
    fn from_env_reads_variables() {
        std::env::set_var("TTN_API_BASE_URL", "https://test.example/api/v3");
        std::env::set_var("TTN_APPLICATION_ID", "test-app");

        let config = ClientConfig::from_env();
        assert_eq!(config.base_url, "https://test.example/api/v3");
        assert_eq!(config.application_id.as_deref(), Some("test-app"));

        std::env::remove_var("TTN_API_BASE_URL");
        std::env::remove_var("TTN_APPLICATION_ID");
    }

    #[test]
    fn deserializes_with_optional_fields_absent() {
        let json = r#"{
            "base_url": "https://eu1.cloud.thethings.network/api/v3",
            "identity_server": "https://eu1.cloud.thethings.network/api/v3/users",
            "application_server": "https://eu1.cloud.thethings.network/api/v3/applications",
            "network_server": "https://eu1.cloud.thethings.network/api/v3/gateways"
        }"#;
        let config: ClientConfig = serde_json::from_str(json).unwrap();
        assert!(config.application_id.is_none());
        assert!(config.api_key.is_none());
    }
}
