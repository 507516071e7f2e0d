//! Typed operations over the TTN v3 HTTP API

use std::sync::{Arc, PoisonError, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::{self, TokenProvider};
use crate::config::{ClientConfig, ConfigOverrides};
use crate::io::HttpClient;
use crate::models::{Application, Device, Gateway, UplinkMessage};
use crate::stream::{self, UplinkSocket};

const DEFAULT_MESSAGE_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy)]
enum Method {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Debug, Deserialize)]
struct ApplicationsResponse {
    #[serde(default)]
    applications: Vec<Application>,
}

#[derive(Debug, Deserialize)]
struct DevicesResponse {
    #[serde(default)]
    end_devices: Vec<Device>,
}

#[derive(Debug, Deserialize)]
struct GatewaysResponse {
    #[serde(default)]
    gateways: Vec<Gateway>,
}

/// Health of the remote service as seen from a bare request to the base URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Health {
    Healthy,
    Unhealthy,
    Error,
}

impl std::fmt::Display for Health {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Health::Healthy => write!(f, "healthy"),
            Health::Unhealthy => write!(f, "unhealthy"),
            Health::Error => write!(f, "error"),
        }
    }
}

/// Timestamped result of a health check
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: Health,
    pub checked_at_epoch_ms: u64,
}

/// Client for the TTN v3 API.
///
/// Every read re-fetches from the remote service; nothing is cached across
/// calls. All data operations take an optional bearer token which, when
/// absent, falls back to the configured API key and then to the injected
/// [`TokenProvider`].
pub struct TtnClient {
    config: RwLock<ClientConfig>,
    token_provider: Arc<dyn TokenProvider>,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for TtnClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtnClient")
            .field("config", &self.config)
            .finish()
    }
}

impl TtnClient {
    pub fn new(
        config: ClientConfig,
        http: Arc<dyn HttpClient>,
        token_provider: Arc<dyn TokenProvider>,
    ) -> Self {
        tracing::debug!("Created TtnClient for {}", config.base_url);
        Self {
            config: RwLock::new(config),
            token_provider,
            http,
        }
    }

    /// Construct from `TTN_*` environment variables with no token provider
    pub fn from_env(http: Arc<dyn HttpClient>) -> Self {
        Self::new(
            ClientConfig::from_env(),
            http,
            Arc::new(crate::auth::NoToken),
        )
    }

    /// A copy of the current configuration
    pub fn config(&self) -> ClientConfig {
        self.config_read().clone()
    }

    /// Merge partial overrides into the live configuration
    pub fn update_config(&self, overrides: ConfigOverrides) {
        self.config
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .merge(overrides);
    }

    fn config_read(&self) -> std::sync::RwLockReadGuard<'_, ClientConfig> {
        self.config.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolution order: explicit argument, configured API key, token provider
    fn resolve_token(&self, token: Option<&str>) -> Option<String> {
        token
            .map(str::to_string)
            .or_else(|| self.config_read().api_key.clone())
            .or_else(|| self.token_provider.token())
    }

    fn headers(&self, token: Option<&str>) -> Vec<(String, String)> {
        let mut headers = vec![(
            "Content-Type".to_string(),
            "application/json".to_string(),
        )];
        if let Some(token) = self.resolve_token(token) {
            headers.push(("Authorization".to_string(), auth::bearer(&token)));
        }
        headers
    }

    /// Low-level request primitive.
    ///
    /// Non-success statuses become [`crate::TtnError::Api`] carrying the body
    /// text verbatim; success bodies are parsed as JSON (empty body -> null).
    /// No retries are performed here.
    async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> crate::Result<Value> {
        let headers = self.headers(token);
        let body_text = body.map(Value::to_string).unwrap_or_default();

        let response = match method {
            Method::Get => self.http.get(url, &headers).await?,
            Method::Post => self.http.post(url, &headers, body_text).await?,
            Method::Put => self.http.put(url, &headers, body_text).await?,
            Method::Delete => self.http.delete(url, &headers).await?,
        };

        if !(200..300).contains(&response.status) {
            return Err(crate::TtnError::Api {
                status: response.status,
                body: response.body,
            });
        }

        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    /// List all applications visible to the caller
    pub async fn applications(&self, token: Option<&str>) -> crate::Result<Vec<Application>> {
        let url = self.config_read().application_server.clone();
        let value = self.request(Method::Get, &url, None, token).await?;
        let parsed: ApplicationsResponse = serde_json::from_value(value)?;
        Ok(parsed.applications)
    }

    pub async fn application(
        &self,
        application_id: &str,
        token: Option<&str>,
    ) -> crate::Result<Application> {
        let url = format!("{}/{}", self.config_read().application_server, application_id);
        let value = self.request(Method::Get, &url, None, token).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// List devices of an application.
    ///
    /// Falls back to the configured default application id; fails with a
    /// configuration error before any request when neither is available.
    pub async fn devices(
        &self,
        application_id: Option<&str>,
        token: Option<&str>,
    ) -> crate::Result<Vec<Device>> {
        let (application_server, default_id) = {
            let config = self.config_read();
            (config.application_server.clone(), config.application_id.clone())
        };
        let application_id = application_id
            .map(str::to_string)
            .or(default_id)
            .ok_or_else(|| {
                crate::TtnError::Config(
                    "No application id given and none configured".to_string(),
                )
            })?;

        let url = format!("{}/{}/devices", application_server, application_id);
        let value = self.request(Method::Get, &url, None, token).await?;
        let parsed: DevicesResponse = serde_json::from_value(value)?;
        Ok(parsed.end_devices)
    }

    pub async fn device(
        &self,
        application_id: &str,
        device_id: &str,
        token: Option<&str>,
    ) -> crate::Result<Device> {
        let url = format!(
            "{}/{}/devices/{}",
            self.config_read().application_server,
            application_id,
            device_id
        );
        let value = self.request(Method::Get, &url, None, token).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Register a device; `device` is the partial end-device record to create
    pub async fn create_device(
        &self,
        application_id: &str,
        device: &Value,
        token: Option<&str>,
    ) -> crate::Result<Device> {
        let url = format!(
            "{}/{}/devices",
            self.config_read().application_server,
            application_id
        );
        let body = serde_json::json!({ "end_device": device });
        let value = self.request(Method::Post, &url, Some(&body), token).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn update_device(
        &self,
        application_id: &str,
        device_id: &str,
        device: &Value,
        token: Option<&str>,
    ) -> crate::Result<Device> {
        let url = format!(
            "{}/{}/devices/{}",
            self.config_read().application_server,
            application_id,
            device_id
        );
        let body = serde_json::json!({ "end_device": device });
        let value = self.request(Method::Put, &url, Some(&body), token).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn delete_device(
        &self,
        application_id: &str,
        device_id: &str,
        token: Option<&str>,
    ) -> crate::Result<()> {
        let url = format!(
            "{}/{}/devices/{}",
            self.config_read().application_server,
            application_id,
            device_id
        );
        self.request(Method::Delete, &url, None, token).await?;
        Ok(())
    }

    /// List all gateways visible to the caller
    pub async fn gateways(&self, token: Option<&str>) -> crate::Result<Vec<Gateway>> {
        let url = self.config_read().network_server.clone();
        let value = self.request(Method::Get, &url, None, token).await?;
        let parsed: GatewaysResponse = serde_json::from_value(value)?;
        Ok(parsed.gateways)
    }

    pub async fn gateway(&self, gateway_id: &str, token: Option<&str>) -> crate::Result<Gateway> {
        let url = format!("{}/{}", self.config_read().network_server, gateway_id);
        let value = self.request(Method::Get, &url, None, token).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Connection statistics for a gateway, returned as the service sends them
    pub async fn gateway_connection_stats(
        &self,
        gateway_id: &str,
        token: Option<&str>,
    ) -> crate::Result<Value> {
        let url = format!(
            "{}/{}/connection_stats",
            self.config_read().network_server,
            gateway_id
        );
        self.request(Method::Get, &url, None, token).await
    }

    /// Stored uplink messages for an application, newest first
    pub async fn uplink_messages(
        &self,
        application_id: &str,
        limit: Option<usize>,
        token: Option<&str>,
    ) -> crate::Result<Vec<UplinkMessage>> {
        let url = format!(
            "{}/{}/packages/storage/uplink_message?limit={}&order=-received_at",
            self.config_read().application_server,
            application_id,
            limit.unwrap_or(DEFAULT_MESSAGE_LIMIT)
        );
        let value = self.request(Method::Get, &url, None, token).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Stored uplink messages for a single device, newest first
    pub async fn device_messages(
        &self,
        application_id: &str,
        device_id: &str,
        limit: Option<usize>,
        token: Option<&str>,
    ) -> crate::Result<Vec<UplinkMessage>> {
        let url = format!(
            "{}/{}/devices/{}/packages/storage/uplink_message?limit={}&order=-received_at",
            self.config_read().application_server,
            application_id,
            device_id,
            limit.unwrap_or(DEFAULT_MESSAGE_LIMIT)
        );
        let value = self.request(Method::Get, &url, None, token).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Information about the authenticated caller
    pub async fn auth_info(&self, token: &str) -> crate::Result<Value> {
        let url = format!("{}/auth_info", self.config_read().base_url);
        self.request(Method::Get, &url, None, Some(token)).await
    }

    pub async fn validate_user(&self, user_id: &str, token: &str) -> crate::Result<Value> {
        let url = format!("{}/{}", self.config_read().identity_server, user_id);
        self.request(Method::Get, &url, None, Some(token)).await
    }

    /// Probe the base URL with a bare request. Never fails; the outcome is
    /// reported in the returned status.
    pub async fn health_check(&self) -> HealthReport {
        let url = self.config_read().base_url.clone();
        let status = match self.http.get(&url, &[]).await {
            Ok(response) if (200..300).contains(&response.status) => Health::Healthy,
            Ok(response) => {
                tracing::debug!("Health check got status {}", response.status);
                Health::Unhealthy
            }
            Err(e) => {
                tracing::debug!("Health check failed: {}", e);
                Health::Error
            }
        };
        HealthReport {
            status,
            checked_at_epoch_ms: current_epoch_ms(),
        }
    }

    /// Open the live uplink stream for an application and send the
    /// authentication frame. The caller owns all subsequent message handling.
    pub async fn uplink_stream(
        &self,
        application_id: &str,
        api_key: &str,
    ) -> crate::Result<UplinkSocket> {
        let base_url = self.config_read().base_url.clone();
        stream::connect_uplink_stream(&base_url, application_id, api_key).await
    }
}

fn current_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
