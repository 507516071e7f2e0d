//! Entity types returned by the TTN v3 API
//!
//! These mirror the remote service's JSON shapes; the client passes them
//! through without local caching or mutation. Timestamps stay as the RFC 3339
//! strings the service sends.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationIds {
    pub application_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub ids: ApplicationIds,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceIds {
    pub device_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_eui: Option<String>,
    pub application_ids: ApplicationIds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub ids: DeviceIds,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<DeviceLocations>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceLocations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Location>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayIds {
    pub gateway_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eui: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gateway {
    pub ids: GatewayIds,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub antenna_location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_public: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_public: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndDeviceIds {
    pub device_id: String,
    pub application_ids: ApplicationIds,
}

/// Stored uplink message envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UplinkMessage {
    pub end_device_ids: EndDeviceIds,
    #[serde(default)]
    pub correlation_ids: Vec<String>,
    pub received_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uplink_message: Option<UplinkPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UplinkPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_key_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub f_port: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frm_payload: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decoded_payload: Option<Value>,
    #[serde(default)]
    pub rx_metadata: Vec<RxMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<UplinkSettings>,
}

/// Per-gateway reception metadata for one uplink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RxMetadata {
    pub gateway_ids: GatewayIds,
    pub rssi: f64,
    pub snr: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UplinkSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_rate: Option<DataRate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataRate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lora: Option<LoraDataRate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoraDataRate {
    pub bandwidth: u64,
    pub spreading_factor: u32,
}
