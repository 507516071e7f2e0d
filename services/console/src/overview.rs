//! Aggregated network overview for the dashboard

use serde::Serialize;
use ttn_client::models::{Device, UplinkMessage};
use ttn_client::{TtnClient, TtnError};

use crate::metrics::MetricsSource;

/// Top-level counts shown on the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct NetworkOverview {
    pub total_applications: usize,
    pub total_devices: usize,
    pub total_gateways: usize,
    pub online_gateways: usize,
    pub online_devices: usize,
    pub messages_this_month: u64,
    pub system_health_percent: u8,
}

/// Fetch the overview.
///
/// A total failure listing applications propagates; a failing gateway list or
/// a failing per-application device list degrades to what did resolve.
pub async fn fetch_overview(
    client: &TtnClient,
    metrics: &dyn MetricsSource,
) -> crate::Result<NetworkOverview> {
    let applications = client.applications(None).await?;

    let gateways = match client.gateways(None).await {
        Ok(gateways) => gateways,
        Err(e) => {
            tracing::warn!("Failed to fetch gateways: {}", e);
            Vec::new()
        }
    };

    let mut total_devices = 0usize;
    for application in &applications {
        match client
            .devices(Some(&application.ids.application_id), None)
            .await
        {
            Ok(devices) => total_devices += devices.len(),
            Err(e) => tracing::warn!(
                "Failed to fetch devices for '{}': {}",
                application.ids.application_id,
                e
            ),
        }
    }

    let sample = metrics.sample();
    Ok(NetworkOverview {
        total_applications: applications.len(),
        total_devices,
        total_gateways: gateways.len(),
        online_gateways: (gateways.len() as f64 * metrics.online_gateway_ratio()).floor() as usize,
        online_devices: (total_devices as f64 * metrics.online_device_ratio()).floor() as usize,
        messages_this_month: sample.messages_this_month,
        system_health_percent: sample.system_health_percent,
    })
}

/// All devices across every visible application; applications whose device
/// list fails are skipped with a warning
pub async fn fetch_all_devices(client: &TtnClient) -> crate::Result<Vec<Device>> {
    let applications = client.applications(None).await?;

    let mut all_devices = Vec::new();
    for application in &applications {
        match client
            .devices(Some(&application.ids.application_id), None)
            .await
        {
            Ok(mut devices) => all_devices.append(&mut devices),
            Err(e) => tracing::warn!(
                "Failed to fetch devices for '{}': {}",
                application.ids.application_id,
                e
            ),
        }
    }
    Ok(all_devices)
}

/// Recent stored uplinks for the configured default application
pub async fn fetch_recent_messages(
    client: &TtnClient,
    limit: usize,
) -> crate::Result<Vec<UplinkMessage>> {
    let application_id = client.config().application_id.ok_or_else(|| {
        TtnError::Config("No application id configured for message fetch".to_string())
    })?;
    Ok(client
        .uplink_messages(&application_id, Some(limit), None)
        .await?)
}
