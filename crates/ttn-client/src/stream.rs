//! Live uplink stream over websocket
//!
//! Opens a socket against the application's `/up` endpoint and sends the one
//! authentication frame the service expects; everything after that belongs to
//! the caller.

use futures_util::SinkExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// The connected uplink socket handed back to the caller
pub type UplinkSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Derive the websocket endpoint for an application's uplink stream from the
/// HTTP base URL (same host, secure-websocket scheme)
pub fn uplink_stream_url(base_url: &str, application_id: &str) -> String {
    let ws_base = base_url.replacen("https", "wss", 1);
    format!("{}/applications/{}/up", ws_base, application_id)
}

/// Authentication frame sent once after the socket opens
pub fn auth_frame(application_id: &str, api_key: &str) -> serde_json::Value {
    serde_json::json!({
        "identifiers": [{ "application_ids": { "application_id": application_id } }],
        "api_key": api_key,
    })
}

/// Connect the uplink stream and authenticate
pub async fn connect_uplink_stream(
    base_url: &str,
    application_id: &str,
    api_key: &str,
) -> crate::Result<UplinkSocket> {
    let url = uplink_stream_url(base_url, application_id);
    tracing::debug!("Connecting uplink stream at {}", url);

    let (mut socket, _) = connect_async(&url)
        .await
        .map_err(|e| crate::TtnError::Stream(format!("Connecting {} failed: {}", url, e)))?;

    let frame = auth_frame(application_id, api_key).to_string();
    socket
        .send(Message::Text(frame.into()))
        .await
        .map_err(|e| crate::TtnError::Stream(format!("Sending auth frame failed: {}", e)))?;

    tracing::debug!("Uplink stream authenticated for '{}'", application_id);
    Ok(socket)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_url_swaps_scheme_and_appends_path() {
        let url = uplink_stream_url(
            "https://nam1.cloud.thethings.network/api/v3",
            "farm-sensors",
        );
        assert_eq!(
            url,
            "wss://nam1.cloud.thethings.network/api/v3/applications/farm-sensors/up"
        );
    }

    #[test]
    fn auth_frame_carries_identifiers_and_key() {
        let frame = auth_frame("farm-sensors", "NNSXS.KEY");
        assert_eq!(
            frame["identifiers"][0]["application_ids"]["application_id"],
            "farm-sensors"
        );
        assert_eq!(frame["api_key"], "NNSXS.KEY");
    }

    #[tokio::test]
    async fn connect_to_unreachable_host_returns_stream_error() {
        let err = connect_uplink_stream("https://127.0.0.1:1", "farm-sensors", "key")
            .await
            .unwrap_err();
        match err {
            crate::TtnError::Stream(message) => {
                assert!(message.contains("failed"), "{message}");
            }
            other => panic!("expected TtnError::Stream, got {other:?}"),
        }
    }
}
