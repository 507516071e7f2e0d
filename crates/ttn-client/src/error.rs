//! Error types for the TTN client

/// Errors that can occur in TTN client operations
#[derive(Debug, thiserror::Error)]
pub enum TtnError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TTN API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Stream error: {0}")]
    Stream(String),
}

/// Result type alias for TTN client operations
pub type Result<T> = std::result::Result<T, TtnError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_embeds_status_and_body() {
        let err = TtnError::Api {
            status: 404,
            body: "application not found".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("404"));
        assert!(message.contains("application not found"));
    }

    #[test]
    fn json_error_converts() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: TtnError = parse_err.into();
        assert!(err.to_string().contains("JSON parse error"));
    }
}
