//! Credential sources for request authorization

/// A capability that yields the current bearer token, if any.
///
/// Injected at client construction so callers decide where credentials live
/// (a login session, a key file, a secret store) instead of the client reading
/// ambient state.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// Provider that never yields a token
#[derive(Debug, Default)]
pub struct NoToken;

impl TokenProvider for NoToken {
    fn token(&self) -> Option<String> {
        None
    }
}

/// Provider backed by a fixed token
#[derive(Debug)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl TokenProvider for StaticToken {
    fn token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Format a token as an `Authorization` header value, adding the `Bearer `
/// prefix only when absent.
pub fn bearer(token: &str) -> String {
    if token.starts_with("Bearer ") {
        token.to_string()
    } else {
        format!("Bearer {}", token)
    }
}
