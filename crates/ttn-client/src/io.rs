//! HTTP client abstraction for testability

use async_trait::async_trait;

/// HTTP response from a request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Abstraction over HTTP client for dependency injection
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait HttpClient: Send + Sync {
    /// Send a GET request with the given headers
    async fn get(&self, url: &str, headers: &[(String, String)]) -> crate::Result<HttpResponse>;

    /// Send a POST request with the given headers and body
    async fn post(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: String,
    ) -> crate::Result<HttpResponse>;

    /// Send a PUT request with the given headers and body
    async fn put(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: String,
    ) -> crate::Result<HttpResponse>;

    /// Send a DELETE request with the given headers
    async fn delete(&self, url: &str, headers: &[(String, String)])
        -> crate::Result<HttpResponse>;
}

/// Production HTTP client using reqwest
#[derive(Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    async fn send(
        &self,
        method: &str,
        mut request: reqwest::RequestBuilder,
        url: &str,
        headers: &[(String, String)],
    ) -> crate::Result<HttpResponse> {
        tracing::debug!("{} {}", method, url);
        for (name, value) in headers {
            request = request.header(name, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| crate::TtnError::Http(format!("{} {} failed: {}", method, url, e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| crate::TtnError::Http(format!("Reading response body: {}", e)))?;

        tracing::debug!("{} {} -> {} ({} bytes)", method, url, status, body.len());
        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str, headers: &[(String, String)]) -> crate::Result<HttpResponse> {
        self.send("GET", self.client.get(url), url, headers).await
    }

    async fn post(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: String,
    ) -> crate::Result<HttpResponse> {
        self.send("POST", self.client.post(url).body(body), url, headers)
            .await
    }

    async fn put(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: String,
    ) -> crate::Result<HttpResponse> {
        self.send("PUT", self.client.put(url).body(body), url, headers)
            .await
    }

    async fn delete(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> crate::Result<HttpResponse> {
        self.send("DELETE", self.client.delete(url), url, headers)
            .await
    }
}
