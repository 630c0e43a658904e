//! Shared HTTP transport for provider adapters.
//!
//! `HttpTransport` wraps a `reqwest::Client` with pre-configured headers
//! and an endpoint URL. All dialects POST JSON through it; status codes
//! are mapped to the fixed error strings downstream components match on.

use anyhow::{Result, bail};
use reqwest::{
    Client, Method, StatusCode,
    header::{self, HeaderMap, HeaderName, HeaderValue},
};
use serde::Serialize;

/// Shared HTTP transport: client + headers + endpoint.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    headers: HeaderMap,
    endpoint: String,
}

impl HttpTransport {
    /// Create a transport with Bearer token authentication.
    pub fn bearer(client: Client, key: &str, endpoint: &str) -> Result<Self> {
        let mut headers = base_headers();
        headers.insert(header::AUTHORIZATION, format!("Bearer {key}").parse()?);
        Ok(Self {
            client,
            headers,
            endpoint: endpoint.to_owned(),
        })
    }

    /// Create a transport without authentication (e.g. Ollama).
    pub fn no_auth(client: Client, endpoint: &str) -> Self {
        Self {
            client,
            headers: base_headers(),
            endpoint: endpoint.to_owned(),
        }
    }

    /// Create a transport authenticating with a custom header.
    ///
    /// Anthropic uses `x-api-key`, Gemini uses `x-goog-api-key`.
    pub fn custom_header(
        client: Client,
        header_name: &str,
        header_value: &str,
        endpoint: &str,
    ) -> Result<Self> {
        let mut headers = base_headers();
        headers.insert(
            header_name.parse::<HeaderName>()?,
            header_value.parse::<HeaderValue>()?,
        );
        Ok(Self {
            client,
            headers,
            endpoint: endpoint.to_owned(),
        })
    }

    /// Add a fixed header to every request (e.g. `anthropic-version`).
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        self.headers
            .insert(name.parse::<HeaderName>()?, value.parse::<HeaderValue>()?);
        Ok(self)
    }

    /// POST a JSON body to the configured endpoint.
    pub async fn post(&self, body: &impl Serialize) -> Result<String> {
        self.post_to(&self.endpoint, body).await
    }

    /// POST a JSON body to an explicit URL (Gemini embeds the model name
    /// in the path, so its endpoint varies per request).
    pub async fn post_to(&self, url: &str, body: &impl Serialize) -> Result<String> {
        tracing::trace!("request: {}", serde_json::to_string(body)?);
        let response = self
            .client
            .request(Method::POST, url)
            .headers(self.headers.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("API Error: {e}"))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        tracing::trace!("response ({status}): {text}");

        if status.is_success() {
            return Ok(text);
        }
        match status {
            StatusCode::UNAUTHORIZED => bail!("Unauthorized"),
            StatusCode::NOT_FOUND => bail!("Endpoint not found"),
            StatusCode::BAD_REQUEST => match error_detail(&text) {
                Some(detail) => bail!("Bad request: {detail}"),
                None => bail!("Bad request"),
            },
            _ => match error_detail(&text) {
                Some(detail) => bail!("API Error: {detail}"),
                None => bail!("API Error: HTTP {}", status.as_u16()),
            },
        }
    }

    /// The configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The configured request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

fn base_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// Pull a nested error message out of a provider error body, if any.
///
/// Both OpenAI-family and Anthropic bodies nest it under `error`.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let error = value.get("error")?;
    let message = error
        .get("message")
        .and_then(|m| m.as_str())
        .or_else(|| error.as_str())?;
    if message.is_empty() {
        return None;
    }
    Some(message.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_detail_reads_nested_message() {
        let body = r#"{"error": {"message": "model not found", "type": "invalid_request_error"}}"#;
        assert_eq!(error_detail(body).as_deref(), Some("model not found"));
    }

    #[test]
    fn error_detail_none_for_plain_text() {
        assert_eq!(error_detail("<html>gateway error</html>"), None);
        assert_eq!(error_detail(r#"{"message": "no error key"}"#), None);
    }
}
