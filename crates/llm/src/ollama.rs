//! Ollama model discovery.

use anyhow::{Context, Result};
use compact_str::CompactString;
use reqwest::Client;
use serde::Deserialize;

/// One locally installed Ollama model, from `GET {base}/api/tags`.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaModel {
    /// Model name (e.g. `llama3.2:latest`).
    pub name: CompactString,
    /// On-disk size in bytes.
    #[serde(default)]
    pub size: u64,
    /// Last-modified timestamp as reported by the daemon.
    #[serde(default)]
    pub modified_at: String,
    /// Content digest.
    #[serde(default)]
    pub digest: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<OllamaModel>,
}

/// List models installed on a local Ollama daemon.
pub async fn list_models(client: &Client, base_url: &str) -> Result<Vec<OllamaModel>> {
    let url = format!("{}/api/tags", base_url.trim_end_matches('/'));
    let response = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("failed to reach ollama at {url}"))?;
    let tags: TagsResponse = response
        .json()
        .await
        .context("failed to parse ollama tags response")?;
    Ok(tags.models)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_response_parses() {
        let raw = r#"{"models": [
            {"name": "llama3.2:latest", "size": 2019393189,
             "modified_at": "2025-01-01T00:00:00Z", "digest": "abc123",
             "details": {"family": "llama"}}
        ]}"#;
        let tags: TagsResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(tags.models.len(), 1);
        assert_eq!(tags.models[0].name, "llama3.2:latest");
        assert_eq!(tags.models[0].size, 2019393189);
    }

    #[test]
    fn tags_response_tolerates_empty() {
        let tags: TagsResponse = serde_json::from_str("{}").unwrap();
        assert!(tags.models.is_empty());
    }
}
