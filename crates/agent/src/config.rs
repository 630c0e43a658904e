//! Agent configuration and provider-default resolution.

use anyhow::Result;
use compact_str::CompactString;
use quorum_llm::{OLLAMA_BASE_URL, Provider, ProviderKind, build_provider};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Serializable identity of one agent.
///
/// Field names match the on-disk team file schema (camelCase). `api_key`
/// is `None` when the agent inherits the process-wide config default —
/// the store serializes that as the `"__config__"` sentinel so the real
/// key never lands in a team file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    /// Unique short identifier within a team.
    pub id: CompactString,
    /// Human-readable name.
    pub name: CompactString,
    /// Free-text role (e.g. "Backend Developer").
    pub role: String,
    /// System-prompt override; `None` falls back to a default built from
    /// name and role.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Provider family.
    pub provider: ProviderKind,
    /// Model identifier.
    pub model: String,
    /// Explicit API key, or `None` to use the config default.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Endpoint override (Ollama base URL or custom provider endpoint).
    #[serde(default)]
    pub ollama_base_url: Option<String>,
}

impl AgentConfig {
    /// Create a config with the required identity fields.
    pub fn new(
        id: impl Into<CompactString>,
        name: impl Into<CompactString>,
        role: impl Into<String>,
        provider: ProviderKind,
        model: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
            system_prompt: None,
            provider,
            model: model.into(),
            api_key: None,
            ollama_base_url: None,
        }
    }

    /// Set the system-prompt override.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Set an explicit API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Resolve the effective API key: explicit, then config, then env.
    pub fn resolve_key(&self, defaults: &ProviderDefaults) -> Option<String> {
        if let Some(key) = &self.api_key {
            return Some(key.clone());
        }
        defaults.key_for(self.provider)
    }

    /// Bind a provider adapter for this config.
    pub fn bind(&self, defaults: &ProviderDefaults, client: reqwest::Client) -> Result<Provider> {
        let key = self.resolve_key(defaults);
        let base_url = self
            .ollama_base_url
            .as_deref()
            .or(defaults.ollama_base_url.as_deref());
        build_provider(self.provider, key.as_deref(), base_url, client)
    }
}

/// Process-wide provider defaults, loaded from config by the host.
#[derive(Debug, Clone, Default)]
pub struct ProviderDefaults {
    /// API keys per provider, from the config file.
    pub api_keys: BTreeMap<ProviderKind, String>,
    /// Default Ollama base URL.
    pub ollama_base_url: Option<String>,
}

impl ProviderDefaults {
    /// The configured or well-known Ollama base URL.
    pub fn ollama_base(&self) -> &str {
        self.ollama_base_url.as_deref().unwrap_or(OLLAMA_BASE_URL)
    }

    /// Look up a key: config entry first, then the provider's env var.
    pub fn key_for(&self, kind: ProviderKind) -> Option<String> {
        if let Some(key) = self.api_keys.get(&kind)
            && !key.is_empty()
        {
            return Some(key.clone());
        }
        kind.key_env().and_then(|var| std::env::var(var).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_are_camel_case() {
        let config = AgentConfig::new("a1", "Ada", "Planner", ProviderKind::Claude, "claude-3")
            .with_system_prompt("plan things");
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["systemPrompt"], "plan things");
        assert_eq!(json["provider"], "claude");
        assert!(json.as_object().unwrap().contains_key("ollamaBaseUrl"));
    }

    #[test]
    fn explicit_key_wins_over_defaults() {
        let mut defaults = ProviderDefaults::default();
        defaults
            .api_keys
            .insert(ProviderKind::Grok, "config-key".into());

        let config = AgentConfig::new("a1", "Ada", "Dev", ProviderKind::Grok, "grok-3")
            .with_api_key("explicit");
        assert_eq!(config.resolve_key(&defaults).as_deref(), Some("explicit"));

        let config = AgentConfig::new("a2", "Bob", "Dev", ProviderKind::Grok, "grok-3");
        assert_eq!(config.resolve_key(&defaults).as_deref(), Some("config-key"));
    }

    #[test]
    fn bind_fails_without_key() {
        let config = AgentConfig::new("a1", "Ada", "Dev", ProviderKind::Groq, "llama-3.3-70b");
        let defaults = ProviderDefaults::default();
        // No config key; only fails when the env var is also absent.
        if std::env::var("GROQ_API_KEY").is_err() {
            assert!(config.bind(&defaults, reqwest::Client::new()).is_err());
        }
    }
}
