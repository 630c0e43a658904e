//! Application configuration at `~/.quorum/config.json`.
//!
//! String values support `${ENV_VAR}` expansion so keys can live in the
//! environment while the file stays shareable. A default file is
//! generated on first run.

use anyhow::{Context, Result};
use quorum_agent::ProviderDefaults;
use quorum_llm::{PriceTable, ProviderKind, Rates};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Top-level app configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Default provider for new agents and the chat surface.
    pub provider: ProviderKind,
    /// Default model.
    pub model: String,
    /// API keys per provider tag. `${ENV_VAR}` values are expanded.
    pub api_keys: BTreeMap<String, String>,
    /// Ollama base URL override.
    pub ollama_base_url: Option<String>,
    /// Sandbox safe mode.
    pub safe_mode: bool,
    /// Tool-loop round bound.
    pub max_rounds: usize,
    /// Tool calls allowed per round.
    pub max_tool_calls_per_round: usize,
    /// Per-provider rate overrides for cost estimates.
    pub pricing: BTreeMap<String, Rates>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut api_keys = BTreeMap::new();
        for kind in ProviderKind::ALL {
            if let Some(var) = kind.key_env() {
                api_keys.insert(kind.as_str().to_owned(), format!("${{{var}}}"));
            }
        }
        Self {
            provider: ProviderKind::Grok,
            model: "grok-3".to_owned(),
            api_keys,
            ollama_base_url: None,
            safe_mode: false,
            max_rounds: 10,
            max_tool_calls_per_round: 10,
            pricing: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Load the config, generating the default file on first run.
    pub fn load() -> Result<Self> {
        let path = config_path()?;
        if !path.exists() {
            let config = Self::default();
            config.save()?;
            tracing::info!("generated default config at {}", path.display());
            return Ok(config);
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let expanded = expand_env_vars(&raw);
        serde_json::from_str(&expanded)
            .with_context(|| format!("malformed config at {}", path.display()))
    }

    /// Write the config to disk (raw, without expansion).
    pub fn save(&self) -> Result<()> {
        let path = config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// Provider defaults for agent binding.
    pub fn provider_defaults(&self) -> ProviderDefaults {
        let mut defaults = ProviderDefaults {
            ollama_base_url: self.ollama_base_url.clone(),
            ..Default::default()
        };
        for (tag, key) in &self.api_keys {
            if key.is_empty() {
                continue;
            }
            match tag.parse::<ProviderKind>() {
                Ok(kind) => {
                    defaults.api_keys.insert(kind, key.clone());
                }
                Err(_) => tracing::warn!("ignoring api key for unknown provider '{tag}'"),
            }
        }
        defaults
    }

    /// The rate table with config overrides applied.
    pub fn price_table(&self) -> PriceTable {
        let mut table = PriceTable::default();
        for (tag, rates) in &self.pricing {
            if let Ok(kind) = tag.parse::<ProviderKind>() {
                table.set(kind, *rates);
            }
        }
        table
    }
}

/// The quorum home directory (`~/.quorum`).
pub fn quorum_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("no home directory")?;
    Ok(home.join(".quorum"))
}

/// Path of the config file.
pub fn config_path() -> Result<PathBuf> {
    Ok(quorum_dir()?.join("config.json"))
}

/// Expand `${VAR}` patterns with environment variable values.
///
/// Unknown variables expand to the empty string.
pub fn expand_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'
            let mut var_name = String::new();
            for c in chars.by_ref() {
                if c == '}' {
                    break;
                }
                var_name.push(c);
            }
            if let Ok(val) = std::env::var(&var_name) {
                result.push_str(&val);
            }
        } else {
            result.push(ch);
        }
    }

    result
}
