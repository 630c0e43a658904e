//! Provider kinds and the unified `Provider` enum.
//!
//! `Provider` dispatches statically over the three dialect adapters.
//! xAI, Groq, and Ollama all speak the OpenAI chat-completions dialect;
//! they differ only in endpoint, auth, and tool capability.

use crate::claude::Claude;
use crate::gemini::Gemini;
use crate::openai::OpenAi;
use crate::{ChatReply, Message, Tool};
use anyhow::{Result, bail};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Default Ollama base URL.
pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";

const GROK_BASE: &str = "https://api.x.ai/v1";
const GROQ_BASE: &str = "https://api.groq.com/openai/v1";

/// Supported provider families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// xAI Grok — OpenAI-compatible, tool-capable.
    Grok,
    /// Groq — OpenAI-compatible, single-pass.
    Groq,
    /// Google Gemini — generateContent, single-pass.
    Gemini,
    /// Anthropic Claude — Messages API, tool-capable.
    Claude,
    /// Ollama local API — OpenAI-compatible, tool-capable, no key.
    Ollama,
}

impl ProviderKind {
    /// All provider kinds, in display order.
    pub const ALL: [ProviderKind; 5] = [
        Self::Grok,
        Self::Groq,
        Self::Gemini,
        Self::Claude,
        Self::Ollama,
    ];

    /// The lowercase tag used in config and team files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grok => "grok",
            Self::Groq => "groq",
            Self::Gemini => "gemini",
            Self::Claude => "claude",
            Self::Ollama => "ollama",
        }
    }

    /// Whether this provider supports the tool-call loop.
    ///
    /// Single-pass providers (Groq, Gemini) answer in one shot and never
    /// receive tool declarations.
    pub fn tool_capable(&self) -> bool {
        matches!(self, Self::Grok | Self::Claude | Self::Ollama)
    }

    /// Whether construction requires an API key.
    pub fn requires_key(&self) -> bool {
        !matches!(self, Self::Ollama)
    }

    /// Environment variable consulted for the API key.
    pub fn key_env(&self) -> Option<&'static str> {
        match self {
            Self::Grok => Some("GROK_API_KEY"),
            Self::Groq => Some("GROQ_API_KEY"),
            Self::Gemini => Some("GEMINI_API_KEY"),
            Self::Claude => Some("CLAUDE_API_KEY"),
            Self::Ollama => None,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "grok" => Ok(Self::Grok),
            "groq" => Ok(Self::Groq),
            "gemini" => Ok(Self::Gemini),
            "claude" => Ok(Self::Claude),
            "ollama" => Ok(Self::Ollama),
            other => bail!("unknown provider '{other}'"),
        }
    }
}

/// One chat request: system prompt, conversation, tool declarations, model.
#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    /// System prompt. Dialects place it wherever their wire format wants it.
    pub system: &'a str,
    /// Conversation messages in order.
    pub messages: &'a [Message],
    /// Tools offered to the model. Empty for single-pass providers.
    pub tools: &'a [Tool],
    /// Model identifier.
    pub model: &'a str,
}

/// The provider contract: one request in, one normalized reply out.
///
/// Implemented by [`Provider`] for real backends and by scripted mocks in
/// tests of the agent loop and team channel.
pub trait Chat: Send + Sync {
    /// Send a chat request and await the normalized reply.
    fn send(&self, req: ChatRequest<'_>) -> impl Future<Output = Result<ChatReply>> + Send;
}

/// Unified LLM provider (static dispatch, no dyn).
#[derive(Clone, Debug)]
pub enum Provider {
    /// OpenAI-compatible dialect (Grok, Groq, Ollama).
    OpenAi(OpenAi),
    /// Anthropic Messages dialect.
    Claude(Claude),
    /// Gemini generateContent dialect.
    Gemini(Gemini),
}

impl Chat for Provider {
    async fn send(&self, req: ChatRequest<'_>) -> Result<ChatReply> {
        match self {
            Self::OpenAi(p) => p.send(req).await,
            Self::Claude(p) => p.send(req).await,
            Self::Gemini(p) => p.send(req).await,
        }
    }
}

/// Construct a [`Provider`] for the given kind.
///
/// `key` must be present for every kind except Ollama; a missing key is a
/// config error and the agent cannot be created. `base_url` overrides the
/// provider endpoint (for Grok the `GROK_BASE_URL` environment variable is
/// consulted first).
pub fn build_provider(
    kind: ProviderKind,
    key: Option<&str>,
    base_url: Option<&str>,
    client: Client,
) -> Result<Provider> {
    let key = match key {
        Some(k) if !k.is_empty() => Some(k),
        _ if kind.requires_key() => bail!(
            "missing API key for provider '{kind}' (set {} or configure one)",
            kind.key_env().unwrap_or("an API key")
        ),
        _ => None,
    };

    // OpenAI-family overrides are base URLs; the path is appended here.
    let provider = match kind {
        ProviderKind::Grok => {
            let env_base = std::env::var("GROK_BASE_URL").ok();
            let base = base_url
                .map(str::to_owned)
                .or(env_base)
                .unwrap_or_else(|| GROK_BASE.to_owned());
            let endpoint = chat_endpoint(&base);
            Provider::OpenAi(OpenAi::bearer(client, key.unwrap_or(""), &endpoint)?)
        }
        ProviderKind::Groq => {
            let endpoint = chat_endpoint(base_url.unwrap_or(GROQ_BASE));
            Provider::OpenAi(OpenAi::bearer(client, key.unwrap_or(""), &endpoint)?)
        }
        ProviderKind::Ollama => {
            let base = base_url.unwrap_or(OLLAMA_BASE_URL).trim_end_matches('/');
            let endpoint = format!("{base}/v1/chat/completions");
            Provider::OpenAi(OpenAi::no_auth(client, &endpoint))
        }
        ProviderKind::Claude => Provider::Claude(Claude::anthropic(client, key.unwrap_or(""))?),
        ProviderKind::Gemini => Provider::Gemini(Gemini::new(client, key.unwrap_or(""), base_url)?),
    };
    Ok(provider)
}

fn chat_endpoint(base: &str) -> String {
    format!("{}/chat/completions", base.trim_end_matches('/'))
}
