//! Gemini generateContent dialect.
//!
//! Gemini is a single-pass provider here: tools are never declared, and
//! the whole conversation (system prompt included) is flattened into one
//! text part. The endpoint embeds the model name, so the URL is built per
//! request.

use crate::{ChatReply, ChatRequest, HttpTransport, Role, StopReason, Usage};
use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Default Gemini API base URL.
pub const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The Gemini provider adapter.
#[derive(Clone, Debug)]
pub struct Gemini {
    transport: HttpTransport,
    base: String,
}

impl Gemini {
    /// Create an adapter; `base_url` overrides the default API base.
    pub fn new(client: Client, key: &str, base_url: Option<&str>) -> Result<Self> {
        let transport = HttpTransport::custom_header(client, "x-goog-api-key", key, BASE_URL)?;
        Ok(Self {
            transport,
            base: base_url.unwrap_or(BASE_URL).trim_end_matches('/').to_owned(),
        })
    }

    /// Send a request and normalize the response.
    pub async fn send(&self, req: ChatRequest<'_>) -> Result<ChatReply> {
        let url = format!("{}/models/{}:generateContent", self.base, req.model);
        let body = Body::build(&req);
        let text = self.transport.post_to(&url, &body).await?;
        let raw: Response =
            serde_json::from_str(&text).context("API Error: malformed generateContent response")?;
        Ok(raw.into_reply())
    }
}

/// Request body for `POST /models/{m}:generateContent`.
#[derive(Debug, Serialize)]
struct Body {
    contents: Vec<Value>,
}

impl Body {
    fn build(req: &ChatRequest<'_>) -> Self {
        Self {
            contents: vec![json!({
                "role": "user",
                "parts": [{"text": flatten(req)}],
            })],
        }
    }
}

/// Concatenate system prompt and history into a single text blob.
fn flatten(req: &ChatRequest<'_>) -> String {
    let mut text = String::new();
    if !req.system.is_empty() {
        text.push_str(req.system);
        text.push_str("\n\n");
    }
    for msg in req.messages {
        let label = match msg.role {
            Role::User => "User",
            Role::Assistant => "Assistant",
            Role::Tool => "Tool result",
        };
        text.push_str(label);
        text.push_str(": ");
        text.push_str(&msg.content);
        text.push('\n');
    }
    text
}

/// Raw generateContent response.
#[derive(Deserialize)]
struct Response {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default, rename = "usageMetadata")]
    usage: WireUsage,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
    #[serde(default, rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize, Default)]
struct WireUsage {
    #[serde(default, rename = "promptTokenCount")]
    prompt_tokens: u64,
    #[serde(default, rename = "candidatesTokenCount")]
    candidate_tokens: u64,
}

impl Response {
    fn into_reply(mut self) -> ChatReply {
        let usage = Usage::new(self.usage.prompt_tokens, self.usage.candidate_tokens);
        if self.candidates.is_empty() {
            return ChatReply {
                usage,
                ..Default::default()
            };
        }
        let candidate = self.candidates.remove(0);
        let text = candidate
            .content
            .parts
            .into_iter()
            .map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");

        let stop = match candidate.finish_reason.as_deref() {
            Some("MAX_TOKENS") => StopReason::Length,
            Some("STOP") | None => StopReason::EndTurn,
            Some(_) => StopReason::Other,
        };

        ChatReply {
            text,
            tool_calls: Vec::new(),
            stop,
            usage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Message;

    #[test]
    fn flatten_labels_roles() {
        let messages = [Message::user("hello"), Message::assistant("hi", &[])];
        let text = flatten(&ChatRequest {
            system: "Be brief.",
            messages: &messages,
            tools: &[],
            model: "gemini-2.0-flash",
        });
        assert!(text.starts_with("Be brief.\n\n"));
        assert!(text.contains("User: hello\n"));
        assert!(text.contains("Assistant: hi\n"));
    }

    #[test]
    fn body_is_a_single_text_part() {
        let messages = [Message::user("hello")];
        let body = Body::build(&ChatRequest {
            system: "",
            messages: &messages,
            tools: &[],
            model: "m",
        });
        assert_eq!(body.contents.len(), 1);
        assert_eq!(body.contents[0]["parts"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn response_joins_parts_and_reads_usage() {
        let raw = r#"{
            "candidates": [{
                "content": {"parts": [{"text": "Hello "}, {"text": "world"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 3}
        }"#;
        let reply = serde_json::from_str::<Response>(raw).unwrap().into_reply();
        assert_eq!(reply.text, "Hello world");
        assert_eq!(reply.stop, StopReason::EndTurn);
        assert_eq!(reply.usage, Usage::new(12, 3));
        assert!(reply.tool_calls.is_empty());
    }

    #[test]
    fn empty_candidates_yield_empty_reply() {
        let reply = serde_json::from_str::<Response>("{}").unwrap().into_reply();
        assert!(reply.text.is_empty());
        assert_eq!(reply.stop, StopReason::EndTurn);
    }
}
