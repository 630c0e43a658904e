//! Anthropic Messages dialect.
//!
//! Differs from the chat-completions format in message structure: content
//! is a list of `text` and `tool_use` blocks, tool declarations are flat
//! `{name, description, input_schema}`, and tool results travel back as a
//! *user* message containing `tool_result` blocks keyed by `tool_use_id`.

use crate::{ChatReply, ChatRequest, HttpTransport, Role, StopReason, ToolCall, Usage};
use anyhow::{Context, Result};
use compact_str::CompactString;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// The Anthropic Messages API endpoint.
pub const ENDPOINT: &str = "https://api.anthropic.com/v1/messages";

/// The Anthropic API version header value.
const API_VERSION: &str = "2023-06-01";

/// Maximum tokens requested per response.
const MAX_TOKENS: u32 = 8192;

/// The Claude provider adapter.
#[derive(Clone, Debug)]
pub struct Claude {
    transport: HttpTransport,
}

impl Claude {
    /// Create an adapter targeting the Anthropic API.
    pub fn anthropic(client: Client, key: &str) -> Result<Self> {
        Self::custom(client, key, ENDPOINT)
    }

    /// Create an adapter targeting a custom Anthropic-compatible endpoint.
    pub fn custom(client: Client, key: &str, endpoint: &str) -> Result<Self> {
        let transport = HttpTransport::custom_header(client, "x-api-key", key, endpoint)?
            .with_header("anthropic-version", API_VERSION)?;
        Ok(Self { transport })
    }

    /// Send a request and normalize the response.
    pub async fn send(&self, req: ChatRequest<'_>) -> Result<ChatReply> {
        let body = Body::build(&req);
        let text = self.transport.post(&body).await?;
        let raw: Response =
            serde_json::from_str(&text).context("API Error: malformed messages response")?;
        Ok(raw.into_reply())
    }
}

/// Request body for `POST /v1/messages`.
#[derive(Debug, Serialize)]
struct Body {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Value>>,
}

impl Body {
    fn build(req: &ChatRequest<'_>) -> Self {
        let mut messages = Vec::with_capacity(req.messages.len());
        for msg in req.messages {
            match msg.role {
                Role::User => messages.push(json!({"role": "user", "content": msg.content})),
                Role::Assistant => {
                    let mut content = Vec::new();
                    if !msg.content.is_empty() {
                        content.push(json!({"type": "text", "text": msg.content}));
                    }
                    for call in &msg.tool_calls {
                        content.push(json!({
                            "type": "tool_use",
                            "id": call.id,
                            "name": call.name,
                            "input": call.args(),
                        }));
                    }
                    if content.is_empty() {
                        content.push(json!({"type": "text", "text": ""}));
                    }
                    messages.push(json!({"role": "assistant", "content": content}));
                }
                // Tool results are a user message with tool_result blocks.
                Role::Tool => messages.push(json!({
                    "role": "user",
                    "content": [{
                        "type": "tool_result",
                        "tool_use_id": msg.tool_call_id,
                        "content": msg.content,
                    }],
                })),
            }
        }

        let tools = (!req.tools.is_empty()).then(|| {
            req.tools
                .iter()
                .map(|tool| {
                    json!({
                        "name": tool.name,
                        "description": tool.description,
                        "input_schema": tool.parameters,
                    })
                })
                .collect()
        });

        Self {
            model: req.model.to_owned(),
            max_tokens: MAX_TOKENS,
            system: (!req.system.is_empty()).then(|| req.system.to_owned()),
            messages,
            tools,
        }
    }
}

/// Raw Messages API response.
#[derive(Deserialize)]
struct Response {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<CompactString>,
    #[serde(default)]
    usage: WireUsage,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "tool_use")]
    ToolUse {
        id: CompactString,
        name: CompactString,
        input: Value,
    },
}

#[derive(Deserialize, Default)]
struct WireUsage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

impl Response {
    fn into_reply(self) -> ChatReply {
        let mut text = String::new();
        let mut tool_calls = Vec::new();

        for block in self.content {
            match block {
                ContentBlock::Text { text: t } => {
                    if !text.is_empty() {
                        text.push('\n');
                    }
                    text.push_str(&t);
                }
                ContentBlock::ToolUse { id, name, input } => {
                    let arguments = serde_json::to_string(&input).unwrap_or_default();
                    tool_calls.push(ToolCall::new(id, name, arguments));
                }
            }
        }

        let stop = match self.stop_reason.as_deref() {
            Some("tool_use") => StopReason::ToolUse,
            Some("max_tokens") => StopReason::Length,
            Some("end_turn") | Some("stop_sequence") | None => StopReason::EndTurn,
            Some(_) => StopReason::Other,
        };

        ChatReply {
            text,
            tool_calls,
            stop,
            usage: Usage::new(self.usage.input_tokens, self.usage.output_tokens),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Message, Tool};

    #[test]
    fn body_hoists_system_prompt() {
        let messages = [Message::user("hi")];
        let body = Body::build(&ChatRequest {
            system: "Be brief.",
            messages: &messages,
            tools: &[],
            model: "claude-sonnet-4-20250514",
        });
        assert_eq!(body.system.as_deref(), Some("Be brief."));
        assert_eq!(body.messages.len(), 1);
        assert!(body.tools.is_none());
    }

    #[test]
    fn body_renders_tool_results_as_user_blocks() {
        let messages = [
            Message::assistant("", &[ToolCall::new("tu_1", "read", r#"{"path": "a"}"#)]),
            Message::tool("contents", "tu_1"),
        ];
        let body = Body::build(&ChatRequest {
            system: "",
            messages: &messages,
            tools: &[],
            model: "m",
        });
        let assistant = &body.messages[0];
        assert_eq!(assistant["content"][0]["type"], "tool_use");
        assert_eq!(assistant["content"][0]["input"]["path"], "a");
        let result = &body.messages[1];
        assert_eq!(result["role"], "user");
        assert_eq!(result["content"][0]["type"], "tool_result");
        assert_eq!(result["content"][0]["tool_use_id"], "tu_1");
    }

    #[test]
    fn body_declares_flat_tools() {
        let messages = [Message::user("hi")];
        let tools = [Tool::new("bash", "run", json!({"type": "object"}))];
        let body = Body::build(&ChatRequest {
            system: "",
            messages: &messages,
            tools: &tools,
            model: "m",
        });
        let wire_tools = body.tools.unwrap();
        let wire = &wire_tools[0];
        assert_eq!(wire["name"], "bash");
        assert_eq!(wire["input_schema"]["type"], "object");
        assert!(wire.get("function").is_none());
    }

    #[test]
    fn response_maps_tool_use_stop() {
        let raw = r#"{
            "content": [
                {"type": "text", "text": "Let me check."},
                {"type": "tool_use", "id": "tu_1", "name": "glob", "input": {"pattern": "*.rs"}}
            ],
            "stop_reason": "tool_use",
            "usage": {"input_tokens": 20, "output_tokens": 7}
        }"#;
        let reply = serde_json::from_str::<Response>(raw).unwrap().into_reply();
        assert_eq!(reply.stop, StopReason::ToolUse);
        assert_eq!(reply.text, "Let me check.");
        assert_eq!(reply.tool_calls[0].id, "tu_1");
        assert_eq!(reply.tool_calls[0].args()["pattern"], "*.rs");
        assert_eq!(reply.usage, Usage::new(20, 7));
    }

    #[test]
    fn response_joins_text_blocks() {
        let raw = r#"{
            "content": [{"type": "text", "text": "a"}, {"type": "text", "text": "b"}],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 1, "output_tokens": 1}
        }"#;
        let reply = serde_json::from_str::<Response>(raw).unwrap().into_reply();
        assert_eq!(reply.text, "a\nb");
        assert_eq!(reply.stop, StopReason::EndTurn);
    }
}
