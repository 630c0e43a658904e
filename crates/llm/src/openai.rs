//! OpenAI-compatible chat-completions dialect.
//!
//! Covers xAI (Grok), Groq, and Ollama's `/v1/chat/completions` surface.
//! Tools are declared as `{type: "function", function: {...}}` entries;
//! the assistant message carries `tool_calls` and results go back as
//! role=`tool` messages keyed by `tool_call_id`.

use crate::{ChatReply, ChatRequest, HttpTransport, Role, StopReason, ToolCall, Usage};
use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// The OpenAI-compatible provider adapter.
#[derive(Clone, Debug)]
pub struct OpenAi {
    transport: HttpTransport,
}

impl OpenAi {
    /// Create an adapter with Bearer auth (xAI, Groq).
    pub fn bearer(client: Client, key: &str, endpoint: &str) -> Result<Self> {
        Ok(Self {
            transport: HttpTransport::bearer(client, key, endpoint)?,
        })
    }

    /// Create an adapter without auth (Ollama).
    pub fn no_auth(client: Client, endpoint: &str) -> Self {
        Self {
            transport: HttpTransport::no_auth(client, endpoint),
        }
    }

    /// Send a request and normalize the response.
    pub async fn send(&self, req: ChatRequest<'_>) -> Result<ChatReply> {
        let body = Body::build(&req);
        let text = self.transport.post(&body).await?;
        let raw: Response =
            serde_json::from_str(&text).context("API Error: malformed chat completion response")?;
        Ok(raw.into_reply())
    }

    /// The endpoint this adapter posts to.
    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Serialize)]
struct Body {
    model: String,
    messages: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Value>>,
}

impl Body {
    fn build(req: &ChatRequest<'_>) -> Self {
        let mut messages = Vec::with_capacity(req.messages.len() + 1);
        if !req.system.is_empty() {
            messages.push(json!({"role": "system", "content": req.system}));
        }
        for msg in req.messages {
            messages.push(wire_message(msg));
        }

        let tools = (!req.tools.is_empty()).then(|| {
            req.tools
                .iter()
                .map(|tool| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": tool.name,
                            "description": tool.description,
                            "parameters": tool.parameters,
                        },
                    })
                })
                .collect()
        });

        Self {
            model: req.model.to_owned(),
            messages,
            tools,
        }
    }
}

fn wire_message(msg: &crate::Message) -> Value {
    match msg.role {
        Role::User => json!({"role": "user", "content": msg.content}),
        Role::Assistant => {
            let mut wire = json!({"role": "assistant", "content": msg.content});
            if !msg.tool_calls.is_empty() {
                wire["tool_calls"] = msg
                    .tool_calls
                    .iter()
                    .map(|call| {
                        json!({
                            "id": call.id,
                            "type": "function",
                            "function": {"name": call.name, "arguments": call.arguments},
                        })
                    })
                    .collect();
            }
            wire
        }
        Role::Tool => json!({
            "role": "tool",
            "content": msg.content,
            "tool_call_id": msg.tool_call_id,
        }),
    }
}

/// Raw chat-completion response.
#[derive(Deserialize)]
struct Response {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: WireMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct WireMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<WireToolCall>,
}

#[derive(Deserialize)]
struct WireToolCall {
    id: String,
    function: WireFunction,
}

#[derive(Deserialize)]
struct WireFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Deserialize)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

impl Response {
    fn into_reply(mut self) -> ChatReply {
        let usage = self
            .usage
            .map(|u| Usage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        if self.choices.is_empty() {
            return ChatReply {
                usage,
                ..Default::default()
            };
        }
        let choice = self.choices.remove(0);
        let tool_calls: Vec<ToolCall> = choice
            .message
            .tool_calls
            .into_iter()
            .map(|call| ToolCall::new(call.id, call.function.name, call.function.arguments))
            .collect();

        // This dialect signals tool use by presence of tool_calls, not by
        // a dedicated finish_reason value.
        let stop = if !tool_calls.is_empty() {
            StopReason::ToolUse
        } else {
            match choice.finish_reason.as_deref() {
                Some("length") => StopReason::Length,
                Some("stop") | None => StopReason::EndTurn,
                Some(_) => StopReason::Other,
            }
        };

        ChatReply {
            text: choice.message.content.unwrap_or_default(),
            tool_calls,
            stop,
            usage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Message, Tool};

    fn request<'a>(messages: &'a [Message], tools: &'a [Tool]) -> ChatRequest<'a> {
        ChatRequest {
            system: "You are terse.",
            messages,
            tools,
            model: "grok-3",
        }
    }

    #[test]
    fn body_places_system_first() {
        let messages = [Message::user("hi")];
        let body = Body::build(&request(&messages, &[]));
        assert_eq!(body.messages[0]["role"], "system");
        assert_eq!(body.messages[0]["content"], "You are terse.");
        assert_eq!(body.messages[1]["role"], "user");
        assert!(body.tools.is_none());
    }

    #[test]
    fn body_wraps_tools_in_function_envelope() {
        let messages = [Message::user("hi")];
        let tools = [Tool::new("bash", "run a command", json!({"type": "object"}))];
        let body = Body::build(&request(&messages, &tools));
        let wire_tools = body.tools.unwrap();
        let wire = &wire_tools[0];
        assert_eq!(wire["type"], "function");
        assert_eq!(wire["function"]["name"], "bash");
        assert_eq!(wire["function"]["parameters"]["type"], "object");
    }

    #[test]
    fn body_keys_tool_results_by_call_id() {
        let messages = [
            Message::assistant("", &[ToolCall::new("call_1", "read", "{}")]),
            Message::tool("file contents", "call_1"),
        ];
        let body = Body::build(&request(&messages, &[]));
        assert_eq!(body.messages[1]["tool_calls"][0]["id"], "call_1");
        assert_eq!(body.messages[2]["role"], "tool");
        assert_eq!(body.messages[2]["tool_call_id"], "call_1");
    }

    #[test]
    fn response_with_tool_calls_stops_for_tools() {
        let raw = r#"{
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [
                        {"id": "c1", "type": "function",
                         "function": {"name": "read", "arguments": "{\"path\": \"a.txt\"}"}}
                    ]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5}
        }"#;
        let reply = serde_json::from_str::<Response>(raw).unwrap().into_reply();
        assert_eq!(reply.stop, StopReason::ToolUse);
        assert_eq!(reply.tool_calls.len(), 1);
        assert_eq!(reply.tool_calls[0].name, "read");
        assert_eq!(reply.usage.total(), 15);
    }

    #[test]
    fn response_plain_text_ends_turn() {
        let raw = r#"{"choices": [{"message": {"content": "Done."}, "finish_reason": "stop"}]}"#;
        let reply = serde_json::from_str::<Response>(raw).unwrap().into_reply();
        assert_eq!(reply.text, "Done.");
        assert_eq!(reply.stop, StopReason::EndTurn);
        assert!(reply.tool_calls.is_empty());
    }
}
