//! Conversation messages.

use crate::ToolCall;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A message in a conversation.
///
/// The system prompt is not a message — it travels separately in
/// [`ChatRequest`](crate::ChatRequest) because two of the four dialects
/// put it outside the messages array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message.
    pub role: Role,

    /// The text content.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,

    /// Correlates a tool result back to the call that produced it.
    #[serde(default, skip_serializing_if = "CompactString::is_empty")]
    pub tool_call_id: CompactString,

    /// Tool calls carried by an assistant message.
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub tool_calls: SmallVec<[ToolCall; 4]>,

    /// Name of the agent that authored this message, when it originated
    /// in a team broadcast.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<CompactString>,

    /// Role of the authoring agent, when it originated in a team broadcast.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_role: Option<CompactString>,
}

impl Message {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            ..Default::default()
        }
    }

    /// Create an assistant message, optionally carrying tool calls.
    pub fn assistant(content: impl Into<String>, tool_calls: &[ToolCall]) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_calls: tool_calls.iter().cloned().collect(),
            ..Default::default()
        }
    }

    /// Create a tool-result message keyed to the originating call.
    pub fn tool(content: impl Into<String>, call_id: impl Into<CompactString>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            tool_call_id: call_id.into(),
            ..Default::default()
        }
    }

    /// Tag the message with its team-broadcast provenance.
    pub fn from_agent(
        mut self,
        name: impl Into<CompactString>,
        role: impl Into<CompactString>,
    ) -> Self {
        self.agent_name = Some(name.into());
        self.agent_role = Some(role.into());
        self
    }
}

/// The role of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// End-user input.
    #[default]
    User,
    /// Model output.
    Assistant,
    /// Result of a tool invocation.
    Tool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ToolCall;

    #[test]
    fn tool_message_carries_its_call_id() {
        let msg = Message::tool("result", "call_7");
        assert_eq!(msg.role, Role::Tool);
        assert_eq!(msg.tool_call_id, "call_7");
    }

    #[test]
    fn broadcast_provenance_round_trips() {
        let msg = Message::assistant("reply", &[]).from_agent("Planner", "Planner");
        let json = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back.agent_name.as_deref(), Some("Planner"));
        assert_eq!(back.agent_role.as_deref(), Some("Planner"));
    }

    #[test]
    fn empty_fields_are_omitted_on_the_wire() {
        let json = serde_json::to_string(&Message::user("hi")).unwrap();
        assert!(!json.contains("tool_call_id"));
        assert!(!json.contains("agent_name"));
    }

    #[test]
    fn assistant_keeps_tool_call_order() {
        let calls = [
            ToolCall::new("c1", "read", "{}"),
            ToolCall::new("c2", "write", "{}"),
        ];
        let msg = Message::assistant("", &calls);
        assert_eq!(msg.tool_calls[0].id, "c1");
        assert_eq!(msg.tool_calls[1].id, "c2");
    }
}
