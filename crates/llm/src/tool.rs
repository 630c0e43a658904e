//! Tool declarations and model-emitted tool calls.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// A tool the model may call.
///
/// `parameters` is a JSON Schema object. Each dialect reshapes it into
/// its own envelope (`function.parameters` for OpenAI, `input_schema`
/// for Anthropic).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    /// Tool name as exposed to the model.
    pub name: CompactString,
    /// Description shown to the model.
    pub description: String,
    /// JSON Schema of the arguments object.
    pub parameters: serde_json::Value,
}

impl Tool {
    /// Create a tool declaration.
    pub fn new(
        name: impl Into<CompactString>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// A model-emitted request to invoke a tool.
///
/// Dialect adapters normalize their wire shapes into this flat form;
/// `arguments` is the raw JSON argument string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned call identifier (`tool_call_id` / `tool_use_id`).
    pub id: CompactString,
    /// Name of the tool to invoke.
    pub name: CompactString,
    /// JSON-encoded arguments object.
    pub arguments: String,
}

impl ToolCall {
    /// Create a tool call.
    pub fn new(
        id: impl Into<CompactString>,
        name: impl Into<CompactString>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    /// Parse the argument string as JSON, defaulting to an empty object.
    pub fn args(&self) -> serde_json::Value {
        serde_json::from_str(&self.arguments).unwrap_or_else(|_| serde_json::json!({}))
    }
}
