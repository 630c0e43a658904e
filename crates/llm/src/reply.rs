//! The unified provider reply.

use crate::ToolCall;
use serde::{Deserialize, Serialize};

/// A normalized provider response.
///
/// Every dialect adapter produces this shape regardless of how its wire
/// format structures text and tool use.
#[derive(Debug, Clone, Default)]
pub struct ChatReply {
    /// Assistant text, joined across content blocks.
    pub text: String,
    /// Tool calls requested by the model, in emission order.
    pub tool_calls: Vec<ToolCall>,
    /// Why the model stopped.
    pub stop: StopReason,
    /// Token usage for this request.
    pub usage: Usage,
}

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopReason {
    /// Natural end of turn.
    #[default]
    EndTurn,
    /// The model is waiting on tool results.
    ToolUse,
    /// Token limit reached.
    Length,
    /// Anything else the provider reported.
    Other,
}

/// Token usage extracted from a provider response.
///
/// OpenAI-family responses report `prompt_tokens`/`completion_tokens`,
/// Anthropic reports `input_tokens`/`output_tokens`; both normalize here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens consumed by the prompt.
    pub input_tokens: u64,
    /// Tokens generated by the model.
    pub output_tokens: u64,
}

impl Usage {
    /// Create a usage record.
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// Total tokens in and out.
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}
