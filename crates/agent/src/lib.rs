//! The quorum agent runtime.
//!
//! An [`Agent`] owns one configured LLM persona: its identity, private DM
//! history, and the bounded tool-call loop against its provider. The
//! runtime is generic over [`Chat`](quorum_llm::Chat) so tests drive it
//! with a scripted provider instead of HTTP.

pub use config::{AgentConfig, ProviderDefaults};
pub use runtime::{Agent, AgentStatus, SendOptions};
pub use sink::{AutoAllow, DANGEROUS_TOOLS, EventSink, Gateway, describe_tool_call, is_dangerous};

mod config;
mod runtime;
mod sink;
