//! Unified LLM interface for quorum.
//!
//! This crate provides the shared types used across all providers —
//! [`Message`], [`Tool`], [`ChatReply`] — and the [`Chat`] trait with one
//! adapter per wire dialect (OpenAI-compatible, Anthropic, Gemini).

pub use message::{Message, Role};
pub use ollama::{OllamaModel, list_models};
pub use pricing::{PriceTable, Rates};
pub use provider::{Chat, ChatRequest, OLLAMA_BASE_URL, Provider, ProviderKind, build_provider};
pub use reply::{ChatReply, StopReason, Usage};
pub use reqwest::Client;
pub use tool::{Tool, ToolCall};
pub use transport::HttpTransport;

pub mod claude;
pub mod gemini;
mod message;
mod ollama;
pub mod openai;
mod pricing;
mod provider;
mod reply;
mod tool;
mod transport;
