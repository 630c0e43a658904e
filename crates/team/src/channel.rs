//! The team channel: sequential broadcast with context handoff.
//!
//! Given a user message and a team [A1..An], agent Ai's prompt contains
//! the message plus the replies R1..Ri-1 — never a later reply. The loop
//! is strictly sequential by design: later agents read earlier ones.

use crate::team::Team;
use crate::transcript::{PROMPT_WINDOW, SharedTranscript, TranscriptEntry};
use anyhow::{Result, bail};
use compact_str::CompactString;
use quorum_agent::{AgentConfig, EventSink, SendOptions};
use quorum_llm::{Chat, PriceTable};
use serde_json::Value;

/// Channel events the UI can subscribe to. All methods default to no-ops;
/// the channel never depends on a subscriber.
pub trait TeamSink {
    /// An agent's provider request started.
    fn agent_thinking(&self, _agent: &AgentConfig) {}
    /// An agent dispatched a tool call.
    fn agent_tool_call(&self, _agent: &AgentConfig, _tool: &str, _args: &Value) {}
    /// A tool call finished.
    fn agent_tool_result(&self, _agent: &AgentConfig, _tool: &str, _ok: bool) {}
    /// An agent produced its reply.
    fn agent_responded(&self, _agent: &AgentConfig, _reply: &str) {}
    /// An agent failed; the broadcast continues.
    fn agent_error(&self, _agent: &AgentConfig, _error: &str) {}
}

/// The silent sink.
impl TeamSink for () {}

/// One agent's contribution to a broadcast.
#[derive(Debug, Clone)]
pub struct BroadcastReply {
    /// Responding agent id.
    pub agent_id: CompactString,
    /// Responding agent name.
    pub agent_name: CompactString,
    /// False when the entry is an error marker.
    pub ok: bool,
    /// Reply text or `Error: …` marker.
    pub content: String,
}

/// Bridges agent-level tool events into the team sink.
struct ChannelEvents<'a> {
    sink: &'a dyn TeamSink,
    config: AgentConfig,
}

impl EventSink for ChannelEvents<'_> {
    fn on_tool_call(&self, tool: &str, args: &Value) {
        self.sink.agent_tool_call(&self.config, tool, args);
    }

    fn on_tool_result(&self, tool: &str, ok: bool) {
        self.sink.agent_tool_result(&self.config, tool, ok);
    }
}

/// The broadcast orchestrator. Owns the shared transcript; references,
/// never owns, the team it is driving.
#[derive(Default)]
pub struct TeamChannel {
    transcript: SharedTranscript,
}

impl TeamChannel {
    /// Create a channel with an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared transcript.
    pub fn transcript(&self) -> &SharedTranscript {
        &self.transcript
    }

    /// Explicitly reset the transcript.
    pub fn reset(&mut self) {
        self.transcript.clear();
    }

    /// Broadcast one user turn to every team member in order.
    ///
    /// Individual agent failures become `Error: …` transcript entries and
    /// the broadcast continues; only an empty team is a hard error.
    pub async fn broadcast<C: Chat>(
        &mut self,
        team: &mut Team<C>,
        text: &str,
        sink: &dyn TeamSink,
        prices: Option<&PriceTable>,
    ) -> Result<Vec<BroadcastReply>> {
        if team.is_empty() {
            bail!("no agents in team '{}'", team.name);
        }

        self.transcript.push_user(text);
        let mut replies = Vec::with_capacity(team.len());

        for idx in 0..team.agents.len() {
            // Teammate context is recomputed per agent so each one sees
            // exactly the replies appended before its own turn.
            let teammates: Vec<TranscriptEntry> = self
                .transcript
                .window(PROMPT_WINDOW)
                .iter()
                .filter(|entry| entry.author_id.is_some())
                .cloned()
                .collect();

            let agent = &mut team.agents[idx];
            let prompt = build_prompt(text, &teammates, &agent.config, idx == 0);
            sink.agent_thinking(&agent.config);

            let events = ChannelEvents {
                sink,
                config: agent.config.clone(),
            };
            let opts = SendOptions {
                include_history: false,
                gateway: None, // auto-allow: prompts would stall the broadcast
                sink: Some(&events),
                prices,
            };

            match agent.send_message(&prompt, &opts).await {
                Ok(reply) => {
                    sink.agent_responded(&agent.config, &reply);
                    self.transcript.push_agent(&agent.config, reply.clone());
                    replies.push(BroadcastReply {
                        agent_id: agent.config.id.clone(),
                        agent_name: agent.config.name.clone(),
                        ok: true,
                        content: reply,
                    });
                }
                Err(e) => {
                    let marker = format!("Error: {e}");
                    tracing::warn!(agent = %agent.config.id, "broadcast agent failed: {e}");
                    sink.agent_error(&agent.config, &marker);
                    self.transcript.push_agent(&agent.config, marker.clone());
                    replies.push(BroadcastReply {
                        agent_id: agent.config.id.clone(),
                        agent_name: agent.config.name.clone(),
                        ok: false,
                        content: marker,
                    });
                }
            }
        }

        Ok(replies)
    }
}

/// The three-section broadcast prompt.
fn build_prompt(
    user: &str,
    teammates: &[TranscriptEntry],
    agent: &AgentConfig,
    first: bool,
) -> String {
    let mut prompt = String::new();
    prompt.push_str("== USER REQUEST ==\n");
    prompt.push_str(user);
    prompt.push_str("\n\n");

    if !first && !teammates.is_empty() {
        prompt.push_str("== TEAMMATE RESPONSES ==\n");
        for entry in teammates {
            prompt.push_str(&format!(
                "--- {} ({}) ---\n{}\n\n",
                entry.author_name.as_deref().unwrap_or("unknown"),
                entry.role,
                entry.content,
            ));
        }
    }

    prompt.push_str("== YOUR ASSIGNMENT ==\n");
    if first {
        prompt.push_str(&format!(
            "You are {} ({}). You go first: produce a detailed plan your \
             teammates can build on.",
            agent.name, agent.role
        ));
    } else {
        prompt.push_str(&format!(
            "You are {} ({}). Your teammates above have already responded; \
             build on their work and do not repeat it.",
            agent.name, agent.role
        ));
    }
    prompt.push_str(
        " Use your tools to read and modify project files when your part calls for it.\n",
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorum_llm::ProviderKind;

    fn config(id: &str, name: &str, role: &str) -> AgentConfig {
        AgentConfig::new(id, name, role, ProviderKind::Ollama, "m")
    }

    fn entry(name: &str, role: &str, content: &str) -> TranscriptEntry {
        TranscriptEntry {
            author_id: Some(name.to_lowercase().into()),
            author_name: Some(name.into()),
            role: role.into(),
            content: content.into(),
            timestamp: chrono::Utc::now(),
        }
    }

    #[test]
    fn first_agent_gets_no_teammate_section() {
        let prompt = build_prompt("add /health", &[], &config("p", "Planner", "Planner"), true);
        assert!(prompt.starts_with("== USER REQUEST ==\nadd /health\n"));
        assert!(!prompt.contains("== TEAMMATE RESPONSES =="));
        assert!(prompt.contains("You go first"));
    }

    #[test]
    fn later_agents_see_prior_replies_formatted() {
        let teammates = [entry("Planner", "Planner", "the plan P")];
        let prompt = build_prompt(
            "add /health",
            &teammates,
            &config("b", "Builder", "Backend Developer"),
            false,
        );
        assert!(prompt.contains("== TEAMMATE RESPONSES ==\n--- Planner (Planner) ---\nthe plan P"));
        assert!(prompt.contains("build on their work"));
        assert!(prompt.contains("Builder (Backend Developer)"));
    }
}
