//! The shared team transcript.

use chrono::{DateTime, Utc};
use compact_str::CompactString;
use quorum_agent::AgentConfig;

/// How many trailing entries feed into a broadcast prompt.
pub const PROMPT_WINDOW: usize = 50;

/// One transcript entry. `author_id` of `None` marks the user.
#[derive(Debug, Clone)]
pub struct TranscriptEntry {
    /// Authoring agent id; `None` for the user.
    pub author_id: Option<CompactString>,
    /// Authoring agent name; `None` for the user.
    pub author_name: Option<CompactString>,
    /// "user" or the agent's free-text role.
    pub role: CompactString,
    /// Entry text.
    pub content: String,
    /// Append time.
    pub timestamp: DateTime<Utc>,
}

/// Monotonic, channel-owned transcript. Grows for the whole session;
/// only an explicit reset clears it.
#[derive(Debug, Default)]
pub struct SharedTranscript {
    entries: Vec<TranscriptEntry>,
}

impl SharedTranscript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user entry.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.entries.push(TranscriptEntry {
            author_id: None,
            author_name: None,
            role: "user".into(),
            content: content.into(),
            timestamp: Utc::now(),
        });
    }

    /// Append an agent entry.
    pub fn push_agent(&mut self, agent: &AgentConfig, content: impl Into<String>) {
        self.entries.push(TranscriptEntry {
            author_id: Some(agent.id.clone()),
            author_name: Some(agent.name.clone()),
            role: agent.role.as_str().into(),
            content: content.into(),
            timestamp: Utc::now(),
        });
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// The trailing `k` entries (all of them when shorter).
    pub fn window(&self, k: usize) -> &[TranscriptEntry] {
        let start = self.entries.len().saturating_sub(k);
        &self.entries[start..]
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the transcript is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Explicit reset — the only way the transcript shrinks.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorum_llm::ProviderKind;

    fn config(id: &str) -> AgentConfig {
        AgentConfig::new(id, "Name", "Role", ProviderKind::Ollama, "m")
    }

    #[test]
    fn window_takes_the_tail() {
        let mut transcript = SharedTranscript::new();
        for i in 0..60 {
            transcript.push_user(format!("msg{i}"));
        }
        let window = transcript.window(PROMPT_WINDOW);
        assert_eq!(window.len(), 50);
        assert_eq!(window[0].content, "msg10");
        assert_eq!(window[49].content, "msg59");
    }

    #[test]
    fn user_and_agent_entries_are_distinguishable() {
        let mut transcript = SharedTranscript::new();
        transcript.push_user("hello");
        transcript.push_agent(&config("a1"), "reply");

        assert!(transcript.entries()[0].author_id.is_none());
        assert_eq!(transcript.entries()[0].role, "user");
        assert_eq!(
            transcript.entries()[1].author_id.as_deref(),
            Some("a1")
        );
    }

    #[test]
    fn clear_is_the_only_shrink() {
        let mut transcript = SharedTranscript::new();
        transcript.push_user("x");
        transcript.clear();
        assert!(transcript.is_empty());
    }
}
