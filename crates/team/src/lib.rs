//! Teams of agents: the sequential broadcast channel and persistence.
//!
//! A team is an ordered list of agents. The channel broadcasts one user
//! turn to every member in order, and each member sees the replies of the
//! members before it — that handoff is the whole point of the ordering.

pub use channel::{BroadcastReply, TeamChannel, TeamSink};
pub use manager::TeamManager;
pub use preset::default_preset;
pub use store::{CONFIG_KEY_SENTINEL, TeamRecord, TeamStore, TeamSummary, safe_name};
pub use team::Team;
pub use transcript::{PROMPT_WINDOW, SharedTranscript, TranscriptEntry};

mod channel;
mod manager;
mod preset;
mod store;
mod team;
mod transcript;
