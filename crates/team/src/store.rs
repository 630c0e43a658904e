//! On-disk team records.
//!
//! Teams persist as `{dir}/{safeName}.json`. An agent that inherits the
//! process-wide config key serializes its `apiKey` as the literal
//! `"__config__"` sentinel — real keys sourced from config never land in
//! a team file. The sentinel deserializes back to `None`, and the agent
//! falls back to the config lookup at bind time.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use quorum_agent::AgentConfig;
use quorum_llm::Chat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Sentinel standing in for "use the config default key".
///
/// A magic string rather than a tagged union: the value is part of the
/// on-disk wire format.
pub const CONFIG_KEY_SENTINEL: &str = "__config__";

/// Fold a team name into a filesystem-safe key.
pub fn safe_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Serialized form of one team.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRecord {
    /// Team name (the display name, not the folded key).
    pub name: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// Member configs in broadcast order.
    pub agents: Vec<AgentConfig>,
}

impl TeamRecord {
    /// Build a record from a live team, masking inherited keys.
    pub fn from_team<C: Chat>(team: &crate::Team<C>) -> Self {
        let agents = team
            .agents
            .iter()
            .map(|agent| {
                let mut config = agent.config.clone();
                config.api_key = Some(
                    config
                        .api_key
                        .unwrap_or_else(|| CONFIG_KEY_SENTINEL.to_owned()),
                );
                config
            })
            .collect();
        Self {
            name: team.name.clone(),
            created_at: team.created_at,
            updated_at: team.updated_at,
            agents,
        }
    }

    /// Member configs with the sentinel mapped back to `None`.
    pub fn configs(&self) -> Vec<AgentConfig> {
        self.agents
            .iter()
            .map(|config| {
                let mut config = config.clone();
                if config.api_key.as_deref() == Some(CONFIG_KEY_SENTINEL) {
                    config.api_key = None;
                }
                config
            })
            .collect()
    }
}

/// Listing row for `team list`.
#[derive(Debug, Clone)]
pub struct TeamSummary {
    /// Team name.
    pub name: String,
    /// Number of member agents.
    pub agent_count: usize,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Directory-backed team storage.
pub struct TeamStore {
    dir: PathBuf,
}

impl TeamStore {
    /// Open a store over an explicit directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Open the default store at `~/.quorum/teams`.
    pub fn open_default() -> Result<Self> {
        let home = dirs::home_dir().context("no home directory")?;
        Ok(Self::new(home.join(".quorum").join("teams")))
    }

    /// The backing directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file path a team name maps to.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", safe_name(name)))
    }

    /// Persist a record, creating the directory on first use.
    pub fn save(&self, record: &TeamRecord) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        let path = self.path_for(&record.name);
        let json = serde_json::to_string_pretty(record)?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Load a record by team name.
    pub fn load(&self, name: &str) -> Result<TeamRecord> {
        let path = self.path_for(name);
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("team '{name}' not found at {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("malformed team file {}", path.display()))
    }

    /// Summaries of every stored team.
    pub fn list(&self) -> Result<Vec<TeamSummary>> {
        let mut summaries = Vec::new();
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return Ok(summaries), // nothing saved yet
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match std::fs::read_to_string(&path)
                .map_err(anyhow::Error::from)
                .and_then(|json| serde_json::from_str::<TeamRecord>(&json).map_err(Into::into))
            {
                Ok(record) => summaries.push(TeamSummary {
                    name: record.name,
                    agent_count: record.agents.len(),
                    created_at: record.created_at,
                    updated_at: record.updated_at,
                }),
                Err(e) => tracing::warn!("skipping unreadable team file {}: {e}", path.display()),
            }
        }
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(summaries)
    }

    /// Delete a stored team. Returns whether a file was removed.
    pub fn delete(&self, name: &str) -> Result<bool> {
        let path = self.path_for(name);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("failed to delete {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_name_folds_specials() {
        assert_eq!(safe_name("My Team!"), "My_Team_");
        assert_eq!(safe_name("dev/ops"), "dev_ops");
        assert_eq!(safe_name("plain-name_1"), "plain-name_1");
    }
}
