//! A team: an ordered collection of agents under one name.

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use quorum_agent::Agent;
use quorum_llm::{Chat, Provider};

/// An ordered team of agents. The order is the broadcast order.
pub struct Team<C: Chat = Provider> {
    /// Team name (also the persistence key).
    pub name: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last structural change (agent added/removed, loaded).
    pub updated_at: DateTime<Utc>,
    /// Members, in broadcast order.
    pub agents: Vec<Agent<C>>,
}

impl<C: Chat> Team<C> {
    /// Create an empty team.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            created_at: now,
            updated_at: now,
            agents: Vec::new(),
        }
    }

    /// Append an agent. Ids must be unique within the team.
    pub fn add_agent(&mut self, agent: Agent<C>) -> Result<()> {
        if self.agents.iter().any(|a| a.config.id == agent.config.id) {
            bail!(
                "agent id '{}' already exists in team '{}'",
                agent.config.id,
                self.name
            );
        }
        self.agents.push(agent);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Remove an agent by id, returning it when found.
    pub fn remove_agent(&mut self, id: &str) -> Option<Agent<C>> {
        let idx = self.agents.iter().position(|a| a.config.id == id)?;
        self.updated_at = Utc::now();
        Some(self.agents.remove(idx))
    }

    /// Find an agent by id.
    pub fn agent(&self, id: &str) -> Option<&Agent<C>> {
        self.agents.iter().find(|a| a.config.id == id)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the team has no members.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
