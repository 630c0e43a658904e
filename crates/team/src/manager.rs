//! The team manager: current team + store, with provider binding.

use crate::preset::default_preset;
use crate::store::{TeamRecord, TeamStore, TeamSummary};
use crate::team::Team;
use anyhow::{Context, Result, bail};
use quorum_agent::{Agent, AgentConfig, ProviderDefaults};
use quorum_llm::ProviderKind;
use quorum_sandbox::Sandbox;
use std::path::PathBuf;
use std::sync::Arc;

/// Owns the currently selected team and everything needed to
/// reconstruct agents from stored configs.
pub struct TeamManager {
    store: TeamStore,
    defaults: ProviderDefaults,
    client: reqwest::Client,
    sandbox: Arc<Sandbox>,
    current: Option<Team>,
}

impl TeamManager {
    /// Create a manager over a store.
    pub fn new(
        store: TeamStore,
        defaults: ProviderDefaults,
        client: reqwest::Client,
        sandbox: Arc<Sandbox>,
    ) -> Self {
        Self {
            store,
            defaults,
            client,
            sandbox,
            current: None,
        }
    }

    /// The currently selected team.
    pub fn current(&self) -> Option<&Team> {
        self.current.as_ref()
    }

    /// Mutable access to the current team.
    pub fn current_mut(&mut self) -> Option<&mut Team> {
        self.current.as_mut()
    }

    /// Create a fresh empty team and select it.
    pub fn create(&mut self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            bail!("team name must not be empty");
        }
        self.current = Some(Team::new(name));
        Ok(())
    }

    /// Create the built-in preset team and select it.
    ///
    /// Architect → Frontend → Backend → Reviewer → DevOps. The order is
    /// load-bearing: the channel's sequential discipline is what makes
    /// the handoff work.
    pub fn create_preset(
        &mut self,
        name: &str,
        provider: ProviderKind,
        model: &str,
    ) -> Result<()> {
        self.create(name)?;
        for config in default_preset(provider, model) {
            self.add_agent(config)?;
        }
        Ok(())
    }

    /// Bind a provider for the config and add the agent to the current team.
    pub fn add_agent(&mut self, config: AgentConfig) -> Result<()> {
        let team = self
            .current
            .as_mut()
            .context("no team selected; create or load one first")?;
        let agent = Agent::connect(
            config,
            &self.defaults,
            self.client.clone(),
            Arc::clone(&self.sandbox),
        )?;
        team.add_agent(agent)
    }

    /// Remove an agent from the current team. Returns whether it existed.
    pub fn remove_agent(&mut self, id: &str) -> Result<bool> {
        let team = self.current.as_mut().context("no team selected")?;
        Ok(team.remove_agent(id).is_some())
    }

    /// Save the current team, optionally under a new name.
    pub fn save(&mut self, name: Option<&str>) -> Result<PathBuf> {
        let team = self.current.as_mut().context("no team to save")?;
        if let Some(name) = name {
            team.name = name.to_owned();
        }
        team.updated_at = chrono::Utc::now();
        self.store.save(&TeamRecord::from_team(team))
    }

    /// Load a stored team, reconstructing and binding every agent.
    pub fn load(&mut self, name: &str) -> Result<()> {
        let record = self.store.load(name)?;
        let mut team = Team::new(record.name.clone());
        team.created_at = record.created_at;
        team.updated_at = record.updated_at;
        for config in record.configs() {
            let agent = Agent::connect(
                config,
                &self.defaults,
                self.client.clone(),
                Arc::clone(&self.sandbox),
            )?;
            team.add_agent(agent)?;
        }
        self.current = Some(team);
        Ok(())
    }

    /// Summaries of every stored team.
    pub fn list(&self) -> Result<Vec<TeamSummary>> {
        self.store.list()
    }

    /// Delete a stored team; deselects it when it was current.
    pub fn delete(&mut self, name: &str) -> Result<bool> {
        let removed = self.store.delete(name)?;
        if self
            .current
            .as_ref()
            .is_some_and(|team| team.name == name)
        {
            self.current = None;
        }
        Ok(removed)
    }
}
