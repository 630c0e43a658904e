//! Process-wide wiring: config, sandbox, manager, prices.

use crate::config::AppConfig;
use anyhow::{Context, Result};
use quorum_agent::{Agent, AgentConfig, ProviderDefaults};
use quorum_llm::{PriceTable, Provider, ProviderKind};
use quorum_sandbox::{Sandbox, SandboxPolicy};
use quorum_team::{TeamManager, TeamStore};
use std::path::PathBuf;
use std::sync::Arc;

/// Everything one CLI invocation needs, built once at startup.
pub struct Session {
    /// Loaded app configuration.
    pub config: AppConfig,
    /// Shared tool sandbox rooted at the project directory.
    pub sandbox: Arc<Sandbox>,
    /// Team manager over the default store.
    pub manager: TeamManager,
    /// Rate table with config overrides.
    pub prices: PriceTable,
    defaults: ProviderDefaults,
    client: reqwest::Client,
}

impl Session {
    /// Build a session for the given project directory (defaults to cwd).
    pub fn new(directory: Option<PathBuf>, safe_mode: bool) -> Result<Self> {
        let config = AppConfig::load()?;
        let root = match directory {
            Some(dir) => dir,
            None => std::env::current_dir().context("cannot determine working directory")?,
        };
        let policy = SandboxPolicy::new(&root)?
            .with_safe_mode(safe_mode || config.safe_mode)
            .with_bounds(config.max_rounds, config.max_tool_calls_per_round);
        let sandbox = Arc::new(Sandbox::new(policy));
        let client = reqwest::Client::new();
        let defaults = config.provider_defaults();
        let store = TeamStore::open_default()?;
        let manager = TeamManager::new(
            store,
            defaults.clone(),
            client.clone(),
            Arc::clone(&sandbox),
        );
        let prices = config.price_table();
        Ok(Self {
            config,
            sandbox,
            manager,
            prices,
            defaults,
            client,
        })
    }

    /// Resolve provider/model from flags, falling back to config defaults.
    pub fn resolve_target(
        &self,
        provider: Option<ProviderKind>,
        model: Option<&str>,
    ) -> (ProviderKind, String) {
        (
            provider.unwrap_or(self.config.provider),
            model.unwrap_or(&self.config.model).to_owned(),
        )
    }

    /// Build and bind the single-agent chat assistant.
    pub fn assistant(
        &self,
        provider: Option<ProviderKind>,
        model: Option<&str>,
    ) -> Result<Agent<Provider>> {
        let (provider, model) = self.resolve_target(provider, model);
        let config = AgentConfig::new("assistant", "Assistant", "Coding Assistant", provider, model);
        Agent::connect(
            config,
            &self.defaults,
            self.client.clone(),
            Arc::clone(&self.sandbox),
        )
    }

    /// The effective Ollama base URL.
    pub fn ollama_base(&self) -> String {
        self.defaults.ollama_base().to_owned()
    }

    /// Print per-tool call statistics for this session.
    pub fn print_tool_stats(&self) {
        let stats = self.sandbox.log().stats();
        if stats.is_empty() {
            println!("(no tool calls this session)");
            return;
        }
        println!("tool        calls  ok");
        for (tool, s) in stats {
            println!("{tool:<12}{:>5}{:>5}", s.calls, s.ok);
        }
    }
}
