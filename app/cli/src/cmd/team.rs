//! `quorum team` — manage teams and drive broadcasts.

use crate::session::Session;
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use quorum_agent::AgentConfig;
use quorum_llm::ProviderKind;
use quorum_team::{TeamChannel, TeamSink};
use serde_json::Value;

/// Team management and broadcast subcommands.
#[derive(Subcommand, Debug)]
pub enum TeamCommand {
    /// Create and save an empty team.
    Create(Create),
    /// Create and save the built-in five-agent preset team.
    Preset(Preset),
    /// Add an agent to a stored team.
    Add(Add),
    /// Remove an agent from a stored team.
    Remove(Remove),
    /// List stored teams.
    List,
    /// Delete a stored team.
    Delete(Delete),
    /// Broadcast a message to every member of a stored team, in order.
    Tell(Tell),
}

impl TeamCommand {
    /// Dispatch the team subcommand.
    pub async fn run(
        self,
        mut session: Session,
        provider: Option<ProviderKind>,
        model: Option<&str>,
    ) -> Result<()> {
        match self {
            Self::Create(cmd) => {
                session.manager.create(&cmd.name)?;
                let path = session.manager.save(None)?;
                println!("created team '{}' at {}", cmd.name, path.display());
                Ok(())
            }
            Self::Preset(cmd) => {
                let (provider, model) = session.resolve_target(provider, model);
                session.manager.create_preset(&cmd.name, provider, &model)?;
                let path = session.manager.save(None)?;
                println!(
                    "created preset team '{}' ({provider}/{model}) at {}",
                    cmd.name,
                    path.display()
                );
                Ok(())
            }
            Self::Add(cmd) => {
                // Provider and model come from the global flags.
                let (provider, model) = session.resolve_target(provider, model);
                session.manager.load(&cmd.team)?;
                let mut config =
                    AgentConfig::new(cmd.id.clone(), cmd.name, cmd.role, provider, model);
                config.system_prompt = cmd.system_prompt;
                config.api_key = cmd.api_key;
                config.ollama_base_url = cmd.base_url;
                session.manager.add_agent(config)?;
                session.manager.save(None)?;
                println!("added agent '{}' to team '{}'", cmd.id, cmd.team);
                Ok(())
            }
            Self::Remove(cmd) => {
                session.manager.load(&cmd.team)?;
                if session.manager.remove_agent(&cmd.id)? {
                    session.manager.save(None)?;
                    println!("removed agent '{}' from team '{}'", cmd.id, cmd.team);
                } else {
                    println!("no agent '{}' in team '{}'", cmd.id, cmd.team);
                }
                Ok(())
            }
            Self::List => {
                let teams = session.manager.list()?;
                if teams.is_empty() {
                    println!("(no teams saved)");
                    return Ok(());
                }
                for team in teams {
                    println!(
                        "{:<24} {:>2} agents  updated {}",
                        team.name,
                        team.agent_count,
                        team.updated_at.format("%Y-%m-%d %H:%M"),
                    );
                }
                Ok(())
            }
            Self::Delete(cmd) => {
                if session.manager.delete(&cmd.name)? {
                    println!("deleted team '{}'", cmd.name);
                } else {
                    println!("no team '{}'", cmd.name);
                }
                Ok(())
            }
            Self::Tell(cmd) => cmd.run(session).await,
        }
    }
}

/// Arguments for `team create`.
#[derive(Args, Debug)]
pub struct Create {
    /// Team name.
    pub name: String,
}

/// Arguments for `team preset`.
#[derive(Args, Debug)]
pub struct Preset {
    /// Team name.
    pub name: String,
}

/// Arguments for `team add`.
#[derive(Args, Debug)]
pub struct Add {
    /// Team to modify.
    pub team: String,
    /// Unique agent id within the team.
    pub id: String,
    /// Display name.
    #[arg(long)]
    pub name: String,
    /// Free-text role.
    #[arg(long)]
    pub role: String,
    /// System-prompt override.
    #[arg(long)]
    pub system_prompt: Option<String>,
    /// Explicit API key (omit to inherit the config default).
    #[arg(long)]
    pub api_key: Option<String>,
    /// Endpoint override (Ollama base URL).
    #[arg(long)]
    pub base_url: Option<String>,
}

/// Arguments for `team remove`.
#[derive(Args, Debug)]
pub struct Remove {
    /// Team to modify.
    pub team: String,
    /// Agent id to remove.
    pub id: String,
}

/// Arguments for `team delete`.
#[derive(Args, Debug)]
pub struct Delete {
    /// Team to delete.
    pub name: String,
}

/// Arguments for `team tell`.
#[derive(Args, Debug)]
pub struct Tell {
    /// Team to broadcast to.
    pub team: String,
    /// The user message.
    pub message: String,
    /// Print tool-call statistics afterwards.
    #[arg(long)]
    pub stats: bool,
}

impl Tell {
    async fn run(self, mut session: Session) -> Result<()> {
        session.manager.load(&self.team)?;
        let prices = session.prices.clone();
        let team = session
            .manager
            .current_mut()
            .context("no team selected")?;

        let mut channel = TeamChannel::new();
        let replies = channel
            .broadcast(team, &self.message, &PrintSink, Some(&prices))
            .await?;

        let failed = replies.iter().filter(|r| !r.ok).count();
        if failed > 0 {
            println!("\n{failed} of {} agents failed", replies.len());
        }
        if self.stats {
            session.print_tool_stats();
        }
        Ok(())
    }
}

/// Prints broadcast progress to the terminal.
struct PrintSink;

impl TeamSink for PrintSink {
    fn agent_thinking(&self, agent: &AgentConfig) {
        println!("\n◆ {} ({}) is thinking…", agent.name, agent.role);
    }

    fn agent_tool_call(&self, agent: &AgentConfig, tool: &str, args: &Value) {
        let detail = quorum_agent::describe_tool_call(tool, args);
        println!("  ⚙ {} → {tool}: {detail}", agent.name);
    }

    fn agent_tool_result(&self, _agent: &AgentConfig, tool: &str, ok: bool) {
        if !ok {
            println!("  ⚠ {tool} failed");
        }
    }

    fn agent_responded(&self, agent: &AgentConfig, reply: &str) {
        println!("\n--- {} ({}) ---\n{reply}", agent.name, agent.role);
    }

    fn agent_error(&self, agent: &AgentConfig, error: &str) {
        eprintln!("\n--- {} ({}) ---\n{error}", agent.name, agent.role);
    }
}
