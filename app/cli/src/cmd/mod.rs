//! CLI argument parsing and command dispatch.

use crate::session::Session;
use anyhow::Result;
use clap::{Parser, Subcommand};
use quorum_llm::ProviderKind;
use std::path::PathBuf;

pub mod chat;
pub mod config;
pub mod models;
pub mod send;
pub mod team;

/// Terminal multi-agent coding assistant.
#[derive(Parser, Debug)]
#[command(name = "quorum", about = "Terminal multi-agent coding assistant")]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Project directory the sandbox is rooted at (defaults to cwd).
    #[arg(long, global = true)]
    pub directory: Option<PathBuf>,

    /// Safe mode: additionally block network utilities and installers.
    #[arg(long, global = true)]
    pub safe: bool,

    /// Provider override.
    #[arg(long, global = true)]
    pub provider: Option<ProviderKind>,

    /// Model override.
    #[arg(long, global = true)]
    pub model: Option<String>,
}

impl Cli {
    /// Dispatch the parsed command.
    pub async fn run(self) -> Result<()> {
        let session = Session::new(self.directory.clone(), self.safe)?;
        let provider = self.provider;
        let model = self.model.clone();
        match self.command {
            Command::Chat(cmd) => cmd.run(&session, provider, model.as_deref()).await,
            Command::Send(cmd) => cmd.run(&session, provider, model.as_deref()).await,
            Command::Team(cmd) => cmd.run(session, provider, model.as_deref()).await,
            Command::Models(cmd) => cmd.run(&session).await,
            Command::Config(cmd) => cmd.run(&session),
        }
    }
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start an interactive chat with a single agent.
    Chat(chat::Chat),
    /// Send a one-shot message to a single agent.
    Send(send::Send),
    /// Manage and drive agent teams.
    #[command(subcommand)]
    Team(team::TeamCommand),
    /// List locally installed Ollama models.
    Models(models::Models),
    /// Inspect CLI configuration.
    #[command(subcommand)]
    Config(config::ConfigCommand),
}
