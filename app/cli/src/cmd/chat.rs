//! `quorum chat` — interactive single-agent REPL.

use crate::repl::ChatRepl;
use crate::session::Session;
use anyhow::Result;
use clap::Args;
use quorum_llm::ProviderKind;

/// Start an interactive chat with a single agent.
#[derive(Args, Debug)]
pub struct Chat {}

impl Chat {
    /// Bind the assistant and run the REPL.
    pub async fn run(
        self,
        session: &Session,
        provider: Option<ProviderKind>,
        model: Option<&str>,
    ) -> Result<()> {
        let agent = session.assistant(provider, model)?;
        ChatRepl::new(session, agent)?.run().await
    }
}
