//! `quorum send` — one-shot single-agent message.

use crate::gateway::InteractiveGateway;
use crate::session::Session;
use anyhow::Result;
use clap::Args;
use quorum_agent::{AutoAllow, Gateway, SendOptions};
use quorum_llm::ProviderKind;

/// Send one message and print the reply.
#[derive(Args, Debug)]
pub struct Send {
    /// The message text.
    pub message: String,

    /// Approve all tool calls without prompting.
    #[arg(long)]
    pub yes: bool,

    /// Print tool-call statistics afterwards.
    #[arg(long)]
    pub stats: bool,
}

impl Send {
    /// Run the one-shot turn.
    pub async fn run(
        self,
        session: &Session,
        provider: Option<ProviderKind>,
        model: Option<&str>,
    ) -> Result<()> {
        let mut agent = session.assistant(provider, model)?;
        let gateway: &dyn Gateway = if self.yes {
            &AutoAllow
        } else {
            &InteractiveGateway
        };
        let opts = SendOptions {
            include_history: false,
            gateway: Some(gateway),
            sink: None,
            prices: Some(&session.prices),
        };
        let reply = agent.send_message(&self.message, &opts).await?;
        println!("{reply}");
        if self.stats {
            session.print_tool_stats();
        }
        Ok(())
    }
}
