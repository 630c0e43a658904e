//! `quorum models` — Ollama model discovery.

use crate::session::Session;
use anyhow::Result;
use clap::Args;
use quorum_llm::list_models;

/// List models installed on the local Ollama daemon.
#[derive(Args, Debug)]
pub struct Models {
    /// Ollama base URL override.
    #[arg(long)]
    pub base_url: Option<String>,
}

impl Models {
    /// Query `GET {base}/api/tags` and print the result.
    pub async fn run(self, session: &Session) -> Result<()> {
        let base = self.base_url.unwrap_or_else(|| session.ollama_base());
        let models = list_models(&reqwest::Client::new(), &base).await?;
        if models.is_empty() {
            println!("(no models installed at {base})");
            return Ok(());
        }
        for model in models {
            println!(
                "{:<32} {:>8.1} MB  {}",
                model.name,
                model.size as f64 / (1024.0 * 1024.0),
                model.modified_at,
            );
        }
        Ok(())
    }
}
