//! Interactive single-agent chat REPL with persistent history.

use crate::config::quorum_dir;
use crate::gateway::InteractiveGateway;
use crate::session::Session;
use anyhow::Result;
use quorum_agent::{Agent, SendOptions};
use quorum_llm::Provider;
use rustyline::error::ReadlineError;
use std::path::PathBuf;

/// The chat REPL: one agent, DM history, interactive permissions.
pub struct ChatRepl<'a> {
    session: &'a Session,
    agent: Agent<Provider>,
    editor: rustyline::DefaultEditor,
    history_path: Option<PathBuf>,
}

impl<'a> ChatRepl<'a> {
    /// Create a REPL around an already-bound agent.
    pub fn new(session: &'a Session, agent: Agent<Provider>) -> Result<Self> {
        let mut editor = rustyline::DefaultEditor::new()?;
        let history_path = quorum_dir().ok().map(|d| d.join("history"));
        if let Some(path) = &history_path {
            let _ = editor.load_history(path);
        }
        Ok(Self {
            session,
            agent,
            editor,
            history_path,
        })
    }

    /// Run the loop until Ctrl+D or `/quit`.
    pub async fn run(&mut self) -> Result<()> {
        println!(
            "quorum chat — {} on {} (Ctrl+D to exit, /reset clears history, /stats shows tool use)",
            self.agent.config.provider, self.agent.config.model
        );
        println!("---");

        loop {
            match self.editor.readline("> ") {
                Ok(line) => {
                    let line = line.trim().to_owned();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = self.editor.add_history_entry(&line);
                    match line.as_str() {
                        "/quit" | "/exit" => break,
                        "/reset" => {
                            self.agent.reset_history();
                            println!("(history cleared)");
                        }
                        "/stats" => self.session.print_tool_stats(),
                        _ => self.turn(&line).await,
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(e) => return Err(e.into()),
            }
        }

        self.save_history();
        Ok(())
    }

    async fn turn(&mut self, text: &str) {
        let opts = SendOptions {
            include_history: true,
            gateway: Some(&InteractiveGateway),
            sink: None,
            prices: Some(&self.session.prices),
        };
        match self.agent.send_message(text, &opts).await {
            Ok(reply) => println!("{reply}\n"),
            Err(e) => eprintln!("error: {e}\n"),
        }
    }

    fn save_history(&mut self) {
        if let Some(path) = &self.history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = self.editor.save_history(path);
        }
    }
}
