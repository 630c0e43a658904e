//! `quorum config` — inspect the app configuration.

use crate::config::config_path;
use crate::session::Session;
use anyhow::Result;
use clap::Subcommand;

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration (keys masked).
    Show,
    /// Print the config file path.
    Path,
}

impl ConfigCommand {
    /// Dispatch the config subcommand.
    pub fn run(self, session: &Session) -> Result<()> {
        match self {
            Self::Show => {
                let mut value = serde_json::to_value(&session.config)?;
                if let Some(keys) = value.get_mut("apiKeys").and_then(|k| k.as_object_mut()) {
                    for (_, key) in keys.iter_mut() {
                        if key.as_str().is_some_and(|s| !s.is_empty()) {
                            *key = serde_json::Value::String("********".to_owned());
                        }
                    }
                }
                println!("{}", serde_json::to_string_pretty(&value)?);
                Ok(())
            }
            Self::Path => {
                println!("{}", config_path()?.display());
                Ok(())
            }
        }
    }
}
