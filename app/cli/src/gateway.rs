//! Interactive permission gateway for the single-agent surfaces.

use quorum_agent::Gateway;
use std::io::Write;

/// Prompts on stdin for every dangerous tool call. Anything but an
/// explicit `y`/`yes` denies.
pub struct InteractiveGateway;

impl Gateway for InteractiveGateway {
    fn allow(&self, tool: &str, detail: &str) -> bool {
        print!("Allow {tool}: {detail}? [y/N] ");
        let _ = std::io::stdout().flush();
        let mut line = String::new();
        if std::io::stdin().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
    }
}
