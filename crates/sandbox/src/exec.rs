//! The bash tool.

use crate::guard;
use crate::policy::SandboxPolicy;
use crate::sandbox::ToolResult;
use serde::Deserialize;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

#[derive(Debug, Deserialize)]
pub struct BashArgs {
    pub command: String,
    #[serde(default)]
    pub workdir: Option<String>,
    #[serde(default)]
    pub timeout: Option<u64>,
}

/// Run a shell command under the policy's deny-list, path jail, and timeout.
///
/// The command is passed as a single argument to `sh -c` — the OS handles
/// argument escaping, never string concatenation here.
pub async fn bash(policy: &SandboxPolicy, args: &BashArgs) -> ToolResult {
    if let Err(reason) = guard::check_command(&args.command, policy.safe_mode) {
        return ToolResult::blocked(reason);
    }

    let workdir = match &args.workdir {
        Some(dir) => match guard::resolve_within(dir, policy) {
            Ok(path) => path,
            Err(reason) => return ToolResult::blocked(reason),
        },
        None => policy.project_root.clone(),
    };
    if !workdir.is_dir() {
        return ToolResult::err(format!("Error: workdir {} is not a directory", workdir.display()));
    }

    let secs = policy.bash_timeout_secs(args.timeout);
    let child = Command::new("sh")
        .arg("-c")
        .arg(&args.command)
        .current_dir(&workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn();

    let child = match child {
        Ok(child) => child,
        Err(e) => return ToolResult::err(format!("Error: failed to spawn command: {e}")),
    };

    // On timeout the future is dropped and kill_on_drop reaps the child.
    let output = match tokio::time::timeout(Duration::from_secs(secs), child.wait_with_output())
        .await
    {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => return ToolResult::err(format!("Error: command failed: {e}")),
        Err(_) => {
            return ToolResult::err(format!("Command timed out after {secs}s"));
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let combined = match (stdout.trim().is_empty(), stderr.trim().is_empty()) {
        (false, true) => stdout.into_owned(),
        (true, false) => stderr.into_owned(),
        (false, false) => format!("{stdout}\n--- stderr ---\n{stderr}"),
        (true, true) => String::new(),
    };

    if output.status.success() {
        ToolResult::ok(if combined.is_empty() {
            "(no output)".to_owned()
        } else {
            combined
        })
    } else if combined.is_empty() {
        ToolResult::err(format!(
            "Error: command exited with status {}",
            output.status.code().unwrap_or(-1)
        ))
    } else {
        // Non-zero exit with output: the model sees the output either way.
        ToolResult {
            content: combined,
            ok: false,
        }
    }
}
