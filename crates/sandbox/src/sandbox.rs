//! The sandbox handle: dispatch, truncation, logging.

use crate::output::truncate;
use crate::policy::SandboxPolicy;
use crate::{exec, fetch, files, log::ToolLog, schema, search};
use quorum_llm::Tool;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// The outcome of one tool invocation.
///
/// Tool failures are values, never errors: blocked calls return a
/// `Blocked: …` string, execution failures an `Error: …` string, and the
/// model is expected to adapt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    /// Result text delivered to the model.
    pub content: String,
    /// Success flag, recorded in the tool log.
    pub ok: bool,
}

impl ToolResult {
    /// A successful result.
    pub fn ok(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ok: true,
        }
    }

    /// A failed result.
    pub fn err(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ok: false,
        }
    }

    /// A validation block.
    pub fn blocked(reason: impl std::fmt::Display) -> Self {
        Self {
            content: format!("Blocked: {reason}"),
            ok: false,
        }
    }

    /// Whether this result is a sandbox block.
    pub fn is_blocked(&self) -> bool {
        self.content.starts_with("Blocked: ")
    }
}

/// Process-scoped tool sandbox, shared by all agents.
///
/// Holds no per-agent state beyond the log. Constructed once by the host
/// and passed as a handle to each agent runtime.
pub struct Sandbox {
    policy: SandboxPolicy,
    client: reqwest::Client,
    log: ToolLog,
}

impl Sandbox {
    /// Create a sandbox with the given policy.
    pub fn new(policy: SandboxPolicy) -> Self {
        Self {
            policy,
            client: reqwest::Client::new(),
            log: ToolLog::new(),
        }
    }

    /// The active policy.
    pub fn policy(&self) -> &SandboxPolicy {
        &self.policy
    }

    /// The tool-call log.
    pub fn log(&self) -> &ToolLog {
        &self.log
    }

    /// Declarations for every sandboxed tool.
    pub fn definitions(&self) -> Vec<Tool> {
        schema::definitions()
    }

    /// Execute one tool call: validate, run, truncate, log.
    pub async fn run(&self, agent_id: &str, tool: &str, args: &Value) -> ToolResult {
        let raw = self.dispatch(tool, args).await;
        let result = ToolResult {
            content: truncate(&raw.content, self.policy.max_result_bytes),
            ok: raw.ok,
        };
        self.log
            .append(agent_id, tool, args, &result.content, result.ok);
        tracing::debug!(agent_id, tool, ok = result.ok, "tool call");
        result
    }

    async fn dispatch(&self, tool: &str, args: &Value) -> ToolResult {
        match tool {
            "bash" => match parse::<exec::BashArgs>(args) {
                Ok(args) => exec::bash(&self.policy, &args).await,
                Err(result) => result,
            },
            "read" => match parse::<files::ReadArgs>(args) {
                Ok(args) => files::read(&self.policy, &args).await,
                Err(result) => result,
            },
            "write" => match parse::<files::WriteArgs>(args) {
                Ok(args) => files::write(&self.policy, &args).await,
                Err(result) => result,
            },
            "edit" => match parse::<files::EditArgs>(args) {
                Ok(args) => files::edit(&self.policy, &args).await,
                Err(result) => result,
            },
            "glob" => match parse::<search::GlobArgs>(args) {
                Ok(args) => search::glob(&self.policy, &args),
                Err(result) => result,
            },
            "grep" => match parse::<search::GrepArgs>(args) {
                Ok(args) => search::grep(&self.policy, &args),
                Err(result) => result,
            },
            "webfetch" => match parse::<fetch::FetchArgs>(args) {
                Ok(args) => fetch::webfetch(&self.policy, &self.client, &args).await,
                Err(result) => result,
            },
            other => ToolResult::err(format!("Error: unknown tool '{other}'")),
        }
    }
}

fn parse<T: DeserializeOwned>(args: &Value) -> Result<T, ToolResult> {
    serde_json::from_value(args.clone())
        .map_err(|e| ToolResult::err(format!("Error: invalid arguments: {e}")))
}
