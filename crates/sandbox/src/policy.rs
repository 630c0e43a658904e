//! Sandbox policy: the resource and safety bounds every tool call obeys.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Default bash timeout in seconds.
pub const DEFAULT_BASH_TIMEOUT: u64 = 10;
/// Hard cap on bash timeout in seconds.
pub const MAX_BASH_TIMEOUT: u64 = 120;
/// Default webfetch timeout in seconds.
pub const DEFAULT_FETCH_TIMEOUT: u64 = 30;
/// Hard cap on webfetch timeout in seconds.
pub const MAX_FETCH_TIMEOUT: u64 = 120;
/// Default cap on a single tool result, in bytes.
pub const DEFAULT_RESULT_BYTES: usize = 10 * 1024;
/// Default number of lines returned by `read`.
pub const DEFAULT_READ_LIMIT: usize = 2000;
/// Cap on glob matches.
pub const MAX_GLOB_MATCHES: usize = 100;
/// Cap on grep matches.
pub const MAX_GREP_MATCHES: usize = 50;

/// Bounds and roots for one sandbox instance.
///
/// The policy is fixed at construction; per-request counters (rounds,
/// tool calls) live with the agent loop that owns the request.
#[derive(Debug, Clone)]
pub struct SandboxPolicy {
    /// Canonicalized project root.
    pub project_root: PathBuf,
    /// Safe mode additionally blocks network utilities, package
    /// installers, and non-standard fetch ports.
    pub safe_mode: bool,
    /// Maximum tool-use rounds per agent request.
    pub max_rounds: usize,
    /// Maximum tool calls within one round.
    pub max_tool_calls_per_round: usize,
    /// Default bash timeout in seconds.
    pub bash_timeout: u64,
    /// Cap on a single tool result, in bytes.
    pub max_result_bytes: usize,
    /// Path prefixes tools may touch. Starts as `[project_root]`.
    pub allowed_roots: Vec<PathBuf>,
}

impl SandboxPolicy {
    /// Create a policy rooted at `project_root` (canonicalized).
    pub fn new(project_root: impl AsRef<Path>) -> Result<Self> {
        let root = project_root
            .as_ref()
            .canonicalize()
            .with_context(|| format!("invalid project root {}", project_root.as_ref().display()))?;
        Ok(Self {
            project_root: root.clone(),
            safe_mode: false,
            max_rounds: 10,
            max_tool_calls_per_round: 10,
            bash_timeout: DEFAULT_BASH_TIMEOUT,
            max_result_bytes: DEFAULT_RESULT_BYTES,
            allowed_roots: vec![root],
        })
    }

    /// Enable or disable safe mode.
    pub fn with_safe_mode(mut self, safe: bool) -> Self {
        self.safe_mode = safe;
        self
    }

    /// Override the round/call bounds.
    pub fn with_bounds(mut self, max_rounds: usize, max_tool_calls_per_round: usize) -> Self {
        self.max_rounds = max_rounds;
        self.max_tool_calls_per_round = max_tool_calls_per_round;
        self
    }

    /// Allow an additional path prefix (canonicalized).
    pub fn allow_root(mut self, root: impl AsRef<Path>) -> Result<Self> {
        let root = root
            .as_ref()
            .canonicalize()
            .with_context(|| format!("invalid allowed root {}", root.as_ref().display()))?;
        self.allowed_roots.push(root);
        Ok(self)
    }

    /// Hard ceiling on tool invocations for one agent request.
    pub fn ceiling(&self) -> usize {
        self.max_rounds * self.max_tool_calls_per_round
    }

    /// Clamp a requested bash timeout to the policy default and hard cap.
    pub fn bash_timeout_secs(&self, requested: Option<u64>) -> u64 {
        requested.unwrap_or(self.bash_timeout).min(MAX_BASH_TIMEOUT)
    }

    /// Clamp a requested webfetch timeout to the default and hard cap.
    pub fn fetch_timeout_secs(&self, requested: Option<u64>) -> u64 {
        requested
            .unwrap_or(DEFAULT_FETCH_TIMEOUT)
            .min(MAX_FETCH_TIMEOUT)
    }
}
