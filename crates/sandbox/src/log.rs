//! The append-only tool-call log.
//!
//! Every invocation lands here with sanitized arguments and a short
//! result preview. The log is for observability and statistics — it is
//! never fed back into an agent's conversation context.

use crate::output::clip;
use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// How much of any string field survives into the log.
const SANITIZE_CHARS: usize = 200;

/// One logged tool invocation.
#[derive(Debug, Clone)]
pub struct ToolLogEntry {
    /// When the call completed.
    pub timestamp: DateTime<Utc>,
    /// Id of the agent that made the call.
    pub agent_id: CompactString,
    /// Tool name.
    pub tool: CompactString,
    /// Arguments with string fields clipped to 200 chars.
    pub args: Value,
    /// First 200 chars of the result.
    pub preview: String,
    /// Whether the call succeeded.
    pub ok: bool,
}

/// Per-tool aggregate counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToolStats {
    /// Total invocations.
    pub calls: usize,
    /// Successful invocations.
    pub ok: usize,
}

/// Append-only, process-scoped log of tool calls.
#[derive(Default)]
pub struct ToolLog {
    entries: Mutex<Vec<ToolLogEntry>>,
}

impl ToolLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry, sanitizing the arguments.
    pub fn append(&self, agent_id: &str, tool: &str, args: &Value, result: &str, ok: bool) {
        let entry = ToolLogEntry {
            timestamp: Utc::now(),
            agent_id: agent_id.into(),
            tool: tool.into(),
            args: sanitize(args),
            preview: clip(result, SANITIZE_CHARS),
            ok,
        };
        self.entries.lock().expect("tool log poisoned").push(entry);
    }

    /// Number of logged calls.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("tool log poisoned").len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A snapshot of all entries.
    pub fn snapshot(&self) -> Vec<ToolLogEntry> {
        self.entries.lock().expect("tool log poisoned").clone()
    }

    /// Aggregate call/success counts per tool.
    pub fn stats(&self) -> BTreeMap<CompactString, ToolStats> {
        let mut stats: BTreeMap<CompactString, ToolStats> = BTreeMap::new();
        for entry in self.entries.lock().expect("tool log poisoned").iter() {
            let s = stats.entry(entry.tool.clone()).or_default();
            s.calls += 1;
            if entry.ok {
                s.ok += 1;
            }
        }
        stats
    }
}

/// Clip every string value (recursively) to the sanitization budget.
fn sanitize(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(clip(s, SANITIZE_CHARS)),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), sanitize(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(sanitize).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn append_sanitizes_long_strings() {
        let log = ToolLog::new();
        let args = json!({"path": "a.txt", "content": "x".repeat(500)});
        log.append("a1", "write", &args, "File written successfully", true);

        let entries = log.snapshot();
        assert_eq!(entries.len(), 1);
        let content = entries[0].args["content"].as_str().unwrap();
        assert!(content.len() < 500);
        assert!(content.ends_with('…'));
        assert_eq!(entries[0].args["path"], "a.txt");
    }

    #[test]
    fn stats_aggregate_per_tool() {
        let log = ToolLog::new();
        log.append("a1", "bash", &json!({}), "ok", true);
        log.append("a1", "bash", &json!({}), "Blocked: nope", false);
        log.append("a2", "read", &json!({}), "text", true);

        let stats = log.stats();
        assert_eq!(stats["bash"], ToolStats { calls: 2, ok: 1 });
        assert_eq!(stats["read"], ToolStats { calls: 1, ok: 1 });
    }

    #[test]
    fn preview_is_clipped() {
        let log = ToolLog::new();
        log.append("a1", "read", &json!({}), &"y".repeat(1000), true);
        assert!(log.snapshot()[0].preview.len() <= 204);
    }
}
