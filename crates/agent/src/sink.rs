//! Host callback surfaces: event sink and permission gateway.

use serde_json::Value;

/// Tools that must clear the permission gateway before running.
pub const DANGEROUS_TOOLS: &[&str] = &["bash", "write", "edit"];

/// UI callbacks fired by the agent loop. All methods default to no-ops;
/// the runtime never depends on a subscriber.
pub trait EventSink {
    /// A tool call is about to be dispatched.
    fn on_tool_call(&self, _tool: &str, _args: &Value) {}
    /// A tool call finished.
    fn on_tool_result(&self, _tool: &str, _ok: bool) {}
}

/// The no-op sink.
impl EventSink for () {}

/// Permission decision for dangerous tools.
///
/// Interactive hosts prompt the user; the team channel substitutes
/// [`AutoAllow`] because per-call prompts would stall a broadcast.
pub trait Gateway: Send + Sync {
    /// Allow or deny a tool call. `detail` is a short human-readable
    /// summary (command + workdir for bash, path for write/edit).
    fn allow(&self, tool: &str, detail: &str) -> bool;
}

/// Gateway that approves everything.
pub struct AutoAllow;

impl Gateway for AutoAllow {
    fn allow(&self, _tool: &str, _detail: &str) -> bool {
        true
    }
}

/// Whether a tool must be cleared through the gateway.
pub fn is_dangerous(tool: &str) -> bool {
    DANGEROUS_TOOLS.contains(&tool)
}

/// Build the one-line detail summary shown in permission prompts.
pub fn describe_tool_call(tool: &str, args: &Value) -> String {
    let field = |key: &str| args.get(key).and_then(Value::as_str).unwrap_or("?");
    match tool {
        "bash" => match args.get("workdir").and_then(Value::as_str) {
            Some(dir) => format!("{} (in {dir})", field("command")),
            None => field("command").to_owned(),
        },
        "write" | "edit" | "read" => field("path").to_owned(),
        "webfetch" => field("url").to_owned(),
        _ => args.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dangerous_set_covers_mutating_tools() {
        assert!(is_dangerous("bash"));
        assert!(is_dangerous("write"));
        assert!(is_dangerous("edit"));
        assert!(!is_dangerous("read"));
        assert!(!is_dangerous("glob"));
    }

    #[test]
    fn describe_summarizes_per_tool() {
        assert_eq!(
            describe_tool_call("bash", &json!({"command": "ls", "workdir": "/proj"})),
            "ls (in /proj)"
        );
        assert_eq!(
            describe_tool_call("write", &json!({"path": "a.txt", "content": "x"})),
            "a.txt"
        );
        assert_eq!(
            describe_tool_call("webfetch", &json!({"url": "https://x.test"})),
            "https://x.test"
        );
    }
}
