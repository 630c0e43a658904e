//! Tool declarations offered to tool-capable providers.

use quorum_llm::Tool;
use serde_json::json;

/// The fixed set of sandboxed tools.
pub fn definitions() -> Vec<Tool> {
    vec![
        Tool::new(
            "bash",
            "Run a shell command in the project directory. Dangerous commands \
             are blocked. Output is truncated when large.",
            json!({
                "type": "object",
                "properties": {
                    "command": {"type": "string", "description": "The command to run"},
                    "workdir": {"type": "string", "description": "Working directory (defaults to the project root)"},
                    "timeout": {"type": "integer", "description": "Timeout in seconds (default 10, max 120)"}
                },
                "required": ["command"]
            }),
        ),
        Tool::new(
            "read",
            "Read a text file from the project. Returns numbered lines. Use \
             offset/limit for large files.",
            json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string", "description": "File path"},
                    "offset": {"type": "integer", "description": "1-indexed first line to read"},
                    "limit": {"type": "integer", "description": "Maximum number of lines (default 2000)"}
                },
                "required": ["path"]
            }),
        ),
        Tool::new(
            "write",
            "Write a file in the project, creating parent directories as needed. \
             Overwrites existing content.",
            json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string", "description": "File path"},
                    "content": {"type": "string", "description": "Full file content"}
                },
                "required": ["path", "content"]
            }),
        ),
        Tool::new(
            "edit",
            "Replace an exact substring in a file. The old string must appear \
             verbatim; set replaceAll to replace every occurrence.",
            json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string", "description": "File path"},
                    "oldString": {"type": "string", "description": "Exact text to replace"},
                    "newString": {"type": "string", "description": "Replacement text"},
                    "replaceAll": {"type": "boolean", "description": "Replace every occurrence (default false)"}
                },
                "required": ["path", "oldString", "newString"]
            }),
        ),
        Tool::new(
            "glob",
            "Find files matching a glob pattern (e.g. src/**/*.rs). Returns up \
             to 100 paths relative to the search directory.",
            json!({
                "type": "object",
                "properties": {
                    "pattern": {"type": "string", "description": "Glob pattern"},
                    "path": {"type": "string", "description": "Directory to search (defaults to the project root)"}
                },
                "required": ["pattern"]
            }),
        ),
        Tool::new(
            "grep",
            "Search file contents with a regular expression. Returns up to 50 \
             file:line:text matches.",
            json!({
                "type": "object",
                "properties": {
                    "pattern": {"type": "string", "description": "Regular expression"},
                    "path": {"type": "string", "description": "Directory to search (defaults to the project root)"},
                    "include": {"type": "string", "description": "Filename glob filter, e.g. *.rs"}
                },
                "required": ["pattern"]
            }),
        ),
        Tool::new(
            "webfetch",
            "Fetch a public http(s) URL. Private and internal addresses are \
             blocked. The body is truncated when large.",
            json!({
                "type": "object",
                "properties": {
                    "url": {"type": "string", "description": "URL to fetch"},
                    "format": {"type": "string", "enum": ["text", "markdown", "html"],
                               "description": "text strips markup; html returns the raw body"},
                    "timeout": {"type": "integer", "description": "Timeout in seconds (default 30, max 120)"}
                },
                "required": ["url", "format"]
            }),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seven_tools_declared() {
        let tools = definitions();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            ["bash", "read", "write", "edit", "glob", "grep", "webfetch"]
        );
    }

    #[test]
    fn every_schema_is_an_object_with_required() {
        for tool in definitions() {
            assert_eq!(tool.parameters["type"], "object", "{}", tool.name);
            assert!(tool.parameters["required"].is_array(), "{}", tool.name);
        }
    }
}
