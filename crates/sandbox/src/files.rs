//! File tools: read, write, edit.

use crate::guard;
use crate::policy::{DEFAULT_READ_LIMIT, SandboxPolicy};
use crate::sandbox::ToolResult;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ReadArgs {
    pub path: String,
    #[serde(default)]
    pub offset: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Read a file slice with 1-indexed line prefixes.
pub async fn read(policy: &SandboxPolicy, args: &ReadArgs) -> ToolResult {
    let path = match guard::resolve_within(&args.path, policy) {
        Ok(path) => path,
        Err(reason) => return ToolResult::blocked(reason),
    };

    let text = match tokio::fs::read_to_string(&path).await {
        Ok(text) => text,
        Err(e) => return ToolResult::err(format!("Error: cannot read {}: {e}", args.path)),
    };

    let offset = args.offset.unwrap_or(1).max(1);
    let limit = args.limit.unwrap_or(DEFAULT_READ_LIMIT);
    let mut out = String::new();
    for (idx, line) in text.lines().enumerate().skip(offset - 1).take(limit) {
        out.push_str(&format!("{:>6}\t{}\n", idx + 1, line));
    }
    if out.is_empty() {
        out = "(empty)".to_owned();
    }
    ToolResult::ok(out)
}

#[derive(Debug, Deserialize)]
pub struct WriteArgs {
    pub path: String,
    pub content: String,
}

/// Write a file, creating parent directories under the jail.
pub async fn write(policy: &SandboxPolicy, args: &WriteArgs) -> ToolResult {
    let path = match guard::resolve_within(&args.path, policy) {
        Ok(path) => path,
        Err(reason) => return ToolResult::blocked(reason),
    };

    if let Some(parent) = path.parent()
        && let Err(e) = tokio::fs::create_dir_all(parent).await
    {
        return ToolResult::err(format!("Error: cannot create {}: {e}", parent.display()));
    }
    match tokio::fs::write(&path, &args.content).await {
        Ok(()) => ToolResult::ok("File written successfully"),
        Err(e) => ToolResult::err(format!("Error: cannot write {}: {e}", args.path)),
    }
}

#[derive(Debug, Deserialize)]
pub struct EditArgs {
    pub path: String,
    #[serde(rename = "oldString")]
    pub old_string: String,
    #[serde(rename = "newString")]
    pub new_string: String,
    #[serde(default, rename = "replaceAll")]
    pub replace_all: bool,
}

/// Exact-substring replacement in a file.
pub async fn edit(policy: &SandboxPolicy, args: &EditArgs) -> ToolResult {
    let path = match guard::resolve_within(&args.path, policy) {
        Ok(path) => path,
        Err(reason) => return ToolResult::blocked(reason),
    };
    if args.old_string.is_empty() {
        return ToolResult::err("Error: oldString must not be empty");
    }

    let text = match tokio::fs::read_to_string(&path).await {
        Ok(text) => text,
        Err(e) => return ToolResult::err(format!("Error: cannot read {}: {e}", args.path)),
    };
    if !text.contains(&args.old_string) {
        return ToolResult::err(format!("Error: string not found in {}", args.path));
    }

    let (updated, count) = if args.replace_all {
        // Escape into a regex literal so the old string is always exact.
        let pattern = regex::Regex::new(&regex::escape(&args.old_string))
            .expect("escaped literal always compiles");
        let count = pattern.find_iter(&text).count();
        (
            pattern
                .replace_all(&text, regex::NoExpand(&args.new_string))
                .into_owned(),
            count,
        )
    } else {
        (text.replacen(&args.old_string, &args.new_string, 1), 1)
    };

    match tokio::fs::write(&path, updated).await {
        Ok(()) => ToolResult::ok(format!(
            "Edited {} ({count} replacement{})",
            args.path,
            if count == 1 { "" } else { "s" }
        )),
        Err(e) => ToolResult::err(format!("Error: cannot write {}: {e}", args.path)),
    }
}
