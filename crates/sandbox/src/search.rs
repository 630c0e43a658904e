//! Search tools: glob and grep.

use crate::guard;
use crate::policy::{MAX_GLOB_MATCHES, MAX_GREP_MATCHES, SandboxPolicy};
use crate::sandbox::ToolResult;
use serde::Deserialize;
use std::path::Path;
use walkdir::WalkDir;

#[derive(Debug, Deserialize)]
pub struct GlobArgs {
    pub pattern: String,
    #[serde(default)]
    pub path: Option<String>,
}

/// Find files matching a glob pattern, relative to the search directory.
pub fn glob(policy: &SandboxPolicy, args: &GlobArgs) -> ToolResult {
    let base = match resolve_base(policy, args.path.as_deref()) {
        Ok(base) => base,
        Err(result) => return result,
    };
    let pattern = match glob::Pattern::new(&args.pattern) {
        Ok(pattern) => pattern,
        Err(e) => return ToolResult::err(format!("Invalid glob pattern: {e}")),
    };

    let mut matches = Vec::new();
    for entry in walk(&base) {
        let Ok(relative) = entry.path().strip_prefix(&base) else {
            continue;
        };
        if pattern.matches_path(relative) {
            matches.push(relative.display().to_string());
            if matches.len() >= MAX_GLOB_MATCHES {
                break;
            }
        }
    }

    if matches.is_empty() {
        ToolResult::ok("No files matched")
    } else {
        matches.sort();
        ToolResult::ok(matches.join("\n"))
    }
}

#[derive(Debug, Deserialize)]
pub struct GrepArgs {
    pub pattern: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub include: Option<String>,
}

/// Search file contents; returns `file:lineno:line` matches.
///
/// Unreadable (e.g. binary) files are silently skipped. Ignore files are
/// not honored — the match cap bounds the walk.
pub fn grep(policy: &SandboxPolicy, args: &GrepArgs) -> ToolResult {
    let base = match resolve_base(policy, args.path.as_deref()) {
        Ok(base) => base,
        Err(result) => return result,
    };
    let regex = match guard::compile_regex(&args.pattern) {
        Ok(regex) => regex,
        Err(message) => return ToolResult::err(message),
    };
    let include = match &args.include {
        Some(filter) => match glob::Pattern::new(filter) {
            Ok(pattern) => Some(pattern),
            Err(e) => return ToolResult::err(format!("Invalid include pattern: {e}")),
        },
        None => None,
    };

    let mut matches = Vec::new();
    'files: for entry in walk(&base) {
        if let Some(include) = &include {
            let name = entry.file_name().to_string_lossy();
            if !include.matches(&name) {
                continue;
            }
        }
        let Ok(text) = std::fs::read_to_string(entry.path()) else {
            continue;
        };
        let relative = entry
            .path()
            .strip_prefix(&base)
            .unwrap_or(entry.path())
            .display()
            .to_string();
        for (idx, line) in text.lines().enumerate() {
            if regex.is_match(line) {
                matches.push(format!("{relative}:{}:{line}", idx + 1));
                if matches.len() >= MAX_GREP_MATCHES {
                    break 'files;
                }
            }
        }
    }

    if matches.is_empty() {
        ToolResult::ok("No matches found")
    } else {
        ToolResult::ok(matches.join("\n"))
    }
}

fn resolve_base(
    policy: &SandboxPolicy,
    path: Option<&str>,
) -> Result<std::path::PathBuf, ToolResult> {
    match path {
        Some(dir) => match guard::resolve_within(dir, policy) {
            Ok(base) if base.is_dir() => Ok(base),
            Ok(base) => Err(ToolResult::err(format!(
                "Error: {} is not a directory",
                base.display()
            ))),
            Err(reason) => Err(ToolResult::blocked(reason)),
        },
        None => Ok(policy.project_root.clone()),
    }
}

/// Walk regular files under `base`, pruning `.git`.
fn walk(base: &Path) -> impl Iterator<Item = walkdir::DirEntry> {
    WalkDir::new(base)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.file_name() != ".git")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
}
