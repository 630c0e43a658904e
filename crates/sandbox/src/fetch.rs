//! The webfetch tool.

use crate::guard;
use crate::policy::SandboxPolicy;
use crate::sandbox::ToolResult;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct FetchArgs {
    pub url: String,
    #[serde(default)]
    pub format: Format,
    #[serde(default)]
    pub timeout: Option<u64>,
}

/// Output shaping for fetched bodies.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Strip markup, keep text.
    #[default]
    Text,
    /// Same stripping as text.
    Markdown,
    /// The raw body.
    Html,
}

static SCRIPT_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)>").expect("script/style pattern")
});
static TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern"));
static BLANK_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank-run pattern"));

/// Fetch a public URL; the SSRF filter runs before any request is made.
pub async fn webfetch(
    policy: &SandboxPolicy,
    client: &reqwest::Client,
    args: &FetchArgs,
) -> ToolResult {
    let url = match guard::check_url(&args.url, policy.safe_mode) {
        Ok(url) => url,
        Err(reason) => return ToolResult::blocked(reason),
    };

    let secs = policy.fetch_timeout_secs(args.timeout);
    let response = match client
        .get(url)
        .timeout(Duration::from_secs(secs))
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) if e.is_timeout() => {
            return ToolResult::err(format!("Fetch timed out after {secs}s"));
        }
        Err(e) => return ToolResult::err(format!("Error: fetch failed: {e}")),
    };

    let status = response.status();
    if !status.is_success() {
        return ToolResult::err(format!("Error: HTTP {}", status.as_u16()));
    }
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => return ToolResult::err(format!("Error: failed to read body: {e}")),
    };

    let shaped = match args.format {
        Format::Html => body,
        Format::Text | Format::Markdown => strip_tags(&body),
    };
    ToolResult::ok(shaped)
}

/// Crude tag stripping: drop script/style bodies, then all tags, then
/// decode the common entities and collapse blank runs.
fn strip_tags(html: &str) -> String {
    let without_blocks = SCRIPT_STYLE.replace_all(html, "");
    let without_tags = TAGS.replace_all(&without_blocks, "");
    let decoded = without_tags
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ");
    BLANK_RUNS.replace_all(decoded.trim(), "\n\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_tags_drops_markup_and_scripts() {
        let html = "<html><head><style>body{color:red}</style>\
                    <script>alert('x')</script></head>\
                    <body><h1>Title</h1><p>Hello &amp; welcome</p></body></html>";
        let text = strip_tags(html);
        assert!(text.contains("Title"));
        assert!(text.contains("Hello & welcome"));
        assert!(!text.contains("alert"));
        assert!(!text.contains("color:red"));
        assert!(!text.contains('<'));
    }

    #[test]
    fn format_parses_lowercase() {
        let args: FetchArgs =
            serde_json::from_value(serde_json::json!({"url": "https://x.test", "format": "html"}))
                .unwrap();
        assert_eq!(args.format, Format::Html);
    }
}
