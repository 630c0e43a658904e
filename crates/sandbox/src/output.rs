//! Result truncation and preview helpers.

/// Marker joining the head and tail of a truncated result.
pub const TRUNCATION_MARKER: &str = "…[TRUNCATED]…";

/// Truncate a result string to at most `cap` bytes.
///
/// Over-cap strings keep the leading half and a trailing fifth of the
/// budget, joined by [`TRUNCATION_MARKER`]. A no-op for strings within
/// the cap.
pub fn truncate(s: &str, cap: usize) -> String {
    if s.len() <= cap {
        return s.to_owned();
    }
    let head_budget = cap / 2;
    let tail_budget = cap / 5;

    let head_end = floor_char_boundary(s, head_budget);
    let tail_start = ceil_char_boundary(s, s.len().saturating_sub(tail_budget));
    format!("{}{}{}", &s[..head_end], TRUNCATION_MARKER, &s[tail_start..])
}

/// Clip a string to at most `max` bytes on a char boundary, appending an
/// ellipsis when anything was dropped. Used for log sanitization.
pub fn clip(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_owned();
    }
    let end = floor_char_boundary(s, max);
    format!("{}…", &s[..end])
}

fn floor_char_boundary(s: &str, mut idx: usize) -> usize {
    idx = idx.min(s.len());
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_char_boundary(s: &str, mut idx: usize) -> usize {
    idx = idx.min(s.len());
    while idx < s.len() && !s.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_is_noop_within_cap() {
        assert_eq!(truncate("short", 100), "short");
        let exact = "x".repeat(100);
        assert_eq!(truncate(&exact, 100), exact);
    }

    #[test]
    fn truncate_keeps_head_and_tail() {
        let s = format!("{}{}{}", "A".repeat(6000), "B".repeat(6000), "C".repeat(6000));
        let out = truncate(&s, 10 * 1024);
        assert!(out.len() <= 10 * 1024);
        assert!(out.starts_with('A'));
        assert!(out.ends_with('C'));
        assert!(out.contains(TRUNCATION_MARKER));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let s = "é".repeat(8000);
        let out = truncate(&s, 1000);
        // Must not panic and must stay valid UTF-8 within the cap.
        assert!(out.len() <= 1000);
        assert!(out.contains(TRUNCATION_MARKER));
    }

    #[test]
    fn clip_appends_ellipsis() {
        assert_eq!(clip("abc", 10), "abc");
        let clipped = clip(&"x".repeat(300), 200);
        assert!(clipped.ends_with('…'));
        assert!(clipped.len() <= 204);
    }
}
