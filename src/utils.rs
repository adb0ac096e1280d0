//! String helpers shared by sources, liveness checks and the summarizer.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a char boundary) with
/// `"…(+N bytes)"` appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Strip HTML tags, decode entities and collapse whitespace.
///
/// Search APIs wrap matched terms in `<b>`, often mid-word, and escape
/// quotes as `&quot;`. Tags are removed without leaving a gap.
pub fn strip_html(s: &str) -> String {
    let without_tags = TAG_RE.replace_all(s, "");
    let fragment = Html::parse_fragment(&without_tags);
    let text: String = fragment.root_element().text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
