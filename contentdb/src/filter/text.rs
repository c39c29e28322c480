//! Plain-text helpers shared by every filter.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static LINE_ENDING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n|\n|\r").expect("valid regex"));

/// Existing anchors and tags, matched first and passed through, or a bare
/// http(s) URL. The trailing character class keeps sentence punctuation out
/// of the link.
static MARKUP_OR_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)(<a\b[^>]*>.*?</a\s*>|<[^>]*>)|\b(https?://[^\s<>"']*[^\s<>"'.,;:!?)])"#)
        .expect("valid regex")
});

/// Escape the characters that are significant in HTML text and
/// double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

/// Insert `<br />` before every line ending, keeping the line ending.
pub fn nl2br(text: &str) -> String {
    LINE_ENDING.replace_all(text, "<br />$0").into_owned()
}

/// Turn plain `http://` and `https://` URLs into anchors.
///
/// URLs inside a tag (attribute values) or inside the text of an existing
/// anchor are left alone.
pub fn make_clickable(text: &str) -> String {
    MARKUP_OR_URL
        .replace_all(text, |caps: &Captures| match caps.get(1) {
            Some(markup) => markup.as_str().to_string(),
            None => format!("<a href='{0}'>{0}</a>", &caps[2]),
        })
        .into_owned()
}
