//! BBCode to HTML conversion
//!
//! Runs on text that has already been HTML-escaped, so the only markup in
//! the output is what the rules below produce. Links and images only accept
//! http(s) targets.

use regex::Regex;
use std::sync::LazyLock;

static RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?is)\[b\](.*?)\[/b\]", "<strong>$1</strong>"),
        (r"(?is)\[i\](.*?)\[/i\]", "<em>$1</em>"),
        (r"(?is)\[u\](.*?)\[/u\]", "<u>$1</u>"),
        (r"(?is)\[s\](.*?)\[/s\]", "<del>$1</del>"),
        (r"(?is)\[code\](.*?)\[/code\]", "<code>$1</code>"),
        (r"(?is)\[quote\](.*?)\[/quote\]", "<blockquote>$1</blockquote>"),
        (r"(?is)\[url\](https?://[^\[\s]+)\[/url\]", "<a href='$1'>$1</a>"),
        (r"(?is)\[url=(https?://[^\]\s]+)\](.*?)\[/url\]", "<a href='$1'>$2</a>"),
        (r"(?is)\[img\](https?://[^\[\s]+)\[/img\]", "<img src='$1' alt='' />"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).expect("valid regex"), replacement))
    .collect()
});

/// Convert BBCode markup to HTML.
pub fn bbcode_to_html(text: &str) -> String {
    RULES
        .iter()
        .fold(text.to_string(), |acc, (rule, replacement)| {
            rule.replace_all(&acc, *replacement).into_owned()
        })
}
