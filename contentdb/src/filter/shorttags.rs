//! Shorttag expansion for extended Markdown
//!
//! Supported tags:
//! - `[BASEURL]` expands to the configured base URL.
//! - `[FIGURE src=... caption=... alt=...]` expands to a `<figure>` element.
//!   Values may be bare, single- or double-quoted. `alt` defaults to the caption.

use super::text::escape_html;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

static BASE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[BASEURL\]").expect("valid regex"));

static FIGURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[FIGURE\s+([^\]]*)\]").expect("valid regex"));

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\w+)=(?:"([^"]*)"|'([^']*)'|(\S+))"#).expect("valid regex")
});

/// Expand every shorttag in `text`.
pub fn expand(text: &str, base_url: &str) -> String {
    let text = BASE_URL.replace_all(text, regex::NoExpand(base_url));
    FIGURE
        .replace_all(&text, |caps: &Captures| figure(&caps[1]))
        .into_owned()
}

fn figure(attributes: &str) -> String {
    let attrs = parse_attributes(attributes);
    let src = attrs.get("src").map(String::as_str).unwrap_or_default();
    let caption = attrs.get("caption").map(String::as_str).unwrap_or_default();
    let alt = attrs.get("alt").map(String::as_str).unwrap_or(caption);

    let mut html = format!(
        "<figure><img src=\"{}\" alt=\"{}\" />",
        escape_html(src),
        escape_html(alt)
    );
    if !caption.is_empty() {
        html.push_str(&format!("<figcaption>{}</figcaption>", escape_html(caption)));
    }
    html.push_str("</figure>");
    html
}

fn parse_attributes(attributes: &str) -> HashMap<String, String> {
    ATTRIBUTE
        .captures_iter(attributes)
        .map(|caps| {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            (caps[1].to_lowercase(), value)
        })
        .collect()
}
