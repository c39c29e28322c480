//! Markdown rendering on top of pulldown-cmark
//!
//! The typographer pass (curly quotes, dashes, ellipses) is pulldown-cmark's
//! smart punctuation, applied while parsing so it never touches code spans.

use pulldown_cmark::{html, Options, Parser};

fn to_html(text: &str, options: Options) -> String {
    let parser = Parser::new_ext(text, options);
    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// CommonMark followed by the typographer.
pub fn markdown(text: &str) -> String {
    to_html(text, Options::ENABLE_SMART_PUNCTUATION)
}

/// Markdown with extensions (tables, footnotes, strikethrough, task lists
/// and `{#id}` heading attributes) followed by the typographer.
pub fn markdown_extra(text: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
        | Options::ENABLE_SMART_PUNCTUATION;
    to_html(text, options)
}
