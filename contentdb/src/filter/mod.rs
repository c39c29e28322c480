//! Text filters
//!
//! Every content record names the filter that turns its stored text into
//! display HTML. This module maps a [`FilterKind`] to its chain of transforms.

pub mod bbcode;
pub mod markdown;
pub mod shorttags;
pub mod text;

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Rendering transform selected by a record's `filter` column.
///
/// Unrecognized tags behave as [`FilterKind::Plain`], both when parsed and
/// when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Bbcode,
    Htmlpurify,
    Markdown,
    Markdownx,
    #[default]
    #[serde(other)]
    Plain,
}

impl FilterKind {
    /// All supported filters, in the order a settings UI lists them.
    pub const fn supported() -> &'static [FilterKind] {
        &[
            FilterKind::Plain,
            FilterKind::Bbcode,
            FilterKind::Htmlpurify,
            FilterKind::Markdown,
            FilterKind::Markdownx,
        ]
    }

    /// Parse a stored tag, falling back to `Plain`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "bbcode" => FilterKind::Bbcode,
            "htmlpurify" => FilterKind::Htmlpurify,
            "markdown" => FilterKind::Markdown,
            "markdownx" => FilterKind::Markdownx,
            _ => FilterKind::Plain,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FilterKind::Plain => "plain",
            FilterKind::Bbcode => "bbcode",
            FilterKind::Htmlpurify => "htmlpurify",
            FilterKind::Markdown => "markdown",
            FilterKind::Markdownx => "markdownx",
        }
    }

    /// User-facing description for a settings UI.
    pub fn description(self) -> &'static str {
        match self {
            FilterKind::Plain => {
                "Convert http://webb.com/ to clickable links. Convert newline to <br />."
            }
            FilterKind::Bbcode => "Support bbcode. Convert newline to <br />.",
            FilterKind::Htmlpurify => {
                "Treat data as HTML and use a purifier to filter content. Convert newline to <br />."
            }
            FilterKind::Markdown => "Support Markdown-syntax together with a typographer.",
            FilterKind::Markdownx => {
                "Support extended Markdown-syntax together with a typographer. Converts links, shorttags."
            }
        }
    }
}

impl FromStr for FilterKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FilterKind::from_tag(s))
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render `data` with the given filter. Shorttags expand `[BASEURL]` to "".
pub fn render(data: &str, kind: FilterKind) -> String {
    render_with_base_url(data, kind, "")
}

/// Render `data` with the given filter, expanding `[BASEURL]` to `base_url`.
pub fn render_with_base_url(data: &str, kind: FilterKind, base_url: &str) -> String {
    match kind {
        FilterKind::Markdownx => text::make_clickable(&markdown::markdown_extra(
            &shorttags::expand(data, base_url),
        )),
        FilterKind::Markdown => markdown::markdown(data),
        FilterKind::Htmlpurify => text::nl2br(&ammonia::clean(data)),
        FilterKind::Bbcode => text::nl2br(&bbcode::bbcode_to_html(&text::escape_html(data))),
        FilterKind::Plain => text::nl2br(&text::make_clickable(&text::escape_html(data))),
    }
}
