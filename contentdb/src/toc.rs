//! Table of contents extraction
//!
//! Scans rendered HTML for `<h2>` .. `<hN>` elements and builds both an
//! outline and a ready-to-print `<ul>` list. Matching is textual: the label
//! is the text between the opening tag and the first closing heading tag on
//! the same line, nested markup included as-is.

use crate::config::{MAX_TOC_LEVEL, MIN_TOC_LEVEL};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// One heading pattern per possible `max_level`, indexed from `MIN_TOC_LEVEL`.
static HEADINGS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    (MIN_TOC_LEVEL..=MAX_TOC_LEVEL)
        .map(|max| {
            let levels = format!("[{}-{}]", MIN_TOC_LEVEL, max);
            Regex::new(&format!(r"<h({levels})([^>]*)>(.*?)</h{levels}>"))
                .expect("valid heading regex")
        })
        .collect()
});

static ID_ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"id=['"]([^>"']+)"#).expect("valid regex"));

/// A single heading in the outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Heading level taken from the matched tag, `h3` gives 3.
    pub level: u8,
    pub id: Option<String>,
    pub label: String,
}

/// Outline of a rendered document plus its preformatted HTML list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOfContents {
    pub entries: Vec<TocEntry>,
    pub formatted: String,
}

impl TableOfContents {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Extract headings from level 2 to `max_level` inclusive, in document order.
///
/// `max_level` is clamped to `2..=6`. Headings without an `id` still produce
/// an entry; their list item carries the label without a link.
pub fn extract_toc(html: &str, max_level: u8) -> TableOfContents {
    let max_level = max_level.clamp(MIN_TOC_LEVEL, MAX_TOC_LEVEL);
    let heading = &HEADINGS[usize::from(max_level - MIN_TOC_LEVEL)];

    let mut entries = Vec::new();
    let mut items = String::new();

    for caps in heading.captures_iter(html) {
        let level = caps[1].as_bytes()[0] - b'0';
        let id = ID_ATTRIBUTE
            .captures(&caps[2])
            .map(|id| id[1].to_string());
        let label = caps[3].to_string();

        match &id {
            Some(id) => items.push_str(&format!(
                "<li class='h{level}'><a href='#{id}'>{label}</a></li>\n"
            )),
            None => items.push_str(&format!("<li class='h{level}'>{label}</li>\n")),
        }
        entries.push(TocEntry { level, id, label });
    }

    TableOfContents {
        entries,
        formatted: format!("<ul>\n{items}</ul>\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TOC_LEVEL;

    #[test]
    fn test_extract_with_and_without_id() {
        let toc = extract_toc("<h2 id='a'>Intro</h2><h3>Next</h3>", 4);

        assert_eq!(toc.entries.len(), 2);
        assert_eq!(
            toc.entries[0],
            TocEntry { level: 2, id: Some("a".to_string()), label: "Intro".to_string() }
        );
        assert_eq!(
            toc.entries[1],
            TocEntry { level: 3, id: None, label: "Next".to_string() }
        );
        assert_eq!(
            toc.formatted,
            "<ul>\n<li class='h2'><a href='#a'>Intro</a></li>\n<li class='h3'>Next</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_double_quoted_id() {
        let toc = extract_toc(r#"<h2 class="x" id="setup">Setup</h2>"#, 4);
        assert_eq!(toc.entries[0].id.as_deref(), Some("setup"));
    }

    #[test]
    fn test_levels_outside_range_are_skipped() {
        let html = "<h1>Title</h1>\n<h2>A</h2>\n<h4>B</h4>\n<h5>C</h5>";

        let toc = extract_toc(html, 4);
        let labels: Vec<&str> = toc.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["A", "B"]);
        assert_eq!(toc.entries[1].level, 4);

        let shallow = extract_toc(html, 2);
        assert_eq!(shallow.entries.len(), 1);
    }

    #[test]
    fn test_max_level_is_clamped() {
        let html = "<h2>A</h2><h6>F</h6>";
        assert_eq!(extract_toc(html, 0).entries.len(), 1);
        assert_eq!(extract_toc(html, 9).entries.len(), 2);
    }

    #[test]
    fn test_empty_heading_still_counts() {
        let toc = extract_toc("<h2></h2>", 4);
        assert_eq!(toc.entries.len(), 1);
        assert_eq!(toc.entries[0].label, "");
        assert_eq!(toc.entries[0].id, None);
    }

    #[test]
    fn test_nested_markup_is_kept_in_label() {
        let toc = extract_toc("<h2 id='x'><em>Big</em> news</h2>", 4);
        assert_eq!(toc.entries[0].label, "<em>Big</em> news");
    }

    #[test]
    fn test_no_headings() {
        let toc = extract_toc("<p>nothing here</p>", DEFAULT_TOC_LEVEL);
        assert!(toc.is_empty());
        assert_eq!(toc.formatted, "<ul>\n</ul>\n");
    }
}
