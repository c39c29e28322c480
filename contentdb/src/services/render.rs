//! Rendering service
//!
//! Binds the filter pipeline and the TOC extractor to the configured data
//! directory and base URL, and caches the results on the record.

use crate::config::{DATAFILE_SUBDIR, MAX_DATAFILE_NAME_LENGTH};
use crate::database::Content;
use crate::error::Result;
use crate::filter;
use crate::services::settings::RenderSettings;
use crate::toc::{self, TableOfContents};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Renderer {
    datafile_dir: PathBuf,
    base_url: String,
    toc_level: u8,
}

impl Renderer {
    pub fn new(data_dir: impl AsRef<Path>, settings: &RenderSettings) -> Self {
        Self {
            datafile_dir: data_dir.as_ref().join(DATAFILE_SUBDIR),
            base_url: settings.base_url.clone(),
            toc_level: settings.toc_level,
        }
    }

    pub fn datafile_dir(&self) -> &Path {
        &self.datafile_dir
    }

    /// Location of a datafile. Directory components in `name` are dropped.
    pub fn datafile_path(&self, name: &str) -> PathBuf {
        self.datafile_dir.join(sanitize_filename(name))
    }

    /// Stored text plus the datafile contents, if any, after a newline
    pub fn source_text(&self, content: &Content) -> Result<String> {
        let mut text = content.data.clone();
        if let Some(name) = content.datafile.as_deref().filter(|n| !n.is_empty()) {
            let path = self.datafile_path(name);
            tracing::debug!("Appending datafile {:?} to content {}", path, content.key);
            text.push('\n');
            text.push_str(&std::fs::read_to_string(&path)?);
        }
        Ok(text)
    }

    /// Filter the content and cache the output on it
    pub fn rendered_body<'a>(&self, content: &'a mut Content) -> Result<&'a str> {
        let source = self.source_text(content)?;
        let html = filter::render_with_base_url(&source, content.filter, &self.base_url);
        Ok(content.rendered.insert(html).as_str())
    }

    /// Extract the outline of the rendered body, rendering first if needed,
    /// and cache it on the content
    pub fn table_of_contents<'a>(&self, content: &'a mut Content) -> Result<&'a TableOfContents> {
        if content.rendered.is_none() {
            self.rendered_body(content)?;
        }
        let html = content.rendered.as_deref().unwrap_or_default();
        let outline = toc::extract_toc(html, self.toc_level);
        Ok(content.toc.insert(outline))
    }

    /// Refresh both caches, as views expect them
    pub fn prepare(&self, content: &mut Content) -> Result<()> {
        self.rendered_body(content)?;
        self.table_of_contents(content)?;
        Ok(())
    }
}

/// Sanitize filename to prevent path traversal
fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .filter(|c| *c != '/' && *c != '\\' && *c != '\0')
        .take(MAX_DATAFILE_NAME_LENGTH)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterKind;
    use tempfile::TempDir;

    fn create_test_renderer() -> (Renderer, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let renderer = Renderer::new(temp_dir.path(), &RenderSettings::default());
        std::fs::create_dir_all(renderer.datafile_dir()).unwrap();
        (renderer, temp_dir)
    }

    #[test]
    fn test_rendered_body_is_cached() {
        let (renderer, _temp) = create_test_renderer();
        let mut content = Content::new(1, "k", "page", "T").with_data("a\nb", FilterKind::Plain);

        let html = renderer.rendered_body(&mut content).unwrap().to_string();
        assert_eq!(html, "a<br />\nb");
        assert_eq!(content.rendered.as_deref(), Some("a<br />\nb"));
    }

    #[test]
    fn test_datafile_appended_after_newline() {
        let (renderer, _temp) = create_test_renderer();
        std::fs::write(renderer.datafile_path("extra.txt"), "from file").unwrap();

        let content = Content::new(1, "k", "page", "T")
            .with_data("inline", FilterKind::Plain)
            .with_datafile("extra.txt");

        assert_eq!(renderer.source_text(&content).unwrap(), "inline\nfrom file");
    }

    #[test]
    fn test_missing_datafile_is_an_error() {
        let (renderer, _temp) = create_test_renderer();
        let mut content = Content::new(1, "k", "page", "T").with_datafile("nope.txt");

        assert!(renderer.rendered_body(&mut content).is_err());
        assert!(content.rendered.is_none());
    }

    #[test]
    fn test_datafile_path_cannot_escape() {
        let (renderer, _temp) = create_test_renderer();
        let path = renderer.datafile_path("../../etc/passwd");
        assert_eq!(path, renderer.datafile_dir().join("....etcpasswd"));
    }

    #[test]
    fn test_prepare_fills_both_caches() {
        let (renderer, _temp) = create_test_renderer();
        let mut content = Content::new(1, "k", "page", "T")
            .with_data("## One {#one}\n\n### Two\n\ntext", FilterKind::Markdownx);

        renderer.prepare(&mut content).unwrap();

        assert!(content.rendered.as_deref().unwrap().contains("<h2 id=\"one\">One</h2>"));
        let toc = content.toc.as_ref().unwrap();
        assert_eq!(toc.entries.len(), 2);
        assert_eq!(toc.entries[0].id.as_deref(), Some("one"));
        assert_eq!(toc.entries[1].level, 3);
    }

    #[test]
    fn test_toc_renders_when_needed() {
        let (renderer, _temp) = create_test_renderer();
        let mut content =
            Content::new(1, "k", "page", "T").with_data("## Only", FilterKind::Markdown);

        let toc = renderer.table_of_contents(&mut content).unwrap();
        assert_eq!(toc.entries.len(), 1);
        assert!(content.rendered.is_some());
    }

    #[test]
    fn test_toc_level_from_settings() {
        let temp_dir = TempDir::new().unwrap();
        let settings = RenderSettings {
            toc_level: 2,
            ..RenderSettings::default()
        };
        let renderer = Renderer::new(temp_dir.path(), &settings);
        let mut content = Content::new(1, "k", "page", "T")
            .with_data("## A\n\n### B", FilterKind::Markdown);

        let toc = renderer.table_of_contents(&mut content).unwrap();
        assert_eq!(toc.entries.len(), 1);
    }
}
