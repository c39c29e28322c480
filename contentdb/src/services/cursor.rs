//! Cursor over a flexible listing
//!
//! The cursor owns its position and shares the fetched rows. Every step
//! hands out a fresh, rendered copy of the row, so records kept by the
//! caller are never changed by later steps.

use crate::database::Content;
use crate::error::Result;
use crate::services::render::Renderer;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct EntryCursor {
    rows: Arc<[Content]>,
    position: usize,
    renderer: Renderer,
}

impl EntryCursor {
    pub fn new(rows: Vec<Content>, renderer: Renderer) -> Self {
        Self {
            rows: rows.into(),
            position: 0,
            renderer,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether `current` has a row to return
    pub fn has_more(&self) -> bool {
        self.position < self.rows.len()
    }

    /// Rendered copy of the row at the current position, `None` once exhausted
    pub fn current(&self) -> Result<Option<Content>> {
        let Some(row) = self.rows.get(self.position) else {
            return Ok(None);
        };
        let mut content = row.clone();
        self.renderer.prepare(&mut content)?;
        Ok(Some(content))
    }

    /// Step forward. Stepping past the end is allowed and stays exhausted.
    pub fn advance(&mut self) {
        if self.position < self.rows.len() {
            self.position += 1;
        }
    }

    pub fn rewind(&mut self) {
        self.position = 0;
    }
}

impl Iterator for EntryCursor {
    type Item = Result<Content>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.current().transpose();
        self.advance();
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.rows.len() - self.position;
        (remaining, Some(remaining))
    }
}
