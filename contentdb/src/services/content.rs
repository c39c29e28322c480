//! Content service
//!
//! Record lifecycle (save, soft delete, load) and listings on top of the
//! repository. Outcomes a visitor should see are collected as notices; only
//! store failures and bad caller input surface as errors.

use crate::config::DEFAULT_ENTRY_LIMIT;
use crate::database::{Content, EntryOptions, EntryQuery, ListCriteria, Repository, Sort};
use crate::error::{ContentError, Result};
use crate::filter::text::escape_html;
use crate::services::cursor::EntryCursor;
use crate::services::render::Renderer;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Human-readable outcome of an operation, for presentation only
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Service for managing content
pub struct ContentService {
    repo: Repository,
    renderer: Renderer,
    entry_limit: u32,
    notices: Vec<Notice>,
}

impl ContentService {
    pub fn new(repo: Repository, renderer: Renderer) -> Self {
        Self {
            repo,
            renderer,
            entry_limit: DEFAULT_ENTRY_LIMIT,
            notices: Vec::new(),
        }
    }

    /// Row cap used by `get_entries` when the options carry none. 0 disables it.
    pub fn with_entry_limit(mut self, entry_limit: u32) -> Self {
        self.entry_limit = entry_limit;
        self
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Hand the collected notices to the caller
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, level: NoticeLevel, message: String) {
        self.notices.push(Notice { level, message });
    }

    /// Insert new content or update existing content.
    ///
    /// Returns `true` when exactly one row was written. A new record gets
    /// its id only after a successful insert.
    pub async fn save(&mut self, content: &mut Content) -> Result<bool> {
        let (rows, done, verb) = match content.id {
            Some(id) => {
                let outcome = self.repo.update_content(id, content).await?;
                (outcome.rows_affected, "updated", "update")
            }
            None => {
                let outcome = self.repo.insert_content(content).await?;
                if outcome.rows_affected == 1 {
                    content.id = Some(outcome.last_insert_id);
                }
                (outcome.rows_affected, "created", "create")
            }
        };

        let key = escape_html(&content.key);
        if rows == 1 {
            tracing::info!("Content {} {} (id {:?})", content.key, done, content.id);
            self.notify(
                NoticeLevel::Success,
                format!("Successfully {done} content '{key}'."),
            );
        } else {
            tracing::warn!("Failed to {} content {} ({} rows)", verb, content.key, rows);
            self.notify(NoticeLevel::Error, format!("Failed to {verb} content '{key}'."));
        }

        Ok(rows == 1)
    }

    /// Move content to the wastebasket by stamping its deletion time.
    ///
    /// Only live rows are stamped. Deleting content that is already in the
    /// wastebasket keeps the first deletion time, returns `false` and adds
    /// the failure notice. Content without an id is handled the same way.
    pub async fn delete(&mut self, content: &mut Content) -> Result<bool> {
        let rows = match content.id {
            Some(id) => self.repo.mark_deleted(id).await?,
            None => 0,
        };

        let key = escape_html(&content.key);
        if rows == 1 {
            content.deleted = Some(chrono::Utc::now().naive_utc());
            tracing::info!("Content {} set as deleted", content.key);
            self.notify(
                NoticeLevel::Success,
                format!("Successfully set content '{key}' as deleted."),
            );
        } else {
            tracing::warn!("Failed to set content {} as deleted", content.key);
            self.notify(
                NoticeLevel::Error,
                format!("Failed to set content '{key}' as deleted."),
            );
        }

        Ok(rows == 1)
    }

    /// Load live content by id
    pub async fn load_by_id(&mut self, id: i64) -> Result<Content> {
        match self.repo.get_content(id).await? {
            Some(content) => Ok(content),
            None => {
                self.notify(
                    NoticeLevel::Error,
                    format!("Failed to load content with id '{id}'."),
                );
                Err(ContentError::NotFound(format!("id {id}")))
            }
        }
    }

    /// Load live content by key
    pub async fn load_by_key(&mut self, key: &str) -> Result<Content> {
        match self.repo.get_content_by_key(key).await? {
            Some(content) => Ok(content),
            None => {
                self.notify(
                    NoticeLevel::Error,
                    format!("Failed to load content with key '{}'.", escape_html(key)),
                );
                Err(ContentError::NotFound(format!("key {key}")))
            }
        }
    }

    /// List live content, optionally of one type.
    ///
    /// Store failures are logged, reported as a notice and turned into `None`.
    pub async fn list_all(&mut self, criteria: Option<&ListCriteria>) -> Option<Vec<Content>> {
        let result = match criteria.and_then(|c| c.content_type.as_deref().map(|t| (t, c.sort))) {
            Some((content_type, sort)) => self.repo.list_content_by_type(content_type, sort).await,
            None => self.repo.list_content().await,
        };

        match result {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::error!("Failed to list content: {}", e);
                self.notify(NoticeLevel::Error, format!("Failed to list content: {e}"));
                None
            }
        }
    }

    /// Run the flexible listing and return a cursor at its first row.
    ///
    /// Ordering is applied when either `order_by` or `order_order` is given,
    /// defaulting the other half to `id` / `ASC`.
    pub async fn get_entries(&mut self, options: &EntryOptions) -> Result<EntryCursor> {
        let order_by = options.order_by.as_deref().filter(|s| !s.is_empty());
        let order_order = options.order_order.as_deref();
        let sort = if order_by.is_some() || order_order.is_some() {
            Some(Sort::parse(order_by, order_order)?)
        } else {
            None
        };

        let limit = options.limit.unwrap_or(self.entry_limit);
        let query = EntryQuery {
            content_type: options.content_type.clone().filter(|t| !t.is_empty()),
            sort,
            limit: (limit > 0).then_some(limit),
        };

        let rows = self.repo.list_entries(&query).await?;
        tracing::debug!("Fetched {} entries", rows.len());

        Ok(EntryCursor::new(rows, self.renderer.clone()))
    }

    /// Every row in the table, deleted content included
    pub async fn export(&self) -> Result<Vec<Content>> {
        self.repo.export_content().await
    }

    /// Render the content and extract its outline, caching both on it
    pub fn prepare(&self, content: &mut Content) -> Result<()> {
        self.renderer.prepare(content)
    }
}
