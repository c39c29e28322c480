//! Database models
//!
//! Rust structs representing database entities.
//! All models use serde for serialization to presentation layers.

use crate::filter::FilterKind;
use crate::toc::TableOfContents;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

/// A content item (article, page, ...) stored in the `Content` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Assigned by the first successful insert, `None` before that.
    pub id: Option<i64>,
    pub key: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub title: String,
    /// Raw, unrendered body text
    pub data: String,
    /// File under the datafile directory appended to `data` when rendering
    pub datafile: Option<String>,
    pub filter: FilterKind,
    pub owner_id: i64,
    /// Owner's display handle, present on rows read through the owner join
    pub owner: Option<String>,
    pub created: Option<NaiveDateTime>,
    pub updated: Option<NaiveDateTime>,
    /// Set when the content has been moved to the wastebasket
    pub deleted: Option<NaiveDateTime>,

    /// Output of the filter, cached by the renderer. Never persisted.
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub rendered: Option<String>,
    /// Outline of `rendered`, cached by the renderer. Never persisted.
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub toc: Option<TableOfContents>,
}

impl Content {
    /// A new, not yet persisted record owned by `owner_id`.
    pub fn new(
        owner_id: i64,
        key: impl Into<String>,
        content_type: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            owner_id,
            key: key.into(),
            content_type: content_type.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_data(mut self, data: impl Into<String>, filter: FilterKind) -> Self {
        self.data = data.into();
        self.filter = filter;
        self
    }

    pub fn with_datafile(mut self, datafile: impl Into<String>) -> Self {
        self.datafile = Some(datafile.into());
        self
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted.is_some()
    }
}

impl<'r> FromRow<'r, SqliteRow> for Content {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let filter: Option<String> = row.try_get("filter")?;

        // Only the owner-joined queries select the handle
        let owner = match row.try_get::<Option<String>, _>("owner") {
            Ok(owner) => owner,
            Err(sqlx::Error::ColumnNotFound(_)) => None,
            Err(e) => return Err(e),
        };

        Ok(Self {
            id: row.try_get("id")?,
            key: row.try_get::<Option<String>, _>("key")?.unwrap_or_default(),
            content_type: row.try_get::<Option<String>, _>("type")?.unwrap_or_default(),
            title: row.try_get::<Option<String>, _>("title")?.unwrap_or_default(),
            data: row.try_get::<Option<String>, _>("data")?.unwrap_or_default(),
            datafile: row.try_get("datafile")?,
            filter: filter.as_deref().map(FilterKind::from_tag).unwrap_or_default(),
            owner_id: row.try_get::<Option<i64>, _>("idUser")?.unwrap_or_default(),
            owner,
            created: row.try_get("created")?,
            updated: row.try_get("updated")?,
            deleted: row.try_get("deleted")?,
            rendered: None,
            toc: None,
        })
    }
}

/// Owner of content
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub acronym: String,
    pub name: Option<String>,
}

/// Criteria for `list_all`
#[derive(Debug, Clone, Default)]
pub struct ListCriteria {
    /// Only list content of this type
    pub content_type: Option<String>,
    /// Ordering of the type-filtered listing
    pub sort: super::catalog::Sort,
}

impl ListCriteria {
    pub fn of_type(content_type: impl Into<String>) -> Self {
        Self {
            content_type: Some(content_type.into()),
            ..Self::default()
        }
    }
}

/// Options for `get_entries`, as received from a caller.
///
/// Sort values are raw strings and are validated when the query is built.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryOptions {
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub order_by: Option<String>,
    pub order_order: Option<String>,
    /// Row cap. `None` uses the configured default, `Some(0)` lists everything.
    pub limit: Option<u32>,
}
