//! SQL catalog for the `Content` table
//!
//! Every statement the crate runs lives here, addressed by a [`QueryKey`].
//! Sort-aware statements take a [`Sort`], whose column and direction come
//! from closed enums, so nothing the caller types reaches an ORDER BY clause
//! unchecked.

use crate::config::SORTABLE_COLUMNS;
use crate::error::{ContentError, Result};
use std::fmt;
use std::str::FromStr;

/// Columns shared by every owner-joined read
const SELECT_WITH_OWNER: &str =
    "SELECT c.*, u.acronym AS owner FROM Content AS c INNER JOIN User AS u ON c.idUser = u.id";

/// Column a listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    #[default]
    Id,
    Key,
    Type,
    Title,
    Created,
    Updated,
    Owner,
}

impl SortColumn {
    /// Column expression valid inside the owner-joined queries
    fn sql(self) -> &'static str {
        match self {
            SortColumn::Id => "c.id",
            SortColumn::Key => "c.key",
            SortColumn::Type => "c.type",
            SortColumn::Title => "c.title",
            SortColumn::Created => "c.created",
            SortColumn::Updated => "c.updated",
            SortColumn::Owner => "owner",
        }
    }
}

impl FromStr for SortColumn {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self> {
        let column = match s.to_ascii_lowercase().as_str() {
            "id" => SortColumn::Id,
            "key" => SortColumn::Key,
            "type" => SortColumn::Type,
            "title" => SortColumn::Title,
            "created" => SortColumn::Created,
            "updated" => SortColumn::Updated,
            "owner" => SortColumn::Owner,
            _ => {
                return Err(ContentError::InvalidSortColumn(format!(
                    "{s} (expected one of {})",
                    SORTABLE_COLUMNS.join(", ")
                )))
            }
        };
        Ok(column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    fn sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = ContentError;

    /// Accepts `asc` or `desc` in any case
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(ContentError::InvalidSortDirection(s.to_string())),
        }
    }
}

/// Validated ORDER BY specification, `id ASC` by default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sort {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Parse raw `order-by` / `order-order` arguments, defaulting each one.
    pub fn parse(order_by: Option<&str>, order_order: Option<&str>) -> Result<Self> {
        let column = match order_by {
            Some(column) if !column.is_empty() => column.parse()?,
            _ => SortColumn::default(),
        };
        let direction = match order_order {
            Some(direction) => direction.parse()?,
            None => SortDirection::default(),
        };
        Ok(Self { column, direction })
    }

    /// `ORDER BY` clause without leading or trailing whitespace
    pub fn order_by_clause(&self) -> String {
        format!("ORDER BY {} {}", self.column.sql(), self.direction.sql())
    }
}

/// Symbolic name of a catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    TableName,
    DropTable,
    CreateTable,
    ExportTable,
    Insert,
    SelectById,
    SelectByKey,
    SelectByType,
    SelectAll,
    FlexibleSelect,
    Update,
    UpdateAsDeleted,
}

impl QueryKey {
    pub const ALL: [QueryKey; 12] = [
        QueryKey::TableName,
        QueryKey::DropTable,
        QueryKey::CreateTable,
        QueryKey::ExportTable,
        QueryKey::Insert,
        QueryKey::SelectById,
        QueryKey::SelectByKey,
        QueryKey::SelectByType,
        QueryKey::SelectAll,
        QueryKey::FlexibleSelect,
        QueryKey::Update,
        QueryKey::UpdateAsDeleted,
    ];

    /// Symbolic name as used by callers that address queries by string
    pub fn name(self) -> &'static str {
        match self {
            QueryKey::TableName => "table name content",
            QueryKey::DropTable => "drop table content",
            QueryKey::CreateTable => "create table content",
            QueryKey::ExportTable => "export table content",
            QueryKey::Insert => "insert content",
            QueryKey::SelectById => "select * by id",
            QueryKey::SelectByKey => "select * by key",
            QueryKey::SelectByType => "select * by type",
            QueryKey::SelectAll => "select *",
            QueryKey::FlexibleSelect => "flexible select *",
            QueryKey::Update => "update content",
            QueryKey::UpdateAsDeleted => "update content as deleted",
        }
    }
}

impl FromStr for QueryKey {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self> {
        QueryKey::ALL
            .into_iter()
            .find(|key| key.name() == s)
            .ok_or_else(|| ContentError::UnknownQueryKey(s.to_string()))
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// SQL text for `key`. Only `SelectByType` uses `sort`.
pub fn sql(key: QueryKey, sort: Sort) -> String {
    match key {
        QueryKey::TableName => "Content".to_string(),
        QueryKey::DropTable => "DROP TABLE IF EXISTS Content;".to_string(),
        QueryKey::CreateTable => "CREATE TABLE IF NOT EXISTS Content (id INTEGER PRIMARY KEY, key TEXT KEY, type TEXT, title TEXT, data TEXT, datafile TEXT DEFAULT NULL, filter TEXT, idUser INT, created DATETIME DEFAULT (datetime('now')), updated DATETIME DEFAULT NULL, deleted DATETIME DEFAULT NULL, FOREIGN KEY(idUser) REFERENCES User(id));".to_string(),
        QueryKey::ExportTable => "SELECT * FROM Content;".to_string(),
        QueryKey::Insert => "INSERT INTO Content (key, type, title, data, datafile, filter, idUser) VALUES (?, ?, ?, ?, ?, ?, ?);".to_string(),
        QueryKey::SelectById => format!("{SELECT_WITH_OWNER} WHERE c.id = ? AND c.deleted IS NULL;"),
        QueryKey::SelectByKey => format!("{SELECT_WITH_OWNER} WHERE c.key = ? AND c.deleted IS NULL;"),
        QueryKey::SelectByType => format!(
            "{SELECT_WITH_OWNER} WHERE c.type = ? AND c.deleted IS NULL {};",
            sort.order_by_clause()
        ),
        QueryKey::SelectAll => format!("{SELECT_WITH_OWNER} WHERE c.deleted IS NULL;"),
        QueryKey::FlexibleSelect => format!("{SELECT_WITH_OWNER} WHERE c.deleted IS NULL"),
        QueryKey::Update => "UPDATE Content SET key = ?, type = ?, title = ?, data = ?, datafile = ?, filter = ?, updated = datetime('now') WHERE id = ?;".to_string(),
        QueryKey::UpdateAsDeleted => "UPDATE Content SET deleted = datetime('now') WHERE id = ? AND deleted IS NULL;".to_string(),
    }
}

/// SQL text for a symbolic query name, parsing raw sort arguments.
///
/// Fails with `UnknownQueryKey` when the name is not registered.
pub fn sql_for(name: &str, order_by: Option<&str>, order_order: Option<&str>) -> Result<String> {
    let key: QueryKey = name.parse()?;
    let sort = Sort::parse(order_by, order_order)?;
    Ok(sql(key, sort))
}
