//! Repository layer for database operations
//!
//! Thin wrapper around the SQLite pool. Every statement comes from the
//! catalog; this layer only binds parameters and maps rows. Store errors are
//! returned as-is, deciding what to swallow is up to the service layer.

use super::catalog::{self, QueryKey, Sort};
use super::models::{Content, User};
use crate::error::Result;
use sqlx::SqlitePool;

/// Outcome of a write statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    pub rows_affected: u64,
    pub last_insert_id: i64,
}

/// Filters and caps for the flexible listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryQuery {
    pub content_type: Option<String>,
    /// `None` leaves the order to SQLite
    pub sort: Option<Sort>,
    /// `None` lists every matching row
    pub limit: Option<u32>,
}

impl EntryQuery {
    /// The flexible select extended with the requested clauses
    pub fn to_sql(&self) -> String {
        let mut sql = catalog::sql(QueryKey::FlexibleSelect, Sort::default());
        if self.content_type.is_some() {
            sql.push_str(" AND c.type = ?");
        }
        if let Some(sort) = &self.sort {
            sql.push(' ');
            sql.push_str(&sort.order_by_clause());
        }
        if self.limit.is_some() {
            sql.push_str(" LIMIT ?");
        }
        sql.push(';');
        sql
    }
}

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create an owner and return its id
    pub async fn create_user(&self, acronym: &str, name: Option<&str>) -> Result<i64> {
        let id = sqlx::query("INSERT INTO User (acronym, name) VALUES (?, ?)")
            .bind(acronym)
            .bind(name)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        tracing::debug!("Created user: {} ({})", acronym, id);
        Ok(id)
    }

    /// Get an owner by id
    pub async fn get_user(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT id, acronym, name FROM User WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Insert content, binding its owner
    pub async fn insert_content(&self, content: &Content) -> Result<WriteOutcome> {
        let result = sqlx::query(&catalog::sql(QueryKey::Insert, Sort::default()))
            .bind(&content.key)
            .bind(&content.content_type)
            .bind(&content.title)
            .bind(&content.data)
            .bind(&content.datafile)
            .bind(content.filter.as_str())
            .bind(content.owner_id)
            .execute(&self.pool)
            .await?;

        let outcome = WriteOutcome {
            rows_affected: result.rows_affected(),
            last_insert_id: result.last_insert_rowid(),
        };
        tracing::debug!("Inserted content: {} ({:?})", content.key, outcome);
        Ok(outcome)
    }

    /// Update every mutable column of the content with the given id
    pub async fn update_content(&self, id: i64, content: &Content) -> Result<WriteOutcome> {
        let result = sqlx::query(&catalog::sql(QueryKey::Update, Sort::default()))
            .bind(&content.key)
            .bind(&content.content_type)
            .bind(&content.title)
            .bind(&content.data)
            .bind(&content.datafile)
            .bind(content.filter.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Updated content: {} ({} rows)", id, result.rows_affected());
        Ok(WriteOutcome {
            rows_affected: result.rows_affected(),
            last_insert_id: result.last_insert_rowid(),
        })
    }

    /// Soft delete: stamp `deleted` on a live row
    pub async fn mark_deleted(&self, id: i64) -> Result<u64> {
        let rows = sqlx::query(&catalog::sql(QueryKey::UpdateAsDeleted, Sort::default()))
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::debug!("Soft deleted content: {} ({} rows)", id, rows);
        Ok(rows)
    }

    /// Get live content by id
    pub async fn get_content(&self, id: i64) -> Result<Option<Content>> {
        let content = sqlx::query_as::<_, Content>(&catalog::sql(QueryKey::SelectById, Sort::default()))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(content)
    }

    /// Get live content by key. The first row wins when keys collide.
    pub async fn get_content_by_key(&self, key: &str) -> Result<Option<Content>> {
        let content = sqlx::query_as::<_, Content>(&catalog::sql(QueryKey::SelectByKey, Sort::default()))
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(content)
    }

    /// List all live content
    pub async fn list_content(&self) -> Result<Vec<Content>> {
        let content = sqlx::query_as::<_, Content>(&catalog::sql(QueryKey::SelectAll, Sort::default()))
            .fetch_all(&self.pool)
            .await?;

        Ok(content)
    }

    /// List live content of one type
    pub async fn list_content_by_type(&self, content_type: &str, sort: Sort) -> Result<Vec<Content>> {
        let content = sqlx::query_as::<_, Content>(&catalog::sql(QueryKey::SelectByType, sort))
            .bind(content_type)
            .fetch_all(&self.pool)
            .await?;

        Ok(content)
    }

    /// Run the flexible listing
    pub async fn list_entries(&self, query: &EntryQuery) -> Result<Vec<Content>> {
        let sql = query.to_sql();
        tracing::debug!("Listing entries: {}", sql);

        let mut q = sqlx::query_as::<_, Content>(&sql);
        if let Some(content_type) = &query.content_type {
            q = q.bind(content_type);
        }
        if let Some(limit) = query.limit {
            q = q.bind(i64::from(limit));
        }

        Ok(q.fetch_all(&self.pool).await?)
    }

    /// Every row, soft-deleted ones included
    pub async fn export_content(&self) -> Result<Vec<Content>> {
        let content = sqlx::query_as::<_, Content>(&catalog::sql(QueryKey::ExportTable, Sort::default()))
            .fetch_all(&self.pool)
            .await?;

        Ok(content)
    }

    /// Create the content table when missing
    pub async fn create_table(&self) -> Result<()> {
        sqlx::query(&catalog::sql(QueryKey::CreateTable, Sort::default()))
            .execute(&self.pool)
            .await?;

        tracing::info!("Created table {}", catalog::sql(QueryKey::TableName, Sort::default()));
        Ok(())
    }

    /// Drop the content table and everything in it
    pub async fn drop_table(&self) -> Result<()> {
        sqlx::query(&catalog::sql(QueryKey::DropTable, Sort::default()))
            .execute(&self.pool)
            .await?;

        tracing::info!("Dropped table {}", catalog::sql(QueryKey::TableName, Sort::default()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::create_memory_pool;
    use crate::filter::FilterKind;

    async fn create_test_repo() -> (Repository, i64) {
        let pool = create_memory_pool().await.unwrap();

        let repo = Repository::new(pool);
        let owner = repo.create_user("doe", Some("Jane Doe")).await.unwrap();
        (repo, owner)
    }

    fn page(owner: i64, key: &str, content_type: &str) -> Content {
        Content::new(owner, key, content_type, format!("Title of {key}"))
            .with_data("Body", FilterKind::Markdown)
    }

    #[tokio::test]
    async fn test_insert_and_get_content() {
        let (repo, owner) = create_test_repo().await;

        let outcome = repo.insert_content(&page(owner, "home", "page")).await.unwrap();
        assert_eq!(outcome.rows_affected, 1);
        assert!(outcome.last_insert_id > 0);

        let fetched = repo.get_content(outcome.last_insert_id).await.unwrap().unwrap();
        assert_eq!(fetched.id, Some(outcome.last_insert_id));
        assert_eq!(fetched.key, "home");
        assert_eq!(fetched.content_type, "page");
        assert_eq!(fetched.filter, FilterKind::Markdown);
        assert_eq!(fetched.owner_id, owner);
        assert_eq!(fetched.owner.as_deref(), Some("doe"));
        assert!(fetched.created.is_some());
        assert!(fetched.updated.is_none());
        assert!(fetched.deleted.is_none());
    }

    #[tokio::test]
    async fn test_update_content() {
        let (repo, owner) = create_test_repo().await;

        let id = repo.insert_content(&page(owner, "a", "page")).await.unwrap().last_insert_id;

        let mut changed = page(owner, "a", "post");
        changed.title = "Changed".to_string();
        let outcome = repo.update_content(id, &changed).await.unwrap();
        assert_eq!(outcome.rows_affected, 1);

        let fetched = repo.get_content(id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Changed");
        assert_eq!(fetched.content_type, "post");
        assert!(fetched.updated.is_some());

        let missing = repo.update_content(id + 100, &changed).await.unwrap();
        assert_eq!(missing.rows_affected, 0);
    }

    #[tokio::test]
    async fn test_mark_deleted_hides_content() {
        let (repo, owner) = create_test_repo().await;

        let id = repo.insert_content(&page(owner, "gone", "page")).await.unwrap().last_insert_id;

        assert_eq!(repo.mark_deleted(id).await.unwrap(), 1);
        assert!(repo.get_content(id).await.unwrap().is_none());
        assert!(repo.get_content_by_key("gone").await.unwrap().is_none());
        assert!(repo.list_content().await.unwrap().is_empty());

        // Already deleted rows are left alone
        assert_eq!(repo.mark_deleted(id).await.unwrap(), 0);

        let exported = repo.export_content().await.unwrap();
        assert_eq!(exported.len(), 1);
        assert!(exported[0].deleted.is_some());
        assert!(exported[0].owner.is_none());
    }

    #[tokio::test]
    async fn test_list_content_by_type_sorted() {
        let (repo, owner) = create_test_repo().await;

        for key in ["b", "c", "a"] {
            repo.insert_content(&page(owner, key, "page")).await.unwrap();
        }
        repo.insert_content(&page(owner, "z", "post")).await.unwrap();

        let by_id = repo.list_content_by_type("page", Sort::default()).await.unwrap();
        let keys: Vec<&str> = by_id.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["b", "c", "a"]);

        let sort = Sort::parse(Some("key"), Some("desc")).unwrap();
        let by_key = repo.list_content_by_type("page", sort).await.unwrap();
        let keys: Vec<&str> = by_key.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["c", "b", "a"]);
    }

    #[tokio::test]
    async fn test_list_entries() {
        let (repo, owner) = create_test_repo().await;

        for i in 0..10 {
            let kind = if i % 2 == 0 { "post" } else { "page" };
            repo.insert_content(&page(owner, &format!("k{i}"), kind)).await.unwrap();
        }

        let query = EntryQuery {
            content_type: Some("post".to_string()),
            sort: Some(Sort::parse(None, Some("DESC")).unwrap()),
            limit: Some(3),
        };
        let entries = repo.list_entries(&query).await.unwrap();
        let keys: Vec<&str> = entries.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["k8", "k6", "k4"]);

        let everything = repo.list_entries(&EntryQuery::default()).await.unwrap();
        assert_eq!(everything.len(), 10);
    }

    #[test]
    fn test_entry_query_sql() {
        let query = EntryQuery {
            content_type: Some("post".to_string()),
            sort: Some(Sort::default()),
            limit: Some(7),
        };
        assert!(query
            .to_sql()
            .ends_with("WHERE c.deleted IS NULL AND c.type = ? ORDER BY c.id ASC LIMIT ?;"));
        assert!(EntryQuery::default().to_sql().ends_with("WHERE c.deleted IS NULL;"));
    }

    #[tokio::test]
    async fn test_unknown_filter_hydrates_as_plain() {
        let (repo, owner) = create_test_repo().await;

        sqlx::query("INSERT INTO Content (key, type, title, data, filter, idUser) VALUES ('x', 'page', 'X', '', 'php', ?)")
            .bind(owner)
            .execute(repo.pool())
            .await
            .unwrap();

        let content = repo.get_content_by_key("x").await.unwrap().unwrap();
        assert_eq!(content.filter, FilterKind::Plain);
    }

    #[tokio::test]
    async fn test_drop_and_create_table() {
        let (repo, owner) = create_test_repo().await;
        repo.insert_content(&page(owner, "a", "page")).await.unwrap();

        repo.drop_table().await.unwrap();
        assert!(repo.list_content().await.is_err());

        repo.create_table().await.unwrap();
        assert!(repo.list_content().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_user() {
        let (repo, owner) = create_test_repo().await;

        let user = repo.get_user(owner).await.unwrap().unwrap();
        assert_eq!(user.acronym, "doe");
        assert_eq!(user.name.as_deref(), Some("Jane Doe"));
        assert!(repo.get_user(owner + 1).await.unwrap().is_none());
    }
}
