//! Metadata store trait and implementations.

use crate::error::{MetadataError, MetadataResult};
use crate::repos::{FileRepo, UserRepo};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Combined metadata store trait.
#[async_trait]
pub trait MetadataStore: UserRepo + FileRepo + Send + Sync {
    /// Run database migrations.
    async fn migrate(&self) -> MetadataResult<()>;

    /// Check database connectivity and health.
    async fn health_check(&self) -> MetadataResult<()>;
}

/// SQLite-based metadata store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Create a new SQLite store.
    pub async fn new(path: impl AsRef<Path>) -> MetadataResult<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| MetadataError::Config(format!("cannot create {parent:?}: {e}")))?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .foreign_keys(true)
            // Prevent transient "database is locked" errors under concurrent access.
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            // SQLite permits limited write concurrency; using a single connection avoids
            // persistent "database is locked" failures under test/axum concurrency.
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;

        tracing::debug!(path = %path.display(), "Opened SQLite metadata store");

        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl MetadataStore for SqliteStore {
    async fn migrate(&self) -> MetadataResult<()> {
        sqlx::query(SCHEMA_SQL)
            .execute(&self.pool)
            .await
            .map_err(|e| MetadataError::Migration(e.to_string()))?;
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

// Implement the repository traits for SqliteStore
mod sqlite_impl {
    use super::*;
    use crate::models::*;
    use time::OffsetDateTime;

    /// Map a unique-constraint violation to `AlreadyExists`, passing other
    /// database errors through unchanged.
    fn map_unique(e: sqlx::Error, what: &str) -> MetadataError {
        if let sqlx::Error::Database(ref db) = e
            && db.is_unique_violation()
        {
            return MetadataError::AlreadyExists(what.to_string());
        }
        MetadataError::Database(e)
    }

    #[async_trait]
    impl UserRepo for SqliteStore {
        async fn create_user(&self, email: &str, password_hash: &str) -> MetadataResult<UserRow> {
            let row = sqlx::query_as::<_, UserRow>(
                r#"
                INSERT INTO users (email, password_hash, created_at)
                VALUES (?, ?, ?)
                RETURNING *
                "#,
            )
            .bind(email)
            .bind(password_hash)
            .bind(OffsetDateTime::now_utc())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique(e, &format!("user '{email}'")))?;
            Ok(row)
        }

        async fn get_user(&self, user_id: i64) -> MetadataResult<Option<UserRow>> {
            let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn get_user_by_email(&self, email: &str) -> MetadataResult<Option<UserRow>> {
            let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = ?")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn count_users(&self) -> MetadataResult<u64> {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
                .fetch_one(&self.pool)
                .await?;
            Ok(count as u64)
        }
    }

    #[async_trait]
    impl FileRepo for SqliteStore {
        async fn create_file(&self, file: &NewFile) -> MetadataResult<FileRow> {
            let row = sqlx::query_as::<_, FileRow>(
                r#"
                INSERT INTO files (owner_id, name, kind, parent_id, is_public, blob_ref, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                RETURNING *
                "#,
            )
            .bind(file.owner_id)
            .bind(&file.name)
            .bind(&file.kind)
            .bind(file.parent_id)
            .bind(file.is_public)
            .bind(&file.blob_ref)
            .bind(OffsetDateTime::now_utc())
            .fetch_one(&self.pool)
            .await?;
            Ok(row)
        }

        async fn get_file(&self, file_id: i64, owner_id: i64) -> MetadataResult<Option<FileRow>> {
            let row = sqlx::query_as::<_, FileRow>(
                "SELECT * FROM files WHERE file_id = ? AND owner_id = ?",
            )
            .bind(file_id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(row)
        }

        async fn get_file_by_id(&self, file_id: i64) -> MetadataResult<Option<FileRow>> {
            let row = sqlx::query_as::<_, FileRow>("SELECT * FROM files WHERE file_id = ?")
                .bind(file_id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn list_files(
            &self,
            owner_id: i64,
            parent_id: i64,
            limit: i64,
            offset: i64,
        ) -> MetadataResult<Vec<FileRow>> {
            let rows = sqlx::query_as::<_, FileRow>(
                r#"
                SELECT * FROM files
                WHERE owner_id = ? AND parent_id = ?
                ORDER BY file_id
                LIMIT ? OFFSET ?
                "#,
            )
            .bind(owner_id)
            .bind(parent_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }

        async fn count_files(&self) -> MetadataResult<u64> {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files")
                .fetch_one(&self.pool)
                .await?;
            Ok(count as u64)
        }
    }
}

const SCHEMA_SQL: &str = r#"
-- Registered identities
CREATE TABLE IF NOT EXISTS users (
    user_id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);

-- Files, images, and folders. parent_id 0 is the root sentinel and has no row.
CREATE TABLE IF NOT EXISTS files (
    file_id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id INTEGER NOT NULL REFERENCES users(user_id),
    name TEXT NOT NULL,
    kind TEXT NOT NULL,
    parent_id INTEGER NOT NULL DEFAULT 0,
    is_public INTEGER NOT NULL DEFAULT 0,
    blob_ref TEXT,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_files_owner_parent ON files(owner_id, parent_id);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewFile;

    async fn test_store() -> (SqliteStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::new(dir.path().join("test.db")).await.unwrap();
        (store, dir)
    }

    fn new_file(owner_id: i64, name: &str, parent_id: i64) -> NewFile {
        NewFile {
            owner_id,
            name: name.to_string(),
            kind: "file".to_string(),
            parent_id,
            is_public: false,
            blob_ref: Some(format!("blob-{name}")),
        }
    }

    #[tokio::test]
    async fn test_migrate_idempotent() {
        let (store, _dir) = test_store().await;
        store.migrate().await.unwrap();
        store.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn test_user_create_and_get() {
        let (store, _dir) = test_store().await;

        let user = store.create_user("alice@example.com", "ab12").await.unwrap();
        assert!(user.user_id >= 1);
        assert_eq!(user.email, "alice@example.com");

        let by_id = store.get_user(user.user_id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "alice@example.com");

        let by_email = store
            .get_user_by_email("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.user_id, user.user_id);

        assert!(store.get_user_by_email("bob@example.com").await.unwrap().is_none());
        assert_eq!(store.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let (store, _dir) = test_store().await;

        store.create_user("alice@example.com", "ab12").await.unwrap();
        let err = store
            .create_user("alice@example.com", "cd34")
            .await
            .unwrap_err();
        assert!(matches!(err, MetadataError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_file_create_and_scoped_get() {
        let (store, _dir) = test_store().await;

        let alice = store.create_user("alice@example.com", "x").await.unwrap();
        let bob = store.create_user("bob@example.com", "x").await.unwrap();

        let file = store
            .create_file(&new_file(alice.user_id, "notes.txt", 0))
            .await
            .unwrap();
        assert!(file.file_id >= 1);
        assert_eq!(file.parent_id, 0);

        // Owner sees it; another user does not.
        assert!(store
            .get_file(file.file_id, alice.user_id)
            .await
            .unwrap()
            .is_some());
        assert!(store
            .get_file(file.file_id, bob.user_id)
            .await
            .unwrap()
            .is_none());

        // Unscoped lookup sees it regardless.
        let any = store.get_file_by_id(file.file_id).await.unwrap().unwrap();
        assert_eq!(any.owner_id, alice.user_id);
    }

    #[tokio::test]
    async fn test_list_files_pagination() {
        let (store, _dir) = test_store().await;
        let alice = store.create_user("alice@example.com", "x").await.unwrap();

        for i in 0..25 {
            store
                .create_file(&new_file(alice.user_id, &format!("f{i:02}"), 0))
                .await
                .unwrap();
        }

        let page0 = store.list_files(alice.user_id, 0, 20, 0).await.unwrap();
        assert_eq!(page0.len(), 20);
        assert_eq!(page0[0].name, "f00");
        assert_eq!(page0[19].name, "f19");

        let page1 = store.list_files(alice.user_id, 0, 20, 20).await.unwrap();
        assert_eq!(page1.len(), 5);
        assert_eq!(page1[0].name, "f20");

        let page2 = store.list_files(alice.user_id, 0, 20, 40).await.unwrap();
        assert!(page2.is_empty());

        // Ids ascend within a page.
        assert!(page0.windows(2).all(|w| w[0].file_id < w[1].file_id));
    }

    #[tokio::test]
    async fn test_list_files_scoped_to_parent_and_owner() {
        let (store, _dir) = test_store().await;
        let alice = store.create_user("alice@example.com", "x").await.unwrap();
        let bob = store.create_user("bob@example.com", "x").await.unwrap();

        let folder = store
            .create_file(&NewFile {
                owner_id: alice.user_id,
                name: "docs".to_string(),
                kind: "folder".to_string(),
                parent_id: 0,
                is_public: false,
                blob_ref: None,
            })
            .await
            .unwrap();

        store
            .create_file(&new_file(alice.user_id, "inside", folder.file_id))
            .await
            .unwrap();
        store
            .create_file(&new_file(alice.user_id, "outside", 0))
            .await
            .unwrap();
        store
            .create_file(&new_file(bob.user_id, "bobs", 0))
            .await
            .unwrap();

        let in_folder = store
            .list_files(alice.user_id, folder.file_id, 20, 0)
            .await
            .unwrap();
        assert_eq!(in_folder.len(), 1);
        assert_eq!(in_folder[0].name, "inside");

        let at_root = store.list_files(alice.user_id, 0, 20, 0).await.unwrap();
        assert_eq!(at_root.len(), 2);

        assert_eq!(store.count_files().await.unwrap(), 4);
    }
}
