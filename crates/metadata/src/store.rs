//! Metadata store trait and SQLite implementation.

use crate::error::{MetadataError, MetadataResult};
use crate::models::{FileRow, FolderRow, LinkShareRow, ShareGrantRow, StarRow};
use crate::repos::{FileRepo, FolderRepo, LinkShareRepo, ShareRepo, StarRepo};
use async_trait::async_trait;
use locker_core::ResourceKind;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

/// Combined metadata store trait.
#[async_trait]
pub trait MetadataStore:
    FileRepo + FolderRepo + ShareRepo + LinkShareRepo + StarRepo + Send + Sync
{
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
    /// Create a new SQLite store and run migrations.
    pub async fn new(path: impl AsRef<Path>) -> MetadataResult<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| MetadataError::Config(e.to_string()))?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .foreign_keys(true)
            // Prevent transient "database is locked" errors under concurrent access.
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            // SQLite permits limited write concurrency; a single connection avoids
            // persistent "database is locked" failures under test concurrency.
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

/// Map a unique-constraint violation on the named table to `AlreadyExists`.
fn map_unique_violation(e: sqlx::Error, table: &str, what: String) -> MetadataError {
    match e {
        sqlx::Error::Database(db_err) => {
            let msg = db_err.message();
            if msg.contains("UNIQUE constraint") && msg.contains(table) {
                MetadataError::AlreadyExists(what)
            } else {
                MetadataError::Unavailable(sqlx::Error::Database(db_err))
            }
        }
        other => other.into(),
    }
}

#[async_trait]
impl MetadataStore for SqliteStore {
    async fn migrate(&self) -> MetadataResult<()> {
        sqlx::raw_sql(SCHEMA_SQL).execute(&self.pool).await?;
        debug!("metadata schema up to date");
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl FileRepo for SqliteStore {
    async fn create_file(&self, file: &FileRow) -> MetadataResult<()> {
        sqlx::query(
            r#"
            INSERT INTO files (file_id, owner_id, folder_id, name, size_bytes, storage_key, is_deleted, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(file.file_id)
        .bind(file.owner_id)
        .bind(file.folder_id)
        .bind(&file.name)
        .bind(file.size_bytes)
        .bind(&file.storage_key)
        .bind(file.is_deleted)
        .bind(file.created_at)
        .bind(file.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_file(&self, file_id: Uuid) -> MetadataResult<Option<FileRow>> {
        let row = sqlx::query_as::<_, FileRow>("SELECT * FROM files WHERE file_id = ?")
            .bind(file_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn trash_file(&self, file_id: Uuid, at: OffsetDateTime) -> MetadataResult<()> {
        let result =
            sqlx::query("UPDATE files SET is_deleted = 1, updated_at = ? WHERE file_id = ?")
                .bind(at)
                .bind(file_id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(MetadataError::NotFound(format!("file {file_id}")));
        }
        Ok(())
    }

    async fn restore_file(&self, file_id: Uuid, at: OffsetDateTime) -> MetadataResult<()> {
        let result =
            sqlx::query("UPDATE files SET is_deleted = 0, updated_at = ? WHERE file_id = ?")
                .bind(at)
                .bind(file_id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(MetadataError::NotFound(format!("file {file_id}")));
        }
        Ok(())
    }

    async fn list_trashed_files(&self, owner_id: Uuid, limit: u32) -> MetadataResult<Vec<FileRow>> {
        let rows = sqlx::query_as::<_, FileRow>(
            "SELECT * FROM files WHERE owner_id = ? AND is_deleted = 1 ORDER BY updated_at DESC LIMIT ?",
        )
        .bind(owner_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_expired_files(
        &self,
        cutoff: OffsetDateTime,
        limit: u32,
    ) -> MetadataResult<Vec<FileRow>> {
        let rows = sqlx::query_as::<_, FileRow>(
            "SELECT * FROM files WHERE is_deleted = 1 AND updated_at < ? ORDER BY file_id LIMIT ?",
        )
        .bind(cutoff)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_files_in_folder(
        &self,
        folder_id: Uuid,
        after: Option<Uuid>,
        limit: u32,
    ) -> MetadataResult<Vec<FileRow>> {
        // No is_deleted filter: a purged folder takes both active and
        // trashed children with it.
        let rows = match after {
            Some(after) => {
                sqlx::query_as::<_, FileRow>(
                    "SELECT * FROM files WHERE folder_id = ? AND file_id > ? ORDER BY file_id LIMIT ?",
                )
                .bind(folder_id)
                .bind(after)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, FileRow>(
                    "SELECT * FROM files WHERE folder_id = ? ORDER BY file_id LIMIT ?",
                )
                .bind(folder_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    async fn delete_file(&self, file_id: Uuid) -> MetadataResult<()> {
        // Idempotent: zero rows affected means the record is already gone.
        sqlx::query("DELETE FROM files WHERE file_id = ?")
            .bind(file_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl FolderRepo for SqliteStore {
    async fn create_folder(&self, folder: &FolderRow) -> MetadataResult<()> {
        sqlx::query(
            r#"
            INSERT INTO folders (folder_id, owner_id, parent_id, name, is_deleted, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(folder.folder_id)
        .bind(folder.owner_id)
        .bind(folder.parent_id)
        .bind(&folder.name)
        .bind(folder.is_deleted)
        .bind(folder.created_at)
        .bind(folder.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_folder(&self, folder_id: Uuid) -> MetadataResult<Option<FolderRow>> {
        let row = sqlx::query_as::<_, FolderRow>("SELECT * FROM folders WHERE folder_id = ?")
            .bind(folder_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn trash_folder(&self, folder_id: Uuid, at: OffsetDateTime) -> MetadataResult<()> {
        let result =
            sqlx::query("UPDATE folders SET is_deleted = 1, updated_at = ? WHERE folder_id = ?")
                .bind(at)
                .bind(folder_id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(MetadataError::NotFound(format!("folder {folder_id}")));
        }
        Ok(())
    }

    async fn restore_folder(&self, folder_id: Uuid, at: OffsetDateTime) -> MetadataResult<()> {
        let result =
            sqlx::query("UPDATE folders SET is_deleted = 0, updated_at = ? WHERE folder_id = ?")
                .bind(at)
                .bind(folder_id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(MetadataError::NotFound(format!("folder {folder_id}")));
        }
        Ok(())
    }

    async fn list_trashed_folders(
        &self,
        owner_id: Uuid,
        limit: u32,
    ) -> MetadataResult<Vec<FolderRow>> {
        let rows = sqlx::query_as::<_, FolderRow>(
            "SELECT * FROM folders WHERE owner_id = ? AND is_deleted = 1 ORDER BY updated_at DESC LIMIT ?",
        )
        .bind(owner_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_expired_folders(
        &self,
        cutoff: OffsetDateTime,
        limit: u32,
    ) -> MetadataResult<Vec<FolderRow>> {
        let rows = sqlx::query_as::<_, FolderRow>(
            "SELECT * FROM folders WHERE is_deleted = 1 AND updated_at < ? ORDER BY folder_id LIMIT ?",
        )
        .bind(cutoff)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_child_folders(
        &self,
        parent_id: Uuid,
        after: Option<Uuid>,
        limit: u32,
    ) -> MetadataResult<Vec<FolderRow>> {
        let rows = match after {
            Some(after) => {
                sqlx::query_as::<_, FolderRow>(
                    "SELECT * FROM folders WHERE parent_id = ? AND folder_id > ? ORDER BY folder_id LIMIT ?",
                )
                .bind(parent_id)
                .bind(after)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, FolderRow>(
                    "SELECT * FROM folders WHERE parent_id = ? ORDER BY folder_id LIMIT ?",
                )
                .bind(parent_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    async fn delete_folder(&self, folder_id: Uuid) -> MetadataResult<()> {
        sqlx::query("DELETE FROM folders WHERE folder_id = ?")
            .bind(folder_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ShareRepo for SqliteStore {
    async fn create_share(&self, share: &ShareGrantRow) -> MetadataResult<()> {
        sqlx::query(
            r#"
            INSERT INTO shares (share_id, resource_type, resource_id, grantee_id, role, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(share.share_id)
        .bind(&share.resource_type)
        .bind(share.resource_id)
        .bind(share.grantee_id)
        .bind(&share.role)
        .bind(share.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(
                e,
                "shares",
                format!(
                    "share on {} {} for grantee {}",
                    share.resource_type, share.resource_id, share.grantee_id
                ),
            )
        })?;
        Ok(())
    }

    async fn list_shares_for_resource(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        after: Option<Uuid>,
        limit: u32,
    ) -> MetadataResult<Vec<ShareGrantRow>> {
        let rows = match after {
            Some(after) => {
                sqlx::query_as::<_, ShareGrantRow>(
                    "SELECT * FROM shares WHERE resource_type = ? AND resource_id = ? AND share_id > ? ORDER BY share_id LIMIT ?",
                )
                .bind(kind.as_str())
                .bind(resource_id)
                .bind(after)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ShareGrantRow>(
                    "SELECT * FROM shares WHERE resource_type = ? AND resource_id = ? ORDER BY share_id LIMIT ?",
                )
                .bind(kind.as_str())
                .bind(resource_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    async fn list_shares_for_grantee(
        &self,
        grantee_id: Uuid,
    ) -> MetadataResult<Vec<ShareGrantRow>> {
        let rows = sqlx::query_as::<_, ShareGrantRow>(
            "SELECT * FROM shares WHERE grantee_id = ? ORDER BY created_at DESC",
        )
        .bind(grantee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn delete_share(&self, share_id: Uuid) -> MetadataResult<()> {
        sqlx::query("DELETE FROM shares WHERE share_id = ?")
            .bind(share_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl LinkShareRepo for SqliteStore {
    async fn create_link_share(&self, link: &LinkShareRow) -> MetadataResult<()> {
        sqlx::query(
            r#"
            INSERT INTO link_shares (link_id, resource_type, resource_id, token, password_hash, expires_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(link.link_id)
        .bind(&link.resource_type)
        .bind(link.resource_id)
        .bind(&link.token)
        .bind(&link.password_hash)
        .bind(link.expires_at)
        .bind(link.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "link_shares", format!("link token {}", link.token)))?;
        Ok(())
    }

    async fn get_link_share_by_token(&self, token: &str) -> MetadataResult<Option<LinkShareRow>> {
        let row = sqlx::query_as::<_, LinkShareRow>("SELECT * FROM link_shares WHERE token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_link_shares_for_resource(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        after: Option<Uuid>,
        limit: u32,
    ) -> MetadataResult<Vec<LinkShareRow>> {
        let rows = match after {
            Some(after) => {
                sqlx::query_as::<_, LinkShareRow>(
                    "SELECT * FROM link_shares WHERE resource_type = ? AND resource_id = ? AND link_id > ? ORDER BY link_id LIMIT ?",
                )
                .bind(kind.as_str())
                .bind(resource_id)
                .bind(after)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, LinkShareRow>(
                    "SELECT * FROM link_shares WHERE resource_type = ? AND resource_id = ? ORDER BY link_id LIMIT ?",
                )
                .bind(kind.as_str())
                .bind(resource_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    async fn delete_link_share(&self, link_id: Uuid) -> MetadataResult<()> {
        sqlx::query("DELETE FROM link_shares WHERE link_id = ?")
            .bind(link_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl StarRepo for SqliteStore {
    async fn create_star(&self, star: &StarRow) -> MetadataResult<()> {
        sqlx::query(
            r#"
            INSERT INTO stars (star_id, resource_type, resource_id, user_id, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(star.star_id)
        .bind(&star.resource_type)
        .bind(star.resource_id)
        .bind(star.user_id)
        .bind(star.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(
                e,
                "stars",
                format!(
                    "star on {} {} by user {}",
                    star.resource_type, star.resource_id, star.user_id
                ),
            )
        })?;
        Ok(())
    }

    async fn list_stars_for_resource(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        after: Option<Uuid>,
        limit: u32,
    ) -> MetadataResult<Vec<StarRow>> {
        let rows = match after {
            Some(after) => {
                sqlx::query_as::<_, StarRow>(
                    "SELECT * FROM stars WHERE resource_type = ? AND resource_id = ? AND star_id > ? ORDER BY star_id LIMIT ?",
                )
                .bind(kind.as_str())
                .bind(resource_id)
                .bind(after)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, StarRow>(
                    "SELECT * FROM stars WHERE resource_type = ? AND resource_id = ? ORDER BY star_id LIMIT ?",
                )
                .bind(kind.as_str())
                .bind(resource_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    async fn list_stars_for_user(&self, user_id: Uuid) -> MetadataResult<Vec<StarRow>> {
        let rows = sqlx::query_as::<_, StarRow>(
            "SELECT * FROM stars WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn delete_star(&self, star_id: Uuid) -> MetadataResult<()> {
        sqlx::query("DELETE FROM stars WHERE star_id = ?")
            .bind(star_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// SQL schema for SQLite.
const SCHEMA_SQL: &str = r#"
-- Files
CREATE TABLE IF NOT EXISTS files (
    file_id BLOB PRIMARY KEY,
    owner_id BLOB NOT NULL,
    folder_id BLOB,
    name TEXT NOT NULL,
    size_bytes INTEGER NOT NULL DEFAULT 0,
    storage_key TEXT,
    is_deleted INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
-- Stable keyset-paginated child listing
CREATE INDEX IF NOT EXISTS idx_files_folder ON files(folder_id, file_id);
-- Expiry scan: is_deleted = 1 AND updated_at < cutoff
CREATE INDEX IF NOT EXISTS idx_files_trash ON files(is_deleted, updated_at);
CREATE INDEX IF NOT EXISTS idx_files_owner ON files(owner_id);

-- Folders
CREATE TABLE IF NOT EXISTS folders (
    folder_id BLOB PRIMARY KEY,
    owner_id BLOB NOT NULL,
    parent_id BLOB,
    name TEXT NOT NULL,
    is_deleted INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_folders_parent ON folders(parent_id, folder_id);
CREATE INDEX IF NOT EXISTS idx_folders_trash ON folders(is_deleted, updated_at);
CREATE INDEX IF NOT EXISTS idx_folders_owner ON folders(owner_id);

-- Share grants
CREATE TABLE IF NOT EXISTS shares (
    share_id BLOB PRIMARY KEY,
    resource_type TEXT NOT NULL,
    resource_id BLOB NOT NULL,
    grantee_id BLOB NOT NULL,
    role TEXT NOT NULL DEFAULT 'viewer',
    created_at TEXT NOT NULL,
    UNIQUE(resource_type, resource_id, grantee_id)
);
CREATE INDEX IF NOT EXISTS idx_shares_resource ON shares(resource_type, resource_id, share_id);
CREATE INDEX IF NOT EXISTS idx_shares_grantee ON shares(grantee_id);

-- Public link shares
CREATE TABLE IF NOT EXISTS link_shares (
    link_id BLOB PRIMARY KEY,
    resource_type TEXT NOT NULL,
    resource_id BLOB NOT NULL,
    token TEXT NOT NULL UNIQUE,
    password_hash TEXT,
    expires_at TEXT,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_link_shares_resource ON link_shares(resource_type, resource_id, link_id);

-- Stars
CREATE TABLE IF NOT EXISTS stars (
    star_id BLOB PRIMARY KEY,
    resource_type TEXT NOT NULL,
    resource_id BLOB NOT NULL,
    user_id BLOB NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE(resource_type, resource_id, user_id)
);
CREATE INDEX IF NOT EXISTS idx_stars_resource ON stars(resource_type, resource_id, star_id);
CREATE INDEX IF NOT EXISTS idx_stars_user ON stars(user_id);
"#;
