//! File repository trait.

use crate::error::MetadataResult;
use crate::models::FileRow;
use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

/// Repository for file records.
#[async_trait]
pub trait FileRepo: Send + Sync {
    /// Create a file record.
    async fn create_file(&self, file: &FileRow) -> MetadataResult<()>;

    /// Get a file by id.
    async fn get_file(&self, file_id: Uuid) -> MetadataResult<Option<FileRow>>;

    /// Soft-delete a file, starting its retention window.
    /// Returns `NotFound` if the file does not exist.
    async fn trash_file(&self, file_id: Uuid, at: OffsetDateTime) -> MetadataResult<()>;

    /// Undo a soft delete. Returns `NotFound` if the file does not exist.
    async fn restore_file(&self, file_id: Uuid, at: OffsetDateTime) -> MetadataResult<()>;

    /// List an owner's trashed files, most recently trashed first.
    async fn list_trashed_files(&self, owner_id: Uuid, limit: u32) -> MetadataResult<Vec<FileRow>>;

    /// Find soft-deleted files whose retention window has elapsed:
    /// `is_deleted AND updated_at < cutoff`, ordered by id, at most `limit`.
    async fn find_expired_files(
        &self,
        cutoff: OffsetDateTime,
        limit: u32,
    ) -> MetadataResult<Vec<FileRow>>;

    /// List files inside a folder regardless of their soft-delete state,
    /// keyset-paginated: rows with `file_id > after`, ordered by id.
    async fn list_files_in_folder(
        &self,
        folder_id: Uuid,
        after: Option<Uuid>,
        limit: u32,
    ) -> MetadataResult<Vec<FileRow>>;

    /// Permanently delete a file record. Deleting a missing id is a no-op.
    async fn delete_file(&self, file_id: Uuid) -> MetadataResult<()>;
}
