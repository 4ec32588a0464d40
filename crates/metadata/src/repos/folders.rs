//! Folder repository trait.

use crate::error::MetadataResult;
use crate::models::FolderRow;
use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

/// Repository for folder records.
#[async_trait]
pub trait FolderRepo: Send + Sync {
    /// Create a folder record.
    async fn create_folder(&self, folder: &FolderRow) -> MetadataResult<()>;

    /// Get a folder by id.
    async fn get_folder(&self, folder_id: Uuid) -> MetadataResult<Option<FolderRow>>;

    /// Soft-delete a folder, starting its retention window.
    /// Returns `NotFound` if the folder does not exist.
    async fn trash_folder(&self, folder_id: Uuid, at: OffsetDateTime) -> MetadataResult<()>;

    /// Undo a soft delete. Returns `NotFound` if the folder does not exist.
    async fn restore_folder(&self, folder_id: Uuid, at: OffsetDateTime) -> MetadataResult<()>;

    /// List an owner's trashed folders, most recently trashed first.
    async fn list_trashed_folders(
        &self,
        owner_id: Uuid,
        limit: u32,
    ) -> MetadataResult<Vec<FolderRow>>;

    /// Find soft-deleted folders whose retention window has elapsed,
    /// ordered by id, at most `limit`.
    async fn find_expired_folders(
        &self,
        cutoff: OffsetDateTime,
        limit: u32,
    ) -> MetadataResult<Vec<FolderRow>>;

    /// List direct child folders regardless of their soft-delete state,
    /// keyset-paginated: rows with `folder_id > after`, ordered by id.
    async fn list_child_folders(
        &self,
        parent_id: Uuid,
        after: Option<Uuid>,
        limit: u32,
    ) -> MetadataResult<Vec<FolderRow>>;

    /// Permanently delete a folder record. Deleting a missing id is a no-op.
    async fn delete_folder(&self, folder_id: Uuid) -> MetadataResult<()>;
}
