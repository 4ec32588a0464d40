//! Instrumented wrappers for fault injection and call recording.

use async_trait::async_trait;
use bytes::Bytes;
use locker_core::ResourceKind;
use locker_metadata::{
    FileRepo, FileRow, FolderRepo, FolderRow, LinkShareRepo, LinkShareRow, MetadataError,
    MetadataResult, MetadataStore, ShareGrantRow, ShareRepo, SqliteStore, StarRepo, StarRow,
};
use locker_storage::{BlobStore, FilesystemBackend, StorageError, StorageResult};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use time::OffsetDateTime;
use uuid::Uuid;

/// Blob store that fails deletes for configured keys.
pub struct FlakyBlobStore {
    inner: Arc<FilesystemBackend>,
    failing_keys: Mutex<HashSet<String>>,
}

impl FlakyBlobStore {
    pub fn new(inner: Arc<FilesystemBackend>) -> Self {
        Self {
            inner,
            failing_keys: Mutex::new(HashSet::new()),
        }
    }

    pub fn fail_key(&self, key: &str) {
        self.failing_keys.lock().unwrap().insert(key.to_string());
    }

    pub fn heal(&self) {
        self.failing_keys.lock().unwrap().clear();
    }

    fn check(&self, key: &str) -> StorageResult<()> {
        if self.failing_keys.lock().unwrap().contains(key) {
            return Err(StorageError::Io(std::io::Error::other("injected failure")));
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for FlakyBlobStore {
    async fn exists(&self, key: &str) -> StorageResult<bool> {
        self.inner.exists(key).await
    }

    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()> {
        self.inner.put(key, data).await
    }

    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        self.inner.get(key).await
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.check(key)?;
        self.inner.delete(key).await
    }

    fn backend_name(&self) -> &'static str {
        "flaky"
    }
}

/// What a deletion-order recording saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deleted {
    File(Uuid),
    Folder(Uuid),
}

/// Metadata store wrapper that records deletion order and injects
/// failures on demand.
pub struct InstrumentedStore {
    inner: Arc<SqliteStore>,
    pub deletions: Mutex<Vec<Deleted>>,
    pub fail_file_scan: AtomicBool,
    pub fail_folder_scan: AtomicBool,
    pub fail_share_listing: AtomicBool,
}

impl InstrumentedStore {
    pub fn new(inner: Arc<SqliteStore>) -> Self {
        Self {
            inner,
            deletions: Mutex::new(Vec::new()),
            fail_file_scan: AtomicBool::new(false),
            fail_folder_scan: AtomicBool::new(false),
            fail_share_listing: AtomicBool::new(false),
        }
    }

    pub fn deletion_order(&self) -> Vec<Deleted> {
        self.deletions.lock().unwrap().clone()
    }

    fn injected() -> MetadataError {
        MetadataError::Internal("injected failure".to_string())
    }
}

#[async_trait]
impl FileRepo for InstrumentedStore {
    async fn create_file(&self, file: &FileRow) -> MetadataResult<()> {
        self.inner.create_file(file).await
    }

    async fn get_file(&self, file_id: Uuid) -> MetadataResult<Option<FileRow>> {
        self.inner.get_file(file_id).await
    }

    async fn trash_file(&self, file_id: Uuid, at: OffsetDateTime) -> MetadataResult<()> {
        self.inner.trash_file(file_id, at).await
    }

    async fn restore_file(&self, file_id: Uuid, at: OffsetDateTime) -> MetadataResult<()> {
        self.inner.restore_file(file_id, at).await
    }

    async fn list_trashed_files(&self, owner_id: Uuid, limit: u32) -> MetadataResult<Vec<FileRow>> {
        self.inner.list_trashed_files(owner_id, limit).await
    }

    async fn find_expired_files(
        &self,
        cutoff: OffsetDateTime,
        limit: u32,
    ) -> MetadataResult<Vec<FileRow>> {
        if self.fail_file_scan.load(Ordering::SeqCst) {
            return Err(Self::injected());
        }
        self.inner.find_expired_files(cutoff, limit).await
    }

    async fn list_files_in_folder(
        &self,
        folder_id: Uuid,
        after: Option<Uuid>,
        limit: u32,
    ) -> MetadataResult<Vec<FileRow>> {
        self.inner.list_files_in_folder(folder_id, after, limit).await
    }

    async fn delete_file(&self, file_id: Uuid) -> MetadataResult<()> {
        self.inner.delete_file(file_id).await?;
        self.deletions.lock().unwrap().push(Deleted::File(file_id));
        Ok(())
    }
}

#[async_trait]
impl FolderRepo for InstrumentedStore {
    async fn create_folder(&self, folder: &FolderRow) -> MetadataResult<()> {
        self.inner.create_folder(folder).await
    }

    async fn get_folder(&self, folder_id: Uuid) -> MetadataResult<Option<FolderRow>> {
        self.inner.get_folder(folder_id).await
    }

    async fn trash_folder(&self, folder_id: Uuid, at: OffsetDateTime) -> MetadataResult<()> {
        self.inner.trash_folder(folder_id, at).await
    }

    async fn restore_folder(&self, folder_id: Uuid, at: OffsetDateTime) -> MetadataResult<()> {
        self.inner.restore_folder(folder_id, at).await
    }

    async fn list_trashed_folders(
        &self,
        owner_id: Uuid,
        limit: u32,
    ) -> MetadataResult<Vec<FolderRow>> {
        self.inner.list_trashed_folders(owner_id, limit).await
    }

    async fn find_expired_folders(
        &self,
        cutoff: OffsetDateTime,
        limit: u32,
    ) -> MetadataResult<Vec<FolderRow>> {
        if self.fail_folder_scan.load(Ordering::SeqCst) {
            return Err(Self::injected());
        }
        self.inner.find_expired_folders(cutoff, limit).await
    }

    async fn list_child_folders(
        &self,
        parent_id: Uuid,
        after: Option<Uuid>,
        limit: u32,
    ) -> MetadataResult<Vec<FolderRow>> {
        self.inner.list_child_folders(parent_id, after, limit).await
    }

    async fn delete_folder(&self, folder_id: Uuid) -> MetadataResult<()> {
        self.inner.delete_folder(folder_id).await?;
        self.deletions.lock().unwrap().push(Deleted::Folder(folder_id));
        Ok(())
    }
}

#[async_trait]
impl ShareRepo for InstrumentedStore {
    async fn create_share(&self, share: &ShareGrantRow) -> MetadataResult<()> {
        self.inner.create_share(share).await
    }

    async fn list_shares_for_resource(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        after: Option<Uuid>,
        limit: u32,
    ) -> MetadataResult<Vec<ShareGrantRow>> {
        if self.fail_share_listing.load(Ordering::SeqCst) {
            return Err(Self::injected());
        }
        self.inner
            .list_shares_for_resource(kind, resource_id, after, limit)
            .await
    }

    async fn list_shares_for_grantee(
        &self,
        grantee_id: Uuid,
    ) -> MetadataResult<Vec<ShareGrantRow>> {
        self.inner.list_shares_for_grantee(grantee_id).await
    }

    async fn delete_share(&self, share_id: Uuid) -> MetadataResult<()> {
        self.inner.delete_share(share_id).await
    }
}

#[async_trait]
impl LinkShareRepo for InstrumentedStore {
    async fn create_link_share(&self, link: &LinkShareRow) -> MetadataResult<()> {
        self.inner.create_link_share(link).await
    }

    async fn get_link_share_by_token(&self, token: &str) -> MetadataResult<Option<LinkShareRow>> {
        self.inner.get_link_share_by_token(token).await
    }

    async fn list_link_shares_for_resource(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        after: Option<Uuid>,
        limit: u32,
    ) -> MetadataResult<Vec<LinkShareRow>> {
        self.inner
            .list_link_shares_for_resource(kind, resource_id, after, limit)
            .await
    }

    async fn delete_link_share(&self, link_id: Uuid) -> MetadataResult<()> {
        self.inner.delete_link_share(link_id).await
    }
}

#[async_trait]
impl StarRepo for InstrumentedStore {
    async fn create_star(&self, star: &StarRow) -> MetadataResult<()> {
        self.inner.create_star(star).await
    }

    async fn list_stars_for_resource(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        after: Option<Uuid>,
        limit: u32,
    ) -> MetadataResult<Vec<StarRow>> {
        self.inner
            .list_stars_for_resource(kind, resource_id, after, limit)
            .await
    }

    async fn list_stars_for_user(&self, user_id: Uuid) -> MetadataResult<Vec<StarRow>> {
        self.inner.list_stars_for_user(user_id).await
    }

    async fn delete_star(&self, star_id: Uuid) -> MetadataResult<()> {
        self.inner.delete_star(star_id).await
    }
}

#[async_trait]
impl MetadataStore for InstrumentedStore {
    async fn migrate(&self) -> MetadataResult<()> {
        self.inner.migrate().await
    }

    async fn health_check(&self) -> MetadataResult<()> {
        self.inner.health_check().await
    }
}
