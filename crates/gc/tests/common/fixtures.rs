//! Row builders and seeding helpers.

use bytes::Bytes;
use locker_metadata::{FileRepo, FileRow, FolderRepo, FolderRow, LinkShareRow, ShareGrantRow, StarRow};
use locker_storage::BlobStore;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

pub fn days_ago(days: i64) -> OffsetDateTime {
    OffsetDateTime::now_utc() - Duration::days(days)
}

pub fn file_row(folder_id: Option<Uuid>) -> FileRow {
    let now = OffsetDateTime::now_utc();
    FileRow {
        file_id: Uuid::new_v4(),
        owner_id: Uuid::new_v4(),
        folder_id,
        name: "photo.jpg".to_string(),
        size_bytes: 1024,
        storage_key: Some(format!("objects/{}", Uuid::new_v4())),
        is_deleted: false,
        created_at: now,
        updated_at: now,
    }
}

pub fn folder_row(parent_id: Option<Uuid>) -> FolderRow {
    let now = OffsetDateTime::now_utc();
    FolderRow {
        folder_id: Uuid::new_v4(),
        owner_id: Uuid::new_v4(),
        parent_id,
        name: "album".to_string(),
        is_deleted: false,
        created_at: now,
        updated_at: now,
    }
}

pub fn share_for_file(file_id: Uuid) -> ShareGrantRow {
    ShareGrantRow {
        share_id: Uuid::new_v4(),
        resource_type: "file".to_string(),
        resource_id: file_id,
        grantee_id: Uuid::new_v4(),
        role: "viewer".to_string(),
        created_at: OffsetDateTime::now_utc(),
    }
}

pub fn share_for_folder(folder_id: Uuid) -> ShareGrantRow {
    ShareGrantRow {
        resource_type: "folder".to_string(),
        ..share_for_file(folder_id)
    }
}

pub fn link_for_file(file_id: Uuid) -> LinkShareRow {
    LinkShareRow {
        link_id: Uuid::new_v4(),
        resource_type: "file".to_string(),
        resource_id: file_id,
        token: Uuid::new_v4().to_string(),
        password_hash: None,
        expires_at: None,
        created_at: OffsetDateTime::now_utc(),
    }
}

pub fn star_for_file(file_id: Uuid) -> StarRow {
    StarRow {
        star_id: Uuid::new_v4(),
        resource_type: "file".to_string(),
        resource_id: file_id,
        user_id: Uuid::new_v4(),
        created_at: OffsetDateTime::now_utc(),
    }
}

/// Create a file record with a stored blob, trashed `trashed_days_ago`
/// days in the past.
pub async fn seed_trashed_file(
    metadata: &dyn FileRepo,
    blobs: &dyn BlobStore,
    folder_id: Option<Uuid>,
    trashed_days_ago: i64,
) -> FileRow {
    let file = file_row(folder_id);
    if let Some(key) = &file.storage_key {
        blobs.put(key, Bytes::from_static(b"contents")).await.unwrap();
    }
    metadata.create_file(&file).await.unwrap();
    metadata
        .trash_file(file.file_id, days_ago(trashed_days_ago))
        .await
        .unwrap();
    file
}

/// Create a folder record trashed `trashed_days_ago` days in the past.
pub async fn seed_trashed_folder(
    metadata: &dyn FolderRepo,
    parent_id: Option<Uuid>,
    trashed_days_ago: i64,
) -> FolderRow {
    let folder = folder_row(parent_id);
    metadata.create_folder(&folder).await.unwrap();
    metadata
        .trash_folder(folder.folder_id, days_ago(trashed_days_ago))
        .await
        .unwrap();
    folder
}
