//! Cascading deletion of expired files and folder trees.

use crate::cleaner::purge_dependents;
use crate::report::GcReport;
use locker_core::ResourceKind;
use locker_metadata::{FileRow, MetadataStore};
use locker_storage::{BlobStore, StorageError};
use std::collections::HashSet;
use tracing::{debug, warn};
use uuid::Uuid;

/// Permanently delete a single expired file.
///
/// Purges dependent records, deletes the blob, then removes the
/// metadata record. Every stage is attempted even when an earlier one
/// failed; each failure is recorded. A missing blob is success, so
/// retrying after a previous partial run converges.
pub async fn delete_expired_file(
    metadata: &dyn MetadataStore,
    blobs: &dyn BlobStore,
    file: &FileRow,
    page_size: u32,
    report: &mut GcReport,
) {
    purge_dependents(metadata, ResourceKind::File, file.file_id, page_size, report).await;

    if let Some(key) = &file.storage_key {
        match blobs.delete(key).await {
            Ok(()) => report.blobs_deleted += 1,
            Err(StorageError::NotFound(_)) => {
                debug!(file_id = %file.file_id, key, "blob already absent");
            }
            Err(e) => {
                warn!(file_id = %file.file_id, key, error = %e, "blob delete failed");
                report.record_error(&format!("blob for file {}", file.file_id), e);
            }
        }
    }

    match metadata.delete_file(file.file_id).await {
        Ok(()) => report.files_deleted += 1,
        Err(e) => {
            warn!(file_id = %file.file_id, error = %e, "file record delete failed");
            report.record_error(&format!("file {}", file.file_id), e);
        }
    }
}

enum Frame {
    Visit(Uuid),
    Finalize(Uuid),
}

/// Permanently delete a folder and everything beneath it.
///
/// Iterative post-order walk over an explicit frame stack, so tree
/// depth is bounded by heap, not call stack. Descendants are erased
/// unconditionally regardless of their own soft-delete state: a child
/// inside an expired folder has no surviving path to it.
///
/// `Visit` drains a folder's child files, collects its child folders
/// (both paginated to exhaustion), then pushes `Finalize` below the
/// children so every descendant is attempted first. `Finalize` purges
/// the folder's dependents and removes its record. If either child
/// listing fails the folder is left un-finalized; it stays trashed and
/// expired and the next run retries the subtree.
pub async fn delete_folder_tree(
    metadata: &dyn MetadataStore,
    blobs: &dyn BlobStore,
    root_id: Uuid,
    page_size: u32,
    report: &mut GcReport,
) {
    let mut stack = vec![Frame::Visit(root_id)];
    // Guards against a corrupt parent chain forming a cycle.
    let mut visited = HashSet::new();

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Visit(folder_id) => {
                if !visited.insert(folder_id) {
                    warn!(%folder_id, "folder cycle detected, skipping revisit");
                    continue;
                }

                let files_ok = drain_child_files(metadata, blobs, folder_id, page_size, report).await;

                let mut child_ids = Vec::new();
                let folders_ok =
                    collect_child_folders(metadata, folder_id, page_size, &mut child_ids, report)
                        .await;

                if !files_ok || !folders_ok {
                    // Listing failed; do not finalize or we would orphan
                    // unseen children.
                    continue;
                }

                stack.push(Frame::Finalize(folder_id));
                for child_id in child_ids {
                    stack.push(Frame::Visit(child_id));
                }
            }
            Frame::Finalize(folder_id) => {
                purge_dependents(metadata, ResourceKind::Folder, folder_id, page_size, report)
                    .await;
                match metadata.delete_folder(folder_id).await {
                    Ok(()) => report.folders_deleted += 1,
                    Err(e) => {
                        warn!(%folder_id, error = %e, "folder record delete failed");
                        report.record_error(&format!("folder {folder_id}"), e);
                    }
                }
            }
        }
    }
}

/// Delete every file directly inside a folder. Returns false if the
/// listing itself failed.
async fn drain_child_files(
    metadata: &dyn MetadataStore,
    blobs: &dyn BlobStore,
    folder_id: Uuid,
    page_size: u32,
    report: &mut GcReport,
) -> bool {
    let mut after = None;
    loop {
        let page = match metadata
            .list_files_in_folder(folder_id, after, page_size)
            .await
        {
            Ok(page) => page,
            Err(e) => {
                warn!(%folder_id, error = %e, "child file listing failed");
                report.record_error(&format!("files in folder {folder_id}"), e);
                return false;
            }
        };
        if page.is_empty() {
            return true;
        }
        // Keyset advances past failed deletes; they are retried next run.
        after = page.last().map(|f| f.file_id);
        for file in &page {
            delete_expired_file(metadata, blobs, file, page_size, report).await;
        }
    }
}

/// Collect the ids of every direct child folder. Returns false if the
/// listing failed partway; collected ids are still visited.
async fn collect_child_folders(
    metadata: &dyn MetadataStore,
    folder_id: Uuid,
    page_size: u32,
    out: &mut Vec<Uuid>,
    report: &mut GcReport,
) -> bool {
    let mut after = None;
    loop {
        let page = match metadata
            .list_child_folders(folder_id, after, page_size)
            .await
        {
            Ok(page) => page,
            Err(e) => {
                warn!(%folder_id, error = %e, "child folder listing failed");
                report.record_error(&format!("folders in folder {folder_id}"), e);
                return false;
            }
        };
        if page.is_empty() {
            return true;
        }
        after = page.last().map(|f| f.folder_id);
        out.extend(page.into_iter().map(|f| f.folder_id));
    }
}
