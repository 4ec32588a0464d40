//! The trash collector.

use crate::cascade::{delete_expired_file, delete_folder_tree};
use crate::report::GcReport;
use locker_core::GcConfig;
use locker_metadata::MetadataStore;
use locker_storage::BlobStore;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

/// Scans for trashed resources whose retention window has elapsed and
/// permanently deletes them, cascading through folder contents,
/// dependent records, and blobs.
pub struct TrashCollector {
    metadata: Arc<dyn MetadataStore>,
    blobs: Arc<dyn BlobStore>,
    config: GcConfig,
}

impl TrashCollector {
    pub fn new(
        metadata: Arc<dyn MetadataStore>,
        blobs: Arc<dyn BlobStore>,
        config: GcConfig,
    ) -> Self {
        Self {
            metadata,
            blobs,
            config,
        }
    }

    /// Run one collection pass.
    ///
    /// Scans at most `batch_size` expired files and `batch_size` expired
    /// folders; backlog beyond that drains across later runs. Never
    /// fails as a whole: per-item errors are recorded in the report and
    /// the run continues. A scan failure skips only that collection.
    pub async fn run(&self) -> GcReport {
        let started_at = OffsetDateTime::now_utc();
        let cutoff = started_at - self.config.retention_period();
        let mut report = GcReport::new(started_at);

        info!(
            %cutoff,
            batch_size = self.config.batch_size,
            "starting trash collection"
        );

        match self
            .metadata
            .find_expired_files(cutoff, self.config.batch_size)
            .await
        {
            Ok(files) => {
                for file in &files {
                    delete_expired_file(
                        self.metadata.as_ref(),
                        self.blobs.as_ref(),
                        file,
                        self.config.page_size,
                        &mut report,
                    )
                    .await;
                }
            }
            Err(e) => {
                warn!(error = %e, "expired file scan failed");
                report.record_error("expired file scan", e);
            }
        }

        match self
            .metadata
            .find_expired_folders(cutoff, self.config.batch_size)
            .await
        {
            Ok(folders) => {
                for folder in &folders {
                    // An earlier cascade in this run may have taken this
                    // folder already (nested expired folders).
                    match self.metadata.get_folder(folder.folder_id).await {
                        Ok(Some(_)) => {
                            delete_folder_tree(
                                self.metadata.as_ref(),
                                self.blobs.as_ref(),
                                folder.folder_id,
                                self.config.page_size,
                                &mut report,
                            )
                            .await;
                        }
                        Ok(None) => {
                            debug!(folder_id = %folder.folder_id, "already removed by a cascade");
                        }
                        Err(e) => {
                            warn!(folder_id = %folder.folder_id, error = %e, "folder lookup failed");
                            report.record_error(&format!("folder {}", folder.folder_id), e);
                        }
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "expired folder scan failed");
                report.record_error("expired folder scan", e);
            }
        }

        report.finished_at = OffsetDateTime::now_utc();
        info!(
            files_deleted = report.files_deleted,
            folders_deleted = report.folders_deleted,
            blobs_deleted = report.blobs_deleted,
            errors = report.errors.len(),
            "trash collection finished"
        );
        report
    }
}
