//! Dependent-record cleanup.
//!
//! When a file or folder is purged, every record that references it
//! (share grants, public links, stars) goes with it. The three kinds
//! are cleaned independently so a failure in one never blocks the
//! others.

use crate::report::GcReport;
use locker_core::ResourceKind;
use locker_metadata::MetadataStore;
use tracing::warn;
use uuid::Uuid;

/// Purge all dependent records referencing a resource.
///
/// Each kind paginates to exhaustion. Per-row delete failures are
/// recorded and the loop keeps going; a listing failure aborts only
/// that kind's loop. Re-running after a partial failure converges
/// because deleting an absent row is a no-op.
pub async fn purge_dependents(
    store: &dyn MetadataStore,
    kind: ResourceKind,
    resource_id: Uuid,
    page_size: u32,
    report: &mut GcReport,
) {
    purge_shares(store, kind, resource_id, page_size, report).await;
    purge_link_shares(store, kind, resource_id, page_size, report).await;
    purge_stars(store, kind, resource_id, page_size, report).await;
}

async fn purge_shares(
    store: &dyn MetadataStore,
    kind: ResourceKind,
    resource_id: Uuid,
    page_size: u32,
    report: &mut GcReport,
) {
    let mut after = None;
    loop {
        let page = match store
            .list_shares_for_resource(kind, resource_id, after, page_size)
            .await
        {
            Ok(page) => page,
            Err(e) => {
                warn!(%kind, %resource_id, error = %e, "share listing failed");
                report.record_error(&format!("shares of {kind} {resource_id}"), e);
                return;
            }
        };
        if page.is_empty() {
            return;
        }
        // Advance past the page even if some deletes fail, so a bad row
        // cannot stall the loop. Failed rows are retried next run.
        after = page.last().map(|s| s.share_id);
        for share in page {
            match store.delete_share(share.share_id).await {
                Ok(()) => report.shares_purged += 1,
                Err(e) => {
                    warn!(share_id = %share.share_id, error = %e, "share delete failed");
                    report.record_error(&format!("share {}", share.share_id), e);
                }
            }
        }
    }
}

async fn purge_link_shares(
    store: &dyn MetadataStore,
    kind: ResourceKind,
    resource_id: Uuid,
    page_size: u32,
    report: &mut GcReport,
) {
    let mut after = None;
    loop {
        let page = match store
            .list_link_shares_for_resource(kind, resource_id, after, page_size)
            .await
        {
            Ok(page) => page,
            Err(e) => {
                warn!(%kind, %resource_id, error = %e, "link share listing failed");
                report.record_error(&format!("link shares of {kind} {resource_id}"), e);
                return;
            }
        };
        if page.is_empty() {
            return;
        }
        after = page.last().map(|l| l.link_id);
        for link in page {
            match store.delete_link_share(link.link_id).await {
                Ok(()) => report.link_shares_purged += 1,
                Err(e) => {
                    warn!(link_id = %link.link_id, error = %e, "link share delete failed");
                    report.record_error(&format!("link share {}", link.link_id), e);
                }
            }
        }
    }
}

async fn purge_stars(
    store: &dyn MetadataStore,
    kind: ResourceKind,
    resource_id: Uuid,
    page_size: u32,
    report: &mut GcReport,
) {
    let mut after = None;
    loop {
        let page = match store
            .list_stars_for_resource(kind, resource_id, after, page_size)
            .await
        {
            Ok(page) => page,
            Err(e) => {
                warn!(%kind, %resource_id, error = %e, "star listing failed");
                report.record_error(&format!("stars of {kind} {resource_id}"), e);
                return;
            }
        };
        if page.is_empty() {
            return;
        }
        after = page.last().map(|s| s.star_id);
        for star in page {
            match store.delete_star(star.star_id).await {
                Ok(()) => report.stars_purged += 1,
                Err(e) => {
                    warn!(star_id = %star.star_id, error = %e, "star delete failed");
                    report.record_error(&format!("star {}", star.star_id), e);
                }
            }
        }
    }
}
