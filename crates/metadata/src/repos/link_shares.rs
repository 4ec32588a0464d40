//! Link share repository trait.

use crate::error::MetadataResult;
use crate::models::LinkShareRow;
use async_trait::async_trait;
use locker_core::ResourceKind;
use uuid::Uuid;

/// Repository for public link shares.
#[async_trait]
pub trait LinkShareRepo: Send + Sync {
    /// Create a link share. The token must be unique.
    async fn create_link_share(&self, link: &LinkShareRow) -> MetadataResult<()>;

    /// Resolve a public link by its token.
    async fn get_link_share_by_token(&self, token: &str) -> MetadataResult<Option<LinkShareRow>>;

    /// List link shares referencing a resource, keyset-paginated by link id.
    async fn list_link_shares_for_resource(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        after: Option<Uuid>,
        limit: u32,
    ) -> MetadataResult<Vec<LinkShareRow>>;

    /// Delete a link share. Deleting a missing id is a no-op.
    async fn delete_link_share(&self, link_id: Uuid) -> MetadataResult<()>;
}
