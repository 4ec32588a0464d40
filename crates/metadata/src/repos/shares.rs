//! Share grant repository trait.

use crate::error::MetadataResult;
use crate::models::ShareGrantRow;
use async_trait::async_trait;
use locker_core::ResourceKind;
use uuid::Uuid;

/// Repository for share grants.
#[async_trait]
pub trait ShareRepo: Send + Sync {
    /// Create a share grant. Fails with `AlreadyExists` if the grantee
    /// already has a grant on this resource.
    async fn create_share(&self, share: &ShareGrantRow) -> MetadataResult<()>;

    /// List grants referencing a resource, keyset-paginated by share id.
    async fn list_shares_for_resource(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        after: Option<Uuid>,
        limit: u32,
    ) -> MetadataResult<Vec<ShareGrantRow>>;

    /// List everything shared with a user ("shared with me").
    async fn list_shares_for_grantee(&self, grantee_id: Uuid)
        -> MetadataResult<Vec<ShareGrantRow>>;

    /// Delete a share grant. Deleting a missing id is a no-op.
    async fn delete_share(&self, share_id: Uuid) -> MetadataResult<()>;
}
