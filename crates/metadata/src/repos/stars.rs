//! Star repository trait.

use crate::error::MetadataResult;
use crate::models::StarRow;
use async_trait::async_trait;
use locker_core::ResourceKind;
use uuid::Uuid;

/// Repository for stars (favorites).
#[async_trait]
pub trait StarRepo: Send + Sync {
    /// Create a star. Fails with `AlreadyExists` if the user already
    /// starred this resource.
    async fn create_star(&self, star: &StarRow) -> MetadataResult<()>;

    /// List stars referencing a resource, keyset-paginated by star id.
    async fn list_stars_for_resource(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        after: Option<Uuid>,
        limit: u32,
    ) -> MetadataResult<Vec<StarRow>>;

    /// List a user's starred resources.
    async fn list_stars_for_user(&self, user_id: Uuid) -> MetadataResult<Vec<StarRow>>;

    /// Delete a star. Deleting a missing id is a no-op.
    async fn delete_star(&self, star_id: Uuid) -> MetadataResult<()>;
}
