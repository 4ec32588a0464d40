//! Database models mapping to the metadata schema.

use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

// =============================================================================
// Files and folders
// =============================================================================

/// File record.
///
/// `updated_at` doubles as the soft-delete timestamp: trashing a file flips
/// `is_deleted` and touches `updated_at`, which starts the retention window.
#[derive(Debug, Clone, FromRow)]
pub struct FileRow {
    pub file_id: Uuid,
    pub owner_id: Uuid,
    /// Containing folder; NULL for root-level files.
    pub folder_id: Option<Uuid>,
    pub name: String,
    pub size_bytes: i64,
    /// Blob locator; NULL for files whose content was never uploaded.
    pub storage_key: Option<String>,
    pub is_deleted: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Folder record.
#[derive(Debug, Clone, FromRow)]
pub struct FolderRow {
    pub folder_id: Uuid,
    pub owner_id: Uuid,
    /// Parent folder; NULL for root-level folders.
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub is_deleted: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

// =============================================================================
// Dependent records (deleted whenever their resource is permanently erased)
// =============================================================================

/// Share grant giving another user access to a resource.
#[derive(Debug, Clone, FromRow)]
pub struct ShareGrantRow {
    pub share_id: Uuid,
    /// "file" or "folder".
    pub resource_type: String,
    pub resource_id: Uuid,
    pub grantee_id: Uuid,
    /// "viewer" or "editor".
    pub role: String,
    pub created_at: OffsetDateTime,
}

/// Public link share for a resource.
#[derive(Debug, Clone, FromRow)]
pub struct LinkShareRow {
    pub link_id: Uuid,
    pub resource_type: String,
    pub resource_id: Uuid,
    /// Opaque token embedded in the public URL.
    pub token: String,
    pub password_hash: Option<String>,
    pub expires_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

/// Star marking a resource as a favorite of a user.
#[derive(Debug, Clone, FromRow)]
pub struct StarRow {
    pub star_id: Uuid,
    pub resource_type: String,
    pub resource_id: Uuid,
    pub user_id: Uuid,
    pub created_at: OffsetDateTime,
}
