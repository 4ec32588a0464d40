//! Metadata persistence layer for Locker.
//!
//! Stores file and folder records plus the dependent records that
//! reference them (share grants, link shares, stars). The garbage
//! collector drives this layer through the [`MetadataStore`] trait.

pub mod error;
pub mod models;
pub mod repos;
pub mod store;

pub use error::{MetadataError, MetadataResult};
pub use models::{FileRow, FolderRow, LinkShareRow, ShareGrantRow, StarRow};
pub use repos::{FileRepo, FolderRepo, LinkShareRepo, ShareRepo, StarRepo};
pub use store::{MetadataStore, SqliteStore};

use locker_core::MetadataConfig;
use std::sync::Arc;

/// Build a metadata store from configuration. Runs migrations.
pub async fn from_config(config: &MetadataConfig) -> MetadataResult<Arc<dyn MetadataStore>> {
    match config {
        MetadataConfig::Sqlite { path } => {
            let store = SqliteStore::new(path).await?;
            Ok(Arc::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn from_config_creates_sqlite_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = MetadataConfig::Sqlite {
            path: dir.path().join("meta.db"),
        };
        let store = from_config(&config).await.unwrap();
        store.health_check().await.unwrap();
    }
}
