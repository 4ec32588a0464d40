//! Blob storage layer for Locker.
//!
//! File contents live here under opaque keys; everything else about a
//! file is metadata. The garbage collector deletes blobs through the
//! [`BlobStore`] trait when purging expired files.

pub mod backends;
pub mod error;
pub mod traits;

pub use backends::FilesystemBackend;
pub use error::{StorageError, StorageResult};
pub use traits::BlobStore;

use locker_core::StorageConfig;
use std::sync::Arc;

/// Build a blob store from configuration.
pub fn from_config(config: &StorageConfig) -> StorageResult<Arc<dyn BlobStore>> {
    match config {
        StorageConfig::Filesystem { path } => {
            let backend = FilesystemBackend::new(path)?;
            Ok(Arc::new(backend))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_builds_filesystem_backend() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig::Filesystem {
            path: dir.path().to_path_buf(),
        };
        let store = from_config(&config).unwrap();
        assert_eq!(store.backend_name(), "filesystem");
    }
}
