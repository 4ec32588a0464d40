//! Shared test fixtures and mocks.
#![allow(dead_code)]

pub mod fixtures;
pub mod mocks;

use locker_metadata::SqliteStore;
use locker_storage::FilesystemBackend;
use std::sync::Arc;

pub struct TestEnv {
    pub metadata: Arc<SqliteStore>,
    pub blobs: Arc<FilesystemBackend>,
    _dir: tempfile::TempDir,
}

/// SQLite store and filesystem blob store in a fresh temp directory.
pub async fn test_env() -> TestEnv {
    let dir = tempfile::tempdir().unwrap();
    let metadata = SqliteStore::new(dir.path().join("meta.db")).await.unwrap();
    let blobs = FilesystemBackend::new(dir.path().join("blobs")).unwrap();
    TestEnv {
        metadata: Arc::new(metadata),
        blobs: Arc::new(blobs),
        _dir: dir,
    }
}
