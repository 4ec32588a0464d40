//! Core domain types and shared logic for Locker.
//!
//! This crate defines the vocabulary used across all other crates:
//! - Resource identity (files and folders) and share roles
//! - Application configuration (metadata store, blob store, GC policy)
//! - The shared core error type

pub mod config;
pub mod error;
pub mod resource;

pub use config::{AppConfig, GcConfig, MetadataConfig, StorageConfig};
pub use error::{Error, Result};
pub use resource::{ResourceKind, ShareRole};

/// Default trash retention period in days.
pub const DEFAULT_RETENTION_DAYS: u32 = 30;
