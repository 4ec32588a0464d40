//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use time::Duration;

/// Garbage collection configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GcConfig {
    /// Days a trashed resource remains recoverable before it is purged.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    /// Maximum expired items scanned per collection per run.
    /// Remaining backlog is picked up by the next scheduled run.
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
    /// Page size for child and dependent-record listings.
    /// Listings paginate to exhaustion; this only bounds page fetches.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Run the collector on an interval instead of once (default: false).
    #[serde(default)]
    pub schedule_enabled: bool,
    /// Seconds between scheduled runs (default: 1 hour).
    /// Only used if schedule_enabled is true.
    #[serde(default = "default_schedule_interval_secs")]
    pub schedule_interval_secs: u64,
}

fn default_retention_days() -> u32 {
    crate::DEFAULT_RETENTION_DAYS
}

fn default_batch_size() -> u32 {
    500
}

fn default_page_size() -> u32 {
    100
}

fn default_schedule_interval_secs() -> u64 {
    3600 // 1 hour
}

impl Default for GcConfig {
    fn default() -> Self {
        Self {
            retention_days: default_retention_days(),
            batch_size: default_batch_size(),
            page_size: default_page_size(),
            schedule_enabled: false,
            schedule_interval_secs: default_schedule_interval_secs(),
        }
    }
}

impl GcConfig {
    /// Get the retention period as a Duration.
    pub fn retention_period(&self) -> Duration {
        Duration::days(i64::from(self.retention_days))
    }

    /// Get the schedule interval as a std::time::Duration.
    pub fn schedule_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.schedule_interval_secs)
    }

    /// Validate GC configuration for settings that would break at runtime.
    pub fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 {
            return Err("gc.batch_size cannot be 0; no expired items would ever be scanned".to_string());
        }
        if self.page_size == 0 {
            return Err("gc.page_size cannot be 0; child listings would loop forever".to_string());
        }
        if self.schedule_enabled && self.schedule_interval_secs == 0 {
            return Err("gc.schedule_interval_secs cannot be 0 when scheduling is enabled".to_string());
        }
        Ok(())
    }
}

/// Metadata store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MetadataConfig {
    Sqlite {
        /// Path to the SQLite database file.
        path: PathBuf,
    },
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self::Sqlite {
            path: PathBuf::from("data/locker.db"),
        }
    }
}

/// Blob store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    Filesystem {
        /// Root directory for blob objects.
        path: PathBuf,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Filesystem {
            path: PathBuf::from("data/blobs"),
        }
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Filesystem { path } => {
                if path.as_os_str().is_empty() {
                    return Err("storage.path cannot be empty".to_string());
                }
                Ok(())
            }
        }
    }
}

/// Complete application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Metadata store configuration.
    #[serde(default)]
    pub metadata: MetadataConfig,
    /// Blob store configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Garbage collection configuration.
    #[serde(default)]
    pub gc: GcConfig,
}

impl AppConfig {
    /// Validate the whole configuration before wiring anything up.
    pub fn validate(&self) -> Result<(), String> {
        self.gc.validate()?;
        self.storage.validate()?;
        Ok(())
    }
}
