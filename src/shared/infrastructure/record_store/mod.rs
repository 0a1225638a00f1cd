// Key-value store behind the hourly cache.
//
// Purpose
// - Hold one record collection per (username, hour bucket).
//
// Boundaries
// - No fetching or aggregation here. Adapters only persist what they are given.
//
// Testing guidance
// - Use the in memory store for handler tests and the file store with a temp dir.

use async_trait::async_trait;
use thiserror::Error;

use crate::modules::repository_charts::core::hour_bucket::{CacheKey, HourBucket};
use crate::modules::repository_charts::core::record::RepositoryRecord;

#[derive(Debug, Error)]
pub enum RecordStoreError {
    #[error("cache entry {key} is unreadable: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn load(&self, key: &CacheKey) -> Result<Option<Vec<RepositoryRecord>>, RecordStoreError>;

    async fn save(&self, key: &CacheKey, records: &[RepositoryRecord])
    -> Result<(), RecordStoreError>;

    /// Removes the entries of `username` from buckets older than `keep_from`.
    async fn prune(&self, username: &str, keep_from: HourBucket) -> Result<usize, RecordStoreError>;
}

pub mod file;
pub mod in_memory;
