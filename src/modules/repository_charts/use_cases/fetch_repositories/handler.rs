use crate::modules::repository_charts::adapters::outbound::data_source::{
    DataSourceError, RepositoryDataSource,
};
use crate::modules::repository_charts::core::hour_bucket::{CacheKey, HourBucket};
use crate::modules::repository_charts::core::record::RepositoryRecord;
use crate::modules::repository_charts::core::username::Username;
use crate::shared::core::clock::Clock;
use crate::shared::infrastructure::record_store::{RecordStore, RecordStoreError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error(transparent)]
    Fetch(#[from] DataSourceError),

    #[error(transparent)]
    Store(#[from] RecordStoreError),
}

/// Serves a user's repositories from the store while the hour lasts, and from
/// the data source on the first request of every hour.
pub struct HourlyCache {
    store: Arc<dyn RecordStore>,
    source: Arc<dyn RepositoryDataSource>,
    prune_stale: bool,
}

impl HourlyCache {
    pub fn new(store: Arc<dyn RecordStore>, source: Arc<dyn RepositoryDataSource>) -> Self {
        Self {
            store,
            source,
            prune_stale: false,
        }
    }

    /// Drop a user's entries from earlier hours whenever a new one is written.
    pub fn with_pruning(mut self, prune_stale: bool) -> Self {
        self.prune_stale = prune_stale;
        self
    }

    pub async fn fetch_or_load(
        &self,
        username: &Username,
        clock: &dyn Clock,
    ) -> Result<Vec<RepositoryRecord>, CacheError> {
        let key = CacheKey::new(username, HourBucket::containing(clock.now()));

        match self.store.load(&key).await {
            Ok(Some(records)) => {
                debug!(%key, records = records.len(), "cache hit");
                return Ok(records);
            }
            Ok(None) => debug!(%key, "cache miss"),
            Err(RecordStoreError::Corrupt { reason, .. }) => {
                warn!(%key, %reason, "discarding unreadable cache entry");
            }
            Err(e) => return Err(CacheError::Store(e)),
        }

        let records = self
            .source
            .fetch_repositories(username)
            .await
            .inspect_err(|e| warn!(%username, error = %e, "fetching repositories failed"))?;

        match self.store.save(&key, &records).await {
            Ok(()) => self.prune(&key).await,
            Err(e) => warn!(%key, error = %e, "could not persist cache entry"),
        }

        Ok(records)
    }

    async fn prune(&self, key: &CacheKey) {
        if !self.prune_stale {
            return;
        }
        match self.store.prune(key.username(), key.bucket()).await {
            Ok(0) => {}
            Ok(removed) => debug!(username = key.username(), removed, "pruned stale cache entries"),
            Err(e) => warn!(username = key.username(), error = %e, "pruning cache failed"),
        }
    }
}
