use crate::modules::repository_charts::core::hour_bucket::{CacheKey, HourBucket};
use crate::modules::repository_charts::core::record::RepositoryRecord;
use crate::shared::infrastructure::record_store::{RecordStore, RecordStoreError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryRecordStore {
    entries: RwLock<HashMap<CacheKey, Arc<Vec<RepositoryRecord>>>>,
    is_offline: bool,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn contains(&self, key: &CacheKey) -> bool {
        self.entries.read().await.contains_key(key)
    }

    fn ensure_online(&self) -> Result<(), RecordStoreError> {
        if self.is_offline {
            return Err(RecordStoreError::Backend("Record store offline".into()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn load(&self, key: &CacheKey) -> Result<Option<Vec<RepositoryRecord>>, RecordStoreError> {
        self.ensure_online()?;
        Ok(self
            .entries
            .read()
            .await
            .get(key)
            .map(|records| records.as_ref().clone()))
    }

    async fn save(&self, key: &CacheKey, records: &[RepositoryRecord]) -> Result<(), RecordStoreError> {
        self.ensure_online()?;
        self.entries
            .write()
            .await
            .insert(key.clone(), Arc::new(records.to_vec()));
        Ok(())
    }

    async fn prune(&self, username: &str, keep_from: HourBucket) -> Result<usize, RecordStoreError> {
        self.ensure_online()?;
        let mut guard = self.entries.write().await;
        let before = guard.len();
        guard.retain(|key, _| key.username() != username || key.bucket() >= keep_from);
        Ok(before - guard.len())
    }
}
