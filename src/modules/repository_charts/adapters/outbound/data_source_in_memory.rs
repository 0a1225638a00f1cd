use crate::modules::repository_charts::adapters::outbound::data_source::{
    DataSourceError, RepositoryDataSource,
};
use crate::modules::repository_charts::core::record::RepositoryRecord;
use crate::modules::repository_charts::core::username::Username;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryRepositoryDataSource {
    repositories: RwLock<HashMap<String, Vec<RepositoryRecord>>>,
    calls: AtomicUsize,
    is_offline: bool,
}

impl InMemoryRepositoryDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, login: &str, records: Vec<RepositoryRecord>) {
        self.repositories
            .write()
            .await
            .insert(login.to_ascii_lowercase(), records);
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RepositoryDataSource for InMemoryRepositoryDataSource {
    async fn fetch_repositories(
        &self,
        username: &Username,
    ) -> Result<Vec<RepositoryRecord>, DataSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.is_offline {
            return Err(DataSourceError::Transport("Data source offline".into()));
        }
        self.repositories
            .read()
            .await
            .get(&username.cache_key())
            .cloned()
            .ok_or_else(|| DataSourceError::NotFound(username.to_string()))
    }
}
