use async_trait::async_trait;
use thiserror::Error;

use crate::modules::repository_charts::core::record::RepositoryRecord;
use crate::modules::repository_charts::core::username::Username;

#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("user not found: {0}")]
    NotFound(String),

    #[error("upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Decode(String),
}

/// Read-only access to a user's public repositories.
#[async_trait]
pub trait RepositoryDataSource: Send + Sync {
    async fn fetch_repositories(
        &self,
        username: &Username,
    ) -> Result<Vec<RepositoryRecord>, DataSourceError>;
}
