// GitHub REST implementation of the RepositoryDataSource port.
//
// Responsibilities
// - List a user's owned repositories, most recently updated first.
// - Translate HTTP failures into DataSourceError. No retries, no auth.

use std::time::Duration;

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::Deserialize;

use crate::modules::repository_charts::adapters::outbound::data_source::{
    DataSourceError, RepositoryDataSource,
};
use crate::modules::repository_charts::core::record::RepositoryRecord;
use crate::modules::repository_charts::core::username::Username;

pub const GITHUB_API_BASE: &str = "https://api.github.com";
const PER_PAGE: usize = 100;

/// Subset of the repository payload the charts need.
#[derive(Debug, Deserialize)]
struct GitHubRepository {
    name: String,
    forks_count: Option<u64>,
    stargazers_count: Option<u64>,
    language: Option<String>,
}

impl From<GitHubRepository> for RepositoryRecord {
    fn from(repo: GitHubRepository) -> Self {
        Self {
            name: repo.name,
            fork_count: repo.forks_count.unwrap_or(0),
            star_count: repo.stargazers_count.unwrap_or(0),
            primary_language: repo.language.filter(|l| !l.trim().is_empty()),
        }
    }
}

pub struct GitHubDataSource {
    client: Client,
    base_url: String,
    max_pages: u32,
}

impl GitHubDataSource {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        max_pages: u32,
    ) -> Result<Self, DataSourceError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("badge-generator/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| DataSourceError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_pages: max_pages.max(1),
        })
    }

    async fn fetch_page(
        &self,
        username: &Username,
        page: u32,
    ) -> Result<Vec<GitHubRepository>, DataSourceError> {
        let url = format!("{}/users/{}/repos", self.base_url, username);
        let page = page.to_string();
        let per_page = PER_PAGE.to_string();
        let params = [
            ("type", "owner"),
            ("sort", "updated"),
            ("direction", "desc"),
            ("per_page", per_page.as_str()),
            ("page", page.as_str()),
        ];

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| DataSourceError::Transport(e.to_string()))?;

        let response = check_response(username, response).await?;
        response
            .json()
            .await
            .map_err(|e| DataSourceError::Decode(e.to_string()))
    }
}

async fn check_response(username: &Username, response: Response) -> Result<Response, DataSourceError> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::NOT_FOUND => Err(DataSourceError::NotFound(username.to_string())),
        status => Err(DataSourceError::Status {
            status: status.as_u16(),
            body: response.text().await.unwrap_or_default(),
        }),
    }
}

#[async_trait::async_trait]
impl RepositoryDataSource for GitHubDataSource {
    async fn fetch_repositories(
        &self,
        username: &Username,
    ) -> Result<Vec<RepositoryRecord>, DataSourceError> {
        let mut records = Vec::new();
        for page in 1..=self.max_pages {
            let repos = self.fetch_page(username, page).await?;
            let last_page = repos.len() < PER_PAGE;
            records.extend(repos.into_iter().map(RepositoryRecord::from));
            if last_page {
                break;
            }
        }
        tracing::debug!(%username, records = records.len(), "fetched repositories from GitHub");
        Ok(records)
    }
}
