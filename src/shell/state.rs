// Composition root: turns a Config into the concrete adapters the routes use.

use std::sync::Arc;

use crate::modules::repository_charts::adapters::outbound::fonts::FontRegistry;
use crate::modules::repository_charts::adapters::outbound::github::GitHubDataSource;
use crate::modules::repository_charts::adapters::outbound::plotters_renderer::PlottersRenderer;
use crate::modules::repository_charts::use_cases::fetch_repositories::handler::HourlyCache;
use crate::modules::repository_charts::use_cases::render_chart::handler::RenderChartHandler;
use crate::shared::core::clock::SystemClock;
use crate::shared::infrastructure::record_store::RecordStore;
use crate::shared::infrastructure::record_store::file::FileRecordStore;
use crate::shared::infrastructure::record_store::in_memory::InMemoryRecordStore;
use crate::shell::config::{CacheBackend, Config};

#[derive(Clone)]
pub struct AppState {
    pub render_chart: Arc<RenderChartHandler>,
}

impl AppState {
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let store: Arc<dyn RecordStore> = match config.cache_backend {
            CacheBackend::File => {
                tokio::fs::create_dir_all(&config.cache_dir).await?;
                Arc::new(FileRecordStore::new(&config.cache_dir))
            }
            CacheBackend::Memory => Arc::new(InMemoryRecordStore::new()),
        };
        let source = GitHubDataSource::new(
            config.github_api_base.as_str(),
            config.github_timeout,
            config.github_max_pages,
        )?;
        let cache = HourlyCache::new(store, Arc::new(source)).with_pruning(config.cache_prune_stale);

        let fonts = FontRegistry::load_dir(&config.font_dir, &config.default_font)?;
        let renderer = PlottersRenderer::new(Arc::new(fonts));

        tracing::info!(
            backend = ?config.cache_backend,
            cache_dir = %config.cache_dir.display(),
            prune_stale = config.cache_prune_stale,
            github = %config.github_api_base,
            "application state ready"
        );

        Ok(Self {
            render_chart: Arc::new(RenderChartHandler::new(
                cache,
                Arc::new(renderer),
                Arc::new(SystemClock),
                config.default_font.as_str(),
            )),
        })
    }
}
