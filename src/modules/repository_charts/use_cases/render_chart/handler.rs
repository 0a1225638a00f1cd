use crate::modules::repository_charts::adapters::outbound::chart_renderer::{
    ChartPoint, ChartRenderer, ChartSpec, RenderError,
};
use crate::modules::repository_charts::core::aggregate::aggregate;
use crate::modules::repository_charts::core::username::Username;
use crate::modules::repository_charts::use_cases::fetch_repositories::handler::{
    CacheError, HourlyCache,
};
use crate::modules::repository_charts::use_cases::render_chart::chart_request::ChartRequest;
use crate::shared::core::clock::Clock;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("font family not available: {0}")]
    UnknownFont(String),

    #[error("unexpected: {0}")]
    Unexpected(String),
}

pub struct RenderChartHandler {
    cache: HourlyCache,
    renderer: Arc<dyn ChartRenderer>,
    clock: Arc<dyn Clock>,
    default_font: String,
}

impl RenderChartHandler {
    pub fn new(
        cache: HourlyCache,
        renderer: Arc<dyn ChartRenderer>,
        clock: Arc<dyn Clock>,
        default_font: impl Into<String>,
    ) -> Self {
        Self {
            cache,
            renderer,
            clock,
            default_font: default_font.into(),
        }
    }

    pub fn default_font(&self) -> &str {
        &self.default_font
    }

    /// PNG bytes of the requested chart for `username`.
    pub async fn handle(
        &self,
        username: &Username,
        request: &ChartRequest,
    ) -> Result<Vec<u8>, ApplicationError> {
        if !self.renderer.supports_font(&request.font) {
            return Err(ApplicationError::UnknownFont(request.font.clone()));
        }

        let records = self.cache.fetch_or_load(username, self.clock.as_ref()).await?;

        let kind = request.kind;
        let series = aggregate(
            &records,
            kind.metric(),
            kind.top_n(request.top),
            kind.sort_descending(),
        );
        let points = series.into_display_order();
        let values: Vec<u64> = points.iter().map(|p| p.value).collect();
        let colors = request.colormap.colorize(&values);

        let spec = ChartSpec {
            shape: kind.shape(),
            title: request.title(),
            points: points
                .into_iter()
                .zip(colors)
                .map(|(point, color)| ChartPoint {
                    label: point.label,
                    value: point.value,
                    color,
                })
                .collect(),
            width: request.width,
            height: request.height,
            font: request.font.clone(),
        };
        tracing::debug!(
            %username,
            kind = ?kind,
            points = spec.points.len(),
            "rendering chart"
        );

        let renderer = self.renderer.clone();
        let png = tokio::task::spawn_blocking(move || renderer.render(&spec))
            .await
            .map_err(|e| ApplicationError::Unexpected(e.to_string()))??;
        Ok(png)
    }
}
