// Port to the charting collaborator.
//
// The renderer receives everything it needs per request (title, colors, size,
// font) and keeps no plotting state between calls.

use thiserror::Error;

use crate::modules::repository_charts::core::colormap::Rgb;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("chart size {width}x{height} is not drawable")]
    InvalidSize { width: u32, height: u32 },

    #[error("drawing failed: {0}")]
    Draw(String),

    #[error("png encoding failed: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartShape {
    HorizontalBars,
    Bubbles,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPoint {
    pub label: String,
    pub value: u64,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    pub shape: ChartShape,
    pub title: String,
    /// Bars are drawn bottom to top in this order.
    pub points: Vec<ChartPoint>,
    pub width: u32,
    pub height: u32,
    pub font: String,
}

pub trait ChartRenderer: Send + Sync {
    /// PNG bytes of the chart.
    fn render(&self, spec: &ChartSpec) -> Result<Vec<u8>, RenderError>;

    fn supports_font(&self, family: &str) -> bool;
}
