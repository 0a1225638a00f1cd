use serde::Deserialize;
use thiserror::Error;

use crate::modules::repository_charts::adapters::outbound::chart_renderer::ChartShape;
use crate::modules::repository_charts::core::aggregate::Metric;
use crate::modules::repository_charts::core::colormap::{Colormap, UnknownColormap};

pub const DEFAULT_TOP: usize = 5;
pub const MAX_TOP: usize = 100;
pub const PIXELS_PER_INCH: u32 = 100;
pub const MIN_INCHES: u32 = 1;
pub const MAX_INCHES: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    TopForks,
    TopStars,
    LanguageBubbles,
}

impl ChartKind {
    pub fn metric(self) -> Metric {
        match self {
            ChartKind::TopForks => Metric::Forks,
            ChartKind::TopStars => Metric::Stars,
            ChartKind::LanguageBubbles => Metric::Languages,
        }
    }

    pub fn sort_descending(self) -> bool {
        !matches!(self, ChartKind::LanguageBubbles)
    }

    pub fn shape(self) -> ChartShape {
        match self {
            ChartKind::TopForks | ChartKind::TopStars => ChartShape::HorizontalBars,
            ChartKind::LanguageBubbles => ChartShape::Bubbles,
        }
    }

    pub fn default_cmap(self) -> &'static str {
        match self {
            ChartKind::TopForks => "jet",
            ChartKind::TopStars | ChartKind::LanguageBubbles => "rainbow",
        }
    }

    /// Width and height in inches.
    pub fn default_size(self) -> (u32, u32) {
        match self {
            ChartKind::TopForks | ChartKind::TopStars => (8, 3),
            ChartKind::LanguageBubbles => (8, 8),
        }
    }

    pub fn title(self, top: usize) -> String {
        match self {
            ChartKind::TopForks => format!("Top {top} forked"),
            ChartKind::TopStars => format!("Top {top} starred"),
            ChartKind::LanguageBubbles => "Languages".to_string(),
        }
    }

    /// Language charts show every language.
    pub fn top_n(self, top: usize) -> Option<usize> {
        match self {
            ChartKind::TopForks | ChartKind::TopStars => Some(top),
            ChartKind::LanguageBubbles => None,
        }
    }
}

/// Query string of the chart routes.
#[derive(Debug, Default, Deserialize)]
pub struct ChartParams {
    pub cmap: Option<String>,
    pub top: Option<usize>,
    pub w: Option<u32>,
    pub h: Option<u32>,
    pub font: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidChartRequest {
    #[error(transparent)]
    Colormap(#[from] UnknownColormap),

    #[error("top must be between 1 and {MAX_TOP}, got {0}")]
    Top(usize),

    #[error("{name} must be between {MIN_INCHES} and {MAX_INCHES} inches, got {value}")]
    Size { name: &'static str, value: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub kind: ChartKind,
    pub colormap: Colormap,
    pub top: usize,
    /// Pixels.
    pub width: u32,
    /// Pixels.
    pub height: u32,
    pub font: String,
}

impl ChartRequest {
    pub fn from_params(
        kind: ChartKind,
        params: ChartParams,
        default_font: &str,
    ) -> Result<Self, InvalidChartRequest> {
        let colormap: Colormap = params
            .cmap
            .as_deref()
            .unwrap_or(kind.default_cmap())
            .parse()?;

        let top = params.top.unwrap_or(DEFAULT_TOP);
        if kind.top_n(top).is_some() && !(1..=MAX_TOP).contains(&top) {
            return Err(InvalidChartRequest::Top(top));
        }

        let (default_w, default_h) = kind.default_size();
        let width = inches("w", params.w.unwrap_or(default_w))?;
        let height = inches("h", params.h.unwrap_or(default_h))?;

        Ok(Self {
            kind,
            colormap,
            top,
            width: width * PIXELS_PER_INCH,
            height: height * PIXELS_PER_INCH,
            font: params.font.unwrap_or_else(|| default_font.to_string()),
        })
    }

    pub fn title(&self) -> String {
        self.kind.title(self.top)
    }
}

fn inches(name: &'static str, value: u32) -> Result<u32, InvalidChartRequest> {
    if (MIN_INCHES..=MAX_INCHES).contains(&value) {
        Ok(value)
    } else {
        Err(InvalidChartRequest::Size { name, value })
    }
}
