use std::collections::BTreeSet;
use std::sync::Mutex;

use crate::modules::repository_charts::adapters::outbound::chart_renderer::{
    ChartRenderer, ChartSpec, RenderError,
};

pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// Renderer double that returns a bare PNG signature and remembers what it was asked to draw.
pub struct RecordingRenderer {
    fonts: BTreeSet<String>,
    specs: Mutex<Vec<ChartSpec>>,
    is_broken: bool,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::with_fonts(&["sans-serif"])
    }

    pub fn with_fonts(fonts: &[&str]) -> Self {
        Self {
            fonts: fonts.iter().map(|f| f.to_string()).collect(),
            specs: Mutex::new(Vec::new()),
            is_broken: false,
        }
    }

    pub fn toggle_broken(&mut self) {
        self.is_broken = !self.is_broken;
    }

    pub fn last_spec(&self) -> Option<ChartSpec> {
        self.specs.lock().unwrap().last().cloned()
    }

    pub fn render_count(&self) -> usize {
        self.specs.lock().unwrap().len()
    }
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartRenderer for RecordingRenderer {
    fn render(&self, spec: &ChartSpec) -> Result<Vec<u8>, RenderError> {
        if self.is_broken {
            return Err(RenderError::Draw("Renderer broken".into()));
        }
        self.specs.lock().unwrap().push(spec.clone());
        Ok(PNG_SIGNATURE.to_vec())
    }

    fn supports_font(&self, family: &str) -> bool {
        self.fonts.contains(family)
    }
}

#[cfg(test)]
mod recording_renderer_tests {
    use super::*;
    use crate::modules::repository_charts::adapters::outbound::chart_renderer::ChartShape;

    fn spec(title: &str) -> ChartSpec {
        ChartSpec {
            shape: ChartShape::HorizontalBars,
            title: title.into(),
            points: vec![],
            width: 800,
            height: 300,
            font: "sans-serif".into(),
        }
    }

    #[test]
    fn it_should_record_each_spec_it_renders() {
        let renderer = RecordingRenderer::new();
        renderer.render(&spec("first")).unwrap();
        let png = renderer.render(&spec("second")).unwrap();

        assert_eq!(png, PNG_SIGNATURE);
        assert_eq!(renderer.render_count(), 2);
        assert_eq!(renderer.last_spec().unwrap().title, "second");
    }

    #[test]
    fn it_should_fail_when_broken() {
        let mut renderer = RecordingRenderer::with_fonts(&["Roboto"]);
        renderer.toggle_broken();

        assert!(matches!(renderer.render(&spec("x")), Err(RenderError::Draw(_))));
        assert_eq!(renderer.render_count(), 0);
        assert!(renderer.supports_font("Roboto"));
        assert!(!renderer.supports_font("sans-serif"));
    }
}
