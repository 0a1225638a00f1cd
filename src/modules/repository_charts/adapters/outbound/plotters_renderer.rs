// plotters implementation of the ChartRenderer port.
//
// Charts are drawn in pixel coordinates on an RGB bitmap and encoded to PNG.
// Layout math is kept in plain functions so it can be tested without fonts.

use std::io::Cursor;
use std::sync::Arc;

use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::modules::repository_charts::adapters::outbound::chart_renderer::{
    ChartPoint, ChartRenderer, ChartShape, ChartSpec, RenderError,
};
use crate::modules::repository_charts::adapters::outbound::fonts::FontRegistry;
use crate::modules::repository_charts::core::bubble_layout::{self, Circle as Bubble};
use crate::modules::repository_charts::core::colormap::Rgb;

const MAX_SIDE: u32 = 4000;
const TITLE_SIZE: u32 = 28;
const LABEL_SIZE: u32 = 15;
const PADDING: i32 = 12;
const AXIS_GRAY: RGBColor = RGBColor(0x55, 0x55, 0x55);
const EMPTY_MESSAGE: &str = "No data";

pub struct PlottersRenderer {
    fonts: Arc<FontRegistry>,
}

impl PlottersRenderer {
    pub fn new(fonts: Arc<FontRegistry>) -> Self {
        Self { fonts }
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render(&self, spec: &ChartSpec) -> Result<Vec<u8>, RenderError> {
        if spec.width == 0 || spec.height == 0 || spec.width > MAX_SIDE || spec.height > MAX_SIDE {
            return Err(RenderError::InvalidSize {
                width: spec.width,
                height: spec.height,
            });
        }

        let mut buffer = vec![0u8; spec.width as usize * spec.height as usize * 3];
        draw(&mut buffer, spec)?;
        encode_png(buffer, spec.width, spec.height)
    }

    fn supports_font(&self, family: &str) -> bool {
        self.fonts.contains(family)
    }
}

fn draw_err(e: impl std::fmt::Display) -> RenderError {
    RenderError::Draw(e.to_string())
}

fn draw(buffer: &mut [u8], spec: &ChartSpec) -> Result<(), RenderError> {
    let root = BitMapBackend::with_buffer(buffer, (spec.width, spec.height)).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;

    let title_style = (spec.font.as_str(), TITLE_SIZE).into_font().color(&BLACK);
    let area = root.titled(&spec.title, title_style).map_err(draw_err)?;
    let (width, height) = area.dim_in_pixel();

    if spec.points.is_empty() {
        let style = (spec.font.as_str(), LABEL_SIZE)
            .into_font()
            .color(&AXIS_GRAY)
            .pos(Pos::new(HPos::Center, VPos::Center));
        area.draw(&Text::new(
            EMPTY_MESSAGE,
            (width as i32 / 2, height as i32 / 2),
            style,
        ))
        .map_err(draw_err)?;
    } else {
        match spec.shape {
            ChartShape::HorizontalBars => draw_bars(&area, spec, width, height)?,
            ChartShape::Bubbles => draw_bubbles(&area, spec, width, height)?,
        }
    }

    root.present().map_err(draw_err)?;
    Ok(())
}

fn draw_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    spec: &ChartSpec,
    width: u32,
    height: u32,
) -> Result<(), RenderError> {
    let label_style = (spec.font.as_str(), LABEL_SIZE).into_font().color(&AXIS_GRAY);
    let mut label_width = 0;
    for point in &spec.points {
        let (w, _) = area
            .estimate_text_size(&point.label, &label_style)
            .map_err(draw_err)?;
        label_width = label_width.max(w);
    }
    let label_width = label_width.min(width / 2) as i32;

    let bars = bar_layout(&spec.points, width as i32, height as i32, label_width);
    let label_style = label_style.pos(Pos::new(HPos::Right, VPos::Center));
    let inside_style = (spec.font.as_str(), LABEL_SIZE)
        .into_font()
        .color(&WHITE)
        .pos(Pos::new(HPos::Right, VPos::Center));
    let outside_style = (spec.font.as_str(), LABEL_SIZE)
        .into_font()
        .color(&AXIS_GRAY)
        .pos(Pos::new(HPos::Left, VPos::Center));

    for (point, bar) in spec.points.iter().zip(&bars) {
        area.draw(&Rectangle::new(
            [(bar.left, bar.top), (bar.right, bar.bottom)],
            to_color(point.color).filled(),
        ))
        .map_err(draw_err)?;

        area.draw(&Text::new(
            point.label.clone(),
            (bar.left - PADDING / 2, bar.center_y()),
            label_style.clone(),
        ))
        .map_err(draw_err)?;

        let value = point.value.to_string();
        let (value_width, _) = area
            .estimate_text_size(&value, &inside_style)
            .map_err(draw_err)?;
        let drawn = if (bar.right - bar.left) > value_width as i32 + PADDING {
            area.draw(&Text::new(
                value,
                (bar.right - PADDING / 2, bar.center_y()),
                inside_style.clone(),
            ))
        } else {
            area.draw(&Text::new(
                value,
                (bar.right + PADDING / 2, bar.center_y()),
                outside_style.clone(),
            ))
        };
        drawn.map_err(draw_err)?;
    }
    Ok(())
}

fn draw_bubbles<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    spec: &ChartSpec,
    width: u32,
    height: u32,
) -> Result<(), RenderError> {
    let values: Vec<u64> = spec.points.iter().map(|p| p.value).collect();
    let circles = bubble_layout::pack(&values);
    let placed = bubble_geometry(&circles, width as i32, height as i32);

    for (point, bubble) in spec.points.iter().zip(&placed) {
        area.draw(&Circle::new(
            (bubble.x, bubble.y),
            bubble.radius,
            to_color(point.color).mix(0.7).filled(),
        ))
        .map_err(draw_err)?;

        let size = (bubble.radius / 4).clamp(8, 48) as u32;
        let style = (spec.font.as_str(), size)
            .into_font()
            .color(&WHITE)
            .pos(Pos::new(HPos::Center, VPos::Center));
        for (row, y) in bubble_text_rows(&point.label, point.value, bubble.y, size as i32 + 2) {
            area.draw(&Text::new(row, (bubble.x, y), style.clone()))
                .map_err(draw_err)?;
        }
    }
    Ok(())
}

/// One row per word of the label followed by the value, centred on `center_y`.
fn bubble_text_rows(label: &str, value: u64, center_y: i32, line_height: i32) -> Vec<(String, i32)> {
    let mut rows: Vec<String> = label.split_whitespace().map(str::to_string).collect();
    rows.push(value.to_string());
    let first = center_y - line_height * (rows.len() as i32 - 1) / 2;
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| (row, first + line_height * i as i32))
        .collect()
}

fn to_color(rgb: Rgb) -> RGBColor {
    RGBColor(rgb.0, rgb.1, rgb.2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BarGeometry {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl BarGeometry {
    fn center_y(&self) -> i32 {
        (self.top + self.bottom) / 2
    }
}

/// One bar per point; the first point sits at the bottom.
fn bar_layout(points: &[ChartPoint], width: i32, height: i32, label_width: i32) -> Vec<BarGeometry> {
    let count = points.len() as i32;
    if count == 0 {
        return Vec::new();
    }
    let max = points.iter().map(|p| p.value).max().unwrap_or(0).max(1) as f64;

    let left = PADDING + label_width + PADDING / 2;
    let track = (width - left - PADDING).max(1);
    let row = ((height - 2 * PADDING) / count).max(1);
    let gap = row / 8;

    points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let top = PADDING + (count - 1 - i as i32) * row + gap;
            let length = (point.value as f64 / max * track as f64).round() as i32;
            BarGeometry {
                left,
                top,
                right: left + length,
                bottom: top + row - 2 * gap,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PlacedBubble {
    x: i32,
    y: i32,
    radius: i32,
}

fn bubble_geometry(circles: &[Bubble], width: i32, height: i32) -> Vec<PlacedBubble> {
    let half = (width.min(height) - 2 * PADDING).max(2) as f64 / 2.0;
    let (cx, cy) = (width as f64 / 2.0, height as f64 / 2.0);
    circles
        .iter()
        .map(|c| PlacedBubble {
            x: (cx + c.x * half).round() as i32,
            // screen y grows downwards
            y: (cy - c.y * half).round() as i32,
            radius: ((c.r * half) - 1.0).max(1.0).round() as i32,
        })
        .collect()
}

fn encode_png(buffer: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
    let image = RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| RenderError::Encode("buffer does not match chart size".into()))?;
    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| RenderError::Encode(e.to_string()))?;
    Ok(png)
}
