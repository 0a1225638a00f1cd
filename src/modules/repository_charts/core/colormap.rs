// Named colormaps that turn series values into bar and bubble colors.
//
// Values are min-max normalized into [0, 1] before lookup. When every value is
// the same they all map to 0.

use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    fn from_unit(r: f64, g: f64, b: f64) -> Self {
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self(channel(r), channel(g), channel(b))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Jet,
    Rainbow,
    Viridis,
    Cool,
    Hot,
    Spring,
    Summer,
    Autumn,
    Winter,
    Gray,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown colormap: {0:?}")]
pub struct UnknownColormap(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colormap {
    palette: Palette,
    reversed: bool,
}

impl FromStr for Colormap {
    type Err = UnknownColormap;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let (name, reversed) = match lower.strip_suffix("_r") {
            Some(name) => (name, true),
            None => (lower.as_str(), false),
        };
        let palette = match name {
            "jet" => Palette::Jet,
            "rainbow" => Palette::Rainbow,
            "viridis" => Palette::Viridis,
            "cool" => Palette::Cool,
            "hot" => Palette::Hot,
            "spring" => Palette::Spring,
            "summer" => Palette::Summer,
            "autumn" => Palette::Autumn,
            "winter" => Palette::Winter,
            "gray" | "grey" => Palette::Gray,
            _ => return Err(UnknownColormap(s.to_string())),
        };
        Ok(Self { palette, reversed })
    }
}

// Sampled at 0, 1/8, ..., 1.
const VIRIDIS: [(f64, f64, f64); 9] = [
    (0.267, 0.005, 0.329),
    (0.283, 0.141, 0.458),
    (0.254, 0.265, 0.530),
    (0.207, 0.372, 0.553),
    (0.164, 0.471, 0.558),
    (0.128, 0.567, 0.551),
    (0.135, 0.659, 0.518),
    (0.267, 0.749, 0.441),
    (0.993, 0.906, 0.144),
];

impl Colormap {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            reversed: false,
        }
    }

    /// Color at `x` in [0, 1]; out-of-range input is clamped.
    pub fn at(&self, x: f64) -> Rgb {
        let x = if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) };
        let x = if self.reversed { 1.0 - x } else { x };
        match self.palette {
            Palette::Jet => Rgb::from_unit(
                1.5 - (4.0 * x - 3.0).abs(),
                1.5 - (4.0 * x - 2.0).abs(),
                1.5 - (4.0 * x - 1.0).abs(),
            ),
            Palette::Rainbow => Rgb::from_unit(
                (2.0 * x - 0.5).abs(),
                (std::f64::consts::PI * x).sin(),
                (std::f64::consts::FRAC_PI_2 * x).cos(),
            ),
            Palette::Viridis => interpolate(&VIRIDIS, x),
            Palette::Cool => Rgb::from_unit(x, 1.0 - x, 1.0),
            Palette::Hot => Rgb::from_unit(
                x * 8.0 / 3.0,
                x * 8.0 / 3.0 - 1.0,
                x * 4.0 - 3.0,
            ),
            Palette::Spring => Rgb::from_unit(1.0, x, 1.0 - x),
            Palette::Summer => Rgb::from_unit(x, 0.5 + x / 2.0, 0.4),
            Palette::Autumn => Rgb::from_unit(1.0, x, 0.0),
            Palette::Winter => Rgb::from_unit(0.0, x, 1.0 - x / 2.0),
            Palette::Gray => Rgb::from_unit(x, x, x),
        }
    }

    /// One color per value, normalized over the values given.
    pub fn colorize(&self, values: &[u64]) -> Vec<Rgb> {
        normalize(values).into_iter().map(|x| self.at(x)).collect()
    }
}

pub fn normalize(values: &[u64]) -> Vec<f64> {
    let (Some(min), Some(max)) = (values.iter().min(), values.iter().max()) else {
        return Vec::new();
    };
    let span = (max - min) as f64;
    values
        .iter()
        .map(|v| {
            if span == 0.0 {
                0.0
            } else {
                (v - min) as f64 / span
            }
        })
        .collect()
}

fn interpolate(stops: &[(f64, f64, f64)], x: f64) -> Rgb {
    let scaled = x * (stops.len() - 1) as f64;
    let lower = (scaled.floor() as usize).min(stops.len() - 1);
    let upper = (lower + 1).min(stops.len() - 1);
    let t = scaled - lower as f64;
    let (r0, g0, b0) = stops[lower];
    let (r1, g1, b1) = stops[upper];
    Rgb::from_unit(r0 + (r1 - r0) * t, g0 + (g1 - g0) * t, b0 + (b1 - b0) * t)
}
