//! Figure styles loaded from TOML files
//!
//! A style file lives at `<style_dir>/<name>.toml`. Every key is optional;
//! missing keys keep the defaults.
//!
//! ```toml
//! width = 1200
//! height = 500
//! foreground = [20, 20, 20]
//! palette = [[31, 119, 180], [255, 127, 14]]
//! ```

use crate::error::{PlotError, Result};
use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// An RGB colour, written as `[r, g, b]` in style files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Linear blend towards `other`; `t` is clamped to `[0, 1]`
    pub fn mix(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(lerp(self.0, other.0), lerp(self.1, other.1), lerp(self.2, other.2))
    }
}

impl From<Rgb> for RGBColor {
    fn from(c: Rgb) -> Self {
        RGBColor(c.0, c.1, c.2)
    }
}

/// Colours and geometry shared by every figure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    /// Figure width in pixels
    pub width: u32,
    /// Figure height in pixels
    pub height: u32,
    /// Blank space around the plot area, in pixels
    pub margin: u32,
    /// Figure background
    pub background: Rgb,
    /// Spikes, bars and heat-map maxima
    pub foreground: Rgb,
    /// Group separators and scale bars
    pub accent: Rgb,
    /// Per-group colours, cycled
    pub palette: Vec<Rgb>,
    /// Stroke width in pixels
    pub line_width: u32,
    /// Height of a raster tick as a fraction of the row pitch
    pub tick_length: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            margin: 20,
            background: Rgb(255, 255, 255),
            foreground: Rgb(0, 0, 0),
            accent: Rgb(211, 211, 211),
            palette: vec![
                Rgb(31, 119, 180),
                Rgb(255, 127, 14),
                Rgb(44, 160, 44),
                Rgb(214, 39, 40),
            ],
            line_width: 1,
            tick_length: 0.8,
        }
    }
}

impl Style {
    /// Path of the named style inside `style_dir`
    pub fn path_for(style_dir: &Path, name: &str) -> PathBuf {
        style_dir.join(format!("{}.toml", name))
    }

    /// Load `<style_dir>/<name>.toml`
    pub fn load(style_dir: &Path, name: &str) -> Result<Self> {
        let path = Self::path_for(style_dir, name);
        if !path.is_file() {
            return Err(PlotError::StyleNotFound { path });
        }
        let content = std::fs::read_to_string(&path)?;
        let style = Self::from_toml_str(&content).map_err(|err| match err {
            PlotError::StyleParse { reason, .. } => PlotError::StyleParse {
                path: path.clone(),
                reason,
            },
            other => other,
        })?;
        log::debug!("loaded style {} from {}", name, path.display());
        Ok(style)
    }

    /// Parse a style from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let style: Style = toml::from_str(content).map_err(|err| PlotError::StyleParse {
            path: PathBuf::new(),
            reason: err.to_string(),
        })?;
        if style.width == 0 || style.height == 0 {
            return Err(PlotError::StyleParse {
                path: PathBuf::new(),
                reason: "figure size must be non-zero".to_string(),
            });
        }
        Ok(style)
    }

    /// Figure size in pixels
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Colour of group `index`, cycling through the palette
    pub fn group_color(&self, index: usize) -> Rgb {
        if self.palette.is_empty() {
            self.foreground
        } else {
            self.palette[index % self.palette.len()]
        }
    }
}
