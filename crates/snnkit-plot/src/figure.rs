//! Figure rendering and file-path conventions

use crate::error::{PlotError, Result};
use crate::style::Style;
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Output image format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Scalable vector graphics
    Svg,
    /// PNG bitmap
    Png,
}

impl ImageFormat {
    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            other => Err(PlotError::unsupported_format(other)),
        }
    }
}

/// Anything that can draw itself onto a drawing area
pub trait Figure {
    /// Draw onto `area`, which has already been filled with the background
    fn draw<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>, style: &Style)
        -> Result<()>;
}

fn render<DB: DrawingBackend, F: Figure>(
    root: DrawingArea<DB, Shift>,
    figure: &F,
    style: &Style,
) -> Result<()> {
    root.fill(&RGBColor::from(style.background))?;
    figure.draw(&root, style)?;
    root.present()?;
    Ok(())
}

/// Render a figure to an SVG document in memory
pub fn render_svg<F: Figure>(figure: &F, style: &Style) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, style.size()).into_drawing_area();
        render(root, figure, style)?;
    }
    Ok(svg)
}

/// Render a figure to `path` in the given format
pub fn save_figure<F: Figure>(
    path: &Path,
    format: ImageFormat,
    figure: &F,
    style: &Style,
) -> Result<()> {
    match format {
        ImageFormat::Svg => render(
            SVGBackend::new(path, style.size()).into_drawing_area(),
            figure,
            style,
        ),
        ImageFormat::Png => render(
            BitMapBackend::new(path, style.size()).into_drawing_area(),
            figure,
            style,
        ),
    }
}

/// Directory that receives saved figures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigureDir {
    root: PathBuf,
}

impl FigureDir {
    /// Use `root` as the figure directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory itself
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<name>.<ext>`
    pub fn path_for(&self, name: &str, format: ImageFormat) -> PathBuf {
        self.root.join(format!("{}.{}", name, format.extension()))
    }

    /// Render `figure` once per format; returns the written paths
    ///
    /// The directory is created if needed.
    pub fn save<F: Figure>(
        &self,
        name: &str,
        formats: &[ImageFormat],
        figure: &F,
        style: &Style,
    ) -> Result<Vec<PathBuf>> {
        if formats.is_empty() {
            return Err(PlotError::empty_data("no output formats requested"));
        }
        std::fs::create_dir_all(&self.root)?;
        let mut written = Vec::with_capacity(formats.len());
        for &format in formats {
            let path = self.path_for(name, format);
            save_figure(&path, format, figure, style)?;
            log::info!("saved {}", path.display());
            written.push(path);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Diagonal;

    impl Figure for Diagonal {
        fn draw<DB: DrawingBackend>(
            &self,
            area: &DrawingArea<DB, Shift>,
            style: &Style,
        ) -> Result<()> {
            let (w, h) = area.dim_in_pixel();
            area.draw(&PathElement::new(
                vec![(0, 0), (w as i32, h as i32)],
                RGBColor::from(style.foreground).stroke_width(style.line_width),
            ))?;
            Ok(())
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("SVG".parse::<ImageFormat>().unwrap(), ImageFormat::Svg);
        assert_eq!(".png".parse::<ImageFormat>().unwrap(), ImageFormat::Png);
        assert!(matches!(
            "pdf".parse::<ImageFormat>(),
            Err(PlotError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_path_for() {
        let dir = FigureDir::new("figs");
        assert_eq!(
            dir.path_for("raster", ImageFormat::Png),
            PathBuf::from("figs/raster.png")
        );
    }

    #[test]
    fn test_render_svg() {
        let svg = render_svg(&Diagonal, &Style::default()).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("<polyline") || svg.contains("<path") || svg.contains("<line"));
    }

    #[test]
    fn test_save_every_format() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = FigureDir::new(tmp.path().join("out"));
        let style = Style {
            width: 64,
            height: 32,
            ..Style::default()
        };
        let written = dir
            .save("diag", &[ImageFormat::Svg, ImageFormat::Png], &Diagonal, &style)
            .unwrap();
        assert_eq!(written.len(), 2);
        assert!(written.iter().all(|path| path.is_file()));
    }
}
