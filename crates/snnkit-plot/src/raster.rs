//! Spike raster plots
//!
//! Row `i` of a raster is drawn as vertical ticks centred on `y = i`. A
//! channel key groups consecutive rows; group boundaries are marked with
//! horizontal separators and each group gets a tick mark at its centre.

use crate::error::{PlotError, Result};
use crate::figure::Figure;
use crate::style::{Rgb, Style};
use plotters::coord::Shift;
use plotters::prelude::*;
use snnkit_core::Raster;

/// Separators and tick centres derived from a per-row label key
#[derive(Debug, Clone, PartialEq)]
pub struct KeyLayout<L> {
    /// `y` positions between consecutive rows with differing labels
    pub separators: Vec<f64>,
    /// Centre `y` of each run of equal labels, with its label
    pub ticks: Vec<(f64, L)>,
}

/// Compute group separators and label positions for a row key
///
/// Each maximal run of equal consecutive labels forms one group; runs of the
/// same label that are not adjacent form separate groups.
pub fn key_layout<L: PartialEq + Clone>(key: &[L]) -> KeyLayout<L> {
    let mut separators = Vec::new();
    let mut bounds = vec![0.0];
    let mut labels = Vec::new();
    if let Some(first) = key.first() {
        labels.push(first.clone());
    }
    for (i, pair) in key.windows(2).enumerate() {
        if pair[0] != pair[1] {
            let y = i as f64 + 0.5;
            separators.push(y);
            bounds.push(y);
            labels.push(pair[1].clone());
        }
    }
    bounds.push(key.len() as f64);

    let ticks = if key.is_empty() {
        Vec::new()
    } else {
        bounds
            .windows(2)
            .map(|b| (b[0] + b[1]) / 2.0)
            .zip(labels)
            .collect()
    };
    KeyLayout { separators, ticks }
}

/// Group parallel index/time columns into `n` raster rows
///
/// Times keep their input order within a row.
pub fn wheres_to_raster(indices: &[usize], times: &[f64], n: usize) -> Result<Vec<Vec<f64>>> {
    if indices.len() != times.len() {
        return Err(PlotError::invalid_data(format!(
            "{} indices but {} times",
            indices.len(),
            times.len()
        )));
    }
    let mut rows = vec![Vec::new(); n];
    for (&idx, &t) in indices.iter().zip(times) {
        let row = rows.get_mut(idx).ok_or_else(|| {
            PlotError::invalid_data(format!("index {} out of range for {} rows", idx, n))
        })?;
        row.push(t);
    }
    Ok(rows)
}

/// Fraction of the axis width covered by a bar of `duration_ms`
///
/// `span` is the axis extent in samples and `rate` the sampling rate in Hz.
pub fn scale_bar_length(duration_ms: f64, rate: f64, span: f64) -> f64 {
    duration_ms / (span / rate * 1e3)
}

/// A horizontal duration bar placed in figure-relative coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleBar {
    /// Left end, as a fraction of the figure width
    pub x0: f64,
    /// Height, as a fraction of the figure height from the top
    pub y: f64,
    /// Bar duration in milliseconds
    pub duration_ms: f64,
    /// Samples per second of the plotted time axis
    pub rate: f64,
}

impl ScaleBar {
    fn draw_on<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        span: f64,
        color: Rgb,
        width: u32,
    ) -> Result<()> {
        let (w, h) = area.dim_in_pixel();
        let x0 = self.x0 * w as f64;
        let x1 = x0 + scale_bar_length(self.duration_ms, self.rate, span) * w as f64;
        let y = (self.y * h as f64) as i32;
        area.draw(&PathElement::new(
            vec![(x0 as i32, y), (x1 as i32, y)],
            RGBColor::from(color).stroke_width(width.max(2)),
        ))?;
        Ok(())
    }
}

/// Options for [`raster_plot`]
#[derive(Debug, Clone, PartialEq)]
pub struct RasterOptions {
    /// Subtracted from every spike time before plotting
    pub time_shift: f64,
    /// Fit the y axis tightly to the rows (`-0.5 .. n - 0.5`)
    pub adjust_ylim: bool,
    /// Per-row labels used to draw group separators
    pub key: Vec<String>,
    /// Explicit x range; defaults to the shifted data range
    pub x_range: Option<(f64, f64)>,
    /// Optional duration bar
    pub scale_bar: Option<ScaleBar>,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            time_shift: 0.0,
            adjust_ylim: true,
            key: Vec::new(),
            x_range: None,
            scale_bar: None,
        }
    }
}

/// A ready-to-draw spike raster
#[derive(Debug, Clone, PartialEq)]
pub struct RasterPlot {
    rows: Vec<Vec<f64>>,
    options: RasterOptions,
}

/// Build a raster plot from per-row spike times
pub fn raster_plot(rows: &[Vec<f64>], options: RasterOptions) -> RasterPlot {
    let shift = options.time_shift;
    let rows = if shift != 0.0 {
        rows.iter()
            .map(|row| row.iter().map(|t| t - shift).collect())
            .collect()
    } else {
        rows.to_vec()
    };
    RasterPlot { rows, options }
}

impl RasterPlot {
    /// Plot every channel of a raster in channel order
    pub fn from_raster(raster: &Raster, options: RasterOptions) -> Self {
        raster_plot(raster.rows(), options)
    }

    /// Rows after the time shift
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// `(x_min, x_max)` of the plotted axis
    pub fn x_range(&self) -> (f64, f64) {
        if let Some(range) = self.options.x_range {
            return range;
        }
        let mut times = self.rows.iter().flatten().copied();
        let Some(first) = times.next() else {
            return (0.0, 1.0);
        };
        let (lo, hi) = times.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t)));
        let pad = ((hi - lo) * 0.05).max(0.5);
        (lo - pad, hi + pad)
    }

    /// `(y_min, y_max)` of the plotted axis
    pub fn y_range(&self) -> (f64, f64) {
        let n = self.rows.len() as f64;
        if self.options.adjust_ylim {
            (-0.5, n - 0.5)
        } else {
            (-1.0, n)
        }
    }
}

impl Figure for RasterPlot {
    fn draw<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>, style: &Style) -> Result<()> {
        if self.rows.is_empty() {
            return Err(PlotError::empty_data("raster has no rows"));
        }
        let (x0, x1) = self.x_range();
        let (y0, y1) = self.y_range();
        let mut chart = ChartBuilder::on(area)
            .margin(style.margin)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        if !self.options.key.is_empty() {
            let layout = key_layout(&self.options.key);
            let accent = RGBColor::from(style.accent).stroke_width(style.line_width);
            chart.draw_series(
                layout
                    .separators
                    .iter()
                    .map(|&y| PathElement::new(vec![(x0, y), (x1, y)], accent)),
            )?;
            let tick = (x1 - x0) * 0.01;
            chart.draw_series(layout.ticks.iter().enumerate().map(|(group, &(y, _))| {
                let color = RGBColor::from(style.group_color(group));
                PathElement::new(vec![(x0, y), (x0 + tick, y)], color.stroke_width(2))
            }))?;
        }

        let half = style.tick_length / 2.0;
        let ink = RGBColor::from(style.foreground).stroke_width(style.line_width);
        chart.draw_series(self.rows.iter().enumerate().flat_map(|(row, times)| {
            let y = row as f64;
            times
                .iter()
                .map(move |&t| PathElement::new(vec![(t, y - half), (t, y + half)], ink))
        }))?;

        if let Some(bar) = &self.options.scale_bar {
            bar.draw_on(area, x1 - x0, style.foreground, style.line_width)?;
        }
        log::debug!(
            "drew raster: {} row(s), x=[{}, {}]",
            self.rows.len(),
            x0,
            x1
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::render_svg;

    #[test]
    fn test_key_layout() {
        let layout = key_layout(&["a", "a", "b", "b", "b", "a"]);
        assert_eq!(layout.separators, vec![1.5, 4.5]);
        assert_eq!(layout.ticks, vec![(0.75, "a"), (3.0, "b"), (5.25, "a")]);

        let single = key_layout(&[7]);
        assert!(single.separators.is_empty());
        assert_eq!(single.ticks, vec![(0.5, 7)]);

        assert!(key_layout::<u8>(&[]).ticks.is_empty());
    }

    #[test]
    fn test_wheres_to_raster() {
        let rows = wheres_to_raster(&[1, 0, 1], &[0.3, 0.1, 0.2], 3).unwrap();
        assert_eq!(rows, vec![vec![0.1], vec![0.3, 0.2], vec![]]);
        assert!(wheres_to_raster(&[4], &[0.1], 2).is_err());
        assert!(wheres_to_raster(&[0, 1], &[0.1], 2).is_err());
    }

    #[test]
    fn test_scale_bar_length() {
        // 100 ms over a 1000-sample axis at 1 kHz covers a tenth of it
        assert!((scale_bar_length(100.0, 1000.0, 1000.0) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_time_shift_and_ranges() {
        let plot = raster_plot(
            &[vec![10.0, 12.0], vec![11.0]],
            RasterOptions {
                time_shift: 10.0,
                ..RasterOptions::default()
            },
        );
        assert_eq!(plot.rows(), &[vec![0.0, 2.0], vec![1.0]]);
        assert_eq!(plot.y_range(), (-0.5, 1.5));
        let (lo, hi) = plot.x_range();
        assert!(lo < 0.0 && hi > 2.0);
    }

    #[test]
    fn test_render_with_key_and_scale_bar() {
        let plot = raster_plot(
            &[vec![0.1, 0.4], vec![0.2], vec![]],
            RasterOptions {
                key: vec!["left".into(), "left".into(), "right".into()],
                scale_bar: Some(ScaleBar {
                    x0: 0.1,
                    y: 0.9,
                    duration_ms: 100.0,
                    rate: 1.0,
                }),
                ..RasterOptions::default()
            },
        );
        let svg = render_svg(&plot, &Style::default()).unwrap();
        assert!(svg.contains("<svg"));

        let empty = raster_plot(&[], RasterOptions::default());
        assert!(matches!(
            render_svg(&empty, &Style::default()),
            Err(PlotError::EmptyData { .. })
        ));
    }
}
