//! Heat maps and population histograms of binned spike matrices

use crate::error::{PlotError, Result};
use crate::figure::Figure;
use crate::style::Style;
use plotters::coord::Shift;
use plotters::prelude::*;
use snnkit_core::BinaryMatrix;

/// Column edges of a matrix: bin edges in time if binned, else bin indices
fn column_edges(matrix: &BinaryMatrix) -> Vec<f64> {
    match matrix.binner() {
        Some(binner) if binner.bin_count() == matrix.bin_count() => binner.bin_edges(),
        _ => (0..=matrix.bin_count()).map(|k| k as f64).collect(),
    }
}

/// Channel × bin heat map; cell shade scales with its value
#[derive(Debug, Clone)]
pub struct HeatmapPlot<'a> {
    matrix: &'a BinaryMatrix,
}

/// Heat map of a presence or count matrix
pub fn heatmap_plot(matrix: &BinaryMatrix) -> HeatmapPlot<'_> {
    HeatmapPlot { matrix }
}

impl Figure for HeatmapPlot<'_> {
    fn draw<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>, style: &Style) -> Result<()> {
        let matrix = self.matrix;
        if matrix.is_empty() {
            return Err(PlotError::empty_data("matrix has no cells"));
        }
        let edges = column_edges(matrix);
        let rows = matrix.channel_count() as f64;
        let mut chart = ChartBuilder::on(area)
            .margin(style.margin)
            .build_cartesian_2d(edges[0]..edges[edges.len() - 1], -0.5..rows - 0.5)?;

        let max = matrix.max_value().max(1) as f64;
        chart.draw_series(matrix.as_array().indexed_iter().filter(|(_, &v)| v > 0).map(
            |((channel, bin), &v)| {
                let shade = style.background.mix(style.foreground, v as f64 / max);
                let y = channel as f64;
                Rectangle::new(
                    [(edges[bin], y - 0.5), (edges[bin + 1], y + 0.5)],
                    RGBColor::from(shade).filled(),
                )
            },
        ))?;
        log::debug!(
            "drew heat map {}x{} (max {})",
            matrix.channel_count(),
            matrix.bin_count(),
            max
        );
        Ok(())
    }
}

/// Bar histogram of spikes per bin across all channels
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationPlot {
    counts: Vec<u32>,
    edges: Vec<f64>,
}

/// Population histogram from a count (or presence) matrix
pub fn population_plot(matrix: &BinaryMatrix) -> PopulationPlot {
    PopulationPlot {
        counts: matrix.column_sums(),
        edges: column_edges(matrix),
    }
}

impl PopulationPlot {
    /// Bar heights, one per bin
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }
}

impl Figure for PopulationPlot {
    fn draw<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>, style: &Style) -> Result<()> {
        if self.counts.is_empty() {
            return Err(PlotError::empty_data("no bins to plot"));
        }
        let top = self.counts.iter().copied().max().unwrap_or(0).max(1) as f64;
        let mut chart = ChartBuilder::on(area)
            .margin(style.margin)
            .build_cartesian_2d(self.edges[0]..self.edges[self.edges.len() - 1], 0.0..top * 1.05)?;

        let fill = RGBColor::from(style.group_color(0)).filled();
        chart.draw_series(self.counts.iter().enumerate().map(|(k, &n)| {
            Rectangle::new([(self.edges[k], 0.0), (self.edges[k + 1], n as f64)], fill)
        }))?;
        Ok(())
    }
}
