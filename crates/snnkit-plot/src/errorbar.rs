//! Mean ± standard deviation per condition

use crate::error::{PlotError, Result};
use crate::figure::Figure;
use crate::style::Style;
use plotters::coord::Shift;
use plotters::prelude::*;
use snnkit_store::{GroupKey, GroupStat};

/// One point of an error-bar plot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorPoint {
    /// Horizontal position
    pub x: f64,
    /// Mean
    pub mean: f64,
    /// Half-height of the error bar
    pub std: f64,
}

/// Means joined by a line, each with a vertical ± std bar
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorbarPlot {
    points: Vec<ErrorPoint>,
}

/// Error-bar plot of grouped statistics
///
/// Integer groups are placed at their value; text groups at their position.
pub fn errorbar_plot(stats: &[GroupStat]) -> ErrorbarPlot {
    let points = stats
        .iter()
        .enumerate()
        .map(|(i, stat)| ErrorPoint {
            x: match stat.group {
                GroupKey::Integer(v) => v as f64,
                GroupKey::Text(_) => i as f64,
            },
            mean: stat.mean,
            std: stat.std,
        })
        .collect();
    ErrorbarPlot { points }
}

impl ErrorbarPlot {
    /// Plotted points in group order
    pub fn points(&self) -> &[ErrorPoint] {
        &self.points
    }

    fn bounds(&self) -> ((f64, f64), (f64, f64)) {
        let xs = self.points.iter().map(|p| p.x);
        let x_lo = xs.clone().fold(f64::INFINITY, f64::min) - 0.5;
        let x_hi = xs.fold(f64::NEG_INFINITY, f64::max) + 0.5;
        let y_lo = self
            .points
            .iter()
            .map(|p| p.mean - p.std)
            .fold(f64::INFINITY, f64::min);
        let y_hi = self
            .points
            .iter()
            .map(|p| p.mean + p.std)
            .fold(f64::NEG_INFINITY, f64::max);
        let pad = ((y_hi - y_lo) * 0.1).max(0.1);
        ((x_lo, x_hi), (y_lo - pad, y_hi + pad))
    }
}

impl Figure for ErrorbarPlot {
    fn draw<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>, style: &Style) -> Result<()> {
        if self.points.is_empty() {
            return Err(PlotError::empty_data("no groups to plot"));
        }
        let ((x0, x1), (y0, y1)) = self.bounds();
        let mut chart = ChartBuilder::on(area)
            .margin(style.margin)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        let line = RGBColor::from(style.group_color(0)).stroke_width(style.line_width);
        chart.draw_series(std::iter::once(PathElement::new(
            self.points.iter().map(|p| (p.x, p.mean)).collect::<Vec<_>>(),
            line,
        )))?;

        let cap = (x1 - x0) * 0.01;
        let ink = RGBColor::from(style.foreground).stroke_width(style.line_width);
        chart.draw_series(self.points.iter().flat_map(|p| {
            let (lo, hi) = (p.mean - p.std, p.mean + p.std);
            [
                PathElement::new(vec![(p.x, lo), (p.x, hi)], ink),
                PathElement::new(vec![(p.x - cap, lo), (p.x + cap, lo)], ink),
                PathElement::new(vec![(p.x - cap, hi), (p.x + cap, hi)], ink),
            ]
        }))?;
        chart.draw_series(
            self.points
                .iter()
                .map(|p| Circle::new((p.x, p.mean), 3, RGBColor::from(style.foreground).filled())),
        )?;
        Ok(())
    }
}
