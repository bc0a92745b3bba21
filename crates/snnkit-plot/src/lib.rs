//! Figures for spike data
//!
//! Thin layer over `plotters`: every figure type implements [`Figure`] and can
//! be rendered to SVG in memory or saved as SVG/PNG files through a
//! [`FigureDir`]. Figures draw geometry only; axis text is left to the caller.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod binned;
pub mod errorbar;
pub mod error;
pub mod figure;
pub mod raster;
pub mod style;

pub use binned::{heatmap_plot, population_plot, HeatmapPlot, PopulationPlot};
pub use error::{PlotError, Result};
pub use errorbar::{errorbar_plot, ErrorPoint, ErrorbarPlot};
pub use figure::{render_svg, save_figure, Figure, FigureDir, ImageFormat};
pub use raster::{
    key_layout, raster_plot, scale_bar_length, wheres_to_raster, KeyLayout, RasterOptions,
    RasterPlot, ScaleBar,
};
pub use style::{Rgb, Style};
