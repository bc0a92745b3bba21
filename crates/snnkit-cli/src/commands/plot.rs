//! Figure rendering
//!
//! Figures land in `plotting.fig_save_dir` as `<name>.<ext>` for every format
//! in `plotting.formats`, using the style named by `plotting.style`.
//!
//! Example:
//!   snnkit plot raster trial.json --layout lists --key in,in,out --time-shift 100
//!   snnkit plot heatmap trial.json --bin-width 10 --mode count --name trial_heat

use clap::{Args, ValueEnum};
use std::path::PathBuf;
use tracing::info;

use super::convert::BinningArgs;
use super::InputArgs;
use crate::config::SnnkitConfig;
use crate::error::{CliError, CliResult};
use snnkit_core::{BinMode, SpikeData};
use snnkit_plot::{
    heatmap_plot, population_plot, raster_plot, Figure, ImageFormat, RasterOptions, ScaleBar,
    Style,
};

/// Figure type
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlotKind {
    /// Per-channel spike ticks
    Raster,
    /// Channel × bin heat map
    Heatmap,
    /// Spikes per bin over all channels
    Population,
}

#[derive(Args, Debug)]
pub struct PlotCommand {
    /// Figure type
    #[arg(value_enum)]
    pub kind: PlotKind,

    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub binning: BinningArgs,

    /// Figure name (defaults to `<input stem>_<kind>`)
    #[arg(long)]
    pub name: Option<String>,

    /// Override the configured formats
    #[arg(long, value_delimiter = ',')]
    pub formats: Vec<ImageFormat>,

    /// Raster: subtracted from every spike time
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    pub time_shift: f64,

    /// Raster: channels to draw, in drawing order
    #[arg(long, value_delimiter = ',')]
    pub order: Vec<usize>,

    /// Raster: per-row group labels
    #[arg(long, value_delimiter = ',')]
    pub key: Vec<String>,

    /// Raster: keep the default y padding instead of fitting the rows
    #[arg(long)]
    pub no_adjust_ylim: bool,

    /// Raster: draw a duration bar of this many milliseconds
    #[arg(long)]
    pub scale_bar_ms: Option<f64>,

    /// Raster: samples per second of the time axis
    #[arg(long, default_value = "1000.0")]
    pub rate: f64,
}

impl PlotCommand {
    pub fn execute(self, config: &SnnkitConfig) -> CliResult<()> {
        let data = self.input.load(self.binning.binner(config)?)?;
        let style = config.style()?;
        let formats = if self.formats.is_empty() {
            config.plotting.formats.clone()
        } else {
            self.formats.clone()
        };
        let name = self.figure_name(&data);

        let written = match self.kind {
            PlotKind::Raster => {
                let rows = if self.order.is_empty() {
                    data.raster().rows().to_vec()
                } else {
                    data.raster().ordered(&self.order)
                };
                if !self.key.is_empty() && self.key.len() != rows.len() {
                    return Err(CliError::invalid_args(format!(
                        "--key has {} labels for {} rows",
                        self.key.len(),
                        rows.len()
                    )));
                }
                let plot = raster_plot(&rows, self.raster_options());
                save(config, &name, &formats, &plot, &style)?
            }
            PlotKind::Heatmap => {
                let matrix = data.binary_matrix(self.binning.mode(config))?;
                save(config, &name, &formats, &heatmap_plot(matrix), &style)?
            }
            PlotKind::Population => {
                let matrix = data.binary_matrix(BinMode::Count)?;
                save(config, &name, &formats, &population_plot(matrix), &style)?
            }
        };

        for path in written {
            println!("{}", path.display());
        }
        Ok(())
    }

    fn raster_options(&self) -> RasterOptions {
        RasterOptions {
            time_shift: self.time_shift,
            adjust_ylim: !self.no_adjust_ylim,
            key: self.key.clone(),
            x_range: None,
            scale_bar: self.scale_bar_ms.map(|duration_ms| ScaleBar {
                x0: 0.05,
                y: 0.95,
                duration_ms,
                rate: self.rate,
            }),
        }
    }

    fn figure_name(&self, data: &SpikeData) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        let kind = match self.kind {
            PlotKind::Raster => "raster",
            PlotKind::Heatmap => "heatmap",
            PlotKind::Population => "population",
        };
        match data.label() {
            Some(label) => format!("{}_{}", label, kind),
            None => kind.to_string(),
        }
    }
}

fn save<F: Figure>(
    config: &SnnkitConfig,
    name: &str,
    formats: &[ImageFormat],
    figure: &F,
    style: &Style,
) -> CliResult<Vec<PathBuf>> {
    let written = config.figure_dir().save(name, formats, figure, style)?;
    info!("Saved {} figure(s) named {}", written.len(), name);
    Ok(written)
}
