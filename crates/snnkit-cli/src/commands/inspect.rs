use clap::Args;
use tracing::info;

use super::InputArgs;
use crate::config::SnnkitConfig;
use crate::error::CliResult;
use snnkit_core::{SpikeData, SpikeDataError};

/// Summarize a spike file
#[derive(Args, Debug)]
pub struct InspectCommand {
    #[command(flatten)]
    pub input: InputArgs,

    /// Also print per-channel counts and cache state
    #[arg(long)]
    pub detailed: bool,
}

impl InspectCommand {
    pub fn execute(self, _config: &SnnkitConfig) -> CliResult<()> {
        info!("Inspecting {}", self.input.input.display());
        let data = self.input.load(None)?;
        print!("{}", summary(&data, self.detailed)?);
        Ok(())
    }
}

/// Plain-text summary of spike data
pub fn summary(data: &SpikeData, detailed: bool) -> CliResult<String> {
    let mut text = String::new();
    if let Some(label) = data.label() {
        text.push_str(&format!("Label: {}\n", label));
    }
    text.push_str(&format!("Channels: {}\n", data.channel_count()));
    text.push_str(&format!("Spikes: {}\n", data.spike_counts(false).total()));
    match data.time_range() {
        Ok((t_min, t_max)) => text.push_str(&format!("Time range: {} .. {}\n", t_min, t_max)),
        Err(SpikeDataError::EmptyEventSet) => text.push_str("Time range: none\n"),
        Err(e) => return Err(e.into()),
    }
    if let Some(binner) = data.binner_config() {
        text.push_str(&format!("Bin width: {}\n", binner.bin_width));
    }

    if detailed {
        for (channel, times) in data.raster().iter() {
            text.push_str(&format!("  channel {}: {} spike(s)\n", channel, times.len()));
        }
        text.push_str(&format!("State: {}\n", data.state()));
    }
    Ok(text)
}
