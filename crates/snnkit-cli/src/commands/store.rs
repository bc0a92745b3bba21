//! Record tables over directories of spike files
//!
//! Every `*.json` file below the directory becomes one [`SpikeRecord`] keyed
//! by its path relative to the directory (without extension) and labelled
//! with the name of the directory that holds it.
//!
//! Example:
//!   snnkit store summarize recordings/ --layout lists --label control --by-label

use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::SnnkitConfig;
use crate::error::{CliError, CliResult};
use crate::input::{load_spike_data, InputLayout};
use snnkit_plot::errorbar_plot;
use snnkit_store::{Query, SpikeRecord, Table};

#[derive(Args, Debug)]
pub struct StoreCommand {
    #[command(subcommand)]
    pub sub: StoreSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum StoreSubcommand {
    /// Load a directory of spike files and print per-record counts
    Summarize(SummarizeCommand),
}

#[derive(Args, Debug)]
pub struct SummarizeCommand {
    /// Directory searched recursively for `*.json` spike files
    pub dir: PathBuf,

    /// JSON layout shared by all spike files
    #[arg(short, long, value_enum, default_value = "map")]
    pub layout: InputLayout,

    /// Keep only records with one of these labels
    #[arg(long)]
    pub label: Vec<String>,

    /// Print mean and standard deviation of spike counts per label
    #[arg(long)]
    pub by_label: bool,

    /// Save an errorbar figure of spike counts per label under this name
    #[arg(long)]
    pub plot: Option<String>,
}

impl StoreCommand {
    pub fn execute(self, config: &SnnkitConfig) -> CliResult<()> {
        match self.sub {
            StoreSubcommand::Summarize(cmd) => cmd.execute(config),
        }
    }
}

impl SummarizeCommand {
    pub fn execute(self, config: &SnnkitConfig) -> CliResult<()> {
        let table = load_table(&self.dir, self.layout)?;
        let table = if self.label.is_empty() {
            table
        } else {
            table.filter(&Query::new().with("label", self.label.iter().map(String::as_str)))?
        };
        info!("{} record(s) selected", table.len());

        println!("key\tlabel\tchannels\tspikes");
        for record in &table {
            println!(
                "{}\t{}\t{}\t{}",
                record.key,
                record.label,
                record.data.channel_count(),
                record.data.spike_counts(false).total()
            );
        }

        if self.by_label || self.plot.is_some() {
            let stats = table.group_stats("label", "spikes")?;
            if self.by_label {
                println!("label\tmean\tstd\tcount");
                for stat in &stats {
                    println!(
                        "{}\t{:.3}\t{:.3}\t{}",
                        stat.group, stat.mean, stat.std, stat.count
                    );
                }
            }
            if let Some(name) = &self.plot {
                let written = config.figure_dir().save(
                    name,
                    &config.plotting.formats,
                    &errorbar_plot(&stats),
                    &config.style()?,
                )?;
                for path in written {
                    println!("{}", path.display());
                }
            }
        }
        Ok(())
    }
}

/// Load every `*.json` spike file below `dir` into a table
pub fn load_table(dir: &Path, layout: InputLayout) -> CliResult<Table<SpikeRecord>> {
    if !dir.is_dir() {
        return Err(CliError::invalid_args(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut table = Table::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("json")
        {
            continue;
        }
        debug!("Loading {}", path.display());
        let data = load_spike_data(path, layout, None, None)?;
        table.insert(SpikeRecord::new(record_key(dir, path), data).with_label(parent_label(path)))?;
    }
    Ok(table)
}

fn record_key(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path).with_extension("");
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn parent_label(path: &Path) -> String {
    path.parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
