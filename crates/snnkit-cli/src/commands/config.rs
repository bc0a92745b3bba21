use clap::{Args, Subcommand};
use std::path::PathBuf;
use tracing::info;

use crate::config::SnnkitConfig;
use crate::error::{CliError, CliResult};

/// Show or initialize the configuration
#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub sub: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Print the effective configuration as TOML
    Show,
    /// Print one value by dotted key, e.g. `plotting.fig_save_dir`
    Get {
        /// Dotted key
        key: String,
    },
    /// Write the default configuration to the config path
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl ConfigCommand {
    pub fn execute(self, config: &SnnkitConfig, path: Option<PathBuf>) -> CliResult<()> {
        match self.sub {
            ConfigSubcommand::Show => {
                let text = toml::to_string_pretty(config)
                    .map_err(|e| CliError::config(format!("Failed to serialize config: {}", e)))?;
                print!("{}", text);
            }
            ConfigSubcommand::Get { key } => match config.get(&key)? {
                Some(toml::Value::String(s)) => println!("{}", s),
                Some(value) => println!("{}", value),
                None => return Err(CliError::config(format!("No such key: {}", key))),
            },
            ConfigSubcommand::Init { force } => {
                let path = match path {
                    Some(path) => path,
                    None => SnnkitConfig::default_config_path()?,
                };
                if path.exists() && !force {
                    return Err(CliError::invalid_args(format!(
                        "{} already exists (use --force to overwrite)",
                        path.display()
                    )));
                }
                SnnkitConfig::default().save_to_file(&path)?;
                info!("Wrote default configuration to {}", path.display());
                println!("{}", path.display());
            }
        }
        Ok(())
    }
}
