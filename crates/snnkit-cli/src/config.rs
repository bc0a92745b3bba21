//! Configuration management for the snnkit CLI

use serde::{Deserialize, Serialize};
use snnkit_core::{BinMode, BinnerConfig};
use snnkit_plot::{FigureDir, ImageFormat, Style};
use std::path::{Path, PathBuf};

use crate::error::{CliError, CliResult};

/// Global CLI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnnkitConfig {
    /// Default logging level
    pub log_level: Option<String>,

    /// Figure output settings
    pub plotting: PlottingConfig,

    /// Default binning
    pub binning: BinningConfig,
}

/// Where and how figures are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlottingConfig {
    /// Directory receiving saved figures
    pub fig_save_dir: PathBuf,

    /// Directory holding `<name>.toml` style files
    pub style_dir: PathBuf,

    /// Style to load from `style_dir` (built-in default when unset)
    pub style: Option<String>,

    /// Formats every figure is saved in
    pub formats: Vec<ImageFormat>,
}

/// Binning used when a command gets no explicit `--bin-width`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinningConfig {
    /// Bin width in the input's time unit
    pub bin_width: Option<f64>,

    /// Matrix mode
    pub mode: BinMode,
}

impl Default for SnnkitConfig {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            plotting: PlottingConfig::default(),
            binning: BinningConfig::default(),
        }
    }
}

impl Default for PlottingConfig {
    fn default() -> Self {
        Self {
            fig_save_dir: PathBuf::from("figures"),
            style_dir: PathBuf::from("styles"),
            style: None,
            formats: vec![ImageFormat::Svg, ImageFormat::Png],
        }
    }
}

impl Default for BinningConfig {
    fn default() -> Self {
        Self {
            bin_width: None,
            mode: BinMode::Presence,
        }
    }
}

impl SnnkitConfig {
    /// Load configuration from file
    pub fn load_from_file(path: &Path) -> CliResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)
                .map_err(|e| CliError::config(format!("Invalid config file: {}", e)))
        } else {
            Ok(Self::default())
        }
    }

    /// Load from an explicit path, or from the default location
    pub fn load(explicit: Option<&Path>) -> CliResult<Self> {
        match explicit {
            Some(path) => Self::load_from_file(path),
            None => match Self::default_config_path() {
                Ok(path) => Self::load_from_file(&path),
                Err(_) => Ok(Self::default()),
            },
        }
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &Path) -> CliResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CliError::config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> CliResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CliError::config("Could not determine config directory"))?;
        Ok(config_dir.join("snnkit").join("config.toml"))
    }

    /// Look up a dotted key such as `plotting.style`
    pub fn get(&self, key: &str) -> CliResult<Option<toml::Value>> {
        let root = toml::Value::try_from(self)
            .map_err(|e| CliError::config(format!("Failed to serialize config: {}", e)))?;
        let mut node = &root;
        for part in key.split('.') {
            match node.get(part) {
                Some(next) => node = next,
                None => return Ok(None),
            }
        }
        Ok(Some(node.clone()))
    }

    /// Figure directory from the plotting section
    pub fn figure_dir(&self) -> FigureDir {
        FigureDir::new(&self.plotting.fig_save_dir)
    }

    /// Configured style, or the built-in default
    pub fn style(&self) -> CliResult<Style> {
        match &self.plotting.style {
            Some(name) => Ok(Style::load(&self.plotting.style_dir, name)?),
            None => Ok(Style::default()),
        }
    }

    /// Binner from an explicit width or the configured default
    pub fn binner(
        &self,
        bin_width: Option<f64>,
        t_min: Option<f64>,
        t_max: Option<f64>,
    ) -> Option<BinnerConfig> {
        let width = bin_width.or(self.binning.bin_width)?;
        Some(BinnerConfig {
            bin_width: width,
            t_min,
            t_max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: SnnkitConfig = toml::from_str(
            r#"
            [binning]
            bin_width = 2.5
            mode = "count"
            "#,
        )
        .unwrap();
        assert_eq!(config.binning.bin_width, Some(2.5));
        assert_eq!(config.binning.mode, BinMode::Count);
        assert_eq!(config.plotting, PlottingConfig::default());
    }

    #[test]
    fn test_dotted_get() {
        let mut config = SnnkitConfig::default();
        config.plotting.style = Some("talk".into());
        assert_eq!(
            config.get("plotting.style").unwrap(),
            Some(toml::Value::String("talk".into()))
        );
        assert_eq!(config.get("plotting.missing").unwrap(), None);
        assert!(config.get("plotting").unwrap().unwrap().is_table());
    }

    #[test]
    fn test_save_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("config.toml");
        let mut config = SnnkitConfig::default();
        config.plotting.formats = vec![ImageFormat::Svg];
        config.save_to_file(&path).unwrap();
        assert_eq!(SnnkitConfig::load_from_file(&path).unwrap(), config);

        let missing = tmp.path().join("absent.toml");
        assert_eq!(
            SnnkitConfig::load(Some(&missing)).unwrap(),
            SnnkitConfig::default()
        );
    }

    #[test]
    fn test_binner_fallback() {
        let mut config = SnnkitConfig::default();
        assert_eq!(config.binner(None, None, None), None);
        config.binning.bin_width = Some(4.0);
        assert_eq!(
            config.binner(None, Some(1.0), None),
            Some(BinnerConfig::new(4.0).with_t_min(1.0))
        );
        assert_eq!(config.binner(Some(0.5), None, None).unwrap().bin_width, 0.5);
    }
}
