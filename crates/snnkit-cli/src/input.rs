//! Reading spike data files
//!
//! Spike files are JSON in one of four layouts, matching the four ways
//! [`SpikeData`] can be constructed.

use anyhow::Context;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use snnkit_core::{BinnerConfig, SpikeData};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::error::CliResult;

/// JSON layout of a spike file
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputLayout {
    /// `{"0": [0.1, 0.5], "3": [1.2]}`
    #[default]
    Map,
    /// `[[0, 0.1], [3, 1.2]]`
    Pairs,
    /// `[[0.1, 0.5], [], [], [1.2]]`
    Lists,
    /// `{"indices": [0, 3], "times": [0.1, 1.2]}`
    Columns,
}

/// Parallel index/time columns as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnsFile {
    /// Channel of each spike
    pub indices: Vec<usize>,
    /// Timestamp of each spike
    pub times: Vec<f64>,
}

/// Parse spike JSON text in the given layout
pub fn parse_spike_data(
    text: &str,
    layout: InputLayout,
    channels: Option<usize>,
    binner: Option<BinnerConfig>,
) -> CliResult<SpikeData> {
    let mut builder = SpikeData::builder();
    if let Some(n) = channels {
        builder = builder.channel_count(n);
    }
    if let Some(config) = binner {
        builder = builder.binner(config);
    }

    let data = match layout {
        InputLayout::Map => {
            let map: BTreeMap<usize, Vec<f64>> = serde_json::from_str(text)?;
            builder.build_from_channel_map(map)?
        }
        InputLayout::Pairs => {
            let pairs: Vec<(usize, f64)> = serde_json::from_str(text)?;
            builder.build_from_pairs(pairs)?
        }
        InputLayout::Lists => {
            let lists: Vec<Vec<f64>> = serde_json::from_str(text)?;
            builder.build_from_indexed(lists)?
        }
        InputLayout::Columns => {
            let columns: ColumnsFile = serde_json::from_str(text)?;
            builder.build_from_columns(&columns.indices, &columns.times)?
        }
    };
    Ok(data)
}

/// Load a spike file, labelling the data with the file stem
pub fn load_spike_data(
    path: &Path,
    layout: InputLayout,
    channels: Option<usize>,
    binner: Option<BinnerConfig>,
) -> CliResult<SpikeData> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading spike file {}", path.display()))?;
    let data = parse_spike_data(&text, layout, channels, binner)?;
    debug!(
        "Loaded {} ({} channels)",
        path.display(),
        data.channel_count()
    );
    Ok(match path.file_stem().and_then(|s| s.to_str()) {
        Some(stem) => data.with_label(stem),
        None => data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use snnkit_core::SpikeDataError;

    #[test]
    fn test_layouts_agree() {
        let map = parse_spike_data(r#"{"0": [0.1, 0.5], "2": [1.0]}"#, InputLayout::Map, None, None)
            .unwrap();
        let pairs = parse_spike_data(
            "[[0, 0.1], [2, 1.0], [0, 0.5]]",
            InputLayout::Pairs,
            None,
            None,
        )
        .unwrap();
        let lists =
            parse_spike_data("[[0.1, 0.5], [], [1.0]]", InputLayout::Lists, None, None).unwrap();
        let columns = parse_spike_data(
            r#"{"indices": [2, 0, 0], "times": [1.0, 0.5, 0.1]}"#,
            InputLayout::Columns,
            None,
            None,
        )
        .unwrap();

        assert_eq!(map.raster(), pairs.raster());
        assert_eq!(map.raster(), lists.raster());
        assert_eq!(map.raster(), columns.raster());
        assert_eq!(map.channel_count(), 3);
    }

    #[test]
    fn test_negative_timestamp_rejected() {
        let err = parse_spike_data("[[0, -1.0]]", InputLayout::Pairs, None, None).unwrap_err();
        assert!(matches!(
            err,
            CliError::SpikeData(SpikeDataError::InvalidSpikeData { .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_spike_data("{", InputLayout::Map, None, None).unwrap_err();
        assert!(matches!(err, CliError::Json(_)));
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = load_spike_data(Path::new("no/such/spikes.json"), InputLayout::Map, None, None)
            .unwrap_err();
        assert!(matches!(err, CliError::Generic(_)));
        assert!(err.to_string().contains("no/such/spikes.json"));
    }

    #[test]
    fn test_label_from_file_stem() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("trial_07.json");
        std::fs::write(&path, "[[0.2], [0.4]]").unwrap();
        let data = load_spike_data(&path, InputLayout::Lists, Some(4), None).unwrap();
        assert_eq!(data.label(), Some("trial_07"));
        assert_eq!(data.channel_count(), 4);
    }
}
