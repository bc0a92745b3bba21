//! End-to-end behaviour of `SpikeData` on small hand-written inputs.

use snnkit_core::{
    BinMode, BinnerConfig, EventSet, MergePolicy, SpikeCounts, SpikeData, SpikeDataError,
    SpikeDataState, ViolationKind,
};
use std::collections::BTreeMap;

fn single_channel() -> SpikeData {
    SpikeData::builder()
        .binner(BinnerConfig::new(0.5).with_range(0.0, 1.0))
        .build_from_channel_map(BTreeMap::from([(0, vec![0.1, 0.5, 0.9])]))
        .expect("valid input")
}

#[test]
fn presence_matrix_single_channel() {
    let data = single_channel();
    let matrix = data.binary_matrix(BinMode::Presence).unwrap();
    assert_eq!(matrix.shape(), (1, 2));
    assert_eq!(matrix.to_rows(), vec![vec![1, 1]]);
}

#[test]
fn count_matrix_single_channel() {
    let data = single_channel();
    let matrix = data.binary_matrix(BinMode::Count).unwrap();
    assert_eq!(matrix.to_rows(), vec![vec![1, 2]]);
}

#[test]
fn empty_input_has_no_channels() {
    let data = SpikeData::from_channel_map(BTreeMap::<usize, Vec<f64>>::new(), None).unwrap();
    assert_eq!(data.channel_count(), 0);
    assert!(data.raster().is_empty());
    assert_eq!(data.spike_counts(false), SpikeCounts::Total(0));
    assert!(data.binary_matrix(BinMode::Presence).unwrap().is_empty());
    assert_eq!(data.time_range(), Err(SpikeDataError::EmptyEventSet));
}

#[test]
fn negative_timestamp_is_reported() {
    let err = SpikeData::from_channel_map(vec![(0, vec![-1.0])], None).unwrap_err();
    let violations = err.violations();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].channel, 0);
    assert_eq!(violations[0].timestamp, Some(-1.0));
    assert_eq!(violations[0].kind, ViolationKind::NegativeTimestamp);
    assert!(err.to_string().contains("-1"));
}

#[test]
fn rebinning_produces_fresh_matrix() {
    let mut data = single_channel();
    let before = data.binary_matrix(BinMode::Presence).unwrap().clone();
    assert_eq!(data.state(), SpikeDataState::Binned);

    data.set_binner(BinnerConfig::new(0.25).with_range(0.0, 1.0)).unwrap();
    let after = data.binary_matrix(BinMode::Presence).unwrap();
    assert_eq!(before.bin_count(), 2);
    assert_eq!(after.bin_count(), 4);
    assert_eq!(after.to_rows(), vec![vec![1, 0, 1, 1]]);
}

#[test]
fn declared_channel_count_too_small() {
    let events = EventSet::from_indexed(vec![vec![0.1], vec![0.2], vec![0.3]], None).unwrap();
    let err = SpikeData::builder()
        .channel_count(2)
        .build_from_event_set(events)
        .unwrap_err();
    assert_eq!(
        err.violations()[0].kind,
        ViolationKind::ChannelOutOfRange { declared: 2 }
    );
}

#[test]
fn column_input_and_windowing() {
    let data = SpikeData::from_columns(&[0, 1, 0, 2], &[1.0, 1.5, 3.0, 4.0], Some(4)).unwrap();
    assert_eq!(data.channel_count(), 4);

    let window = data.window(1.0, 3.0, true, Some(&[0, 1])).unwrap();
    assert_eq!(window.events().to_columns(), (vec![0, 0, 1], vec![0.0, 2.0, 0.5]));
    assert_eq!(window.channel_count(), 4);
}

#[test]
fn union_merge_drops_repeated_times() {
    let a = SpikeData::from_indexed(vec![vec![1.0, 2.0]], None).unwrap();
    let b = SpikeData::from_indexed(vec![vec![2.0], vec![5.0]], None).unwrap();
    let merged = SpikeData::combine(&a, &b, MergePolicy::Union);
    assert_eq!(merged.spike_counts(true), SpikeCounts::PerChannel(vec![2, 1]));

    let concatenated = SpikeData::combine(&a, &b, MergePolicy::Concatenate);
    assert_eq!(concatenated.spike_counts(true), SpikeCounts::PerChannel(vec![3, 1]));
}
