use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use snnkit_core::{BinMode, BinnerConfig, SpikeData};

// Deterministic spread of spikes: channel c fires every (c + 1) ms
fn build_lists(channels: usize, duration_ms: f64) -> Vec<Vec<f64>> {
    (0..channels)
        .map(|c| {
            let step = (c + 1) as f64;
            (0..)
                .map(|k| k as f64 * step)
                .take_while(|&t| t < duration_ms)
                .collect()
        })
        .collect()
}

fn bench_binning(c: &mut Criterion) {
    let mut group = c.benchmark_group("spike_binning");
    let duration_ms = 1_000.0;

    for &channels in &[16usize, 64, 256] {
        let lists = build_lists(channels, duration_ms);
        let spikes: usize = lists.iter().map(Vec::len).sum();
        group.throughput(Throughput::Elements(spikes as u64));

        group.bench_with_input(BenchmarkId::new("count_matrix", channels), &lists, |b, lists| {
            b.iter_batched(
                || {
                    SpikeData::builder()
                        .binner(BinnerConfig::new(1.0).with_range(0.0, duration_ms))
                        .build_from_indexed(lists.clone())
                        .expect("bench spike data")
                },
                |data| {
                    let _m = data.binary_matrix(BinMode::Count).unwrap().bin_count();
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("construct", channels), &lists, |b, lists| {
            b.iter_batched(
                || lists.clone(),
                |lists| SpikeData::from_indexed(lists, None).unwrap(),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_binning);
criterion_main!(benches);
