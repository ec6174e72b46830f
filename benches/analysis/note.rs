//! Benchmarks for note mapping and accuracy scoring.

use std::hint::black_box;

use criterion::Criterion;
use vox_dsp::analysis::accuracy::calculate_accuracy;
use vox_dsp::analysis::note::frequency_to_note;

pub fn bench_note(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis/note");

    let freqs: Vec<f32> = (0..128).map(|i| 80.0 + i as f32 * 5.5).collect();

    group.bench_function("frequency_to_note", |b| {
        b.iter(|| {
            for &freq in &freqs {
                black_box(frequency_to_note(black_box(freq)));
            }
        })
    });

    group.bench_function("calculate_accuracy", |b| {
        b.iter(|| {
            for &freq in &freqs {
                black_box(calculate_accuracy(220.0, black_box(freq), 50.0));
            }
        })
    });

    group.finish();
}
