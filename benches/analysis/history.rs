//! Benchmarks for history reductions over a full window.

use std::hint::black_box;

use criterion::Criterion;
use vox_dsp::analysis::estimator::PitchEstimate;
use vox_dsp::analysis::history::{PitchHistory, PitchSample, VocalRange};
use vox_dsp::analysis::note::frequency_to_note;

fn full_history() -> PitchHistory {
    let mut history = PitchHistory::new(100);
    for i in 0..100 {
        // Slow vibrato around A3.
        let frequency = 220.0 + 6.0 * (i as f32 * 0.3).sin();
        history.push(PitchSample {
            timestamp: i as f64 * 0.046,
            estimate: PitchEstimate {
                frequency,
                confidence: 0.95,
            },
            reading: frequency_to_note(frequency),
        });
    }
    history
}

pub fn bench_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis/history");
    let history = full_history();

    group.bench_function("stats", |b| b.iter(|| black_box(&history).stats()));

    group.bench_function("mean_accuracy", |b| {
        b.iter(|| black_box(&history).mean_accuracy(220.0, 50.0))
    });

    group.bench_function("range", |b| {
        b.iter(|| VocalRange::from_history(black_box(&history)))
    });

    group.finish();
}
