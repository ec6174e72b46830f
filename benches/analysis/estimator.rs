//! Benchmarks for the autocorrelation pitch estimator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use vox_dsp::analysis::estimator::{EstimatorConfig, PitchEstimator};

use crate::{sine_frame, FRAME_SIZES, SAMPLE_RATE};

pub fn bench_estimator(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis/estimator");

    for &size in FRAME_SIZES {
        let frame = sine_frame(220.0, size);

        // Default band (80-800 Hz).
        let mut estimator = PitchEstimator::new(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("voiced", size), &size, |b, _| {
            b.iter(|| estimator.estimate(black_box(&frame)))
        });

        // Narrow band halves the lag range.
        let config = EstimatorConfig {
            min_freq: 80.0,
            max_freq: 400.0,
            threshold: 0.1,
        };
        let mut estimator = PitchEstimator::with_config(SAMPLE_RATE, config);
        group.bench_with_input(BenchmarkId::new("narrow_band", size), &size, |b, _| {
            b.iter(|| estimator.estimate(black_box(&frame)))
        });

        // Silence pays the full scan too - the common case between notes.
        let silence = vec![0.0f32; size];
        let mut estimator = PitchEstimator::new(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("silence", size), &size, |b, _| {
            b.iter(|| estimator.estimate(black_box(&silence)))
        });
    }

    group.finish();
}
