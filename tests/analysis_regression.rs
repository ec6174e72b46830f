//! End-to-end checks of the analysis pipeline against synthetic signals.

use vox_dsp::analysis::accuracy::calculate_accuracy;
use vox_dsp::analysis::estimator::{EstimatorConfig, PitchEstimator};
use vox_dsp::analysis::history::{PitchHistory, PitchSample, VocalRange};
use vox_dsp::analysis::note::{frequency_to_note, NoteName, NoteReading};
use vox_dsp::tracker::{Analyzer, PitchTracker, TrackerConfig};

const SAMPLE_RATE: f32 = 44_100.0;

fn sine(freq: f32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * freq * t).sin()
        })
        .collect()
}

/// Deterministic white-ish noise, no external PRNG needed.
fn noise(len: usize, amplitude: f32) -> Vec<f32> {
    let mut state = 0x2545_f491_u32;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let unit = state as f32 / u32::MAX as f32;
            (unit * 2.0 - 1.0) * amplitude
        })
        .collect()
}

#[test]
fn estimator_tracks_sines_across_the_band() {
    let config = EstimatorConfig::default();
    let mut estimator = PitchEstimator::with_config(SAMPLE_RATE, config);
    // Two full periods of the 80 Hz floor.
    let frame_len = estimator.frame_size_hint();

    for freq in [90.0_f32, 130.8, 174.6, 246.9, 392.0, 587.3, 740.0] {
        let estimate = estimator
            .estimate(&sine(freq, frame_len))
            .unwrap_or_else(|| panic!("{freq} Hz should be voiced"));
        let error = (estimate.frequency - freq).abs() / freq;
        assert!(
            error < 0.02,
            "{freq} Hz estimated as {} Hz ({:.2}% off)",
            estimate.frequency,
            error * 100.0
        );
    }
}

#[test]
fn silence_and_noise_are_unvoiced() {
    let mut estimator = PitchEstimator::new(SAMPLE_RATE);

    assert!(estimator.estimate(&vec![0.0; 4096]).is_none());
    assert!(estimator.estimate(&noise(4096, 0.5)).is_none());
}

#[test]
fn a4_is_the_reference_point() {
    let reading = frequency_to_note(440.0);
    assert_eq!(reading.name, NoteName::A);
    assert_eq!(reading.octave, 4);
    assert!(reading.cents_offset.abs() < 1e-3);
}

#[test]
fn octaves_are_monotonic_in_frequency() {
    for base in [55.0_f32, 110.0, 220.0, 440.0] {
        let low = frequency_to_note(base);
        let high = frequency_to_note(base * 2.0);
        assert_eq!(high.octave, low.octave + 1);
        assert_eq!(high.name, low.name);
    }
}

#[test]
fn accuracy_peaks_at_the_target_and_decays() {
    for target in [110.0_f32, 220.0, 440.0] {
        assert_eq!(calculate_accuracy(target, target, 25.0), 100.0);
    }

    let mut last = 100.0;
    for cents in [3.0_f32, 8.0, 15.0, 30.0, 45.0] {
        let actual = 220.0 * 2.0_f32.powf(cents / 1200.0);
        let score = calculate_accuracy(220.0, actual, 50.0);
        assert!(score < last);
        last = score;
    }
}

#[test]
fn equal_tempered_round_trip_is_within_a_cent() {
    for octave in 2..=5 {
        for name in NoteName::ALL {
            let note = NoteReading {
                name,
                octave,
                cents_offset: 0.0,
            };
            let back = frequency_to_note(note.frequency());
            assert_eq!((back.name, back.octave), (name, octave));
            assert!(back.cents_offset.abs() < 1.0);
        }
    }
}

#[test]
fn low_a_scenario_through_the_pipeline() {
    // 220 Hz sine, 44.1 kHz, 4096-sample frames: A3 within +/-5 Hz.
    let mut analyzer = Analyzer::new(SAMPLE_RATE, EstimatorConfig::default(), 100);

    let report = analyzer.process_frame(&sine(220.0, 4096));
    let estimate = report.estimate.expect("220 Hz should be voiced");
    assert!((estimate.frequency - 220.0).abs() < 5.0);

    let reading = report.reading.unwrap();
    assert_eq!(reading.name, NoteName::A);
    assert_eq!(reading.octave, 3);
    assert!(reading.cents_offset.abs() < 10.0);
}

#[test]
fn stability_separates_wobble_from_octave_jumps() {
    let mut steady = PitchHistory::new(100);
    let mut jumpy = PitchHistory::new(100);

    for i in 0..49 {
        let t = i as f64 * 0.05;
        let wobble = if i % 2 == 0 { 200.0 } else { 220.0 };
        let jump = if i % 2 == 0 { 100.0 } else { 400.0 };
        steady.push(sample_at(t, wobble));
        jumpy.push(sample_at(t, jump));
    }

    assert!(steady.stats().unwrap().stability > 80.0);
    assert!(jumpy.stats().unwrap().stability < 40.0);
}

#[test]
fn vocal_range_covers_a_measurement_session() {
    let mut analyzer = Analyzer::new(SAMPLE_RATE, EstimatorConfig::default(), 100);

    for freq in [110.0, 146.8, 220.0, 329.6, 440.0] {
        analyzer.process_frame(&sine(freq, 4096));
    }
    // Interleaved silence must not disturb the range.
    analyzer.process_frame(&vec![0.0; 4096]);

    let range = analyzer.range().expect("voiced session has a range");
    assert!((range.min_hz - 110.0).abs() < 3.0);
    assert!((range.max_hz - 440.0).abs() < 9.0);
    assert_eq!(range.lowest_note().name, NoteName::A);
    assert_eq!(range.lowest_note().octave, 2);
    assert!((range.semitone_span() - 24.0).abs() < 0.5);

    // The pure reduction over the same window agrees.
    let from_history = VocalRange::from_history(analyzer.history()).unwrap();
    assert_eq!(from_history, range);
}

#[test]
fn tracker_lifecycle_is_safe_without_a_device() {
    let mut tracker = PitchTracker::new(TrackerConfig::default());

    // stop() before start() is a no-op, repeatedly.
    assert!(tracker.stop().is_none());
    assert!(tracker.stop().is_none());
    assert!(!tracker.is_running());
    assert!(tracker.poll().is_none());
    assert_eq!(tracker.dropped_samples(), 0);
    assert!(tracker.sample_rate().is_none());
}

fn sample_at(timestamp: f64, frequency: f32) -> PitchSample {
    PitchSample {
        timestamp,
        estimate: vox_dsp::analysis::estimator::PitchEstimate {
            frequency,
            confidence: 1.0,
        },
        reading: frequency_to_note(frequency),
    }
}
