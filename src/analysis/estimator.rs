#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::MIN_FREQ_FLOOR;

/*
Normalized Autocorrelation Pitch Estimation
===========================================

The estimator answers one question per frame: "what fundamental frequency,
if any, is this buffer repeating at?"

Vocabulary
----------

  period        Candidate repetition length in samples. A voice singing
                220 Hz at 44.1 kHz repeats every ~200 samples.

  lag range     Periods worth testing. Bounded by the configured frequency
                range: min_period = sr / max_freq, max_period = sr / min_freq.

  correlation   Similarity score in [0, 1] for one candidate period.
                1.0 = the frame matches itself perfectly when shifted.

  threshold     Minimum winning correlation to accept. Below it the frame
                is reported as unvoiced (None) - silence and broadband
                noise land here.


The Score
---------

For each candidate period p we compare the frame against itself shifted
by p samples over a fixed window W:

    diff(p)   = sum over j in 0..W of (x[j] - x[j+p])^2
    energy(p) = sum over j in 0..W of (x[j]^2 + x[j+p]^2)

    correlation(p) = 1 - diff(p) / energy(p)

Dividing by the pairwise energy keeps the score amplitude-independent: a
whisper and a belt at the same pitch produce the same correlation. A pure
periodic signal drives diff to ~0 and the score to ~1; uncorrelated noise
hovers near 0.5 or below; digital silence has no energy and scores 0.

The window W is fixed at frame_len - max_period so every candidate period
compares the same number of samples. This is why a frame must hold at
least two full periods of the lowest detectable frequency - shorter
frames simply cannot vote on low pitches, and the estimator clamps the
lag range (and bails out) accordingly.

Cost is O(W * lag range) per frame. At the default 2048-sample frame and
80-800 Hz range this sits comfortably inside a display-refresh budget;
the criterion benches keep it honest.
*/

/// One accepted pitch measurement for a single frame.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchEstimate {
    /// Estimated fundamental frequency in Hz.
    pub frequency: f32,
    /// Winning correlation score (0.0 - 1.0). Higher is cleaner.
    pub confidence: f32,
}

/// Tunable estimator parameters.
///
/// The defaults cover the vocal range with headroom; tighten `max_freq`
/// to 400 Hz for low voices to cut the per-frame cost roughly in half.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy)]
pub struct EstimatorConfig {
    /// Lowest detectable frequency in Hz.
    pub min_freq: f32,
    /// Highest detectable frequency in Hz.
    pub max_freq: f32,
    /// Minimum winning correlation to report a pitch.
    pub threshold: f32,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            min_freq: 80.0,
            max_freq: 800.0,
            threshold: 0.1,
        }
    }
}

/// Fundamental frequency estimator over fixed-size time-domain frames.
///
/// Scratch space is allocated once at construction; `estimate` itself is
/// allocation-free and safe to call on every UI tick.
pub struct PitchEstimator {
    sample_rate: f32,
    config: EstimatorConfig,
    // Correlation score per candidate period, reused across calls.
    scores: Vec<f32>,
}

impl PitchEstimator {
    pub fn new(sample_rate: f32) -> Self {
        Self::with_config(sample_rate, EstimatorConfig::default())
    }

    pub fn with_config(sample_rate: f32, config: EstimatorConfig) -> Self {
        let min_freq = config.min_freq.max(MIN_FREQ_FLOOR);
        let config = EstimatorConfig {
            min_freq,
            max_freq: config.max_freq.max(min_freq + 1.0),
            threshold: config.threshold.clamp(0.0, 1.0),
        };
        let max_period = (sample_rate / config.min_freq) as usize;

        Self {
            sample_rate,
            config,
            scores: vec![0.0; max_period + 2],
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Smallest frame length that can resolve the configured `min_freq`:
    /// two full periods of the lowest detectable pitch.
    pub fn frame_size_hint(&self) -> usize {
        2 * (self.sample_rate / self.config.min_freq) as usize
    }

    /// Estimate the fundamental frequency of one frame.
    ///
    /// Returns `None` for silence, noise, and frames too short to resolve
    /// any candidate period - all expected conditions, not errors.
    pub fn estimate(&mut self, frame: &[f32]) -> Option<PitchEstimate> {
        let min_period = ((self.sample_rate / self.config.max_freq) as usize).max(2);
        let max_period = ((self.sample_rate / self.config.min_freq) as usize)
            .min(frame.len() / 2)
            .min(self.scores.len() - 1);

        if max_period <= min_period {
            return None;
        }

        // Fixed comparison window so every candidate period scores over
        // the same number of samples.
        let window = frame.len() - max_period;

        let mut best_period = 0usize;
        let mut best_score = 0.0f32;

        for period in min_period..=max_period {
            let mut diff = 0.0f64;
            let mut energy = 0.0f64;
            for j in 0..window {
                let a = frame[j] as f64;
                let b = frame[j + period] as f64;
                let d = a - b;
                diff += d * d;
                energy += a * a + b * b;
            }

            let score = if energy > 1e-10 {
                (1.0 - diff / energy) as f32
            } else {
                0.0
            };
            self.scores[period] = score;

            if score > best_score {
                best_score = score;
                best_period = period;
            }
        }

        if best_period == 0 || best_score < self.config.threshold {
            return None;
        }

        // Integer multiples of the true period score as well as the period
        // itself, so the global maximum can land an octave (or more) low.
        // Take the earliest period that comes within a whisker of the best
        // score, walked up to its local peak.
        let cutoff = best_score - 0.02;
        let mut p = min_period;
        while p < best_period {
            if self.scores[p] >= cutoff {
                while p + 1 <= max_period && self.scores[p + 1] > self.scores[p] {
                    p += 1;
                }
                best_period = p;
                break;
            }
            p += 1;
        }

        let refined = self.refine_period(best_period, min_period, max_period);
        let frequency = self.sample_rate / refined as f32;

        Some(PitchEstimate {
            frequency,
            confidence: best_score.clamp(0.0, 1.0),
        })
    }

    /// Parabolic interpolation through the winning score and its two
    /// neighbours, for sub-sample period accuracy.
    fn refine_period(&self, period: usize, min_period: usize, max_period: usize) -> f64 {
        if period <= min_period || period >= max_period {
            return period as f64;
        }

        let s0 = self.scores[period - 1] as f64;
        let s1 = self.scores[period] as f64;
        let s2 = self.scores[period + 1] as f64;

        let denom = 2.0 * (2.0 * s1 - s0 - s2);
        if denom.abs() > 1e-10 {
            period as f64 + (s2 - s0) / denom
        } else {
            period as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 44_100.0;

    fn sine_frame(freq: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE;
                (2.0 * std::f32::consts::PI * freq * t).sin()
            })
            .collect()
    }

    #[test]
    fn detects_a440() {
        let mut estimator = PitchEstimator::new(SAMPLE_RATE);
        let frame = sine_frame(440.0, 2048);

        let estimate = estimator.estimate(&frame).expect("440 Hz should be voiced");
        assert!(
            (estimate.frequency - 440.0).abs() / 440.0 < 0.02,
            "expected ~440 Hz, got {} Hz",
            estimate.frequency
        );
        assert!(estimate.confidence > 0.9);
    }

    #[test]
    fn detects_across_vocal_range() {
        let mut estimator = PitchEstimator::new(SAMPLE_RATE);

        for freq in [82.41_f32, 110.0, 196.0, 329.63, 523.25, 784.0] {
            let frame = sine_frame(freq, 4096);
            let estimate = estimator
                .estimate(&frame)
                .unwrap_or_else(|| panic!("{freq} Hz should be voiced"));
            let error = (estimate.frequency - freq).abs() / freq;
            assert!(
                error < 0.02,
                "expected {} Hz, got {} Hz ({:.2}% error)",
                freq,
                estimate.frequency,
                error * 100.0
            );
        }
    }

    #[test]
    fn silence_is_unvoiced() {
        let mut estimator = PitchEstimator::new(SAMPLE_RATE);
        assert!(estimator.estimate(&vec![0.0; 2048]).is_none());
    }

    #[test]
    fn short_frame_is_unvoiced() {
        // 128 samples cannot hold two periods of anything below ~689 Hz,
        // let alone the 80 Hz floor.
        let mut estimator = PitchEstimator::new(SAMPLE_RATE);
        let frame = sine_frame(220.0, 128);
        assert!(estimator.estimate(&frame).is_none());
    }

    #[test]
    fn amplitude_does_not_change_the_estimate() {
        let mut estimator = PitchEstimator::new(SAMPLE_RATE);
        let loud = sine_frame(330.0, 2048);
        let quiet: Vec<f32> = loud.iter().map(|s| s * 0.05).collect();

        let a = estimator.estimate(&loud).unwrap();
        let b = estimator.estimate(&quiet).unwrap();
        assert!((a.frequency - b.frequency).abs() < 1.0);
    }

    #[test]
    fn custom_range_rejects_out_of_band_pitch() {
        let config = EstimatorConfig {
            min_freq: 80.0,
            max_freq: 400.0,
            threshold: 0.1,
        };
        let mut estimator = PitchEstimator::with_config(SAMPLE_RATE, config);

        // 784 Hz (G5) lies above the configured band. The estimator may
        // only report something inside [80, 400].
        let frame = sine_frame(784.0, 4096);
        if let Some(estimate) = estimator.estimate(&frame) {
            assert!(estimate.frequency <= 410.0);
        }
    }

    #[test]
    fn frame_size_hint_covers_two_low_periods() {
        let estimator = PitchEstimator::new(48_000.0);
        // 48000 / 80 = 600 samples per period at the floor.
        assert_eq!(estimator.frame_size_hint(), 1200);
    }
}
