use std::collections::VecDeque;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::accuracy::calculate_accuracy;
use super::estimator::PitchEstimate;
use super::note::{frequency_to_note, NoteName, NoteReading};

/// One accepted estimate with its note mapping and session-relative time.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy)]
pub struct PitchSample {
    /// Seconds since the session started, derived from sample counts.
    pub timestamp: f64,
    pub estimate: PitchEstimate,
    pub reading: NoteReading,
}

/// Capped, ordered pitch history. Appending past capacity drops the
/// oldest sample; all statistics are pure reductions over what remains.
#[derive(Debug, Clone)]
pub struct PitchHistory {
    samples: VecDeque<PitchSample>,
    capacity: usize,
}

/// Aggregate statistics over a history window.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy)]
pub struct HistoryStats {
    /// Arithmetic mean of the sampled frequencies, Hz.
    pub mean_frequency: f32,
    /// Most frequently sampled pitch class.
    pub dominant_note: NoteName,
    /// 100 - relative standard deviation * 100, floored at 0. A steady
    /// tone scores near 100; wild octave swings score near 0.
    pub stability: f32,
}

impl PitchHistory {
    pub const DEFAULT_CAPACITY: usize = 100;

    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn push(&mut self, sample: PitchSample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn latest(&self) -> Option<&PitchSample> {
        self.samples.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PitchSample> {
        self.samples.iter()
    }

    /// Compute aggregate statistics; `None` for an empty history.
    pub fn stats(&self) -> Option<HistoryStats> {
        if self.samples.is_empty() {
            return None;
        }

        let n = self.samples.len() as f64;
        let mean = self
            .samples
            .iter()
            .map(|s| s.estimate.frequency as f64)
            .sum::<f64>()
            / n;

        let variance = self
            .samples
            .iter()
            .map(|s| {
                let d = s.estimate.frequency as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n;
        let stddev = variance.sqrt();

        let stability = if mean > 0.0 {
            (100.0 - (stddev / mean) * 100.0).max(0.0) as f32
        } else {
            0.0
        };

        // Mode of the pitch-class names. Ties resolve to the class that
        // reached the winning count first.
        let mut counts = [0usize; 12];
        for sample in &self.samples {
            counts[sample.reading.name.semitone() as usize] += 1;
        }
        let dominant = counts
            .iter()
            .enumerate()
            .max_by_key(|(_, count)| **count)
            .map(|(idx, _)| NoteName::ALL[idx])
            .unwrap_or(NoteName::C);

        Some(HistoryStats {
            mean_frequency: mean as f32,
            dominant_note: dominant,
            stability,
        })
    }

    /// Mean per-sample accuracy against a fixed target, 0-100.
    pub fn mean_accuracy(&self, target_hz: f32, tolerance_cents: f32) -> Option<f32> {
        if self.samples.is_empty() {
            return None;
        }
        let total: f32 = self
            .samples
            .iter()
            .map(|s| calculate_accuracy(target_hz, s.estimate.frequency, tolerance_cents))
            .sum();
        Some(total / self.samples.len() as f32)
    }
}

impl Default for PitchHistory {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

/// Lowest and highest sustained frequencies of a measurement session.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VocalRange {
    pub min_hz: f32,
    pub max_hz: f32,
}

impl VocalRange {
    /// Min/max over whatever window the history still holds. The live
    /// tracker keeps its own running extremes so a capped history does
    /// not clip a long session's range.
    pub fn from_history(history: &PitchHistory) -> Option<VocalRange> {
        let mut iter = history.iter().map(|s| s.estimate.frequency);
        let first = iter.next()?;
        let (min_hz, max_hz) = iter.fold((first, first), |(lo, hi), f| (lo.min(f), hi.max(f)));
        Some(VocalRange { min_hz, max_hz })
    }

    /// Fold one more observation into the range.
    pub fn extend(&mut self, frequency: f32) {
        self.min_hz = self.min_hz.min(frequency);
        self.max_hz = self.max_hz.max(frequency);
    }

    pub fn lowest_note(&self) -> NoteReading {
        frequency_to_note(self.min_hz)
    }

    pub fn highest_note(&self) -> NoteReading {
        frequency_to_note(self.max_hz)
    }

    /// Width of the range in equal-tempered semitones.
    pub fn semitone_span(&self) -> f32 {
        if self.min_hz <= 0.0 {
            return 0.0;
        }
        12.0 * (self.max_hz / self.min_hz).log2()
    }
}
