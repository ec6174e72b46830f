//! Low-level analysis primitives used by the capture/tracker layers.
//!
//! These components are allocation-free after construction and realtime-safe,
//! making them safe to run once per UI tick against live microphone frames.
//! They intentionally stay focused on the signal math so the tracker can
//! layer on session lifecycle and device handling.

/// Cents-distance accuracy scoring against a target pitch.
pub mod accuracy;
/// Normalized-autocorrelation fundamental frequency estimator.
pub mod estimator;
/// Capped pitch history and aggregate statistics.
pub mod history;
/// Peak/RMS level metering.
pub mod level;
/// Equal-tempered note names and log-frequency mapping.
pub mod note;

pub use estimator::{EstimatorConfig, PitchEstimate, PitchEstimator};
pub use history::{HistoryStats, PitchHistory, PitchSample, VocalRange};
pub use note::{frequency_to_note, NoteName, NoteReading};
