//! The consolidated capture -> estimate -> map -> history pipeline.
//!
//! `Analyzer` is the device-free half: feed it frames, read back reports
//! and statistics. `PitchTracker` wraps it around a live microphone
//! session with a strict lifecycle: `start` tears down any previous
//! session before opening a new one (never two streams), `stop` is
//! idempotent and a no-op before the first `start`, and every teardown
//! releases the device synchronously.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::analysis::estimator::{EstimatorConfig, PitchEstimate, PitchEstimator};
use crate::analysis::history::{HistoryStats, PitchHistory, PitchSample, VocalRange};
use crate::analysis::level::{self, LevelReading};
use crate::analysis::note::{frequency_to_note, NoteReading};
use crate::capture::{CaptureConfig, CaptureError, CaptureSession, FrameReceiver};

/// Everything one analysis pass produces for a single frame.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy)]
pub struct FrameReport {
    /// Seconds of audio processed so far this session.
    pub timestamp: f64,
    pub level: LevelReading,
    /// `None` when the frame held no confident pitch (silence, noise).
    pub estimate: Option<PitchEstimate>,
    pub reading: Option<NoteReading>,
}

/// End-of-session digest handed out by `PitchTracker::stop`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy)]
pub struct SessionSummary {
    /// Running min/max over every accepted estimate of the session.
    pub range: Option<VocalRange>,
    /// Statistics over the trailing history window.
    pub stats: Option<HistoryStats>,
    /// Seconds of audio analyzed.
    pub duration: f64,
    /// Frames analyzed, voiced or not.
    pub frames: u64,
}

/// Tracker-wide configuration, one knob set per session.
#[derive(Debug, Clone, Copy)]
pub struct TrackerConfig {
    pub capture: CaptureConfig,
    pub estimator: EstimatorConfig,
    pub history_len: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            capture: CaptureConfig::default(),
            estimator: EstimatorConfig::default(),
            history_len: PitchHistory::DEFAULT_CAPACITY,
        }
    }
}

/// Device-free per-frame pipeline: estimator + note mapper + history +
/// level metering + running range. The caller's thread is the sole
/// mutator; one `process_frame` call per tick is the whole concurrency
/// story.
pub struct Analyzer {
    estimator: PitchEstimator,
    history: PitchHistory,
    sample_rate: f32,
    samples_seen: u64,
    frames_seen: u64,
    range: Option<VocalRange>,
}

impl Analyzer {
    pub fn new(sample_rate: f32, estimator: EstimatorConfig, history_len: usize) -> Self {
        Self {
            estimator: PitchEstimator::with_config(sample_rate, estimator),
            history: PitchHistory::new(history_len),
            sample_rate,
            samples_seen: 0,
            frames_seen: 0,
            range: None,
        }
    }

    /// Run one frame through the pipeline and record the outcome.
    pub fn process_frame(&mut self, frame: &[f32]) -> FrameReport {
        self.samples_seen += frame.len() as u64;
        self.frames_seen += 1;
        let timestamp = self.samples_seen as f64 / self.sample_rate as f64;

        let level = level::measure(frame);
        let estimate = self.estimator.estimate(frame);
        let reading = estimate.map(|e| frequency_to_note(e.frequency));

        if let (Some(estimate), Some(reading)) = (estimate, reading) {
            self.history.push(PitchSample {
                timestamp,
                estimate,
                reading,
            });
            match &mut self.range {
                Some(range) => range.extend(estimate.frequency),
                None => {
                    self.range = Some(VocalRange {
                        min_hz: estimate.frequency,
                        max_hz: estimate.frequency,
                    })
                }
            }
        }

        FrameReport {
            timestamp,
            level,
            estimate,
            reading,
        }
    }

    pub fn history(&self) -> &PitchHistory {
        &self.history
    }

    /// Running min/max over the whole session, not just the capped
    /// history window. `None` until the first voiced frame.
    pub fn range(&self) -> Option<VocalRange> {
        self.range
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            range: self.range,
            stats: self.history.stats(),
            duration: self.samples_seen as f64 / self.sample_rate as f64,
            frames: self.frames_seen,
        }
    }
}

struct LiveSession {
    session: CaptureSession,
    receiver: FrameReceiver,
    analyzer: Analyzer,
}

/// A microphone-backed analysis session with explicit start/stop.
pub struct PitchTracker {
    config: TrackerConfig,
    live: Option<LiveSession>,
}

impl PitchTracker {
    /// Touches no hardware; the device is only claimed by `start`.
    pub fn new(config: TrackerConfig) -> Self {
        Self { config, live: None }
    }

    pub fn is_running(&self) -> bool {
        self.live.is_some()
    }

    /// Open the microphone and begin a fresh measurement session.
    ///
    /// If a session is already live it is fully torn down first - the
    /// second `start` is a transparent restart, never a second stream on
    /// the same device.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        if let Some(mut live) = self.live.take() {
            live.session.close();
        }

        let (session, receiver) = CaptureSession::open(self.config.capture)?;
        let analyzer = Analyzer::new(
            session.sample_rate(),
            self.config.estimator,
            self.config.history_len,
        );

        self.live = Some(LiveSession {
            session,
            receiver,
            analyzer,
        });
        Ok(())
    }

    /// Pull at most one assembled frame through the pipeline.
    ///
    /// Call once per UI tick. Returns `None` while idle, while the ring
    /// has less than a full frame, or after a stop - never blocks.
    pub fn poll(&mut self) -> Option<FrameReport> {
        let live = self.live.as_mut()?;
        let frame = live.receiver.poll_frame()?;
        Some(live.analyzer.process_frame(frame))
    }

    /// Whether the device reported an asynchronous failure mid-session.
    /// The session stays stopped until the caller retries `start`.
    pub fn has_device_failed(&self) -> bool {
        self.live
            .as_ref()
            .map(|l| l.session.has_failed())
            .unwrap_or(false)
    }

    /// Native sample rate of the live session, if one is open.
    pub fn sample_rate(&self) -> Option<f32> {
        self.live.as_ref().map(|l| l.session.sample_rate())
    }

    /// Samples the device had to discard because polling fell behind.
    pub fn dropped_samples(&self) -> u64 {
        self.live
            .as_ref()
            .map(|l| l.receiver.dropped_samples())
            .unwrap_or(0)
    }

    /// The most recently analyzed frame, for visualization. See
    /// `FrameReceiver::last_frame` for the staleness caveat.
    pub fn last_frame(&self) -> Option<&[f32]> {
        self.live.as_ref().map(|l| l.receiver.last_frame())
    }

    pub fn history(&self) -> Option<&PitchHistory> {
        self.live.as_ref().map(|l| l.analyzer.history())
    }

    pub fn range(&self) -> Option<VocalRange> {
        self.live.as_ref().and_then(|l| l.analyzer.range())
    }

    /// Tear the session down and return its summary.
    ///
    /// Closes the device synchronously; audio still in flight in the ring
    /// is discarded, not analyzed. Idempotent: stopping an idle tracker
    /// (including before the first `start`) is a no-op returning `None`.
    pub fn stop(&mut self) -> Option<SessionSummary> {
        let mut live = self.live.take()?;
        live.session.close();
        Some(live.analyzer.summary())
    }
}
