//! Vox - application builder and run loop

use std::time::Duration;

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};

use vox_dsp::analysis::estimator::EstimatorConfig;
use vox_dsp::capture::CaptureConfig;
use vox_dsp::tracker::{PitchTracker, TrackerConfig};

use super::ui::{self, spectrum::Spectrum, TunerState};

/// Main application builder
pub struct Vox {
    frame_size: usize,
    min_freq: f32,
    max_freq: f32,
    threshold: f32,
    history_len: usize,
}

impl Vox {
    pub fn new() -> Self {
        Self {
            frame_size: 2048,
            min_freq: 80.0,
            max_freq: 800.0,
            threshold: 0.1,
            history_len: 100,
        }
    }

    /// Analysis window length in samples.
    pub fn frame_size(mut self, frame_size: usize) -> Self {
        self.frame_size = frame_size;
        self
    }

    /// Detectable frequency band in Hz.
    pub fn freq_range(mut self, min_freq: f32, max_freq: f32) -> Self {
        self.min_freq = min_freq;
        self.max_freq = max_freq;
        self
    }

    /// Minimum correlation to accept a pitch.
    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Run the tuner (takes over the terminal until quit).
    pub fn run(self) -> EyreResult<()> {
        let config = TrackerConfig {
            capture: CaptureConfig {
                frame_size: self.frame_size,
                ..CaptureConfig::default()
            },
            estimator: EstimatorConfig {
                min_freq: self.min_freq,
                max_freq: self.max_freq,
                threshold: self.threshold,
            },
            history_len: self.history_len,
        };

        let mut tracker = PitchTracker::new(config);
        tracker
            .start()
            .wrap_err("could not open the microphone")?;
        let sample_rate = tracker.sample_rate().unwrap_or(48_000.0);

        let mut terminal = ratatui::init();
        let mut spectrum = Spectrum::new(self.frame_size, sample_rate, 48);
        let mut state = TunerState::new(sample_rate);

        let result = (|| -> EyreResult<()> {
            loop {
                // One analysis pass per tick; partial frames wait for the
                // next tick.
                if let Some(report) = tracker.poll() {
                    state.report = Some(report);
                    if let Some(frame) = tracker.last_frame() {
                        spectrum.update(frame);
                    }
                }
                state.refresh(&tracker);

                terminal.draw(|frame| ui::render(frame, &state, &spectrum))?;

                if event::poll(Duration::from_millis(16))? {
                    if let Event::Key(key) = event::read()? {
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(());
                            }
                            KeyCode::Char('r') | KeyCode::Char('R') => {
                                // Fresh measurement: tear down and reopen.
                                tracker
                                    .start()
                                    .wrap_err("could not restart the microphone")?;
                                state = TunerState::new(sample_rate);
                            }
                            _ => {}
                        }
                    }
                }
            }
        })();

        ratatui::restore();

        if let Some(summary) = tracker.stop() {
            println!("Analyzed {:.1}s of audio ({} frames).", summary.duration, summary.frames);
            if let Some(range) = summary.range {
                println!(
                    "Vocal range: {} ({:.1} Hz) to {} ({:.1} Hz), {:.1} semitones.",
                    range.lowest_note(),
                    range.min_hz,
                    range.highest_note(),
                    range.max_hz,
                    range.semitone_span(),
                );
            } else {
                println!("No voiced audio detected.");
            }
            if let Some(stats) = summary.stats {
                println!(
                    "Dominant note {} | mean {:.1} Hz | stability {:.0}/100",
                    stats.dominant_note, stats.mean_frequency, stats.stability
                );
            }
        }

        result
    }
}

impl Default for Vox {
    fn default() -> Self {
        Self::new()
    }
}
