//! Minimal console tuner: print the detected note once per frame.
//!
//! Run with: cargo run --example mic_note

use std::io::Write;
use std::time::Duration;

use vox_dsp::tracker::{PitchTracker, TrackerConfig};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let mut tracker = PitchTracker::new(TrackerConfig::default());
    tracker.start()?;

    println!(
        "Listening at {:.0} Hz. Sing or hum; Ctrl+C to stop.",
        tracker.sample_rate().unwrap_or(0.0)
    );

    loop {
        match tracker.poll() {
            Some(report) => match (report.estimate, report.reading) {
                (Some(estimate), Some(reading)) => {
                    print!(
                        "\r{:<4} {:+6.1} cents | {:7.2} Hz | conf {:.2} | {:5.1} dBFS   ",
                        reading.to_string(),
                        reading.cents_offset,
                        estimate.frequency,
                        estimate.confidence,
                        report.level.rms_dbfs(),
                    );
                    std::io::stdout().flush()?;
                }
                _ => {
                    print!("\r...                                                      ");
                    std::io::stdout().flush()?;
                }
            },
            None => std::thread::sleep(Duration::from_millis(5)),
        }
    }
}
