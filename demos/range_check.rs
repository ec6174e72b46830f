//! Ten-second vocal range measurement.
//!
//! Run with: cargo run --example range_check

use std::time::{Duration, Instant};

use vox_dsp::tracker::{PitchTracker, TrackerConfig};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let mut tracker = PitchTracker::new(TrackerConfig::default());
    tracker.start()?;

    println!("Slide from your lowest comfortable note to your highest. 10 seconds...");

    let started = Instant::now();
    while started.elapsed() < Duration::from_secs(10) {
        if tracker.poll().is_none() {
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    let summary = tracker.stop().expect("session was started");
    match summary.range {
        Some(range) => {
            println!(
                "Range: {} ({:.1} Hz) to {} ({:.1} Hz) - {:.1} semitones",
                range.lowest_note(),
                range.min_hz,
                range.highest_note(),
                range.max_hz,
                range.semitone_span(),
            );
            if let Some(stats) = summary.stats {
                println!(
                    "Dominant note {} | stability {:.0}/100",
                    stats.dominant_note, stats.stability
                );
            }
        }
        None => println!("No voiced audio detected."),
    }

    Ok(())
}
