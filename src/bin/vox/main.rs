//! vox - terminal vocal tuner and range monitor
//!
//! Run with: cargo run --bin vox

mod app;
mod ui;

use app::Vox;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    Vox::new()
        .frame_size(2048)
        .freq_range(80.0, 800.0)
        .threshold(0.1)
        .run()
}
