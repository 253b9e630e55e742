//! saavy-sdr - Terminal spectrum and waterfall display
//!
//! Run with: cargo run
//! Logs go to the file named by SAAVY_SDR_LOG (filter via RUST_LOG).

mod app;
mod source;
mod ui;

use app::SaavySdr;
use saavy_sdr::{Reference, Rgba, Vfo};
use source::Tone;
use std::{fs::File, sync::Mutex};
use tracing_subscriber::EnvFilter;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_logging()?;

    SaavySdr::new()
        .center_frequency(100e6)
        .sample_rate(2.4e6)
        .fft_size(4096)
        // Broadcast-style carriers plus a fading one near the edge
        .tone(Tone::new(99.5e6, 0.3))
        .tone(Tone::new(100.1e6, 0.05))
        .tone(Tone::new(100.3e6, 0.2).fading(0.2))
        .tone(Tone::new(100.9e6, 0.01))
        .vfo(
            "Radio",
            Vfo::new(100e3, 150e3, Reference::Center)
                .with_bandwidth_limits(10e3, 250e3)
                .with_snap_interval(25e3),
        )
        .vfo(
            "Aux",
            Vfo::new(-500e3, 12.5e3, Reference::Lower)
                .with_snap_interval(12.5e3)
                .with_color(Rgba::new(0, 255, 128, 50)),
        )
        .bookmark("Pop", 100.1e6)
        .bookmark("Fade", 100.3e6)
        .band("Low", "broadcast", 99.0e6, 99.9e6, Rgba::new(0, 128, 255, 255))
        .band("High", "utility", 100.6e6, 101.2e6, Rgba::new(255, 128, 0, 255))
        .run()
}

/// Logs would corrupt the terminal UI, so they only go to a file when asked.
fn init_logging() -> color_eyre::Result<()> {
    let Some(path) = std::env::var_os("SAAVY_SDR_LOG") else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
