//! The waterfall widget: shared spectrum state, the producer handle and the
//! per-frame renderer.
//!
//! ```no_run
//! use saavy_sdr::{ViewState, WaterfallConfig, WaterfallRenderer};
//!
//! let view = ViewState::new(100e6, 2.4e6)?;
//! let (renderer, writer) = WaterfallRenderer::new(&WaterfallConfig::default(), view, 8192)?;
//! std::thread::spawn(move || loop {
//!     let mut line = writer.acquire();
//!     line.slot().fill(-90.0); // one FFT, in dB
//!     line.commit();
//! });
//! # drop(renderer);
//! # Ok::<(), saavy_sdr::WaterfallError>(())
//! ```

mod draw;
mod overlay;
mod renderer;
mod shared;
mod writer;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use overlay::{PlotGeometry, WaterfallOverlay};
pub use renderer::{FrameContext, WaterfallRenderer};
pub use shared::WaterfallCore;
pub use writer::{LineWriteGuard, SpectrumWriter};

/// Lock, carrying on with the data if the other side panicked mid-update.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
