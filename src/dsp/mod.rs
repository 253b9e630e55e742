//! Spectrum line processing.
//!
//! Everything here is plain slice math with no locking: the waterfall core
//! calls into these from inside its own critical section, once per committed
//! line on the producer side and once per frame on the UI side.

/// Bin-range zoom onto a fixed display width.
pub mod decimate;
/// Circular history of raw spectrum lines.
pub mod history;
/// Peak strength and SNR under a VFO passband.
pub mod signal;

pub use decimate::{decimate, DecimationMode, BELOW_RANGE_DB};
pub use history::SpectrumHistory;
pub use signal::{measure_signal, SignalInfo, VfoSpan};
