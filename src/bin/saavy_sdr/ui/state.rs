//! Messages between the UI thread and the receiver thread.
//!
//! Everything here is `Copy` so the ring buffer never allocates.

/// Commands sent from the UI thread to the receiver thread
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlMessage {
    /// New center frequency in Hz
    Tune(f64),
    /// Toggle line production; the waterfall freezes while paused
    TogglePause,
    /// Stop the receiver thread
    Quit,
}
