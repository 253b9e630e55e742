use std::sync::{Arc, Mutex, MutexGuard};

use crate::dsp::BELOW_RANGE_DB;
use crate::error::Result;

use super::{lock, WaterfallCore};

/// Producer-side handle: the DSP thread pushes one spectrum line per FFT.
///
/// Lines are power in dB over the whole acquisition bandwidth, lowest
/// frequency first, DC at bin `len / 2`.
pub struct SpectrumWriter {
    core: Arc<Mutex<WaterfallCore>>,
}

impl SpectrumWriter {
    pub(super) fn new(core: Arc<Mutex<WaterfallCore>>) -> Self {
        Self { core }
    }

    /// Bins per line.
    pub fn line_width(&self) -> usize {
        lock(&self.core).history.line_width()
    }

    /// Change the number of bins per line (FFT size change).
    pub fn set_line_width(&self, line_width: usize) -> Result<()> {
        lock(&self.core).set_raw_line_width(line_width)
    }

    /// Lock the shared state and hand out the next history slot.
    ///
    /// The UI thread cannot render until the guard is committed or dropped,
    /// so fill the slot from a finished line rather than computing into it.
    /// Dropping without [`LineWriteGuard::commit`] discards the line.
    pub fn acquire(&self) -> LineWriteGuard<'_> {
        LineWriteGuard {
            core: lock(&self.core),
        }
    }

    /// Copy `line` into the next slot and commit it. Short lines are padded
    /// with the blank level, long ones truncated.
    pub fn push_line(&self, line: &[f32]) {
        let mut guard = self.acquire();
        let slot = guard.slot();
        let n = slot.len().min(line.len());
        slot[..n].copy_from_slice(&line[..n]);
        slot[n..].fill(BELOW_RANGE_DB);
        guard.commit();
    }
}

/// Exclusive access to the slot being written.
pub struct LineWriteGuard<'a> {
    core: MutexGuard<'a, WaterfallCore>,
}

impl LineWriteGuard<'_> {
    pub fn slot(&mut self) -> &mut [f32] {
        self.core.write_slot()
    }

    /// Publish the line. The new waterfall row lands in the frame buffer,
    /// which the UI thread copies out on its next frame.
    pub fn commit(mut self) {
        self.core.commit_line();
    }
}
