use tracing::debug;

use crate::dsp::decimate::{decimate, DecimationMode, BELOW_RANGE_DB};
use crate::error::{Result, WaterfallError};

/// Ring of raw spectrum lines, newest first.
///
/// Storage is one contiguous `depth * line_width` arena. The write cursor
/// walks backwards so that logical row 0 is always the newest line and row
/// `k` lives at `(current_line + k) % depth`. Committing never moves memory;
/// only [`SpectrumHistory::resize`] reallocates.
#[derive(Debug, Clone)]
pub struct SpectrumHistory {
    lines: Vec<f32>,
    line_width: usize,
    depth: usize,
    current_line: usize,
    filled_lines: usize,
}

impl SpectrumHistory {
    pub fn new(line_width: usize, depth: usize) -> Result<Self> {
        if line_width == 0 || depth == 0 {
            return Err(WaterfallError::InvalidDimensions {
                width: line_width,
                height: depth,
            });
        }
        Ok(Self {
            lines: vec![BELOW_RANGE_DB; line_width * depth],
            line_width,
            depth,
            current_line: 0,
            filled_lines: 0,
        })
    }

    pub fn line_width(&self) -> usize {
        self.line_width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of valid rows, `<= depth`.
    pub fn filled(&self) -> usize {
        self.filled_lines
    }

    pub fn is_empty(&self) -> bool {
        self.filled_lines == 0
    }

    fn next_index(&self) -> usize {
        (self.current_line + self.depth - 1) % self.depth
    }

    fn slot(&self, index: usize) -> std::ops::Range<usize> {
        let start = index * self.line_width;
        start..start + self.line_width
    }

    /// Slot the producer fills next. Does not advance the cursor, so a line
    /// that is never committed is simply overwritten next time.
    pub fn write_slot(&mut self) -> &mut [f32] {
        let range = self.slot(self.next_index());
        &mut self.lines[range]
    }

    /// Publish the slot returned by [`SpectrumHistory::write_slot`] as row 0.
    pub fn commit(&mut self) {
        self.current_line = self.next_index();
        self.filled_lines = (self.filled_lines + 1).min(self.depth);
    }

    /// Logical row `k`, 0 being the newest. `None` past the filled rows.
    pub fn row(&self, k: usize) -> Option<&[f32]> {
        if k >= self.filled_lines {
            return None;
        }
        let range = self.slot((self.current_line + k) % self.depth);
        Some(&self.lines[range])
    }

    pub fn latest(&self) -> Option<&[f32]> {
        self.row(0)
    }

    /// Reallocate for a new line width and/or depth.
    ///
    /// The newest `min(filled, depth)` rows survive, re-laid out from row 0.
    /// A line width change resamples each kept row onto the new bin count.
    /// Zero dimensions are rejected and leave the ring untouched.
    pub fn resize(&mut self, line_width: usize, depth: usize) -> Result<()> {
        if line_width == 0 || depth == 0 {
            return Err(WaterfallError::InvalidDimensions {
                width: line_width,
                height: depth,
            });
        }
        if line_width == self.line_width && depth == self.depth {
            return Ok(());
        }

        let keep = self.filled_lines.min(depth);
        let mut lines = vec![BELOW_RANGE_DB; line_width * depth];
        for (k, dst) in lines.chunks_exact_mut(line_width).take(keep).enumerate() {
            if let Some(src) = self.row(k) {
                if src.len() == line_width {
                    dst.copy_from_slice(src);
                } else {
                    decimate(src, 0, src.len(), dst, DecimationMode::Max);
                }
            }
        }

        debug!(
            from_width = self.line_width,
            from_depth = self.depth,
            line_width,
            depth,
            kept = keep,
            "resized spectrum history"
        );

        self.lines = lines;
        self.line_width = line_width;
        self.depth = depth;
        self.current_line = 0;
        self.filled_lines = keep;
        Ok(())
    }

    /// Drop every row, keeping the allocation.
    pub fn clear(&mut self) {
        self.lines.fill(BELOW_RANGE_DB);
        self.current_line = 0;
        self.filled_lines = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push(history: &mut SpectrumHistory, value: f32) {
        history.write_slot().fill(value);
        history.commit();
    }

    #[test]
    fn rejects_zero_dimensions() {
        assert!(SpectrumHistory::new(0, 4).is_err());
        let mut history = SpectrumHistory::new(8, 4).unwrap();
        assert!(history.resize(8, 0).is_err());
        assert_eq!(history.depth(), 4);
    }

    #[test]
    fn cold_start_has_no_rows() {
        let history = SpectrumHistory::new(8, 4).unwrap();
        assert!(history.latest().is_none());
        assert!(history.is_empty());
    }

    #[test]
    fn uncommitted_write_is_invisible() {
        let mut history = SpectrumHistory::new(4, 4).unwrap();
        push(&mut history, 1.0);
        history.write_slot().fill(99.0);
        assert_eq!(history.latest().unwrap()[0], 1.0);
        assert_eq!(history.filled(), 1);
    }

    #[test]
    fn ring_returns_last_lines_newest_first() {
        let depth = 5;
        let mut history = SpectrumHistory::new(3, depth).unwrap();
        for n in 0..13 {
            push(&mut history, n as f32);
        }
        assert_eq!(history.filled(), depth);
        let rows: Vec<f32> = (0..depth).map(|k| history.row(k).unwrap()[0]).collect();
        assert_eq!(rows, vec![12.0, 11.0, 10.0, 9.0, 8.0]);
        assert!(history.row(depth).is_none());
    }

    #[test]
    fn shrinking_depth_keeps_newest_rows() {
        let mut history = SpectrumHistory::new(2, 6).unwrap();
        for n in 0..6 {
            push(&mut history, n as f32);
        }
        history.resize(2, 3).unwrap();
        assert_eq!(history.filled(), 3);
        let rows: Vec<f32> = (0..3).map(|k| history.row(k).unwrap()[0]).collect();
        assert_eq!(rows, vec![5.0, 4.0, 3.0]);

        push(&mut history, 6.0);
        assert_eq!(history.row(0).unwrap()[0], 6.0);
        assert_eq!(history.row(2).unwrap()[0], 4.0);
    }

    #[test]
    fn growing_depth_keeps_fill_count() {
        let mut history = SpectrumHistory::new(2, 3).unwrap();
        for n in 0..5 {
            push(&mut history, n as f32);
        }
        history.resize(2, 10).unwrap();
        assert_eq!(history.filled(), 3);
        assert_eq!(history.row(0).unwrap()[0], 4.0);
        assert_eq!(history.row(2).unwrap()[0], 2.0);
    }

    #[test]
    fn width_change_resamples_rows() {
        let mut history = SpectrumHistory::new(8, 2).unwrap();
        history.write_slot().copy_from_slice(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        history.commit();
        history.resize(4, 2).unwrap();
        assert_eq!(history.latest().unwrap(), &[1.0, 3.0, 5.0, 7.0]);
    }
}
