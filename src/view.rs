//! Frequency/level window shown by the display.
//!
//! All frequencies are Hz. Offsets are relative to `center_freq`; the visible
//! window is `[center + offset - view_bw/2, center + offset + view_bw/2]` and
//! must stay inside `[center - whole_bw/2, center + whole_bw/2]`.

use tracing::trace;

use crate::error::{Result, WaterfallError};

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    center_freq: f64,
    whole_bandwidth: f64,
    view_bandwidth: f64,
    view_offset: f64,
    fft_min: f32,
    fft_max: f32,
    waterfall_min: f32,
    waterfall_max: f32,
}

/// Result of a pan request.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanOutcome {
    /// Portion of the pan that was transferred to the center frequency.
    pub center_delta: f64,
}

impl PanOutcome {
    pub fn center_moved(&self) -> bool {
        self.center_delta != 0.0
    }
}

impl ViewState {
    /// Fully zoomed-out view of `whole_bandwidth` Hz around `center_freq`.
    pub fn new(center_freq: f64, whole_bandwidth: f64) -> Result<Self> {
        if !(whole_bandwidth > 0.0) || !whole_bandwidth.is_finite() {
            return Err(WaterfallError::InvalidBandwidth(whole_bandwidth));
        }
        Ok(Self {
            center_freq,
            whole_bandwidth,
            view_bandwidth: whole_bandwidth,
            view_offset: 0.0,
            fft_min: -70.0,
            fft_max: 0.0,
            waterfall_min: -70.0,
            waterfall_max: 0.0,
        })
    }

    pub fn center_freq(&self) -> f64 {
        self.center_freq
    }

    pub fn set_center_freq(&mut self, freq: f64) {
        self.center_freq = freq;
    }

    pub fn whole_bandwidth(&self) -> f64 {
        self.whole_bandwidth
    }

    /// Change the acquisition bandwidth, keeping the current zoom ratio.
    pub fn set_whole_bandwidth(&mut self, bandwidth: f64) -> Result<()> {
        if !(bandwidth > 0.0) || !bandwidth.is_finite() {
            return Err(WaterfallError::InvalidBandwidth(bandwidth));
        }
        let ratio = self.view_bandwidth / self.whole_bandwidth;
        self.whole_bandwidth = bandwidth;
        // Force the re-clamp even if the product happens to be unchanged.
        self.view_bandwidth = f64::NAN;
        self.set_view_bandwidth(bandwidth * ratio)?;
        Ok(())
    }

    pub fn view_bandwidth(&self) -> f64 {
        self.view_bandwidth
    }

    /// Zoom. The span is capped at the whole bandwidth and the offset is
    /// pulled in so the window stays inside the band. Returns whether
    /// anything changed.
    pub fn set_view_bandwidth(&mut self, bandwidth: f64) -> Result<bool> {
        if !(bandwidth > 0.0) || !bandwidth.is_finite() {
            return Err(WaterfallError::InvalidBandwidth(bandwidth));
        }
        let bandwidth = bandwidth.min(self.whole_bandwidth);
        if bandwidth == self.view_bandwidth {
            return Ok(false);
        }
        let half_whole = self.whole_bandwidth / 2.0;
        if self.view_offset.abs() + bandwidth / 2.0 > half_whole {
            self.view_offset = if self.view_offset < 0.0 {
                bandwidth / 2.0 - half_whole
            } else {
                half_whole - bandwidth / 2.0
            };
        }
        self.view_bandwidth = bandwidth;
        Ok(true)
    }

    pub fn view_offset(&self) -> f64 {
        self.view_offset
    }

    /// Move the view center, clamped inside the band. Returns whether the
    /// offset changed.
    pub fn set_view_offset(&mut self, offset: f64) -> bool {
        if offset.is_nan() {
            return false;
        }
        let limit = self.offset_limit();
        let offset = offset.clamp(-limit, limit);
        if offset == self.view_offset {
            return false;
        }
        self.view_offset = offset;
        true
    }

    /// Pan by `delta` Hz. Whatever would push the window past the band edge
    /// retunes the center frequency instead, unless `center_locked`, in which
    /// case the window just stops at the edge.
    pub fn pan(&mut self, delta: f64, center_locked: bool) -> PanOutcome {
        if !delta.is_finite() {
            return PanOutcome::default();
        }
        let limit = self.offset_limit();
        let wanted = self.view_offset + delta;
        let clamped = wanted.clamp(-limit, limit);
        self.view_offset = clamped;

        let excess = wanted - clamped;
        if excess == 0.0 || center_locked {
            return PanOutcome::default();
        }
        self.center_freq += excess;
        trace!(excess, center = self.center_freq, "pan spilled into center frequency");
        PanOutcome {
            center_delta: excess,
        }
    }

    /// Largest `|view_offset|` that keeps the window inside the band.
    fn offset_limit(&self) -> f64 {
        ((self.whole_bandwidth - self.view_bandwidth) / 2.0).max(0.0)
    }

    pub fn lower_freq(&self) -> f64 {
        self.center_freq + self.view_offset - self.view_bandwidth / 2.0
    }

    pub fn upper_freq(&self) -> f64 {
        self.center_freq + self.view_offset + self.view_bandwidth / 2.0
    }

    pub fn fft_range(&self) -> (f32, f32) {
        (self.fft_min, self.fft_max)
    }

    /// Vertical plot range in dB. `min` must be below `max`.
    pub fn set_fft_range(&mut self, min: f32, max: f32) -> Result<()> {
        check_range(min, max)?;
        self.fft_min = min;
        self.fft_max = max;
        Ok(())
    }

    pub fn waterfall_range(&self) -> (f32, f32) {
        (self.waterfall_min, self.waterfall_max)
    }

    /// Color-mapping range in dB. Returns whether it changed.
    pub fn set_waterfall_range(&mut self, min: f32, max: f32) -> Result<bool> {
        check_range(min, max)?;
        let changed = min != self.waterfall_min || max != self.waterfall_max;
        self.waterfall_min = min;
        self.waterfall_max = max;
        Ok(changed)
    }

    /// First raw bin and bin count covered by the view on a line of
    /// `line_width` bins spanning the whole bandwidth.
    pub fn bin_range(&self, line_width: usize) -> (isize, usize) {
        let ratio = self.view_bandwidth / self.whole_bandwidth;
        let count = (ratio * line_width as f64) as usize;
        let offset_ratio = self.view_offset / (self.whole_bandwidth / 2.0);
        let start = (line_width as f64 / 2.0) * (offset_ratio + 1.0) - (count / 2) as f64;
        (start as isize, count.max(1))
    }

    /// Pixel column (relative to the data area) of an offset from center.
    pub fn offset_to_x(&self, offset: f64, data_width: f64) -> f64 {
        ((offset - self.view_offset) / (self.view_bandwidth / 2.0) + 1.0) * (data_width / 2.0)
    }

    /// Offset from center under pixel column `x` of the data area.
    pub fn x_to_offset(&self, x: f64, data_width: f64) -> f64 {
        (x / (data_width / 2.0) - 1.0) * (self.view_bandwidth / 2.0) + self.view_offset
    }

    /// Absolute frequency under pixel column `x` of the data area.
    pub fn x_to_freq(&self, x: f64, data_width: f64) -> f64 {
        self.center_freq + self.x_to_offset(x, data_width)
    }

    /// Hz per pixel at the current zoom.
    pub fn hz_per_pixel(&self, data_width: f64) -> f64 {
        self.view_bandwidth / data_width
    }
}

/// A dB range must be finite and strictly increasing.
pub(crate) fn check_range(min: f32, max: f32) -> Result<()> {
    if !min.is_finite() || !max.is_finite() || min >= max {
        return Err(WaterfallError::InvalidRange { min, max });
    }
    Ok(())
}
