//! State shared by the producer and the UI thread.

use tracing::{debug, warn};

use crate::config::WaterfallConfig;
use crate::dsp::decimate::{apply_hold, smooth};
use crate::dsp::{
    decimate, measure_signal, DecimationMode, SignalInfo, SpectrumHistory, VfoSpan,
    BELOW_RANGE_DB,
};
use crate::error::{Result, WaterfallError};
use crate::palette::{ColorPoint, Palette};
use crate::render::WaterfallFrameBuffer;
use crate::view::ViewState;

/// Raw history plus everything derived from it for display.
///
/// Owned behind one mutex: the producer holds it while filling and
/// committing a line, the UI thread for a whole render pass.
pub struct WaterfallCore {
    pub(super) history: SpectrumHistory,
    pub(super) live: Vec<f32>,
    pub(super) hold: Vec<f32>,
    row_scratch: Vec<f32>,
    pub(super) palette: Palette,
    pub(super) framebuffer: WaterfallFrameBuffer,
    /// The frame buffer changed since it was last copied to the texture.
    pub(super) fb_dirty: bool,
    pub(super) view: ViewState,
    display_width: usize,
    waterfall_height: usize,
    pub(super) waterfall_visible: bool,
    history_depth: Option<usize>,
    pub(super) hold_enabled: bool,
    hold_decay: f32,
    decimation: DecimationMode,
    full_update: bool,
    signal_span: Option<VfoSpan>,
    signal: Option<SignalInfo>,
}

impl WaterfallCore {
    pub fn new(
        config: &WaterfallConfig,
        mut view: ViewState,
        raw_line_width: usize,
    ) -> Result<Self> {
        config.validate()?;
        let palette = Palette::new(&config.palette)?;
        view.set_fft_range(config.fft_range.0, config.fft_range.1)?;
        view.set_waterfall_range(config.waterfall_range.0, config.waterfall_range.1)?;
        let history = SpectrumHistory::new(raw_line_width, config.history_depth.unwrap_or(1))?;

        Ok(Self {
            history,
            live: Vec::new(),
            hold: Vec::new(),
            row_scratch: Vec::new(),
            palette,
            framebuffer: WaterfallFrameBuffer::default(),
            fb_dirty: false,
            view,
            display_width: 0,
            waterfall_height: 0,
            waterfall_visible: config.waterfall_visible,
            history_depth: config.history_depth,
            hold_enabled: config.hold_enabled,
            hold_decay: config.hold_decay,
            decimation: config.decimation,
            full_update: config.full_update,
            signal_span: None,
            signal: None,
        })
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn history(&self) -> &SpectrumHistory {
        &self.history
    }

    /// Newest line at display resolution.
    pub fn live_line(&self) -> &[f32] {
        &self.live
    }

    pub fn hold_line(&self) -> &[f32] {
        &self.hold
    }

    pub fn framebuffer(&self) -> &WaterfallFrameBuffer {
        &self.framebuffer
    }

    pub fn display_width(&self) -> usize {
        self.display_width
    }

    pub fn waterfall_visible(&self) -> bool {
        self.waterfall_visible
    }

    /// Strength and SNR under the measured passband, from the newest line.
    pub fn signal(&self) -> Option<SignalInfo> {
        self.signal
    }

    fn target_depth(&self) -> usize {
        let rows = if self.waterfall_visible {
            self.waterfall_height
        } else {
            0
        };
        self.history_depth.unwrap_or(rows).max(1)
    }

    /// Slot the producer fills before [`WaterfallCore::commit_line`].
    pub(super) fn write_slot(&mut self) -> &mut [f32] {
        self.history.write_slot()
    }

    /// Publish the filled slot: zoom it into the live trace, advance the
    /// hold trace and scroll one color-mapped row into the frame buffer.
    pub(super) fn commit_line(&mut self) {
        if self.decimation == DecimationMode::Fast {
            smooth(self.history.write_slot());
        }
        self.history.commit();

        self.decimate_latest();
        apply_hold(&self.live, &mut self.hold, self.hold_decay);

        if self.waterfall_visible && !self.framebuffer.is_empty() {
            let (min, max) = self.view.waterfall_range();
            let row = self.framebuffer.push_row();
            self.palette.map_line(&self.live, min, max, row);
            self.fb_dirty = true;
        }
        self.measure();
    }

    fn decimate_latest(&mut self) {
        match self.history.latest() {
            Some(line) => {
                let (start, count) = self.view.bin_range(line.len());
                decimate(line, start, count, &mut self.live, self.decimation);
            }
            None => self.live.fill(BELOW_RANGE_DB),
        }
    }

    fn measure(&mut self) {
        let whole = self.view.whole_bandwidth();
        self.signal = match (self.signal_span, self.history.latest()) {
            (Some(span), Some(line)) => measure_signal(line, span, whole),
            _ => None,
        };
    }

    /// Passband whose signal level is tracked on every commit.
    pub fn set_signal_span(&mut self, span: Option<VfoSpan>) {
        if span == self.signal_span {
            return;
        }
        self.signal_span = span;
        self.measure();
    }

    /// Reallocate the display buffers for a new layout.
    ///
    /// History keeps its newest rows; the traces restart blank and the
    /// waterfall image is rebuilt from history.
    pub fn resize(&mut self, display_width: usize, waterfall_height: usize) -> Result<()> {
        if display_width == 0 {
            return Err(WaterfallError::InvalidDimensions {
                width: display_width,
                height: waterfall_height,
            });
        }
        self.waterfall_height = waterfall_height;
        let depth = self.target_depth();
        self.history.resize(self.history.line_width(), depth)?;

        self.display_width = display_width;
        self.live = vec![BELOW_RANGE_DB; display_width];
        self.hold = vec![BELOW_RANGE_DB; display_width];
        self.row_scratch = vec![BELOW_RANGE_DB; display_width];
        self.framebuffer = if self.waterfall_visible {
            WaterfallFrameBuffer::new(display_width, waterfall_height)
        } else {
            WaterfallFrameBuffer::default()
        };
        debug!(display_width, waterfall_height, depth, "display buffers resized");
        self.rebuild_framebuffer();
        Ok(())
    }

    /// Recompute every waterfall row from history at the current zoom and
    /// color range.
    pub fn rebuild_framebuffer(&mut self) {
        if !self.waterfall_visible || self.framebuffer.is_empty() {
            return;
        }
        self.framebuffer.clear();
        let (min, max) = self.view.waterfall_range();
        let rows = self.history.filled().min(self.framebuffer.height());
        for k in 0..rows {
            let (Some(src), Some(dst)) = (self.history.row(k), self.framebuffer.row_mut(k)) else {
                break;
            };
            let (start, count) = self.view.bin_range(src.len());
            decimate(src, start, count, &mut self.row_scratch, self.decimation);
            self.palette.map_line(&self.row_scratch, min, max, dst);
        }
        self.fb_dirty = true;
    }

    /// Re-derive the traces (and with full updates the image) after a pan
    /// or zoom.
    pub fn on_view_changed(&mut self) {
        self.decimate_latest();
        self.hold.copy_from_slice(&self.live);
        if self.full_update {
            self.rebuild_framebuffer();
        }
    }

    /// Swap the palette. An empty list is rejected and the old one kept.
    pub fn set_palette(&mut self, points: &[ColorPoint]) -> Result<()> {
        self.palette.set_palette(points)?;
        self.rebuild_framebuffer();
        Ok(())
    }

    pub fn set_waterfall_range(&mut self, min: f32, max: f32) -> Result<()> {
        if self.view.set_waterfall_range(min, max)? && self.full_update {
            self.rebuild_framebuffer();
        }
        Ok(())
    }

    pub fn set_fft_range(&mut self, min: f32, max: f32) -> Result<()> {
        self.view.set_fft_range(min, max)
    }

    /// Fit the plot range to the live trace with 5 dB of headroom on each
    /// side. Returns `false` while there is nothing to fit.
    pub fn auto_range(&mut self) -> bool {
        if self.history.is_empty() {
            return false;
        }
        let (min, max) = self
            .live
            .iter()
            .filter(|v| v.is_finite())
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        if !min.is_finite() || !max.is_finite() {
            return false;
        }
        match self.view.set_fft_range(min - 5.0, max + 5.0) {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, "auto range rejected");
                false
            }
        }
    }

    pub fn set_hold(&mut self, enabled: bool, decay: f32) {
        if enabled && !self.hold_enabled {
            self.hold.copy_from_slice(&self.live);
        }
        self.hold_enabled = enabled;
        self.hold_decay = decay.max(0.0);
    }

    pub fn set_decimation(&mut self, mode: DecimationMode) {
        if mode != self.decimation {
            self.decimation = mode;
            self.on_view_changed();
        }
    }

    pub fn set_full_update(&mut self, full_update: bool) {
        self.full_update = full_update;
    }

    /// Show or hide the waterfall. Showing it starts from an empty history.
    /// The caller re-lays out and calls [`WaterfallCore::resize`].
    pub fn set_waterfall_visible(&mut self, visible: bool) {
        if visible == self.waterfall_visible {
            return;
        }
        self.waterfall_visible = visible;
        if visible {
            self.history.clear();
        }
    }

    /// Change the number of raw bins per line, reflowing the kept history.
    pub fn set_raw_line_width(&mut self, line_width: usize) -> Result<()> {
        let depth = self.history.depth();
        self.history.resize(line_width, depth)?;
        self.decimate_latest();
        self.measure();
        Ok(())
    }
}
