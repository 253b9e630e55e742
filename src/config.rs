//! Display options.
//!
//! The host application owns persistence; with the `serde` feature enabled
//! the config can be stored alongside its other settings.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bandplan::BandPlanPosition;
use crate::dsp::DecimationMode;
use crate::error::{Result, WaterfallError};
use crate::palette::{ColorPoint, DEFAULT_COLOR_MAP};
use crate::render::{LayoutMetrics, Theme};
use crate::view::check_range;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct WaterfallConfig {
    /// Height of plot plus frequency scale, i.e. the split position (px).
    pub fft_area_height: f32,
    pub waterfall_visible: bool,
    /// Rows of raw history kept. `None` follows the waterfall height.
    pub history_depth: Option<usize>,
    pub hold_enabled: bool,
    /// Hold trace decay per committed line, dB.
    pub hold_decay: f32,
    /// Vertical plot range, dB.
    pub fft_range: (f32, f32),
    /// Color-mapping range, dB.
    pub waterfall_range: (f32, f32),
    pub palette: Vec<ColorPoint>,
    pub band_plan_visible: bool,
    pub band_plan_position: BandPlanPosition,
    /// A single click moves the selected VFO; otherwise it only follows a
    /// drag.
    pub vfo_move_single_click: bool,
    /// Panning stops at the band edge instead of retuning.
    pub center_frequency_locked: bool,
    pub decimation: DecimationMode,
    /// Recompute the whole waterfall image on view/range changes.
    pub full_update: bool,
    pub tooltips: bool,
    pub ui_scale: f32,
    pub metrics: LayoutMetrics,
    pub theme: Theme,
}

impl Default for WaterfallConfig {
    fn default() -> Self {
        Self {
            fft_area_height: 300.0,
            waterfall_visible: true,
            history_depth: None,
            hold_enabled: false,
            hold_decay: 0.3,
            fft_range: (-70.0, 0.0),
            waterfall_range: (-70.0, 0.0),
            palette: DEFAULT_COLOR_MAP.to_vec(),
            band_plan_visible: false,
            band_plan_position: BandPlanPosition::Bottom,
            vfo_move_single_click: false,
            center_frequency_locked: false,
            decimation: DecimationMode::Max,
            full_update: true,
            tooltips: true,
            ui_scale: 1.0,
            metrics: LayoutMetrics::standard(),
            theme: Theme::default(),
        }
    }
}

impl WaterfallConfig {
    /// Check everything a renderer would otherwise reject piecemeal.
    pub fn validate(&self) -> Result<()> {
        if self.palette.is_empty() {
            return Err(WaterfallError::EmptyPalette);
        }
        check_range(self.fft_range.0, self.fft_range.1)?;
        check_range(self.waterfall_range.0, self.waterfall_range.1)?;
        if !(self.ui_scale > 0.0) || !self.ui_scale.is_finite() {
            return Err(WaterfallError::InvalidScale(self.ui_scale));
        }
        if self.history_depth == Some(0) {
            return Err(WaterfallError::InvalidDimensions {
                width: 0,
                height: 0,
            });
        }
        Ok(())
    }

    /// Layout metrics with the UI scale applied.
    pub fn scaled_metrics(&self) -> LayoutMetrics {
        self.metrics.scaled(self.ui_scale)
    }
}
