//! Virtual receivers drawn over the spectrum.
//!
//! A [`Vfo`] is a passband described by three offsets from the tuned center
//! frequency. Which of the three stays put when the bandwidth changes is set
//! by its [`Reference`]. Screen geometry is derived separately by
//! [`Vfo::compute_geometry`] so the frequency model never depends on layout.

mod geometry;
mod set;

pub use geometry::{VfoGeometry, WaterfallGeometry};
pub(crate) use set::keep_vfo_in_band;
pub use set::VfoSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::signal::VfoSpan;
use crate::geom::Rgba;
use crate::render::layout::Layout;
use crate::view::ViewState;

/// Point of the passband held fixed on bandwidth changes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reference {
    Lower,
    #[default]
    Center,
    Upper,
}

impl TryFrom<i32> for Reference {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Reference::Lower),
            1 => Ok(Reference::Center),
            2 => Ok(Reference::Upper),
            other => Err(other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Vfo {
    reference: Reference,
    bandwidth: f64,
    general_offset: f64,
    lower_offset: f64,
    center_offset: f64,
    upper_offset: f64,

    /// Smallest bandwidth a drag may produce.
    pub min_bandwidth: f64,
    /// Largest bandwidth a drag may produce.
    pub max_bandwidth: f64,
    /// Owner controls the bandwidth; dragging the edges is disabled.
    pub bandwidth_locked: bool,
    /// Moves by pointer snap the absolute frequency to multiples of this.
    pub snap_interval: f64,
    pub color: Rgba,

    notch_offset: f64,
    notch_visible: bool,

    redraw_required: bool,
    geometry: Option<VfoGeometry>,
}

impl Vfo {
    pub fn new(offset: f64, bandwidth: f64, reference: Reference) -> Self {
        let mut vfo = Self {
            reference,
            bandwidth: bandwidth.max(0.0),
            general_offset: 0.0,
            lower_offset: 0.0,
            center_offset: 0.0,
            upper_offset: 0.0,
            min_bandwidth: 0.0,
            max_bandwidth: f64::INFINITY,
            bandwidth_locked: false,
            snap_interval: 5_000.0,
            color: Rgba::new(255, 255, 255, 50),
            notch_offset: 0.0,
            notch_visible: false,
            redraw_required: true,
            geometry: None,
        };
        vfo.set_offset(offset);
        vfo
    }

    /// Limit the bandwidth a drag may produce.
    pub fn with_bandwidth_limits(mut self, min: f64, max: f64) -> Self {
        self.min_bandwidth = min;
        self.max_bandwidth = max;
        self
    }

    pub fn with_snap_interval(mut self, interval: f64) -> Self {
        self.snap_interval = interval;
        self
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    pub fn reference(&self) -> Reference {
        self.reference
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn general_offset(&self) -> f64 {
        self.general_offset
    }

    pub fn lower_offset(&self) -> f64 {
        self.lower_offset
    }

    pub fn center_offset(&self) -> f64 {
        self.center_offset
    }

    pub fn upper_offset(&self) -> f64 {
        self.upper_offset
    }

    /// Offset of the point pinned by the reference.
    pub fn reference_offset(&self) -> f64 {
        match self.reference {
            Reference::Lower => self.lower_offset,
            Reference::Center => self.center_offset,
            Reference::Upper => self.upper_offset,
        }
    }

    pub fn span(&self) -> VfoSpan {
        VfoSpan {
            center_offset: self.center_offset,
            bandwidth: self.bandwidth,
        }
    }

    /// Place the reference point at `offset`.
    pub fn set_offset(&mut self, offset: f64) {
        self.general_offset = offset;
        match self.reference {
            Reference::Center => {
                self.center_offset = offset;
                self.lower_offset = offset - self.bandwidth / 2.0;
                self.upper_offset = offset + self.bandwidth / 2.0;
            }
            Reference::Lower => {
                self.lower_offset = offset;
                self.center_offset = offset + self.bandwidth / 2.0;
                self.upper_offset = offset + self.bandwidth;
            }
            Reference::Upper => {
                self.upper_offset = offset;
                self.center_offset = offset - self.bandwidth / 2.0;
                self.lower_offset = offset - self.bandwidth;
            }
        }
        self.redraw_required = true;
    }

    /// Place the passband by its middle, whatever the reference.
    pub fn set_center_offset(&mut self, offset: f64) {
        let general = match self.reference {
            Reference::Center => offset,
            Reference::Lower => offset - self.bandwidth / 2.0,
            Reference::Upper => offset + self.bandwidth / 2.0,
        };
        self.set_offset(general);
    }

    /// Resize the passband around the reference point.
    ///
    /// Negative, non-finite or unchanged values are ignored. Unless the
    /// bandwidth is locked by its owner the value is kept inside
    /// `[min_bandwidth, max_bandwidth]`.
    pub fn set_bandwidth(&mut self, bandwidth: f64) {
        if !(bandwidth >= 0.0) || !bandwidth.is_finite() {
            return;
        }
        let bandwidth = if self.bandwidth_locked || self.min_bandwidth > self.max_bandwidth {
            bandwidth
        } else {
            bandwidth.clamp(self.min_bandwidth, self.max_bandwidth)
        };
        if bandwidth == self.bandwidth {
            return;
        }
        self.bandwidth = bandwidth;
        match self.reference {
            Reference::Center => {
                self.lower_offset = self.center_offset - bandwidth / 2.0;
                self.upper_offset = self.center_offset + bandwidth / 2.0;
            }
            Reference::Lower => {
                self.center_offset = self.lower_offset + bandwidth / 2.0;
                self.upper_offset = self.lower_offset + bandwidth;
            }
            Reference::Upper => {
                self.center_offset = self.upper_offset - bandwidth / 2.0;
                self.lower_offset = self.upper_offset - bandwidth;
            }
        }
        self.redraw_required = true;
    }

    /// Switch the pinned point, keeping `general_offset` as the new anchor.
    pub fn set_reference(&mut self, reference: Reference) {
        if reference == self.reference {
            return;
        }
        self.reference = reference;
        self.set_offset(self.general_offset);
    }

    /// Integer form used by settings front-ends; out-of-range values are
    /// ignored.
    pub fn set_reference_index(&mut self, index: i32) {
        if let Ok(reference) = Reference::try_from(index) {
            self.set_reference(reference);
        }
    }

    /// Notch position, relative to the passband center.
    pub fn notch_offset(&self) -> f64 {
        self.notch_offset
    }

    pub fn set_notch_offset(&mut self, offset: f64) {
        self.notch_offset = offset;
        self.redraw_required = true;
    }

    pub fn notch_visible(&self) -> bool {
        self.notch_visible
    }

    pub fn set_notch_visible(&mut self, visible: bool) {
        self.notch_visible = visible;
        self.redraw_required = true;
    }

    /// Force geometry to be recomputed on the next frame, e.g. after the view
    /// or layout changed under this VFO.
    pub fn mark_dirty(&mut self) {
        self.redraw_required = true;
    }

    /// Last geometry computed by [`Vfo::update_geometry`].
    pub fn geometry(&self) -> Option<&VfoGeometry> {
        self.geometry.as_ref()
    }

    /// Screen geometry for `view` laid out in `layout`. `None` when the VFO
    /// cannot be drawn (zero bandwidth or a degenerate view).
    pub fn compute_geometry(&self, view: &ViewState, layout: &Layout) -> Option<VfoGeometry> {
        geometry::compute(self, view, layout)
    }

    /// Refresh the cached geometry if it is stale.
    pub fn update_geometry(&mut self, view: &ViewState, layout: &Layout) {
        if !self.redraw_required {
            return;
        }
        self.geometry = self.compute_geometry(view, layout);
        self.redraw_required = false;
    }
}
