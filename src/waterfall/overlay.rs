//! Host extensions drawn over the plot, e.g. bookmark labels.

use crate::geom::Rect;
use crate::render::{InputState, Layout, Surface};
use crate::view::ViewState;

/// Where the data lands on the surface this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotGeometry {
    /// Spectrum plot, including its top border row.
    pub plot: Rect,
    pub freq_scale: Rect,
    pub waterfall: Option<Rect>,
    /// Absolute frequency at the left edge of the data span, Hz.
    pub lower_freq: f64,
    /// Absolute frequency at the right edge of the data span, Hz.
    pub upper_freq: f64,
    pub hz_per_pixel: f64,
}

impl PlotGeometry {
    pub(crate) fn new(view: &ViewState, layout: &Layout) -> Self {
        Self {
            plot: layout.fft_area,
            freq_scale: layout.freq_area,
            waterfall: layout.waterfall_area,
            lower_freq: view.lower_freq(),
            upper_freq: view.upper_freq(),
            hz_per_pixel: view.hz_per_pixel(layout.data_width as f64),
        }
    }

    /// Surface x of an absolute frequency. Not clamped to the plot.
    pub fn freq_to_x(&self, freq: f64) -> f32 {
        self.plot.min.x + ((freq - self.lower_freq) / self.hz_per_pixel) as f32
    }

    /// Absolute frequency under surface x.
    pub fn x_to_freq(&self, x: f32) -> f64 {
        self.lower_freq + (x - self.plot.min.x) as f64 * self.hz_per_pixel
    }
}

/// Extension the host passes to [`super::FrameContext::overlay`].
///
/// Both hooks run once per frame: `input` before the built-in pointer
/// handling, `draw` after the VFOs and band plan.
pub trait WaterfallOverlay {
    fn draw(&mut self, _surface: &mut dyn Surface, _plot: &PlotGeometry) {}

    /// Return `true` to consume this frame's input. The built-in handling is
    /// then skipped entirely: no drag starts or continues, and neither the
    /// cursor nor the hover tooltip is touched.
    fn input(&mut self, _input: &InputState, _plot: &PlotGeometry) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::LayoutMetrics;

    #[test]
    fn frequency_maps_onto_data_columns() {
        let mut view = ViewState::new(100_000_000.0, 1_000_000.0).unwrap();
        view.set_view_bandwidth(200_000.0).unwrap();
        let widget = Rect::from_xywh(0.0, 0.0, 860.0, 700.0);
        let layout = Layout::compute(widget, 300.0, true, LayoutMetrics::standard()).unwrap();
        let plot = PlotGeometry::new(&view, &layout);

        assert_eq!(plot.lower_freq, 99_900_000.0);
        assert_eq!(plot.upper_freq, 100_100_000.0);
        assert_eq!(plot.hz_per_pixel, 250.0);
        assert_eq!(plot.freq_to_x(100_000_000.0), 450.0);
        assert_eq!(plot.x_to_freq(850.0), 100_100_000.0);
    }
}
