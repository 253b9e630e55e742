use crate::geom::{Rect, Vec2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fixed pixel sizes of the widget chrome, before UI scaling.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    /// Room left of the plot for dB labels.
    pub left_margin: f32,
    pub right_margin: f32,
    pub top_margin: f32,
    /// Height of the frequency scale strip under the plot.
    pub freq_scale_height: f32,
    /// Smallest widget that gets drawn at all.
    pub min_widget: Vec2,
    /// Lowest position the plot/waterfall split can be dragged to.
    pub min_fft_area_height: f32,
    /// Space kept below the split for the waterfall.
    pub bottom_reserve: f32,
    /// Half height of the split-drag hot zone.
    pub split_hot_zone: f32,
    /// Half width of the bandwidth resize grips.
    pub grip_half_width: f32,
    pub notch_half_width: f32,
    /// Pointer travel before a held button counts as a drag.
    pub drag_threshold: f32,
}

impl LayoutMetrics {
    /// Sizes for a pixel-based GUI surface.
    pub const fn standard() -> Self {
        Self {
            left_margin: 50.0,
            right_margin: 10.0,
            top_margin: 10.0,
            freq_scale_height: 40.0,
            min_widget: Vec2::new(100.0, 100.0),
            min_fft_area_height: 150.0,
            bottom_reserve: 50.0,
            split_hot_zone: 2.0,
            grip_half_width: 2.0,
            notch_half_width: 2.0,
            drag_threshold: 6.0,
        }
    }

    /// Sizes for a character-cell surface where one cell is one pixel.
    pub const fn compact() -> Self {
        Self {
            left_margin: 5.0,
            right_margin: 1.0,
            top_margin: 1.0,
            freq_scale_height: 2.0,
            min_widget: Vec2::new(20.0, 8.0),
            min_fft_area_height: 6.0,
            bottom_reserve: 3.0,
            split_hot_zone: 0.5,
            grip_half_width: 1.0,
            notch_half_width: 0.5,
            drag_threshold: 0.5,
        }
    }

    /// Every size multiplied by `scale`.
    pub fn scaled(&self, scale: f32) -> Self {
        Self {
            left_margin: self.left_margin * scale,
            right_margin: self.right_margin * scale,
            top_margin: self.top_margin * scale,
            freq_scale_height: self.freq_scale_height * scale,
            min_widget: Vec2::new(self.min_widget.x * scale, self.min_widget.y * scale),
            min_fft_area_height: self.min_fft_area_height * scale,
            bottom_reserve: self.bottom_reserve * scale,
            split_hot_zone: self.split_hot_zone * scale,
            grip_half_width: self.grip_half_width * scale,
            notch_half_width: self.notch_half_width * scale,
            drag_threshold: self.drag_threshold * scale,
        }
    }
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self::standard()
    }
}

/// Rectangles of one frame, derived from the widget size.
///
/// Top to bottom: plot area, frequency scale strip, then (when visible) the
/// waterfall image. All three share the same horizontal data span of
/// `data_width` pixel columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub widget: Rect,
    pub fft_area: Rect,
    pub freq_area: Rect,
    pub waterfall_area: Option<Rect>,
    pub data_width: usize,
    pub waterfall_height: usize,
    /// Split position, relative to the widget top.
    pub split: f32,
    pub metrics: LayoutMetrics,
}

impl Layout {
    /// Lay out `widget` with the split at `fft_area_height` from its top.
    ///
    /// Returns `None` if the widget is too small to hold a plot.
    pub fn compute(
        widget: Rect,
        fft_area_height: f32,
        waterfall_visible: bool,
        metrics: LayoutMetrics,
    ) -> Option<Self> {
        let size = widget.size();
        if size.x < metrics.min_widget.x || size.y < metrics.min_widget.y {
            return None;
        }

        let split = if waterfall_visible {
            fft_area_height.min(size.y - metrics.bottom_reserve).floor()
        } else {
            size.y.floor()
        };
        let plot_height = (split - metrics.top_margin - metrics.freq_scale_height).floor();
        let data_width = (size.x - metrics.left_margin - metrics.right_margin).floor();
        if plot_height < 1.0 || data_width < 1.0 {
            return None;
        }

        let left = widget.min.x + metrics.left_margin;
        let right = left + data_width;
        let plot_top = widget.min.y + metrics.top_margin;
        let plot_bottom = plot_top + plot_height;

        let fft_area = Rect::new(Vec2::new(left, plot_top - 1.0), Vec2::new(right, plot_bottom));
        let freq_area = Rect::new(
            Vec2::new(left, plot_bottom + 1.0),
            Vec2::new(right, widget.min.y + split),
        );

        let (waterfall_area, waterfall_height) = if waterfall_visible {
            let height = (size.y - split - 2.0).floor().max(0.0);
            let top = widget.min.y + split + 1.0;
            let area = Rect::new(Vec2::new(left, top), Vec2::new(right, top + height));
            (Some(area).filter(|_| height >= 1.0), height as usize)
        } else {
            (None, 0)
        };

        Some(Self {
            widget,
            fft_area,
            freq_area,
            waterfall_area,
            data_width: data_width as usize,
            waterfall_height,
            split,
            metrics,
        })
    }

    /// Left edge of the data columns.
    pub fn data_left(&self) -> f32 {
        self.fft_area.min.x
    }

    /// Top of the trace drawing area (below the plot's top border).
    pub fn plot_top(&self) -> f32 {
        self.fft_area.min.y + 1.0
    }

    pub fn plot_bottom(&self) -> f32 {
        self.fft_area.max.y
    }

    pub fn plot_height(&self) -> f32 {
        self.plot_bottom() - self.plot_top()
    }

    /// Data column under surface x, if inside the data span.
    pub fn column_at(&self, x: f32) -> Option<usize> {
        let col = (x - self.data_left()).floor();
        (col >= 0.0 && col < self.data_width as f32).then_some(col as usize)
    }
}
