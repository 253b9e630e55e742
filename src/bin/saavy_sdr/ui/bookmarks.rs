//! Named frequencies labelled along the top edge of the spectrum plot.
//!
//! Clicking a label claims the click from the waterfall and queues a jump
//! of the selected VFO to that frequency.

use saavy_sdr::{
    geom::{Rect, Rgba, Vec2},
    InputState, PlotGeometry, Surface, WaterfallOverlay,
};

pub struct Bookmark {
    pub name: String,
    /// Absolute frequency in Hz
    pub freq: f64,
}

pub struct Bookmarks {
    marks: Vec<Bookmark>,
    color: Rgba,
    /// Label boxes from the last draw, with their frequency
    labels: Vec<(Rect, f64)>,
    pending: Option<f64>,
}

impl Bookmarks {
    pub fn new(marks: Vec<Bookmark>) -> Self {
        Self {
            marks,
            color: Rgba::new(255, 255, 0, 255),
            labels: Vec::new(),
            pending: None,
        }
    }

    /// Frequency clicked since the last call, if any.
    pub fn take_pending(&mut self) -> Option<f64> {
        self.pending.take()
    }
}

impl WaterfallOverlay for Bookmarks {
    fn draw(&mut self, surface: &mut dyn Surface, plot: &PlotGeometry) {
        self.labels.clear();
        for mark in &self.marks {
            if mark.freq < plot.lower_freq || mark.freq > plot.upper_freq {
                continue;
            }
            let x = plot.freq_to_x(mark.freq).floor();
            let size = surface.text_size(&mark.name);
            let left = (x - (size.x / 2.0).floor())
                .clamp(plot.plot.min.x, (plot.plot.max.x - size.x).max(plot.plot.min.x));
            let label = Rect::from_xywh(left, plot.plot.min.y, size.x, size.y);
            surface.text(label.min, &mark.name, self.color);
            self.labels.push((label, mark.freq));
        }
    }

    fn input(&mut self, input: &InputState, _plot: &PlotGeometry) -> bool {
        let Some(pointer) = input.pointer else {
            return false;
        };
        let Some(&(_, freq)) = self.labels.iter().find(|(rect, _)| rect.contains(pointer)) else {
            return false;
        };
        if input.primary_pressed {
            self.pending = Some(freq);
        }
        true
    }
}
