//! Host GUI abstraction: draw primitives, input polling and colors.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geom::{Rect, Rgba, Vec2};

/// Pointer and keyboard state sampled once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    /// Pointer position, `None` when it is outside the window.
    pub pointer: Option<Vec2>,
    /// Primary button went down this frame.
    pub primary_pressed: bool,
    /// Primary button is held.
    pub primary_down: bool,
    /// Wheel notches this frame, positive away from the user.
    pub wheel: f32,
    /// Left/right arrow presses this frame.
    pub key_left: u32,
    pub key_right: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    #[default]
    Arrow,
    ResizeHorizontal,
    ResizeVertical,
}

/// Host GUI primitives the renderer draws with.
///
/// The renderer decides what goes where; the surface owns the window, the
/// event loop and the one texture holding the waterfall image.
pub trait Surface {
    fn line(&mut self, from: Vec2, to: Vec2, color: Rgba);

    fn rect_filled(&mut self, rect: Rect, color: Rgba);

    fn rect_outline(&mut self, rect: Rect, color: Rgba) {
        let Rect { min, max } = rect;
        self.line(min, Vec2::new(max.x, min.y), color);
        self.line(Vec2::new(max.x, min.y), max, color);
        self.line(max, Vec2::new(min.x, max.y), color);
        self.line(Vec2::new(min.x, max.y), min, color);
    }

    fn text(&mut self, pos: Vec2, text: &str, color: Rgba);

    fn text_size(&self, text: &str) -> Vec2;

    /// Replace the waterfall texture with `width * height` packed RGBA pixels.
    fn upload_texture(&mut self, width: usize, height: usize, pixels: &[u32]);

    /// Stretch the waterfall texture over `rect`.
    fn draw_texture(&mut self, rect: Rect);

    fn input(&self) -> InputState;

    fn set_cursor(&mut self, _cursor: CursorShape) {
        // Default: surfaces without cursor control ignore this
    }

    /// Small text box near the pointer.
    fn tooltip(&mut self, pos: Vec2, lines: &[String], theme: &Theme) {
        let width = lines.iter().map(|l| self.text_size(l).x).fold(0.0, f32::max);
        let line_height = self.text_size("0").y;
        let rect = Rect::from_xywh(
            pos.x + 1.0,
            pos.y + 1.0,
            width + 2.0,
            line_height * lines.len() as f32,
        );
        self.rect_filled(rect, theme.tooltip_background);
        for (i, line) in lines.iter().enumerate() {
            let y = rect.min.y + i as f32 * line_height;
            self.text(Vec2::new(rect.min.x + 1.0, y), line, theme.tooltip_text);
        }
    }
}

/// Colors used by the renderer.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub background: Rgba,
    pub border: Rgba,
    pub grid: Rgba,
    pub axis: Rgba,
    pub label: Rgba,
    pub trace: Rgba,
    pub trace_fill: Rgba,
    pub hold_trace: Rgba,
    pub vfo_line: Rgba,
    pub vfo_line_selected: Rgba,
    pub notch: Rgba,
    pub split_drag: Rgba,
    pub band_default: Rgba,
    pub tooltip_background: Rgba,
    pub tooltip_text: Rgba,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Rgba::BLACK,
            border: Rgba::new(50, 50, 50, 255),
            grid: Rgba::new(50, 50, 50, 255),
            axis: Rgba::WHITE,
            label: Rgba::WHITE,
            trace: Rgba::new(0, 180, 255, 255),
            trace_fill: Rgba::new(0, 180, 255, 51),
            hold_trace: Rgba::new(255, 255, 0, 255),
            vfo_line: Rgba::new(255, 255, 0, 255),
            vfo_line_selected: Rgba::new(255, 0, 0, 255),
            notch: Rgba::new(255, 0, 0, 127),
            split_drag: Rgba::new(66, 150, 250, 255),
            band_default: Rgba::WHITE,
            tooltip_background: Rgba::new(30, 30, 30, 230),
            tooltip_text: Rgba::WHITE,
        }
    }
}
