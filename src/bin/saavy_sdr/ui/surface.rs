//! Character-cell drawing surface
//!
//! Every terminal cell is one pixel: the renderer paints into a background
//! color grid, text lands in the cell symbols, and the finished canvas is
//! copied into the ratatui buffer as a widget.

use ratatui::{buffer::Buffer, layout::Rect as TermRect, style::Color, widgets::Widget};
use saavy_sdr::{
    geom::{Rect, Rgba, Vec2},
    CursorShape, InputState, Surface,
};

#[derive(Clone, Copy)]
struct Cell {
    bg: Rgba,
    symbol: char,
    fg: Rgba,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            bg: Rgba::BLACK,
            symbol: ' ',
            fg: Rgba::WHITE,
        }
    }
}

/// Software surface the size of the terminal area it is drawn into.
pub struct CellCanvas {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    /// Last uploaded waterfall image
    texture: Vec<u32>,
    texture_width: usize,
    texture_height: usize,
    input: InputState,
    cursor: CursorShape,
}

impl CellCanvas {
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            cells: Vec::new(),
            texture: Vec::new(),
            texture_width: 0,
            texture_height: 0,
            input: InputState::default(),
            cursor: CursorShape::Arrow,
        }
    }

    /// Start a new frame: resize, clear, and take this frame's input.
    pub fn begin(&mut self, width: usize, height: usize, input: InputState) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells.resize(width * height, Cell::default());
        self.input = input;
    }

    pub fn cursor(&self) -> CursorShape {
        self.cursor
    }

    fn cell_mut(&mut self, x: i64, y: i64) -> Option<&mut Cell> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        self.cells.get_mut(y as usize * self.width + x as usize)
    }

    fn paint(&mut self, x: i64, y: i64, color: Rgba) {
        if let Some(cell) = self.cell_mut(x, y) {
            cell.bg = blend(cell.bg, color);
            // Lines and fills cover whatever text was below
            if color.a == 255 {
                cell.symbol = ' ';
            }
        }
    }
}

impl Default for CellCanvas {
    fn default() -> Self {
        Self::new()
    }
}

/// Source-over blend onto an opaque destination.
fn blend(dst: Rgba, src: Rgba) -> Rgba {
    let a = src.a as u32;
    let mix = |d: u8, s: u8| ((s as u32 * a + d as u32 * (255 - a)) / 255) as u8;
    Rgba::new(mix(dst.r, src.r), mix(dst.g, src.g), mix(dst.b, src.b), 255)
}

impl Surface for CellCanvas {
    fn line(&mut self, from: Vec2, to: Vec2, color: Rgba) {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
        let mut last = None;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = (from.x + dx * t).floor() as i64;
            let y = (from.y + dy * t).floor() as i64;
            // Translucent lines would darken a cell once per step otherwise
            if last == Some((x, y)) {
                continue;
            }
            last = Some((x, y));
            self.paint(x, y, color);
        }
    }

    fn rect_filled(&mut self, rect: Rect, color: Rgba) {
        let x0 = rect.min.x.floor() as i64;
        let y0 = rect.min.y.floor() as i64;
        let x1 = rect.max.x.ceil() as i64;
        let y1 = rect.max.y.ceil() as i64;
        for y in y0..y1 {
            for x in x0..x1 {
                self.paint(x, y, color);
            }
        }
    }

    fn text(&mut self, pos: Vec2, text: &str, color: Rgba) {
        let y = pos.y.floor() as i64;
        let x0 = pos.x.floor() as i64;
        for (i, ch) in text.chars().enumerate() {
            if let Some(cell) = self.cell_mut(x0 + i as i64, y) {
                cell.symbol = ch;
                cell.fg = color;
            }
        }
    }

    fn text_size(&self, text: &str) -> Vec2 {
        Vec2::new(text.chars().count() as f32, 1.0)
    }

    fn upload_texture(&mut self, width: usize, height: usize, pixels: &[u32]) {
        self.texture_width = width;
        self.texture_height = height;
        self.texture.clear();
        self.texture.extend_from_slice(pixels);
    }

    fn draw_texture(&mut self, rect: Rect) {
        let (tw, th) = (self.texture_width, self.texture_height);
        if tw == 0 || th == 0 || self.texture.len() < tw * th {
            return;
        }
        let x0 = rect.min.x.floor() as i64;
        let y0 = rect.min.y.floor() as i64;
        let w = rect.width().round().max(1.0) as i64;
        let h = rect.height().round().max(1.0) as i64;
        // Nearest-neighbour stretch of the texture over the rectangle
        for dy in 0..h {
            let ty = (dy as usize * th) / h as usize;
            for dx in 0..w {
                let tx = (dx as usize * tw) / w as usize;
                let color = Rgba::unpack(self.texture[ty * tw + tx]);
                if let Some(cell) = self.cell_mut(x0 + dx, y0 + dy) {
                    cell.bg = color.with_alpha(255);
                    cell.symbol = ' ';
                }
            }
        }
    }

    fn input(&self) -> InputState {
        self.input
    }

    fn set_cursor(&mut self, cursor: CursorShape) {
        self.cursor = cursor;
    }
}

fn to_color(c: Rgba) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

impl Widget for &CellCanvas {
    fn render(self, area: TermRect, buf: &mut Buffer) {
        let rows = (area.height as usize).min(self.height);
        let cols = (area.width as usize).min(self.width);
        for y in 0..rows {
            for x in 0..cols {
                let cell = self.cells[y * self.width + x];
                let pos = (area.x + x as u16, area.y + y as u16);
                if let Some(out) = buf.cell_mut(pos) {
                    out.set_char(cell.symbol);
                    out.set_fg(to_color(cell.fg));
                    out.set_bg(to_color(cell.bg));
                }
            }
        }
    }
}
