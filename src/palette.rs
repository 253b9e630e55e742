//! Waterfall color lookup table.
//!
//! A palette is a short list of RGB control points stretched over
//! [`PALETTE_RESOLUTION`] interpolated entries. Mapping a dB value to a pixel
//! is then a clamp, a multiply and a table read, cheap enough to run for every
//! pixel of every committed line.

use tracing::debug;

use crate::error::{Result, WaterfallError};
use crate::geom::Rgba;

/// Number of entries in the lookup table.
pub const PALETTE_RESOLUTION: usize = 65_536;

/// RGB control point, channels in `0.0..=255.0`.
pub type ColorPoint = [f32; 3];

/// Dark blue through white and yellow to deep red.
pub const DEFAULT_COLOR_MAP: [ColorPoint; 13] = [
    [0x00 as f32, 0x00 as f32, 0x20 as f32],
    [0x00 as f32, 0x00 as f32, 0x30 as f32],
    [0x00 as f32, 0x00 as f32, 0x50 as f32],
    [0x00 as f32, 0x00 as f32, 0x91 as f32],
    [0x1E as f32, 0x90 as f32, 0xFF as f32],
    [0xFF as f32, 0xFF as f32, 0xFF as f32],
    [0xFF as f32, 0xFF as f32, 0x00 as f32],
    [0xFE as f32, 0x6D as f32, 0x16 as f32],
    [0xFF as f32, 0x00 as f32, 0x00 as f32],
    [0xC6 as f32, 0x00 as f32, 0x00 as f32],
    [0x9F as f32, 0x00 as f32, 0x00 as f32],
    [0x75 as f32, 0x00 as f32, 0x00 as f32],
    [0x4A as f32, 0x00 as f32, 0x00 as f32],
];

pub struct Palette {
    points: Vec<ColorPoint>,
    lut: Box<[u32]>,
}

impl Palette {
    /// Build a palette from control points. Fails on an empty list.
    pub fn new(points: &[ColorPoint]) -> Result<Self> {
        if points.is_empty() {
            return Err(WaterfallError::EmptyPalette);
        }
        Ok(Self {
            points: points.to_vec(),
            lut: build_lut(points),
        })
    }

    /// Replace the control points and rebuild the table.
    ///
    /// On error the previous table is kept untouched.
    pub fn set_palette(&mut self, points: &[ColorPoint]) -> Result<()> {
        if points.is_empty() {
            return Err(WaterfallError::EmptyPalette);
        }
        self.points = points.to_vec();
        self.lut = build_lut(points);
        debug!(points = points.len(), "rebuilt palette lookup table");
        Ok(())
    }

    pub fn control_points(&self) -> &[ColorPoint] {
        &self.points
    }

    pub fn lut(&self) -> &[u32] {
        &self.lut
    }

    /// Lookup-table index for a dB value mapped over `[min_db, max_db]`.
    ///
    /// NaN maps like `min_db`, infinities clamp to the ends, and a degenerate
    /// range maps everything to the first entry.
    pub fn index(db: f32, min_db: f32, max_db: f32) -> usize {
        let range = max_db - min_db;
        if !(range > 0.0) || !range.is_finite() {
            return 0;
        }
        let db = if db.is_nan() { min_db } else { db };
        let norm = (db.clamp(min_db, max_db) - min_db) / range;
        ((norm * (PALETTE_RESOLUTION - 1) as f32) as usize).min(PALETTE_RESOLUTION - 1)
    }

    /// Packed RGBA for a dB value.
    #[inline]
    pub fn map(&self, db: f32, min_db: f32, max_db: f32) -> u32 {
        self.lut[Self::index(db, min_db, max_db)]
    }

    /// Color-map a whole display line into a frame buffer row.
    pub fn map_line(&self, line: &[f32], min_db: f32, max_db: f32, out: &mut [u32]) {
        for (px, &db) in out.iter_mut().zip(line) {
            *px = self.map(db, min_db, max_db);
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            points: DEFAULT_COLOR_MAP.to_vec(),
            lut: build_lut(&DEFAULT_COLOR_MAP),
        }
    }
}

fn build_lut(points: &[ColorPoint]) -> Box<[u32]> {
    let count = points.len();
    let last = count - 1;
    (0..PALETTE_RESOLUTION)
        .map(|i| {
            let pos = (i as f64 / PALETTE_RESOLUTION as f64) * count as f64;
            let lower = (pos.floor() as usize).min(last);
            let upper = (pos.ceil() as usize).min(last);
            let ratio = (pos - lower as f64) as f32;
            let channel = |c: usize| {
                let v = points[lower][c] * (1.0 - ratio) + points[upper][c] * ratio;
                v.clamp(0.0, 255.0) as u8
            };
            Rgba::new(channel(0), channel(1), channel(2), 255).pack()
        })
        .collect()
}
