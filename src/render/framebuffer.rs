/// Color-mapped waterfall rows, newest first.
///
/// Rows are kept in a ring like [`crate::dsp::SpectrumHistory`]: pushing a
/// row moves the top cursor instead of shifting pixels. The linear image
/// (row 0 at the top) is produced only when copying into a [`TextureBuffer`].
#[derive(Debug, Clone, Default)]
pub struct WaterfallFrameBuffer {
    pixels: Vec<u32>,
    width: usize,
    height: usize,
    top: usize,
}

impl WaterfallFrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height],
            width,
            height,
            top: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    fn physical(&self, k: usize) -> std::ops::Range<usize> {
        let start = ((self.top + k) % self.height) * self.width;
        start..start + self.width
    }

    /// Scroll down by one row and return the new top row for writing.
    pub fn push_row(&mut self) -> &mut [u32] {
        if self.is_empty() {
            return &mut [];
        }
        self.top = (self.top + self.height - 1) % self.height;
        let range = self.physical(0);
        &mut self.pixels[range]
    }

    /// Logical row `k`, 0 at the top.
    pub fn row(&self, k: usize) -> Option<&[u32]> {
        (k < self.height).then(|| &self.pixels[self.physical(k)])
    }

    pub fn row_mut(&mut self, k: usize) -> Option<&mut [u32]> {
        if k >= self.height {
            return None;
        }
        let range = self.physical(k);
        Some(&mut self.pixels[range])
    }

    /// Blank every pixel and restart the ring at the first physical row.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
        self.top = 0;
    }

    /// Copy rows top to bottom into `out`, which must hold `width * height`.
    pub fn write_linear(&self, out: &mut [u32]) {
        if self.is_empty() || out.len() != self.pixels.len() {
            return;
        }
        let split = self.top * self.width;
        let (head, tail) = out.split_at_mut(self.pixels.len() - split);
        head.copy_from_slice(&self.pixels[split..]);
        tail.copy_from_slice(&self.pixels[..split]);
    }
}

/// Linear RGBA image waiting for upload to the surface's texture.
///
/// Owned by the UI thread. It is refilled at most once per frame, however
/// many lines the producer committed since the last one, and the pending
/// flag keeps an unchanged image from being uploaded twice.
#[derive(Debug, Clone, Default)]
pub struct TextureBuffer {
    pixels: Vec<u32>,
    width: usize,
    height: usize,
    pending: bool,
}

impl TextureBuffer {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Replace the image with the current frame buffer contents.
    pub fn fill_from(&mut self, fb: &WaterfallFrameBuffer) {
        let len = fb.width() * fb.height();
        if self.pixels.len() != len {
            self.pixels = vec![0; len];
        }
        self.width = fb.width();
        self.height = fb.height();
        fb.write_linear(&mut self.pixels);
        self.pending = true;
    }

    /// Clear the pending flag, returning whether an upload was due.
    pub fn take_pending(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pushed_rows_scroll_down() {
        let mut fb = WaterfallFrameBuffer::new(2, 3);
        for n in 1..=4u32 {
            fb.push_row().fill(n);
        }
        assert_eq!(fb.row(0).unwrap(), &[4, 4]);
        assert_eq!(fb.row(1).unwrap(), &[3, 3]);
        assert_eq!(fb.row(2).unwrap(), &[2, 2]);
        assert!(fb.row(3).is_none());
    }

    #[test]
    fn linear_copy_is_top_to_bottom() {
        let mut fb = WaterfallFrameBuffer::new(1, 3);
        for n in 1..=5u32 {
            fb.push_row().fill(n);
        }
        let mut texture = TextureBuffer::default();
        texture.fill_from(&fb);
        assert_eq!(texture.pixels(), &[5, 4, 3]);
        assert!(texture.take_pending());
        assert!(!texture.take_pending());
    }

    #[test]
    fn empty_buffer_ignores_pushes() {
        let mut fb = WaterfallFrameBuffer::new(0, 0);
        assert!(fb.push_row().is_empty());
        assert!(fb.row(0).is_none());
    }
}
