//! Virtual frame geometry.
//!
//! The frame is a `width` x `height` rectangle centred on the z axis with one
//! world unit per pixel. Frame coordinates `(x, y)` grow right and up; image
//! coordinates `(px, py)` grow right and down from the top-left corner:
//!
//! ```text
//! px = width / 2 + x
//! py = height - (height / 2 + y)
//! ```
//!
//! with integer halves, so x runs over `[-(width / 2), width - width / 2)` and y
//! over `(-(height / 2), height - height / 2]`.

/// Pixel grid of one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Frame {
    /// Create a frame of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    fn half_width(&self) -> i64 {
        i64::from(self.width / 2)
    }

    fn half_height(&self) -> i64 {
        i64::from(self.height / 2)
    }

    /// Image coordinates of frame point `(x, y)`, or `None` outside the frame.
    pub fn to_pixel(&self, x: i32, y: i32) -> Option<(u32, u32)> {
        let px = self.half_width() + i64::from(x);
        let py = i64::from(self.height) - (self.half_height() + i64::from(y));
        let inside = (0..i64::from(self.width)).contains(&px) && (0..i64::from(self.height)).contains(&py);
        inside.then(|| (px as u32, py as u32))
    }

    /// Frame point shown at image coordinates `(px, py)`.
    pub fn from_pixel(&self, px: u32, py: u32) -> (i32, i32) {
        let x = i64::from(px) - self.half_width();
        let y = i64::from(self.height) - self.half_height() - i64::from(py);
        (x as i32, y as i32)
    }

    /// Frame point of the `index`-th pixel in scan order: top row first, left
    /// to right.
    pub fn scan_point(&self, index: usize) -> (i32, i32) {
        let width = self.width as usize;
        self.from_pixel((index % width) as u32, (index / width) as u32)
    }
}
