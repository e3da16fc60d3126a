use crate::game::Rgb;

/// A write-only drawing target addressed in pixels
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Fill an axis-aligned rectangle; parts outside the surface are clipped
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgb);
}

/// In-memory pixel surface
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb(0, 0, 0); (width * height) as usize],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }
}

impl Surface for PixelBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgb) {
        let x0 = x.max(0) as i64;
        let y0 = y.max(0) as i64;
        let x1 = (x as i64 + w as i64).min(self.width as i64);
        let y1 = (y as i64 + h as i64).min(self.height as i64);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        for row in y0..y1 {
            let start = (row * self.width as i64 + x0) as usize;
            let end = (row * self.width as i64 + x1) as usize;
            self.pixels[start..end].fill(color);
        }
    }
}
