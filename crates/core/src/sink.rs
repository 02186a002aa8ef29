//! Output surfaces for renderers.
//!
//! Renderers never own their output. The caller supplies a [`PixelSink`] or
//! [`HeightSink`] sized to the noise map, and the renderer writes every cell
//! exactly once per pass, row by row.

use crate::color::Srgb;
use crate::error::NoiseError;

/// A `width * height` color surface.
pub trait PixelSink {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Writes one pixel. Writes outside the surface may be ignored.
    fn set_pixel(&mut self, x: usize, y: usize, color: Srgb);
}

/// A `width * height` surface of 16-bit heights.
pub trait HeightSink {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn set_height(&mut self, x: usize, y: usize, value: u16);
}

impl<T: PixelSink + ?Sized> PixelSink for &mut T {
    fn width(&self) -> usize {
        (**self).width()
    }

    fn height(&self) -> usize {
        (**self).height()
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: Srgb) {
        (**self).set_pixel(x, y, color);
    }
}

impl<T: HeightSink + ?Sized> HeightSink for &mut T {
    fn width(&self) -> usize {
        (**self).width()
    }

    fn height(&self) -> usize {
        (**self).height()
    }

    fn set_height(&mut self, x: usize, y: usize, value: u16) {
        (**self).set_height(x, y, value);
    }
}

fn checked_len(width: usize, height: usize) -> Result<usize, NoiseError> {
    if width == 0 || height == 0 {
        return Err(NoiseError::InvalidDimensions);
    }
    width
        .checked_mul(height)
        .ok_or(NoiseError::InvalidDimensions)
}

/// In-memory RGB image, row-major, initialised to black.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<Srgb>,
}

impl Image {
    pub fn new(width: usize, height: usize) -> Result<Self, NoiseError> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![Srgb::BLACK; len],
        })
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Srgb> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// Row-major pixels.
    pub fn pixels(&self) -> &[Srgb] {
        &self.pixels
    }
}

impl PixelSink for Image {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: Srgb) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }
}

/// In-memory 16-bit heightmap, row-major, initialised to zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heightmap16 {
    width: usize,
    height: usize,
    data: Vec<u16>,
}

impl Heightmap16 {
    pub fn new(width: usize, height: usize) -> Result<Self, NoiseError> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u16> {
        (x < self.width && y < self.height).then(|| self.data[y * self.width + x])
    }

    pub fn data(&self) -> &[u16] {
        &self.data
    }
}

impl HeightSink for Heightmap16 {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn set_height(&mut self, x: usize, y: usize, value: u16) {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = value;
        }
    }
}
