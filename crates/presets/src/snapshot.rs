//! PNG output of rendered surfaces.
//!
//! Feature-gated behind `png` (default on) so embedders that only need byte
//! buffers do not pull in the `image` crate. The conversion itself lives in
//! [`crate::pixel`].

use std::path::Path;

use image::{ImageBuffer, Luma, RgbaImage};
use noisegraph_core::{Heightmap16, HeightSink, Image, NoiseError, PixelSink};
use tracing::debug;

use crate::pixel::{dims_u32, image_to_rgba};

/// Writes an image as an 8-bit RGBA PNG.
///
/// Returns `NoiseError::InvalidDimensions` if the image dimensions overflow
/// `u32`, or `NoiseError::Io` on write failure.
pub fn write_png(image: &Image, path: &Path) -> Result<(), NoiseError> {
    let (w, h) =
        dims_u32(image.width(), image.height()).ok_or(NoiseError::InvalidDimensions)?;
    let img = RgbaImage::from_raw(w, h, image_to_rgba(image))
        .ok_or_else(|| NoiseError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| NoiseError::Io(e.to_string()))?;
    debug!(path = %path.display(), width = w, height = h, "wrote png");
    Ok(())
}

/// Writes a heightmap as a 16-bit grayscale PNG.
pub fn write_heightmap_png(heightmap: &Heightmap16, path: &Path) -> Result<(), NoiseError> {
    let (w, h) =
        dims_u32(heightmap.width(), heightmap.height()).ok_or(NoiseError::InvalidDimensions)?;
    let img: ImageBuffer<Luma<u16>, Vec<u16>> =
        ImageBuffer::from_raw(w, h, heightmap.data().to_vec())
            .ok_or_else(|| NoiseError::Io("heightmap buffer size mismatch".into()))?;
    img.save(path).map_err(|e| NoiseError::Io(e.to_string()))?;
    debug!(path = %path.display(), width = w, height = h, "wrote 16-bit heightmap png");
    Ok(())
}
