//! Byte buffer conversion for rendered surfaces.
//!
//! Always available (no feature gate) so front ends that blit raw bytes can
//! share the same conversion as the `png` snapshot path.

use noisegraph_core::{Heightmap16, Image};

/// Packs an image as RGBA8, row-major, alpha always 255. The buffer length
/// is `width * height * 4`.
pub fn image_to_rgba(image: &Image) -> Vec<u8> {
    image
        .pixels()
        .iter()
        .flat_map(|p| {
            let [r, g, b] = p.to_rgb8();
            [r, g, b, 255u8]
        })
        .collect()
}

/// Packs a heightmap as big-endian 16-bit samples, the byte order of 16-bit
/// PNG and of most raw terrain formats.
pub fn heightmap_to_be_bytes(heightmap: &Heightmap16) -> Vec<u8> {
    heightmap.data().iter().flat_map(|h| h.to_be_bytes()).collect()
}

/// Surface dimensions as `u32`, the size type of image encoders, if they fit.
pub fn dims_u32(width: usize, height: usize) -> Option<(u32, u32)> {
    Some((u32::try_from(width).ok()?, u32::try_from(height).ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use noisegraph_core::{HeightSink, PixelSink, Srgb};

    #[test]
    fn rgba_length_and_alpha() {
        let image = Image::new(8, 4).unwrap();
        let buf = image_to_rgba(&image);
        assert_eq!(buf.len(), 8 * 4 * 4);
        assert!(buf.chunks(4).all(|px| px == [0, 0, 0, 255]));
    }

    #[test]
    fn rgba_is_row_major() {
        let mut image = Image::new(2, 2).unwrap();
        image.set_pixel(1, 0, Srgb::WHITE);
        image.set_pixel(0, 1, Srgb::new(1.0, 0.0, 0.0));
        let buf = image_to_rgba(&image);
        assert_eq!(&buf[4..8], &[255, 255, 255, 255]);
        assert_eq!(&buf[8..12], &[255, 0, 0, 255]);
    }

    #[test]
    fn heights_are_big_endian() {
        let mut hm = Heightmap16::new(2, 1).unwrap();
        hm.set_height(0, 0, 0x1234);
        hm.set_height(1, 0, u16::MAX);
        assert_eq!(heightmap_to_be_bytes(&hm), vec![0x12, 0x34, 0xff, 0xff]);
    }

    #[test]
    fn oversized_dimensions_do_not_fit_u32() {
        assert_eq!(dims_u32(usize::MAX, 1), None);
        assert_eq!(dims_u32(7, 9), Some((7, 9)));
    }
}
