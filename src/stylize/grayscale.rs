//! RGB to grayscale conversion using ITU-R BT.601 luminance formula.

use image::{GrayImage, RgbImage};

/// Convert an RGB image to grayscale.
///
/// Y = 0.299*R + 0.587*G + 0.114*B, computed with integer math. The
/// coefficients are scaled by 1000 (299 + 587 + 114 = 1000).
pub fn to_grayscale(image: &RgbImage) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut gray = Vec::with_capacity((width * height) as usize);

    for rgb in image.as_raw().chunks_exact(3) {
        let r = rgb[0] as u32;
        let g = rgb[1] as u32;
        let b = rgb[2] as u32;
        let luminance = (299 * r + 587 * g + 114 * b) / 1000;
        gray.push(luminance as u8);
    }

    // Length is width * height by construction
    GrayImage::from_raw(width, height, gray).unwrap_or_else(|| GrayImage::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gray_of(rgb: [u8; 3]) -> u8 {
        to_grayscale(&RgbImage::from_pixel(1, 1, Rgb(rgb))).get_pixel(0, 0).0[0]
    }

    #[test]
    fn test_primaries() {
        assert_eq!(gray_of([255, 0, 0]), 76);
        assert_eq!(gray_of([0, 255, 0]), 149);
        assert_eq!(gray_of([0, 0, 255]), 29);
    }

    #[test]
    fn test_white_and_black() {
        assert_eq!(gray_of([255, 255, 255]), 255);
        assert_eq!(gray_of([0, 0, 0]), 0);
    }

    #[test]
    fn test_keeps_dimensions() {
        let gray = to_grayscale(&RgbImage::new(7, 3));
        assert_eq!(gray.dimensions(), (7, 3));
    }
}
