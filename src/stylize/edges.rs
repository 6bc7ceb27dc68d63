//! Adaptive edge mask and outline compositing.

use image::{GrayImage, Luma, Rgb, RgbImage};

/// Local-mean adaptive threshold.
///
/// Each output pixel is 255 where `pixel > mean - offset` and 0 otherwise,
/// `mean` being the rounded average of the `block_size` x `block_size`
/// neighbourhood (replicated border). Flat areas therefore come out white;
/// pixels noticeably darker than their surroundings come out black.
pub fn adaptive_threshold(gray: &GrayImage, block_size: u32, offset: i32) -> GrayImage {
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return gray.clone();
    }

    let means = box_mean(gray, block_size / 2);
    let mut out = GrayImage::new(width, height);

    for ((src, mean), dst) in gray
        .as_raw()
        .iter()
        .zip(means.iter())
        .zip(out.iter_mut())
    {
        *dst = if (*src as i32) > (*mean as i32) - offset { 255 } else { 0 };
    }

    out
}

/// Rounded box-filter mean using two separable passes with replicated border.
fn box_mean(gray: &GrayImage, radius: u32) -> Vec<u8> {
    let (width, height) = (gray.width() as usize, gray.height() as usize);
    let r = radius as i64;
    let src = gray.as_raw();
    let clamp = |i: i64, len: usize| i.clamp(0, len as i64 - 1) as usize;

    // Horizontal pass: row sums
    let mut rows = vec![0u32; width * height];
    for y in 0..height {
        let line = &src[y * width..(y + 1) * width];
        for x in 0..width {
            let mut sum = 0u32;
            for k in -r..=r {
                sum += line[clamp(x as i64 + k, width)] as u32;
            }
            rows[y * width + x] = sum;
        }
    }

    // Vertical pass over the row sums
    let area = ((2 * r + 1) * (2 * r + 1)) as u32;
    let mut means = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            let mut sum = 0u32;
            for k in -r..=r {
                sum += rows[clamp(y as i64 + k, height) * width + x];
            }
            means[y * width + x] = ((sum + area / 2) / area) as u8;
        }
    }

    means
}

/// Keep `color` where `mask` is non-zero and paint black elsewhere.
///
/// Dimensions must match; extra pixels in either image are ignored.
pub fn apply_mask(color: &RgbImage, mask: &GrayImage) -> RgbImage {
    let mut out = RgbImage::new(color.width(), color.height());

    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let keep = mask
            .get_pixel_checked(x, y)
            .is_some_and(|Luma([m])| *m != 0);
        if keep {
            *pixel = *color.get_pixel(x, y);
        } else {
            *pixel = Rgb([0, 0, 0]);
        }
    }

    out
}
