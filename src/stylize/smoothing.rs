//! Noise suppression filters: median blur for the luminance channel and an
//! edge-preserving bilateral filter for the color image.

use image::{GrayImage, Rgb, RgbImage};

/// Clamp an index into `0..len` (replicated border, `aaa|abcd|ddd`).
fn replicate(i: i64, len: i64) -> usize {
    i.clamp(0, len - 1) as usize
}

/// Reflect an index into `0..len` without repeating the edge (`dcb|abcd|cba`).
fn reflect101(i: i64, len: i64) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len - 1);
    let mut i = i.rem_euclid(period);
    if i >= len {
        i = period - i;
    }
    i as usize
}

/// Median filter with a square `ksize` x `ksize` window and replicated border.
///
/// `ksize` must be odd; even sizes are rounded up.
pub fn median_blur(gray: &GrayImage, ksize: u32) -> GrayImage {
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return gray.clone();
    }

    let radius = (ksize / 2) as i64;
    let (w, h) = (width as i64, height as i64);
    let src = gray.as_raw();
    let mut out = GrayImage::new(width, height);
    let mut window: Vec<u8> = Vec::with_capacity(((2 * radius + 1) * (2 * radius + 1)) as usize);

    for y in 0..h {
        for x in 0..w {
            window.clear();
            for ky in -radius..=radius {
                let row = replicate(y + ky, h) * width as usize;
                for kx in -radius..=radius {
                    window.push(src[row + replicate(x + kx, w)]);
                }
            }
            let mid = window.len() / 2;
            let (_, median, _) = window.select_nth_unstable(mid);
            out.put_pixel(x as u32, y as u32, image::Luma([*median]));
        }
    }

    out
}

/// Bilateral filter: smooths flat regions while keeping strong color edges.
///
/// Neighbours within a disc of radius `diameter / 2` are weighted by
/// `exp(-r² / 2σs²) * exp(-Δ² / 2σc²)` where Δ is the L1 color distance
/// summed over the three channels. Borders are reflected.
pub fn bilateral_filter(image: &RgbImage, diameter: u32, sigma_color: f32, sigma_space: f32) -> RgbImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let radius = (diameter / 2).max(1) as i64;
    let (w, h) = (width as i64, height as i64);
    let src = image.as_raw();

    let space_coeff = -0.5 / (sigma_space * sigma_space);
    let color_coeff = -0.5 / (sigma_color * sigma_color);

    // (dx, dy, spatial weight) for every offset inside the disc
    let mut offsets: Vec<(i64, i64, f32)> = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let r2 = (dx * dx + dy * dy) as f32;
            if r2.sqrt() > radius as f32 {
                continue;
            }
            offsets.push((dx, dy, (r2 * space_coeff).exp()));
        }
    }

    // Color weight indexed by L1 distance (0..=765)
    let color_weights: Vec<f32> = (0..256 * 3)
        .map(|d| ((d * d) as f32 * color_coeff).exp())
        .collect();

    let mut out = RgbImage::new(width, height);

    for y in 0..h {
        for x in 0..w {
            let center = ((y * w + x) * 3) as usize;
            let (r0, g0, b0) = (src[center] as i32, src[center + 1] as i32, src[center + 2] as i32);

            let mut sum = [0.0f32; 3];
            let mut wsum = 0.0f32;

            for &(dx, dy, space_w) in &offsets {
                let sx = reflect101(x + dx, w);
                let sy = reflect101(y + dy, h);
                let idx = (sy * width as usize + sx) * 3;
                let (r, g, b) = (src[idx] as i32, src[idx + 1] as i32, src[idx + 2] as i32);

                let dist = ((r - r0).abs() + (g - g0).abs() + (b - b0).abs()) as usize;
                let weight = space_w * color_weights[dist];

                sum[0] += weight * r as f32;
                sum[1] += weight * g as f32;
                sum[2] += weight * b as f32;
                wsum += weight;
            }

            let px = [
                (sum[0] / wsum).round().clamp(0.0, 255.0) as u8,
                (sum[1] / wsum).round().clamp(0.0, 255.0) as u8,
                (sum[2] / wsum).round().clamp(0.0, 255.0) as u8,
            ];
            out.put_pixel(x as u32, y as u32, Rgb(px));
        }
    }

    out
}
