//! Cartoon stylization: dark edge outlines over smoothed color.
//!
//! The pipeline is fixed:
//!
//! 1. **Grayscale** - BT.601 luminance
//! 2. **Median blur** - 5x5, suppresses sensor noise before edge extraction
//! 3. **Adaptive threshold** - 9x9 local mean, offset 9, yields the edge mask
//! 4. **Bilateral filter** - edge-preserving smoothing of the color image
//! 5. **Mask** - edge pixels become black outlines
//!
//! No parameter is exposed; [`cartoonify`] is a pure function.

mod edges;
mod grayscale;
mod smoothing;

use image::RgbImage;

pub use edges::{adaptive_threshold, apply_mask};
pub use grayscale::to_grayscale;
pub use smoothing::{bilateral_filter, median_blur};

const MEDIAN_KSIZE: u32 = 5;
const THRESHOLD_BLOCK: u32 = 9;
const THRESHOLD_OFFSET: i32 = 9;
const BILATERAL_DIAMETER: u32 = 9;
const BILATERAL_SIGMA_COLOR: f32 = 300.0;
const BILATERAL_SIGMA_SPACE: f32 = 300.0;

/// Apply the cartoon effect to an image.
pub fn cartoonify(image: &RgbImage) -> RgbImage {
    let gray = to_grayscale(image);
    let gray = median_blur(&gray, MEDIAN_KSIZE);
    let edges = adaptive_threshold(&gray, THRESHOLD_BLOCK, THRESHOLD_OFFSET);
    let color = bilateral_filter(
        image,
        BILATERAL_DIAMETER,
        BILATERAL_SIGMA_COLOR,
        BILATERAL_SIGMA_SPACE,
    );
    apply_mask(&color, &edges)
}
