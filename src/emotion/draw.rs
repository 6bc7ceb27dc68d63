//! Raster primitives for the emoji face.
//!
//! Shapes are given by inclusive bounding boxes `(x0, y0, x1, y1)`. A pixel
//! is painted when its center falls inside the shape; everything outside
//! the canvas is clipped.

use image::{Rgb, RgbImage};

/// Inclusive bounding box in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl BoundingBox {
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    fn center(&self) -> (f32, f32) {
        ((self.x0 + self.x1) as f32 / 2.0, (self.y0 + self.y1) as f32 / 2.0)
    }

    /// Half extents measured to the outer pixel edges.
    fn radii(&self) -> (f32, f32) {
        (
            (self.x1 - self.x0) as f32 / 2.0 + 0.5,
            (self.y1 - self.y0) as f32 / 2.0 + 0.5,
        )
    }
}

fn set_pixel(image: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < image.width() && (y as u32) < image.height() {
        image.put_pixel(x as u32, y as u32, color);
    }
}

fn inside_ellipse(dx: f32, dy: f32, rx: f32, ry: f32) -> bool {
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }
    (dx / rx).powi(2) + (dy / ry).powi(2) <= 1.0
}

/// Fill the ellipse inscribed in `bbox`.
pub fn fill_ellipse(image: &mut RgbImage, bbox: BoundingBox, color: Rgb<u8>) {
    let (cx, cy) = bbox.center();
    let (rx, ry) = bbox.radii();

    for y in bbox.y0..=bbox.y1 {
        for x in bbox.x0..=bbox.x1 {
            if inside_ellipse(x as f32 - cx, y as f32 - cy, rx, ry) {
                set_pixel(image, x, y, color);
            }
        }
    }
}

/// Stroke part of the ellipse inscribed in `bbox`.
///
/// Angles are in degrees, 0 pointing right and growing clockwise (y axis
/// points down), so `0..180` is the lower half and `180..360` the upper half.
pub fn draw_arc(
    image: &mut RgbImage,
    bbox: BoundingBox,
    start_deg: f32,
    end_deg: f32,
    color: Rgb<u8>,
    width: u32,
) {
    let (cx, cy) = bbox.center();
    let (rx, ry) = bbox.radii();
    let (inner_rx, inner_ry) = (rx - width as f32, ry - width as f32);

    for y in bbox.y0..=bbox.y1 {
        for x in bbox.x0..=bbox.x1 {
            let (dx, dy) = (x as f32 - cx, y as f32 - cy);
            if !inside_ellipse(dx, dy, rx, ry) || inside_ellipse(dx, dy, inner_rx, inner_ry) {
                continue;
            }
            // Angle on the unit circle the ellipse is stretched from
            let angle = (dy / ry).atan2(dx / rx).to_degrees().rem_euclid(360.0);
            if angle >= start_deg && angle <= end_deg {
                set_pixel(image, x, y, color);
            }
        }
    }
}

/// Stroke a straight segment with square (butt) ends.
pub fn draw_line(
    image: &mut RgbImage,
    from: (i32, i32),
    to: (i32, i32),
    color: Rgb<u8>,
    width: u32,
) {
    let half = width.max(1) as f32 / 2.0;
    let (ax, ay) = (from.0 as f32, from.1 as f32);
    let (bx, by) = (to.0 as f32, to.1 as f32);
    let (vx, vy) = (bx - ax, by - ay);
    let len2 = vx * vx + vy * vy;

    let pad = half.ceil() as i32;
    let (min_x, max_x) = (from.0.min(to.0) - pad, from.0.max(to.0) + pad);
    let (min_y, max_y) = (from.1.min(to.1) - pad, from.1.max(to.1) + pad);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let (px, py) = (x as f32 - ax, y as f32 - ay);
            let (t, dist) = if len2 == 0.0 {
                (0.0, (px * px + py * py).sqrt())
            } else {
                let t = (px * vx + py * vy) / len2;
                let cross = (px * vy - py * vx).abs();
                (t, cross / len2.sqrt())
            };
            if (0.0..=1.0).contains(&t) && dist <= half {
                set_pixel(image, x, y, color);
            }
        }
    }
}
