//! Terminal preview of the current avatar.
//!
//! The avatar is shrunk to a 300×300 thumbnail, then averaged down to a
//! character grid and printed with truecolor half blocks: each cell shows two
//! vertically stacked pixels (`▀` with foreground = top, background = bottom).

use std::fmt::Write;

use image::{imageops, RgbImage};

/// Longest side of the preview thumbnail in pixels.
pub const THUMBNAIL_SIZE: u32 = 300;

/// Default preview width in terminal columns.
pub const DEFAULT_COLUMNS: u16 = 48;

/// RGB color for one downsampled cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Shrink `image` to fit in a `THUMBNAIL_SIZE` square, keeping its aspect
/// ratio. Images that already fit are returned unchanged.
pub fn thumbnail(image: &RgbImage) -> RgbImage {
    let (width, height) = image.dimensions();
    if width <= THUMBNAIL_SIZE && height <= THUMBNAIL_SIZE {
        return image.clone();
    }
    let (w, h) = fit_within(width, height, THUMBNAIL_SIZE);
    imageops::thumbnail(image, w, h)
}

fn fit_within(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width >= height {
        let h = (height as u64 * max as u64 / width as u64).max(1) as u32;
        (max, h)
    } else {
        let w = (width as u64 * max as u64 / height as u64).max(1) as u32;
        (w, max)
    }
}

/// Average the pixels of `image` into a `cols × rows` grid.
///
/// Each cell covers a rectangle of source pixels; cells that would cover no
/// pixel take the nearest one.
pub fn downsample_colors(image: &RgbImage, cols: u16, rows: u16) -> Vec<CellColor> {
    let (img_width, img_height) = image.dimensions();
    if cols == 0 || rows == 0 || img_width == 0 || img_height == 0 {
        return Vec::new();
    }

    let mut cells = Vec::with_capacity(cols as usize * rows as usize);
    let cell_w = img_width as f32 / cols as f32;
    let cell_h = img_height as f32 / rows as f32;

    for cy in 0..rows {
        for cx in 0..cols {
            let start_x = ((cx as f32 * cell_w) as u32).min(img_width - 1);
            let end_x = (((cx + 1) as f32 * cell_w) as u32).clamp(start_x + 1, img_width);
            let start_y = ((cy as f32 * cell_h) as u32).min(img_height - 1);
            let end_y = (((cy + 1) as f32 * cell_h) as u32).clamp(start_y + 1, img_height);

            let mut sum = [0u32; 3];
            let mut count = 0u32;
            for py in start_y..end_y {
                for px in start_x..end_x {
                    let p = image.get_pixel(px, py);
                    sum[0] += p[0] as u32;
                    sum[1] += p[1] as u32;
                    sum[2] += p[2] as u32;
                    count += 1;
                }
            }

            cells.push(CellColor {
                r: (sum[0] / count) as u8,
                g: (sum[1] / count) as u8,
                b: (sum[2] / count) as u8,
            });
        }
    }

    cells
}

/// Grid size for a half-block rendering `max_cols` wide.
///
/// Returns `(cols, pixel_rows)`; pixel rows are always even since each text
/// line holds two of them.
pub fn grid_size(img_width: u32, img_height: u32, max_cols: u16) -> (u16, u16) {
    if img_width == 0 || img_height == 0 || max_cols == 0 {
        return (0, 0);
    }
    let cols = max_cols.min(img_width.min(u16::MAX as u32) as u16);
    let rows = (cols as f32 * img_height as f32 / img_width as f32).round() as u16;
    let rows = rows.max(2);
    (cols, rows + rows % 2)
}

/// Render `image` as ANSI truecolor half blocks, one `String` line per text row.
pub fn render_half_blocks(image: &RgbImage, max_cols: u16) -> String {
    let (cols, rows) = grid_size(image.width(), image.height(), max_cols);
    let cells = downsample_colors(image, cols, rows);
    if cells.is_empty() {
        return String::new();
    }

    let cols = cols as usize;
    let mut out = String::new();
    for pair in cells.chunks_exact(cols * 2) {
        let (top, bottom) = pair.split_at(cols);
        for (t, b) in top.iter().zip(bottom) {
            let _ = write!(
                out,
                "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m\u{2580}",
                t.r, t.g, t.b, b.r, b.g, b.b
            );
        }
        out.push_str("\x1b[0m\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_thumbnail_keeps_small_images() {
        let image = RgbImage::from_pixel(300, 300, Rgb([1, 2, 3]));
        assert_eq!(thumbnail(&image), image);
    }

    #[test]
    fn test_thumbnail_fits_wide_frame() {
        let image = RgbImage::new(1280, 720);
        assert_eq!(thumbnail(&image).dimensions(), (300, 168));
    }

    #[test]
    fn test_thumbnail_fits_tall_frame() {
        let image = RgbImage::new(600, 1200);
        assert_eq!(thumbnail(&image).dimensions(), (150, 300));
    }

    #[test]
    fn test_grid_size_even_rows() {
        assert_eq!(grid_size(300, 300, 48), (48, 48));
        assert_eq!(grid_size(300, 168, 48), (48, 28));
        assert_eq!(grid_size(0, 10, 48), (0, 0));
    }

    #[test]
    fn test_downsample_averages_cells() {
        let mut image = RgbImage::from_pixel(4, 2, Rgb([0, 0, 0]));
        image.put_pixel(0, 0, Rgb([200, 100, 40]));
        image.put_pixel(1, 1, Rgb([200, 100, 40]));

        let cells = downsample_colors(&image, 2, 1);

        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0], CellColor { r: 100, g: 50, b: 20 });
        assert_eq!(cells[1], CellColor::default());
    }

    #[test]
    fn test_downsample_upscales_without_empty_cells() {
        let image = RgbImage::from_pixel(1, 1, Rgb([9, 8, 7]));
        let cells = downsample_colors(&image, 3, 2);
        assert!(cells.iter().all(|c| *c == CellColor { r: 9, g: 8, b: 7 }));
    }

    #[test]
    fn test_render_half_blocks_line_count() {
        let image = RgbImage::from_pixel(10, 10, Rgb([255, 255, 255]));
        let rendered = render_half_blocks(&image, 4);

        assert_eq!(rendered.lines().count(), 2);
        assert_eq!(rendered.matches('\u{2580}').count(), 8);
        assert!(rendered.contains("\x1b[38;2;255;255;255m"));
    }
}
