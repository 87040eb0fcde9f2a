//! Binarization of grayscale sheet images into ink masks.
//!
//! Both pipelines work on masks where ink is foreground (255) and paper
//! is background (0), so every threshold here is inverted.

use image::{GrayImage, Luma};
use imageproc::contrast::otsu_level;
use imageproc::map::map_colors;

/// Binarize with a global Otsu threshold, inverted: pixels at or below
/// the computed level (ink) become foreground.
pub fn otsu_inverted(gray: &GrayImage) -> GrayImage {
    let level = otsu_level(gray);
    map_colors(gray, |p| {
        if p[0] <= level {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Binarize with a local-mean adaptive threshold, inverted: a pixel
/// becomes foreground when it is more than `offset` levels darker than
/// the mean of the surrounding `block_size` x `block_size` window.  The
/// window is clamped at the image borders.
///
/// This handles sheets with uneven scan lighting, where a single global
/// threshold either drops faint boxes or swallows shaded regions.
pub fn adaptive_inverted(gray: &GrayImage, block_size: u32, offset: f64) -> GrayImage {
    let (width, height) = gray.dimensions();
    let mut out = GrayImage::new(width, height);
    if width == 0 || height == 0 {
        return out;
    }

    let w = width as usize;
    let h = height as usize;

    // Summed-area table with a zero row and column, so window sums
    // need no edge special-casing.
    let mut integral = vec![0u64; (w + 1) * (h + 1)];
    for y in 0..h {
        let mut row_sum = 0u64;
        for x in 0..w {
            // 'as' is safe here because x and y fit in u32.
            row_sum += u64::from(gray.get_pixel(x as u32, y as u32)[0]);
            integral[(y + 1) * (w + 1) + (x + 1)] = integral[y * (w + 1) + (x + 1)] + row_sum;
        }
    }

    let radius = i64::from(block_size / 2);
    for y in 0..h {
        for x in 0..w {
            let x0 = (x as i64 - radius).max(0) as usize;
            let y0 = (y as i64 - radius).max(0) as usize;
            let x1 = ((x as i64 + radius + 1).min(w as i64)) as usize;
            let y1 = ((y as i64 + radius + 1).min(h as i64)) as usize;
            let sum = integral[y1 * (w + 1) + x1] + integral[y0 * (w + 1) + x0]
                - integral[y0 * (w + 1) + x1]
                - integral[y1 * (w + 1) + x0];
            let count = ((x1 - x0) * (y1 - y0)) as f64;
            let mean = sum as f64 / count;
            let pixel = f64::from(gray.get_pixel(x as u32, y as u32)[0]);
            let value = if pixel < mean - offset { 255 } else { 0 };
            out.put_pixel(x as u32, y as u32, Luma([value]));
        }
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn adaptive_ignores_flat_regions() {
        let gray = GrayImage::from_pixel(32, 32, Luma([200]));
        let mask = adaptive_inverted(&gray, 15, 5.0);
        assert!(mask.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn adaptive_keeps_dark_marks_on_light_paper() {
        let mut gray = GrayImage::from_pixel(32, 32, Luma([255]));
        gray.put_pixel(16, 16, Luma([0]));
        let mask = adaptive_inverted(&gray, 15, 5.0);
        assert_eq!(mask.get_pixel(16, 16)[0], 255);
        assert_eq!(mask.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn otsu_separates_two_populations() {
        let mut gray = GrayImage::from_pixel(16, 16, Luma([230]));
        for x in 0..8 {
            gray.put_pixel(x, 0, Luma([20]));
        }
        let mask = otsu_inverted(&gray);
        assert_eq!(mask.get_pixel(0, 0)[0], 255);
        assert_eq!(mask.get_pixel(15, 15)[0], 0);
    }
}
