//! Checkbox detection in binarized sheet images.

use image::{DynamicImage, GrayImage};
use imageproc::contours::find_contours;
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use log::{debug, trace};

use crate::binarize::adaptive_inverted;
use crate::geom::{bounding_rect, dist_sq, is_convex, polygon_area, Rect};

/// Tunable knobs for checkbox detection.  The defaults were calibrated
/// against scanned sheets at their original resolution; sheets scanned
/// at a different scale will need different area bounds.
#[derive(Clone, Debug)]
pub struct DetectParams {
    /// Window size for adaptive binarization.
    pub block_size: u32,
    /// How much darker than the local mean a pixel must be to count as ink.
    pub offset: f64,
    /// Smallest acceptable contour area, in square pixels.
    pub min_area: f64,
    /// Largest acceptable contour area, in square pixels.
    pub max_area: f64,
    /// How far from square a box's aspect ratio may stray.
    pub aspect_ratio_tol: f64,
    /// Polygon approximation tolerance, as a fraction of contour perimeter.
    pub approx_poly_epsilon: f64,
    /// Boxes whose centers are closer than this squared distance are
    /// treated as duplicate detections of the same checkbox.
    pub min_dist_sq: i64,
}

impl Default for DetectParams {
    fn default() -> DetectParams {
        DetectParams {
            block_size: 15,
            offset: 5.0,
            min_area: 100.0,
            max_area: 250.0,
            aspect_ratio_tol: 0.25,
            approx_poly_epsilon: 0.04,
            min_dist_sq: 100,
        }
    }
}

/// Find candidate checkbox rectangles in an ink mask.
///
/// Every boundary contour (outer borders and hole borders alike) is
/// simplified to a polygon; only near-square, convex quadrilaterals
/// whose raw contour area falls inside the configured bounds survive.
/// The result is in contour-discovery order, not sorted.
pub fn detect_boxes(mask: &GrayImage, params: &DetectParams) -> Vec<Rect> {
    let contours = find_contours::<i32>(mask);
    trace!("found {} contours", contours.len());

    let mut boxes = vec![];
    for contour in &contours {
        if contour.points.len() < 4 {
            continue;
        }
        let perimeter = arc_length(&contour.points, true);
        let approx =
            approximate_polygon_dp(&contour.points, params.approx_poly_epsilon * perimeter, true);
        if approx.len() != 4 || !is_convex(&approx) {
            continue;
        }
        let rect = bounding_rect(&approx);
        let area = polygon_area(&contour.points);
        // Degenerate rectangles get an aspect ratio of 0, which always
        // fails the near-square check.
        let aspect_ratio = if rect.height() != 0 {
            cast::f64(rect.width()) / cast::f64(rect.height())
        } else {
            0.0
        };
        if area >= params.min_area
            && area <= params.max_area
            && (aspect_ratio - 1.0).abs() <= params.aspect_ratio_tol
        {
            trace!(
                "kept box at ({}, {}) {}x{} area {}",
                rect.left(),
                rect.top(),
                rect.width(),
                rect.height(),
                area
            );
            boxes.push(rect);
        }
    }
    boxes
}

/// Collapse near-duplicate detections of the same physical checkbox.
///
/// Greedy single-pass clustering in input order: each not-yet-consumed
/// box becomes a survivor and consumes every later box whose center lies
/// within `min_dist_sq` of its own.  Consumed boxes are not compared
/// again, so the result depends on input order; this mirrors the
/// behavior the overlay files have always been generated with and must
/// not be replaced with symmetric clustering.
///
/// Survivors are returned sorted ascending by `(top, left)`.
pub fn deduplicate(boxes: &[Rect], min_dist_sq: i64) -> Vec<Rect> {
    let centers: Vec<(i64, i64)> = boxes.iter().map(Rect::center).collect();
    let mut used = vec![false; boxes.len()];
    let mut survivors = vec![];
    for i in 0..boxes.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        survivors.push(boxes[i].clone());
        for j in (i + 1)..boxes.len() {
            if !used[j] && dist_sq(centers[i], centers[j]) < min_dist_sq {
                used[j] = true;
            }
        }
    }
    survivors.sort_by_key(|b| (b.top(), b.left()));
    survivors
}

/// Run the full checkbox pipeline over a decoded sheet image: grayscale,
/// adaptive binarization, contour filtering and de-duplication.
pub fn find_checkboxes(img: &DynamicImage, params: &DetectParams) -> Vec<Rect> {
    let gray = img.to_luma8();
    let mask = adaptive_inverted(&gray, params.block_size, params.offset);
    let raw = detect_boxes(&mask, params);
    debug!("{} raw detections before de-duplication", raw.len());
    deduplicate(&raw, params.min_dist_sq)
}

#[cfg(test)]
mod test {
    use image::Luma;
    use quickcheck::quickcheck;

    use super::*;

    /// Draw the 1px outline of a square checkbox into a mask.
    fn draw_box_outline(mask: &mut GrayImage, left: u32, top: u32, size: u32) {
        for i in 0..size {
            mask.put_pixel(left + i, top, Luma([255]));
            mask.put_pixel(left + i, top + size - 1, Luma([255]));
            mask.put_pixel(left, top + i, Luma([255]));
            mask.put_pixel(left + size - 1, top + i, Luma([255]));
        }
    }

    #[test]
    fn detects_checkbox_outlines_and_collapses_their_borders() {
        let _ = env_logger::try_init();

        let mut mask = GrayImage::new(300, 200);
        // Two 13x13 checkboxes, like the damage boxes on a real sheet.
        draw_box_outline(&mut mask, 50, 40, 13);
        draw_box_outline(&mut mask, 200, 120, 13);

        let params = DetectParams::default();
        let raw = detect_boxes(&mask, &params);
        // Each outline produces an outer border and a hole border; all of
        // them must pass the area, aspect and convexity gates.
        assert!(raw.len() >= 2);
        for rect in &raw {
            let aspect = cast::f64(rect.width()) / cast::f64(rect.height());
            assert!((aspect - 1.0).abs() <= params.aspect_ratio_tol);
        }

        let boxes = deduplicate(&raw, params.min_dist_sq);
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].left(), 50);
        assert_eq!(boxes[0].top(), 40);
        assert_eq!(boxes[1].left(), 200);
        assert_eq!(boxes[1].top(), 120);
    }

    #[test]
    fn rejects_non_square_outlines() {
        let _ = env_logger::try_init();

        let mut mask = GrayImage::new(300, 200);
        // A 24x6 rectangle has a plausible area but is nowhere near square.
        for x in 0..24 {
            for d in [0, 5] {
                mask.put_pixel(50 + x, 40 + d, Luma([255]));
            }
        }
        for y in 0..6 {
            mask.put_pixel(50, 40 + y, Luma([255]));
            mask.put_pixel(73, 40 + y, Luma([255]));
        }

        assert!(detect_boxes(&mask, &DetectParams::default()).is_empty());
    }

    #[test]
    fn deduplication_is_order_dependent() {
        // dist_sq(a, b) and dist_sq(b, c) are both below the threshold,
        // but dist_sq(a, c) is not: a chain, not a clique.
        let a = Rect::ltwh(0, 0, 10, 10);
        let b = Rect::ltwh(8, 0, 10, 10);
        let c = Rect::ltwh(16, 0, 10, 10);
        let threshold = 100;

        // a consumes b, but c is out of a's reach and survives on its own.
        let forward = deduplicate(&[a.clone(), b.clone(), c.clone()], threshold);
        assert_eq!(forward, vec![a.clone(), c.clone()]);

        // With b first, b consumes both of its neighbors.  The surviving
        // set depends on scan order, not just on the point cloud.
        let middle_first = deduplicate(&[b.clone(), a, c], threshold);
        assert_eq!(middle_first, vec![b]);
    }

    #[test]
    fn deduplicate_accepts_empty_input() {
        assert!(deduplicate(&[], 100).is_empty());
    }

    quickcheck! {
        fn surviving_centers_are_all_far_apart(boxes: Vec<Rect>) -> bool {
            let survivors = deduplicate(&boxes, 100);
            survivors.iter().enumerate().all(|(i, a)| {
                survivors[i + 1..]
                    .iter()
                    .all(|b| dist_sq(a.center(), b.center()) >= 100)
            })
        }

        fn survivors_are_sorted_by_top_then_left(boxes: Vec<Rect>) -> bool {
            let survivors = deduplicate(&boxes, 100);
            survivors
                .windows(2)
                .all(|w| (w[0].top(), w[0].left()) <= (w[1].top(), w[1].left()))
        }
    }
}
