// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One document detection pass over a frame.

use std::time::{Duration, Instant};

use image::RgbaImage;
use scanwerk_core::{DetectorParams, Point, Quad};
use tracing::{debug, instrument};

use crate::contour::{
    Contour, arc_length, refine_corners, select_corners, simplify, trace_contours,
};
use crate::edges::edge_mask;
use crate::raster::count_edge_pixels;

/// Corners are searched for their apex at least this far out, even on short
/// contours.
const MIN_REFINE_RADIUS: f64 = 3.0;

/// What one detection pass found, with per-pass diagnostics.
#[derive(Debug, Clone, Default)]
pub struct DetectionReport {
    /// Detected outline, or `None` when no document was found.
    pub quad: Option<Quad>,
    pub edge_pixels: usize,
    pub contour_count: usize,
    pub longest_contour: usize,
    pub simplified_vertices: usize,
    pub elapsed: Duration,
}

impl DetectionReport {
    pub fn found(&self) -> bool {
        self.quad.is_some()
    }
}

/// Find the document outline in a frame. `None` means "not found".
pub fn detect_document(frame: &RgbaImage, params: &DetectorParams) -> Option<Quad> {
    detect_with_report(frame, params).quad
}

/// Run a full detection pass and report what each stage produced.
#[instrument(skip_all, fields(width = frame.width(), height = frame.height()))]
pub fn detect_with_report(frame: &RgbaImage, params: &DetectorParams) -> DetectionReport {
    let started = Instant::now();

    let mask = edge_mask(frame, params);
    let contours = trace_contours(&mask, params.min_contour_len);
    let longest = contours.iter().max_by_key(|c| c.len());

    let mut report = DetectionReport {
        edge_pixels: count_edge_pixels(&mask),
        contour_count: contours.len(),
        longest_contour: longest.map_or(0, Vec::len),
        ..Default::default()
    };

    if let Some(contour) = longest {
        let epsilon = params.epsilon_ratio * arc_length(contour);
        let outline = outline(contour, epsilon);
        report.simplified_vertices = outline.len();
        let corners = select_corners(&outline, Some(contour.as_slice()));
        let corners = refine_corners(&corners, contour, epsilon.max(MIN_REFINE_RADIUS));
        report.quad = Quad::try_from(corners.as_slice()).ok();
    }

    report.elapsed = started.elapsed();
    debug!(
        found = report.found(),
        edge_pixels = report.edge_pixels,
        contours = report.contour_count,
        longest = report.longest_contour,
        vertices = report.simplified_vertices,
        elapsed_us = report.elapsed.as_micros() as u64,
        "detection pass complete"
    );
    report
}

/// Simplify a contour to within `epsilon` pixels.
///
/// A walk that came back around to its start is a closed loop. The loop is
/// re-anchored on the point furthest from the raster-order start pixel, which
/// is a true extreme vertex, and the trailing vertex that merely closes the
/// loop is dropped.
fn outline(contour: &Contour, epsilon: f64) -> Vec<Point> {
    let (Some(&first), Some(last)) = (contour.first(), contour.last()) else {
        return Vec::new();
    };
    if contour.len() < 3 || !first.is_adjacent(last) {
        return simplify(contour, epsilon);
    }

    let anchor = contour
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.distance(&first).total_cmp(&b.distance(&first)))
        .map_or(0, |(i, _)| i);
    let mut ring = Vec::with_capacity(contour.len());
    ring.extend_from_slice(&contour[anchor..]);
    ring.extend_from_slice(&contour[..anchor]);

    let mut simplified = simplify(&ring, epsilon);
    let closes = simplified
        .last()
        .is_some_and(|tail| tail.distance(&ring[0]) <= epsilon.max(1.5));
    if simplified.len() > 1 && closes {
        simplified.pop();
    }
    simplified
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn square_frame() -> RgbaImage {
        RgbaImage::from_fn(200, 200, |x, y| {
            if (50..150).contains(&x) && (50..150).contains(&y) {
                WHITE
            } else {
                BLACK
            }
        })
    }

    #[test]
    fn white_square_yields_its_corners() {
        let quad = detect_document(&square_frame(), &DetectorParams::default())
            .expect("square should be found");

        let truth = [
            Point::new(50, 50),
            Point::new(150, 50),
            Point::new(150, 150),
            Point::new(50, 150),
        ];
        for t in truth {
            let nearest = quad
                .corners
                .iter()
                .map(|c| c.distance(&t))
                .fold(f64::INFINITY, f64::min);
            assert!(nearest <= 3.0, "no corner near {t:?}: {quad:?}");
        }
    }

    /// Even-odd fill of `polygon`, sampled at pixel centres.
    fn polygon_frame(width: u32, height: u32, polygon: &[(f64, f64)]) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            let (px, py) = (f64::from(x) + 0.5, f64::from(y) + 0.5);
            let mut inside = false;
            for (i, &(x1, y1)) in polygon.iter().enumerate() {
                let (x2, y2) = polygon[(i + 1) % polygon.len()];
                if (y1 > py) != (y2 > py) && px < x1 + (py - y1) * (x2 - x1) / (y2 - y1) {
                    inside = !inside;
                }
            }
            if inside { WHITE } else { BLACK }
        })
    }

    #[test]
    fn skewed_quad_yields_its_corners_in_order() {
        let truth = [(40.0, 50.0), (160.0, 30.0), (170.0, 150.0), (30.0, 170.0)];
        let frame = polygon_frame(200, 200, &truth);
        let quad = detect_document(&frame, &DetectorParams::default())
            .expect("quad should be found");

        for (corner, (tx, ty)) in quad.corners.iter().zip(truth) {
            let t = Point::new(tx as i32, ty as i32);
            assert!(corner.distance(&t) <= 3.0, "{corner:?} too far from {t:?}: {quad:?}");
        }
    }

    #[test]
    fn offset_rectangles_keep_corners_within_three_pixels() {
        for (x0, y0, x1, y1) in [(30, 20, 170, 130), (20, 30, 130, 140), (60, 40, 180, 170)] {
            let frame = RgbaImage::from_fn(200, 180, |x, y| {
                if (x0..x1).contains(&x) && (y0..y1).contains(&y) {
                    WHITE
                } else {
                    BLACK
                }
            });
            let quad = detect_document(&frame, &DetectorParams::default())
                .expect("rectangle should be found");
            let truth = [(x0, y0), (x1, y0), (x1, y1), (x0, y1)];
            for (corner, (tx, ty)) in quad.corners.iter().zip(truth) {
                let t = Point::new(tx as i32, ty as i32);
                assert!(corner.distance(&t) <= 3.0, "{corner:?} vs {t:?}: {quad:?}");
            }
        }
    }

    #[test]
    fn white_square_corners_are_ordered_clockwise_from_top_left() {
        let quad = detect_document(&square_frame(), &DetectorParams::default()).unwrap();
        assert!(quad.top_left().x < quad.top_right().x);
        assert!(quad.top_right().y < quad.bottom_right().y);
        assert!(quad.bottom_right().x > quad.bottom_left().x);
        assert!(quad.bottom_left().y > quad.top_left().y);
    }

    #[test]
    fn black_frame_is_not_found() {
        let frame = RgbaImage::from_pixel(200, 200, BLACK);
        let report = detect_with_report(&frame, &DetectorParams::default());
        assert!(report.quad.is_none());
        assert_eq!(report.edge_pixels, 0);
        assert_eq!(report.contour_count, 0);
    }

    #[test]
    fn tiny_frame_does_not_panic() {
        let frame = RgbaImage::from_pixel(2, 3, WHITE);
        assert!(detect_document(&frame, &DetectorParams::default()).is_none());
    }

    #[test]
    fn small_blob_is_noise() {
        // Outline of a 6x6 patch is far below the 50-point contour minimum.
        let frame = RgbaImage::from_fn(100, 100, |x, y| {
            if (40..46).contains(&x) && (40..46).contains(&y) {
                WHITE
            } else {
                BLACK
            }
        });
        let report = detect_with_report(&frame, &DetectorParams::default());
        assert!(report.edge_pixels > 0);
        assert!(report.quad.is_none());
    }

    fn square_walk(start_offset: i32) -> Contour {
        // Clockwise walk around (0,0)-(20,20) starting `start_offset` pixels
        // along the top edge.
        let mut ring: Contour = (0..=20).map(|x| Point::new(x, 0)).collect();
        ring.extend((1..=20).map(|y| Point::new(20, y)));
        ring.extend((0..20).rev().map(|x| Point::new(x, 20)));
        ring.extend((1..20).rev().map(|y| Point::new(0, y)));
        ring.rotate_left(start_offset as usize);
        ring
    }

    #[test]
    fn closed_outline_keeps_only_true_corners() {
        for offset in [0, 3, 10] {
            let walk = square_walk(offset);
            let out = outline(&walk, 0.02 * arc_length(&walk));
            assert_eq!(out.len(), 4, "offset {offset}: {out:?}");
            for corner in [(0, 0), (20, 0), (20, 20), (0, 20)] {
                assert!(out.contains(&Point::from(corner)), "offset {offset}: {out:?}");
            }
        }
    }

    #[test]
    fn open_outline_keeps_its_endpoints() {
        let walk: Contour = (0..=30)
            .map(|x| Point::new(x, 0))
            .chain((1..=30).map(|y| Point::new(30, y)))
            .collect();
        assert_eq!(
            outline(&walk, 0.02 * arc_length(&walk)),
            vec![Point::new(0, 0), Point::new(30, 0), Point::new(30, 30)]
        );
    }
}
