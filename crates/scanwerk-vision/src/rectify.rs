// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rectification: turn the detected quadrilateral into an upright page.

use image::{Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use scanwerk_core::error::{Result, ScanError};
use scanwerk_core::{BoundingBox, Point, Quad, RectifyMode};
use tracing::{debug, instrument};

/// Fill for output pixels with no source coverage.
const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Output size for a quad: the longer of each pair of opposite sides,
/// rounded, and at least one pixel.
pub fn output_size(quad: &Quad) -> (u32, u32) {
    let top = quad.top_left().distance(&quad.top_right());
    let bottom = quad.bottom_left().distance(&quad.bottom_right());
    let left = quad.top_left().distance(&quad.bottom_left());
    let right = quad.top_right().distance(&quad.bottom_right());
    let w = top.max(bottom).round().max(1.0) as u32;
    let h = left.max(right).round().max(1.0) as u32;
    (w, h)
}

/// Rectify the region of `source` outlined by `corners` (top-left, top-right,
/// bottom-right, bottom-left).
///
/// Anything other than exactly four corners, or a quad with no valid
/// projection, is a `ScanError::Rectification`; callers fall back to the
/// unrectified frame.
#[instrument(skip(source, corners), fields(width = source.width(), height = source.height()))]
pub fn rectify(source: &RgbaImage, corners: &[Point], mode: RectifyMode) -> Result<RgbaImage> {
    let quad = Quad::try_from(corners).map_err(|n| {
        ScanError::Rectification(format!("expected 4 corners, got {}", n))
    })?;
    let (w, h) = output_size(&quad);
    debug!(out_w = w, out_h = h, "rectified size");

    match mode {
        RectifyMode::ClipAndCopy => Ok(clip_and_copy(source, &quad, w, h)),
        RectifyMode::Perspective => perspective(source, &quad, w, h),
    }
}

/// Copy source pixels whose centres fall inside the quad onto a `w x h`
/// canvas anchored at the quad's bounding-box origin.
fn clip_and_copy(source: &RgbaImage, quad: &Quad, w: u32, h: u32) -> RgbaImage {
    let mut out = RgbaImage::from_pixel(w, h, BACKGROUND);
    let Some(bbox) = BoundingBox::of(quad.as_slice()) else {
        return out;
    };
    let polygon = quad.corners.map(|p| (f64::from(p.x), f64::from(p.y)));
    let (src_w, src_h) = (source.width() as i64, source.height() as i64);

    for (x, y, px) in out.enumerate_pixels_mut() {
        let sx = i64::from(bbox.min_x) + i64::from(x);
        let sy = i64::from(bbox.min_y) + i64::from(y);
        if sx < 0 || sy < 0 || sx >= src_w || sy >= src_h {
            continue;
        }
        if contains(&polygon, sx as f64 + 0.5, sy as f64 + 0.5) {
            *px = *source.get_pixel(sx as u32, sy as u32);
        }
    }
    out
}

/// Inverse-map the output rectangle through the quad's homography with
/// bilinear sampling.
///
/// Corners are pixel centres: the quad's corners land on the centres of the
/// first and last output columns and rows.
fn perspective(source: &RgbaImage, quad: &Quad, w: u32, h: u32) -> Result<RgbaImage> {
    if quad.area() < 1.0 {
        return Err(ScanError::Rectification(format!(
            "quad encloses no area: {:?}",
            quad.corners
        )));
    }
    let src = quad.corners.map(|p| (p.x as f32, p.y as f32));
    let (right, bottom) = ((w.max(2) - 1) as f32, (h.max(2) - 1) as f32);
    let dest = [(0.0, 0.0), (right, 0.0), (right, bottom), (0.0, bottom)];
    let projection = Projection::from_control_points(src, dest).ok_or_else(|| {
        ScanError::Rectification("quad has no projective mapping (degenerate corners)".into())
    })?;

    let mut out = RgbaImage::new(w, h);
    warp_into(source, &projection, Interpolation::Bilinear, BACKGROUND, &mut out);
    Ok(out)
}

/// Even-odd point-in-polygon test.
fn contains(polygon: &[(f64, f64); 4], px: f64, py: f64) -> bool {
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (xi, yi) = polygon[i];
        let (xj, yj) = polygon[j];
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}
