// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Reduce a simplified outline to four ordered corners and settle them on the
// contour.

use scanwerk_core::{BoundingBox, Point};

/// Pick four corners from a simplified outline.
///
/// With at least four vertices, they are sorted by angle around their
/// centroid (ascending `atan2` in image coordinates, which starts at the
/// top-left for an upright document) and, when more than four remain,
/// sampled at quarter steps. With fewer, the bounding box of `fallback` (the
/// largest contour) is used. An empty result means no document was found.
pub fn select_corners(simplified: &[Point], fallback: Option<&[Point]>) -> Vec<Point> {
    if simplified.len() >= 4 {
        return order_by_angle(simplified);
    }
    fallback
        .and_then(BoundingBox::of)
        .map(|bbox| bbox.corners().to_vec())
        .unwrap_or_default()
}

fn order_by_angle(points: &[Point]) -> Vec<Point> {
    let n = points.len() as f64;
    let cx = points.iter().map(|p| f64::from(p.x)).sum::<f64>() / n;
    let cy = points.iter().map(|p| f64::from(p.y)).sum::<f64>() / n;
    let angle = |p: &Point| (f64::from(p.y) - cy).atan2(f64::from(p.x) - cx);

    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| angle(a).total_cmp(&angle(b)));

    if sorted.len() == 4 {
        return sorted;
    }
    let step = sorted.len() as f64 / 4.0;
    (0..4)
        .map(|k| sorted[(k as f64 * step).floor() as usize])
        .collect()
}

/// Move each corner to the contour point that reaches furthest along the
/// corner's outward bisector, looking no further than `radius` pixels away.
///
/// Smoothing rounds a sharp corner into a short curve and simplification may
/// keep a vertex from one end of it; the apex of that curve is the point
/// furthest out along the bisector. A corner with no contour point in range,
/// or whose neighbours leave no bisector, stays where it is.
pub fn refine_corners(corners: &[Point], contour: &[Point], radius: f64) -> Vec<Point> {
    let n = corners.len();
    if n < 3 {
        return corners.to_vec();
    }

    (0..n)
        .map(|i| {
            let corner = corners[i];
            let (ax, ay) = unit(corners[(i + n - 1) % n], corner);
            let (bx, by) = unit(corners[(i + 1) % n], corner);
            let (ux, uy) = (ax + bx, ay + by);
            if ux.hypot(uy) < 1e-9 {
                return corner;
            }
            let reach =
                |p: &Point| f64::from(p.x - corner.x) * ux + f64::from(p.y - corner.y) * uy;

            contour
                .iter()
                .filter(|p| p.distance(&corner) <= radius)
                .fold(None, |best: Option<(Point, f64)>, p| {
                    let r = reach(p);
                    match best {
                        Some((_, b)) if b >= r => best,
                        _ => Some((*p, r)),
                    }
                })
                .map_or(corner, |(p, _)| p)
        })
        .collect()
}

/// Unit vector from `from` towards `to`, or zero when they coincide.
fn unit(from: Point, to: Point) -> (f64, f64) {
    let (dx, dy) = (f64::from(to.x - from.x), f64::from(to.y - from.y));
    let len = dx.hypot(dy);
    if len == 0.0 {
        (0.0, 0.0)
    } else {
        (dx / len, dy / len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: [Point; 4] = [
        Point::new(20, 20),
        Point::new(80, 20),
        Point::new(80, 80),
        Point::new(20, 80),
    ];

    #[test]
    fn square_corners_regardless_of_start() {
        for shift in 0..4 {
            let mut input = SQUARE.to_vec();
            input.rotate_left(shift);
            assert_eq!(select_corners(&input, None), SQUARE.to_vec(), "shift {shift}");
        }
    }

    #[test]
    fn reversed_winding_is_normalised() {
        let mut input = SQUARE.to_vec();
        input.reverse();
        assert_eq!(select_corners(&input, None), SQUARE.to_vec());
    }

    #[test]
    fn dense_square_is_subsampled_to_its_box() {
        let mut dense = Vec::new();
        for (i, &c) in SQUARE.iter().enumerate() {
            let next = SQUARE[(i + 1) % 4];
            dense.push(c);
            dense.push(Point::new((c.x + next.x) / 2, (c.y + next.y) / 2));
        }
        for shift in 0..dense.len() {
            let mut input = dense.clone();
            input.rotate_left(shift);
            let corners = select_corners(&input, None);
            assert_eq!(corners.len(), 4);
            let bbox = BoundingBox::of(&corners).unwrap();
            assert_eq!(bbox.corners().to_vec(), SQUARE.to_vec());
        }
    }

    #[test]
    fn too_few_vertices_fall_back_to_bounding_box() {
        let contour = vec![Point::new(3, 40), Point::new(50, 4), Point::new(90, 70)];
        let corners = select_corners(&contour[..2], Some(contour.as_slice()));
        assert_eq!(
            corners,
            vec![
                Point::new(3, 4),
                Point::new(90, 4),
                Point::new(90, 70),
                Point::new(3, 70)
            ]
        );
    }

    #[test]
    fn nothing_found_is_empty() {
        assert!(select_corners(&[], None).is_empty());
        assert!(select_corners(&[Point::new(1, 1)], Some(&[][..])).is_empty());
    }

    /// Clockwise outline of (0,0)-(40,40) whose top-right and bottom-left
    /// corners are rounded off over three pixels.
    fn chamfered_square() -> Vec<Point> {
        let mut walk: Vec<Point> = (0..=37).map(|x| Point::new(x, 0)).collect();
        walk.extend([Point::new(38, 1), Point::new(39, 1), Point::new(40, 1)]);
        walk.extend((2..=40).map(|y| Point::new(40, y)));
        walk.extend((0..40).rev().map(|x| Point::new(x, 40)));
        walk.extend((38..40).rev().map(|y| Point::new(0, y)));
        walk.extend([Point::new(1, 37), Point::new(1, 36), Point::new(1, 35)]);
        walk.extend((1..35).rev().map(|y| Point::new(0, y)));
        walk
    }

    #[test]
    fn rounded_corners_settle_on_their_apex() {
        let start_of_curve = vec![
            Point::new(0, 0),
            Point::new(37, 0),
            Point::new(40, 40),
            Point::new(0, 38),
        ];
        let refined = refine_corners(&start_of_curve, &chamfered_square(), 4.0);
        assert_eq!(
            refined,
            vec![
                Point::new(0, 0),
                Point::new(40, 1),
                Point::new(40, 40),
                Point::new(0, 40)
            ]
        );
    }

    #[test]
    fn corners_out_of_range_are_kept() {
        let far = vec![
            Point::new(100, 100),
            Point::new(140, 100),
            Point::new(140, 140),
            Point::new(100, 140),
        ];
        assert_eq!(refine_corners(&far, &chamfered_square(), 3.0), far);
    }

    #[test]
    fn fewer_than_three_corners_pass_through() {
        let pair = vec![Point::new(0, 0), Point::new(5, 5)];
        assert_eq!(refine_corners(&pair, &chamfered_square(), 10.0), pair);
    }
}
