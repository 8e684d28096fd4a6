// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Douglas-Peucker polyline simplification.

use scanwerk_core::Point;

/// Distance from `p` to the line through `a` and `b`, or to `a` when the
/// chord is degenerate.
fn perpendicular_distance(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (f64::from(b.x - a.x), f64::from(b.y - a.y));
    let len = dx.hypot(dy);
    if len == 0.0 {
        return p.distance(&a);
    }
    let cross = dx * f64::from(p.y - a.y) - dy * f64::from(p.x - a.x);
    cross.abs() / len
}

/// Reduce `points` to the vertices needed to stay within `epsilon` pixels of
/// the original polyline. Both endpoints are always kept.
///
/// The range holding the point furthest from its chord is split while that
/// distance exceeds `epsilon`; the ranges are walked with an explicit stack so
/// long contours cannot exhaust the call stack. A non-positive `epsilon`
/// returns the input unchanged.
pub fn simplify(points: &[Point], epsilon: f64) -> Vec<Point> {
    let n = points.len();
    if n < 3 || epsilon <= 0.0 {
        return points.to_vec();
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;
    let mut ranges = vec![(0usize, n - 1)];

    while let Some((first, last)) = ranges.pop() {
        if last <= first + 1 {
            continue;
        }
        let (a, b) = (points[first], points[last]);
        let mut split = first;
        let mut max_dist = 0.0;
        for (i, &p) in points.iter().enumerate().take(last).skip(first + 1) {
            let d = perpendicular_distance(p, a, b);
            if d > max_dist {
                max_dist = d;
                split = i;
            }
        }
        if max_dist > epsilon {
            keep[split] = true;
            ranges.push((split, last));
            ranges.push((first, split));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(&p, k)| k.then_some(p))
        .collect()
}

/// Total length of the open polyline through `points`.
pub fn arc_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(&w[1])).sum()
}
