// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Greedy contour walk over a binary edge mask.
//
// This is not a topological border follower: each walk steps to the first
// unvisited edge neighbour it finds and stops when none is left, so it can
// end early at a branch point. Pixels left behind seed their own (usually
// short, and then discarded) contours.

use image::GrayImage;
use scanwerk_core::Point;

/// Ordered run of connected edge pixels.
pub type Contour = Vec<Point>;

/// Mask values above this count as edge pixels.
const EDGE_THRESHOLD: u8 = 128;

/// Neighbour search order: orthogonal steps first, then diagonals.
const NEIGHBOURS: [(i32, i32); 8] = [
    (1, 0),
    (0, 1),
    (-1, 0),
    (0, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
    (1, -1),
];

/// Walk every edge pixel into contours, visiting each pixel exactly once, and
/// keep those with at least `min_len` points.
pub fn trace_contours(mask: &GrayImage, min_len: usize) -> Vec<Contour> {
    let (width, height) = mask.dimensions();
    let (w, h) = (width as i32, height as i32);
    let raw = mask.as_raw();
    let mut visited = vec![false; raw.len()];
    let mut contours = Vec::new();

    let unvisited_edge = |visited: &[bool], x: i32, y: i32| -> Option<usize> {
        if x < 0 || y < 0 || x >= w || y >= h {
            return None;
        }
        let idx = y as usize * width as usize + x as usize;
        (!visited[idx] && raw[idx] > EDGE_THRESHOLD).then_some(idx)
    };

    for y in 0..h {
        for x in 0..w {
            let Some(start) = unvisited_edge(&visited, x, y) else {
                continue;
            };
            visited[start] = true;
            let mut contour = vec![Point::new(x, y)];
            let mut cur = Point::new(x, y);

            loop {
                let next = NEIGHBOURS.iter().find_map(|&(dx, dy)| {
                    let (nx, ny) = (cur.x + dx, cur.y + dy);
                    unvisited_edge(&visited, nx, ny).map(|idx| (idx, Point::new(nx, ny)))
                });
                let Some((idx, p)) = next else {
                    break;
                };
                visited[idx] = true;
                contour.push(p);
                cur = p;
            }

            if contour.len() >= min_len {
                contours.push(contour);
            }
        }
    }

    contours
}
