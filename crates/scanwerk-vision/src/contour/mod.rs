// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Outline stages: contour tracing, Douglas-Peucker simplification, and
// corner selection.

pub mod corners;
pub mod simplify;
pub mod trace;

pub use corners::{refine_corners, select_corners};
pub use simplify::{arc_length, simplify};
pub use trace::{Contour, trace_contours};
