// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanwerk-vision — Document detection and rectification for Scanwerk.
//
// Provides the edge pipeline (grayscale, Gaussian smoothing, Sobel gradient,
// non-maximum suppression, hysteresis), contour tracing and simplification,
// corner selection, rectification of the detected page, and encoding of the
// result for hand-off.

pub mod contour;
pub mod detect;
pub mod edges;
pub mod encode;
pub mod raster;
pub mod rectify;

// Re-export the entry points so callers can use `scanwerk_vision::detect_document` etc.
pub use detect::{DetectionReport, detect_document, detect_with_report};
pub use edges::edge_mask;
pub use encode::{encode_jpeg, encode_png};
pub use raster::{ScalarField, from_packed};
pub use rectify::{output_size, rectify};
