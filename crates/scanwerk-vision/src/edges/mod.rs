// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edge detection stages: grayscale, smoothing, Sobel gradient, non-maximum
// suppression, and hysteresis linking.

pub mod gradient;
pub mod grayscale;
pub mod hysteresis;
pub mod nms;
pub mod smooth;

use image::{GrayImage, RgbaImage};
use scanwerk_core::DetectorParams;
use tracing::{debug, instrument};

pub use gradient::{Gradient, sobel};
pub use grayscale::to_intensity;
pub use hysteresis::link;
pub use nms::suppress;
pub use smooth::smooth;

/// Run stages 1-5 on a color frame and return the binary edge mask.
#[instrument(skip_all, fields(width = color.width(), height = color.height()))]
pub fn edge_mask(color: &RgbaImage, params: &DetectorParams) -> GrayImage {
    let gray = to_intensity(color);
    let smoothed = smooth(&gray);
    let gradient = sobel(&smoothed);
    let thin = suppress(&gradient);
    debug!(max_magnitude = thin.max_value(), "gradient suppressed");
    link(&thin, params.high_ratio, params.low_ratio)
}
