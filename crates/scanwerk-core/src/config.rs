// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanner configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

/// How the capture step flattens the detected quadrilateral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RectifyMode {
    /// Mask the source to the quadrilateral and copy it onto a canvas sized
    /// from the quad's sides. Non-rectangular quads are not flattened.
    ClipAndCopy,
    /// Inverse-map every output pixel through the quad's homography.
    #[default]
    Perspective,
}

/// Tuning knobs for a single detection pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorParams {
    /// Strong-edge threshold as a fraction of the strongest suppressed gradient.
    pub high_ratio: f32,
    /// Weak-edge threshold as a fraction of the strongest suppressed gradient.
    pub low_ratio: f32,
    /// Contours with fewer points are treated as noise.
    pub min_contour_len: usize,
    /// Douglas-Peucker tolerance as a fraction of the contour's arc length.
    pub epsilon_ratio: f64,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            high_ratio: 0.15,
            low_ratio: 0.05,
            min_contour_len: 50,
            epsilon_ratio: 0.02,
        }
    }
}

/// Scanner session settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Minimum time between two detection passes, in milliseconds.
    pub tick_interval_ms: u64,
    /// Start looping as soon as the camera is acquired.
    pub detect_on_start: bool,
    /// Edge/contour detection parameters.
    pub detector: DetectorParams,
    /// Rectification strategy used by `capture`.
    pub rectify_mode: RectifyMode,
    /// JPEG quality (1-100) for encoded captures.
    pub jpeg_quality: u8,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 120,
            detect_on_start: true,
            detector: DetectorParams::default(),
            rectify_mode: RectifyMode::default(),
            jpeg_quality: 90,
        }
    }
}

impl ScanConfig {
    /// Load a JSON configuration file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// The throttling interval as a `Duration`.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        let d = &self.detector;
        if self.tick_interval_ms == 0 {
            return Err(ScanError::Config("tick_interval_ms must be non-zero".into()));
        }
        if !(d.high_ratio > 0.0 && d.high_ratio <= 1.0) {
            return Err(ScanError::Config(format!(
                "high_ratio must be in (0, 1], got {}",
                d.high_ratio
            )));
        }
        if !(d.low_ratio > 0.0 && d.low_ratio <= d.high_ratio) {
            return Err(ScanError::Config(format!(
                "low_ratio must be in (0, high_ratio], got {}",
                d.low_ratio
            )));
        }
        if d.epsilon_ratio < 0.0 {
            return Err(ScanError::Config(format!(
                "epsilon_ratio must not be negative, got {}",
                d.epsilon_ratio
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ScanError::Config(format!(
                "jpeg_quality must be in 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ScanConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tick_interval(), Duration::from_millis(120));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: ScanConfig =
            serde_json::from_str(r#"{"tick_interval_ms": 100, "rectify_mode": "clip_and_copy"}"#)
                .unwrap();
        assert_eq!(config.tick_interval_ms, 100);
        assert_eq!(config.rectify_mode, RectifyMode::ClipAndCopy);
        assert_eq!(config.detector, DetectorParams::default());
    }

    #[test]
    fn low_above_high_is_rejected() {
        let mut config = ScanConfig::default();
        config.detector.low_ratio = 0.5;
        assert!(matches!(config.validate(), Err(ScanError::Config(_))));
    }

    #[test]
    fn zero_quality_is_rejected() {
        let config = ScanConfig {
            jpeg_quality: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn save_then_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.json");
        let config = ScanConfig {
            tick_interval_ms: 80,
            detect_on_start: false,
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(ScanConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"detector": {"high_ratio": 2.0}}"#).unwrap();
        assert!(matches!(ScanConfig::load(&path), Err(ScanError::Config(_))));
    }
}
