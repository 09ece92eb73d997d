// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Detector configuration
//!
//! The configuration is loaded once at startup from a JSON document, e.g.
//!
//! ```json
//! {
//!     "stop_line_positions": [[1148.56, 1184.65], [1559.2, 1158.43]],
//!     "state_count_threshold": 3,
//!     "light_distance_threshold": 50.0,
//!     "classifier_timeout_ms": 100,
//!     "capture": { "enabled": true, "distance": 100.0, "interval_ms": 200, "directory": "images" }
//! }
//! ```
//!
//! Everything but `stop_line_positions` is optional.

use crate::debounce::STATE_COUNT_THRESHOLD;
use crate::error::{Error, Result};
use crate::messages::Point2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Distance below which the candidate light gets classified
pub const LIGHT_DISTANCE_THRESHOLD: f64 = 50.0;

/// Distance below which frames may be captured for the training dataset
pub const IMAGE_CAPTURE_DISTANCE: f64 = 100.0;

/// Minimum time between two captures of an unchanged light
pub const CAPTURE_INTERVAL_MS: u64 = 200;

/// Detector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Stop line per intersection, index aligned with the light observation feed
    pub stop_line_positions: Vec<[f64; 2]>,
    #[serde(default = "default_state_count_threshold")]
    pub state_count_threshold: u32,
    /// Relevance distance
    #[serde(default = "default_light_distance_threshold")]
    pub light_distance_threshold: f64,
    /// Upper bound for a single classification, unbounded if absent
    #[serde(default)]
    pub classifier_timeout_ms: Option<u64>,
    #[serde(default)]
    pub capture: CaptureConfig,
}

/// Dataset capture configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub enabled: bool,
    pub distance: f64,
    pub interval_ms: u64,
    pub directory: PathBuf,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            distance: IMAGE_CAPTURE_DISTANCE,
            interval_ms: CAPTURE_INTERVAL_MS,
            directory: PathBuf::from("images"),
        }
    }
}

impl CaptureConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

fn default_state_count_threshold() -> u32 {
    STATE_COUNT_THRESHOLD
}

fn default_light_distance_threshold() -> f64 {
    LIGHT_DISTANCE_THRESHOLD
}

impl DetectorConfig {
    /// Configuration with default thresholds for the given stop lines
    pub fn new(stop_lines: impl IntoIterator<Item = Point2>) -> Self {
        Self {
            stop_line_positions: stop_lines.into_iter().map(Into::into).collect(),
            state_count_threshold: STATE_COUNT_THRESHOLD,
            light_distance_threshold: LIGHT_DISTANCE_THRESHOLD,
            classifier_timeout_ms: None,
            capture: CaptureConfig::default(),
        }
    }

    /// Read and validate the configuration file at `path`
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Io((e, "failed to read configuration file")))?;
        Self::from_json(&content)
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: DetectorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the detector cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.state_count_threshold == 0 {
            return Err(Error::Config(
                "state_count_threshold must be at least 1".to_owned(),
            ));
        }
        if !(self.light_distance_threshold.is_finite() && self.light_distance_threshold > 0.0) {
            return Err(Error::Config(format!(
                "light_distance_threshold must be positive, got {}",
                self.light_distance_threshold
            )));
        }
        if let Some((i, _)) = self
            .stop_line_positions
            .iter()
            .enumerate()
            .find(|(_, [x, y])| !(x.is_finite() && y.is_finite()))
        {
            return Err(Error::Config(format!("stop line {i} is not finite")));
        }
        if self.classifier_timeout_ms == Some(0) {
            return Err(Error::Config(
                "classifier_timeout_ms must be positive".to_owned(),
            ));
        }
        if self.capture.enabled && !(self.capture.distance.is_finite() && self.capture.distance >= 0.0)
        {
            return Err(Error::Config(format!(
                "capture distance must not be negative, got {}",
                self.capture.distance
            )));
        }
        Ok(())
    }

    pub fn stop_lines(&self) -> Vec<Point2> {
        self.stop_line_positions.iter().copied().map(Point2::from).collect()
    }

    pub fn classifier_timeout(&self) -> Option<Duration> {
        self.classifier_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod test {
    use super::{DetectorConfig, CAPTURE_INTERVAL_MS, IMAGE_CAPTURE_DISTANCE};
    use crate::error::Error;
    use crate::messages::Point2;
    use std::time::Duration;

    #[test]
    fn minimal_config_uses_defaults() {
        let config =
            DetectorConfig::from_json(r#"{"stop_line_positions": [[1148.56, 1184.65]]}"#).unwrap();
        assert_eq!(config.stop_lines(), vec![Point2::new(1148.56, 1184.65)]);
        assert_eq!(config.state_count_threshold, 3);
        assert_eq!(config.light_distance_threshold, 50.0);
        assert_eq!(config.classifier_timeout(), None);
        assert!(!config.capture.enabled);
        assert_eq!(config.capture.distance, IMAGE_CAPTURE_DISTANCE);
        assert_eq!(config.capture.interval_ms, CAPTURE_INTERVAL_MS);
    }

    #[test]
    fn full_config() {
        let config = DetectorConfig::from_json(
            r#"{
                "stop_line_positions": [[0.0, 1.0], [2.0, 3.0]],
                "state_count_threshold": 5,
                "light_distance_threshold": 80.0,
                "classifier_timeout_ms": 100,
                "capture": { "enabled": true, "interval_ms": 500, "directory": "/tmp/tl" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.stop_lines().len(), 2);
        assert_eq!(config.state_count_threshold, 5);
        assert_eq!(config.classifier_timeout(), Some(Duration::from_millis(100)));
        assert!(config.capture.enabled);
        assert_eq!(config.capture.distance, IMAGE_CAPTURE_DISTANCE);
        assert_eq!(config.capture.interval(), Duration::from_millis(500));
    }

    #[test]
    fn invalid_values_are_rejected() {
        for json in [
            r#"{"stop_line_positions": [], "state_count_threshold": 0}"#,
            r#"{"stop_line_positions": [], "light_distance_threshold": -1.0}"#,
            r#"{"stop_line_positions": [], "classifier_timeout_ms": 0}"#,
            r#"{"stop_line_positions": [], "capture": {"enabled": true, "distance": -5.0}}"#,
        ] {
            assert!(
                matches!(DetectorConfig::from_json(json), Err(Error::Config(_))),
                "accepted {json}"
            );
        }
        assert!(matches!(
            DetectorConfig::from_json(r#"{"state_count_threshold": 3}"#),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            DetectorConfig::from_file("/nonexistent/tl-detector.json"),
            Err(Error::Io(_))
        ));
    }
}
