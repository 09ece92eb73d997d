// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

use crate::classifier::Classifier;
use crate::messages::{CameraFrame, LightState, TrafficLight};
use log::warn;

/// Turns the latest camera frame into a light color for the selected candidate.
///
/// No smoothing happens here, every reading is passed on as is.
pub struct LightStateResolver {
    classifier: Box<dyn Classifier>,
}

impl LightStateResolver {
    pub fn new(classifier: Box<dyn Classifier>) -> Self {
        Self { classifier }
    }

    /// Resolve the state of `light`.
    ///
    /// Without a frame, with a frame whose buffer does not match its
    /// geometry, or if the classifier fails, the state is
    /// [LightState::Unknown]; a color is never made up.
    pub fn resolve(&mut self, frame: Option<&CameraFrame>, light: &TrafficLight) -> LightState {
        let Some(frame) = frame else {
            return LightState::Unknown;
        };
        if !frame.is_consistent() {
            warn!(
                "Dropping malformed frame at {}: {} bytes for {}x{} {:?}",
                frame.timestamp,
                frame.data.len(),
                frame.width,
                frame.height,
                frame.encoding
            );
            return LightState::Unknown;
        }
        match self.classifier.classify(frame, light) {
            Ok(state) => state,
            Err(e) => {
                warn!("Failed to classify frame at {}: {e}", frame.timestamp);
                LightState::Unknown
            }
        }
    }
}

impl std::fmt::Debug for LightStateResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("LightStateResolver")
    }
}
