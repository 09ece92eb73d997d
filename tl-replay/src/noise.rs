// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tl_detector::error::Result;
use tl_detector::prelude::{CameraFrame, Classifier, LightState, TrafficLight};

/// Classifier misreading the wrapped classifier's answer now and then.
///
/// With probability `p` the reading is replaced by a random color.
pub struct NoisyClassifier<C> {
    inner: C,
    p: f64,
    rng: StdRng,
}

impl<C: Classifier> NoisyClassifier<C> {
    /// `p` must be within `0.0..=1.0`. Without a seed the generator is seeded from entropy.
    pub fn new(inner: C, p: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { inner, p, rng }
    }
}

impl<C: Classifier> Classifier for NoisyClassifier<C> {
    fn classify(&mut self, frame: &CameraFrame, light: &TrafficLight) -> Result<LightState> {
        let reading = self.inner.classify(frame, light)?;
        if !self.rng.gen_bool(self.p) {
            return Ok(reading);
        }
        let misread = match self.rng.gen_range(0..3) {
            0 => LightState::Red,
            1 => LightState::Yellow,
            _ => LightState::Green,
        };
        Ok(misread)
    }
}
