// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Training dataset capture
//!
//! While driving in simulation, frames showing the candidate light are stored
//! together with the ground truth state of that light. Capturing never
//! influences the published waypoint.

mod writer;

use crate::error::Result;
use crate::messages::{CameraFrame, LightState};
use crate::selector::Candidate;
use crate::timestamp::Timestamp;
use log::{error, trace};
use std::time::Duration;
pub use writer::{read_frame, DatasetWriter, FrameRecord, OwnedFrameRecord, INDEX_FILE_NAME};

/// Destination of captured frames
pub trait DatasetSink: Send {
    /// Store `frame` labelled with `label`
    fn write(&mut self, frame: &CameraFrame, label: LightState) -> Result<()>;
}

/// Decides which frames are worth capturing
#[derive(Debug, Clone)]
pub struct CapturePolicy {
    distance: f64,
    interval: Duration,
    last_capture: Option<Timestamp>,
}

impl CapturePolicy {
    pub fn new(distance: f64, interval: Duration) -> Self {
        Self {
            distance,
            interval,
            last_capture: None,
        }
    }

    /// Check whether to capture the frame taken at `timestamp`.
    ///
    /// A close enough light is captured whenever the detector currently reads
    /// something else than the ground truth, and otherwise at most once per
    /// interval. A positive answer counts as a capture.
    pub fn should_capture(
        &mut self,
        distance: f64,
        observed: LightState,
        ground_truth: LightState,
        timestamp: Timestamp,
    ) -> bool {
        if distance > self.distance {
            return false;
        }
        let due = self
            .last_capture
            .map_or(true, |last| timestamp >= last + self.interval);
        if observed != ground_truth || due {
            self.last_capture = Some(timestamp);
            return true;
        }
        false
    }
}

/// Capture policy combined with the sink receiving the frames
pub struct Capture {
    policy: CapturePolicy,
    sink: Box<dyn DatasetSink>,
}

impl Capture {
    pub fn new(policy: CapturePolicy, sink: Box<dyn DatasetSink>) -> Self {
        Self { policy, sink }
    }

    /// Offer the frame showing `candidate`; failures are logged and dropped
    pub fn offer(&mut self, frame: &CameraFrame, candidate: &Candidate, observed: LightState) {
        let label = candidate.light.state;
        if !self
            .policy
            .should_capture(candidate.distance, observed, label, frame.timestamp)
        {
            return;
        }
        trace!("Capturing frame at {} labelled {label}", frame.timestamp);
        if let Err(e) = self.sink.write(frame, label) {
            error!("Failed to capture frame at {}: {e}", frame.timestamp);
        }
    }
}

impl std::fmt::Debug for Capture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capture")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
