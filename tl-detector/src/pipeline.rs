// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Per-frame decision pipeline
//!
//! The [Pipeline] caches the latest pose, path and light observations and,
//! for every camera frame, runs candidate selection, light state resolution
//! and debouncing to decide which waypoint to publish.

use crate::capture::{Capture, CapturePolicy, DatasetSink, DatasetWriter};
use crate::classifier::{Classifier, TimeoutClassifier};
use crate::configuration::DetectorConfig;
use crate::debounce::Debouncer;
use crate::error::{Error, Result};
use crate::messages::{CameraFrame, LightState, Point2, Pose, TrafficLight, TrafficWaypoint};
use crate::resolver::LightStateResolver;
use crate::selector::{self, Candidate};
use crate::waypoints::WaypointIndex;
use log::{debug, warn};
use tracing::instrument;

/// Latest values received on the input feeds; the latest value wins
#[derive(Debug, Default, Clone)]
pub struct Snapshot {
    pub pose: Option<Pose>,
    /// Pose received before `pose`, to derive the direction of motion
    pub previous_pose: Option<Pose>,
    pub lights: Vec<TrafficLight>,
    pub frame: Option<CameraFrame>,
}

/// The traffic light detector
#[derive(Debug)]
pub struct Pipeline {
    stop_lines: Vec<Point2>,
    relevance_distance: f64,
    snapshot: Snapshot,
    waypoints: WaypointIndex,
    resolver: LightStateResolver,
    debouncer: Debouncer,
    capture: Option<Capture>,
}

impl Pipeline {
    /// Update the vehicle pose, keeping the replaced one as previous pose
    pub fn on_pose(&mut self, pose: Pose) {
        self.snapshot.previous_pose = self.snapshot.pose.replace(pose);
    }

    /// Build the waypoint index from the first (non-empty) path.
    ///
    /// Returns false if the path was ignored.
    pub fn on_path(&mut self, waypoints: &[Point2]) -> bool {
        self.waypoints.build(waypoints)
    }

    /// Replace the light observations.
    ///
    /// The list must line up with the configured stop lines; a list that
    /// does not is rejected and the previous list stays in place.
    pub fn on_lights(&mut self, lights: Vec<TrafficLight>) -> Result<()> {
        if lights.len() != self.stop_lines.len() {
            return Err(Error::LightCountMismatch {
                expected: self.stop_lines.len(),
                actual: lights.len(),
            });
        }
        self.snapshot.lights = lights;
        Ok(())
    }

    /// Process a camera frame and return the waypoint to publish.
    ///
    /// Frames arriving before the first path are dropped and yield `None`.
    #[instrument(name = "frame", skip_all, fields(t = %frame.timestamp))]
    pub fn on_frame(&mut self, frame: CameraFrame) -> Option<TrafficWaypoint> {
        self.snapshot.frame = Some(frame);
        if !self.waypoints.is_built() {
            debug!("Dropping frame, no path received yet");
            return None;
        }
        Some(self.process())
    }

    /// One decision over the current snapshot
    fn process(&mut self) -> TrafficWaypoint {
        let candidate = selector::select(
            self.snapshot.pose.as_ref(),
            self.snapshot.previous_pose.as_ref(),
            &self.stop_lines,
            &self.snapshot.lights,
        );

        let (waypoint, state) = match candidate {
            Some(candidate) => {
                self.offer_capture(&candidate);
                self.assess(&candidate)
            }
            None => (None, LightState::Unknown),
        };
        self.debouncer.update(waypoint, state)
    }

    /// Resolve state and stop waypoint of a candidate within relevance distance
    fn assess(&mut self, candidate: &Candidate) -> (Option<usize>, LightState) {
        if candidate.distance >= self.relevance_distance {
            return (None, LightState::Unknown);
        }
        debug!(
            "next {} light @ {:.2} distance",
            candidate.light.state, candidate.distance
        );

        let state = self
            .resolver
            .resolve(self.snapshot.frame.as_ref(), &candidate.light);
        match self.waypoints.nearest(candidate.stop_line) {
            Ok(waypoint) => (Some(waypoint), state),
            Err(e) => {
                warn!("Cannot map stop line {}: {e}", candidate.index);
                (None, LightState::Unknown)
            }
        }
    }

    fn offer_capture(&mut self, candidate: &Candidate) {
        if let (Some(capture), Some(frame)) = (self.capture.as_mut(), self.snapshot.frame.as_ref()) {
            capture.offer(frame, candidate, self.debouncer.observed_state());
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn waypoints(&self) -> &WaypointIndex {
        &self.waypoints
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    pub fn stop_lines(&self) -> &[Point2] {
        &self.stop_lines
    }
}

/// Pipeline builder
#[derive(Default)]
pub struct Builder {
    pub config: Option<DetectorConfig>,
    pub classifier: Option<Box<dyn Classifier>>,
    pub capture_sink: Option<Box<dyn DatasetSink>>,
}

impl Builder {
    /// Set the detector configuration
    pub fn config(mut self, config: DetectorConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the classifier resolving light states
    pub fn classifier(mut self, classifier: impl Classifier + 'static) -> Self {
        self.classifier = Some(Box::new(classifier));
        self
    }

    /// Set the sink for captured frames, instead of the configured directory.
    ///
    /// Only used if capturing is enabled in the configuration.
    pub fn capture_sink(mut self, sink: impl DatasetSink + 'static) -> Self {
        self.capture_sink = Some(Box::new(sink));
        self
    }

    pub fn build(self) -> Result<Pipeline> {
        let config = self
            .config
            .ok_or_else(|| Error::Config("missing detector configuration".to_owned()))?;
        config.validate()?;
        let classifier = self
            .classifier
            .ok_or_else(|| Error::Config("missing classifier".to_owned()))?;

        let classifier: Box<dyn Classifier> = match config.classifier_timeout() {
            Some(timeout) => Box::new(TimeoutClassifier::spawn(classifier, timeout)?),
            None => classifier,
        };

        let capture = if config.capture.enabled {
            let sink = match self.capture_sink {
                Some(sink) => sink,
                None => Box::new(DatasetWriter::create(&config.capture.directory)?),
            };
            let policy = CapturePolicy::new(config.capture.distance, config.capture.interval());
            Some(Capture::new(policy, sink))
        } else {
            None
        };

        Ok(Pipeline {
            stop_lines: config.stop_lines(),
            relevance_distance: config.light_distance_threshold,
            snapshot: Snapshot::default(),
            waypoints: WaypointIndex::default(),
            resolver: LightStateResolver::new(classifier),
            debouncer: Debouncer::new(config.state_count_threshold),
            capture,
        })
    }
}
