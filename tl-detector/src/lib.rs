// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Traffic light detector for a vehicle driving along a fixed path.
//!
//! For every camera frame the detector decides whether the vehicle has to
//! stop for an upcoming red light, and if so, at which waypoint of its path.
//!
//! # Decision Pipeline
//!
//! The [Pipeline](crate::pipeline::Pipeline) caches the latest pose, path and light observations.
//! On each frame it selects the closest intersection ahead of the vehicle
//! ([selector]), classifies its light ([resolver], [classifier]) and
//! debounces the reading ([debounce]) before publishing the index of the
//! path waypoint closest to the stop line ([waypoints]).
//!
//! # Running the Detector
//!
//! The [Runner](crate::runner::Runner) owns a pipeline on a dedicated thread and serializes
//! updates from any number of feeds through a single event queue ([signalling]).

pub mod capture;
pub mod classifier;
pub mod configuration;
pub mod debounce;
pub mod error;
pub mod messages;
pub mod pipeline;
pub mod resolver;
pub mod runner;
pub mod selector;
pub mod signalling;
pub mod timestamp;
pub mod waypoints;

/// Re-export the public API
pub mod prelude {
    pub use crate::classifier::{Classifier, GroundTruthClassifier, TimeoutClassifier};
    pub use crate::configuration::DetectorConfig;
    pub use crate::error::Error;
    pub use crate::messages::{
        CameraFrame, LightState, PixelEncoding, Point2, Pose, TrafficLight, TrafficWaypoint,
    };
    pub use crate::pipeline::{self, Pipeline};
    pub use crate::runner::{Event, Published, Runner};
    pub use crate::signalling::{self, Receiver, Sender};
    pub use crate::timestamp::Timestamp;
}
