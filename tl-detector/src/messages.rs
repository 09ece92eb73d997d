// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Messages
//!
//! This module contains the definition of the messages exchanged
//! between the feeds, the detector and its consumer.

use crate::error::Error;
use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::ops::Sub;
use std::sync::Arc;

/// Point in the 2D map plane
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`
    pub fn distance(&self, other: Point2) -> f64 {
        (*self - other).norm()
    }

    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn dot(&self, other: Point2) -> f64 {
        self.x * other.x + self.y * other.y
    }
}

impl Sub for Point2 {
    type Output = Point2;

    fn sub(self, rhs: Point2) -> Point2 {
        Point2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<[f64; 2]> for Point2 {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point2> for [f64; 2] {
    fn from(p: Point2) -> Self {
        [p.x, p.y]
    }
}

/// Vehicle pose
///
/// Only the planar position is relevant for the detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Point2,
    #[serde(default)]
    pub timestamp: Timestamp,
}

impl Pose {
    pub fn new(x: f64, y: f64, timestamp: Timestamp) -> Self {
        Self {
            position: Point2::new(x, y),
            timestamp,
        }
    }
}

/// Color of a traffic light
///
/// The numeric codes match the ones of the simulator's traffic light message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LightState {
    Red,
    Yellow,
    Green,
    #[default]
    Unknown,
}

impl LightState {
    pub const fn code(self) -> u8 {
        match self {
            LightState::Red => 0,
            LightState::Yellow => 1,
            LightState::Green => 2,
            LightState::Unknown => 4,
        }
    }
}

impl TryFrom<u8> for LightState {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(LightState::Red),
            1 => Ok(LightState::Yellow),
            2 => Ok(LightState::Green),
            4 => Ok(LightState::Unknown),
            other => Err(Error::Classifier(format!("invalid light state code {other}"))),
        }
    }
}

impl Display for LightState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LightState::Red => "RED",
            LightState::Yellow => "YELLOW",
            LightState::Green => "GREEN",
            LightState::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// Traffic light observation
///
/// One per known intersection; the state is ground truth when
/// a simulator provides it and [`LightState::Unknown`] otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficLight {
    pub state: LightState,
}

impl TrafficLight {
    pub const fn new(state: LightState) -> Self {
        Self { state }
    }
}

/// Pixel layout of a [`CameraFrame`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelEncoding {
    #[default]
    Bgr8,
    Rgb8,
    Mono8,
}

impl PixelEncoding {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelEncoding::Bgr8 | PixelEncoding::Rgb8 => 3,
            PixelEncoding::Mono8 => 1,
        }
    }
}

/// Decoded camera image
///
/// The pixel buffer is shared, so handing a frame to a classifier
/// thread or to the dataset capture does not copy it.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraFrame {
    pub timestamp: Timestamp,
    pub width: u32,
    pub height: u32,
    pub encoding: PixelEncoding,
    pub data: Arc<Vec<u8>>,
}

impl CameraFrame {
    pub fn new(
        timestamp: Timestamp,
        width: u32,
        height: u32,
        encoding: PixelEncoding,
        data: Vec<u8>,
    ) -> Self {
        Self {
            timestamp,
            width,
            height,
            encoding,
            data: Arc::new(data),
        }
    }

    /// A frame without pixel data, e.g. for ground truth driven runs
    pub fn empty(timestamp: Timestamp) -> Self {
        Self::new(timestamp, 0, 0, PixelEncoding::default(), vec![])
    }

    /// Check that the buffer size matches the declared geometry
    pub fn is_consistent(&self) -> bool {
        let expected = self.width as usize * self.height as usize * self.encoding.bytes_per_pixel();
        self.data.len() == expected
    }
}

/// Waypoint index published downstream
///
/// `None` means that there is no red light ahead to stop for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TrafficWaypoint(pub Option<usize>);

impl TrafficWaypoint {
    pub const NONE: TrafficWaypoint = TrafficWaypoint(None);

    /// Wire representation: the index, or -1 if there is none
    pub fn as_i32(&self) -> i32 {
        self.0
            .and_then(|index| i32::try_from(index).ok())
            .unwrap_or(-1)
    }
}

impl Display for TrafficWaypoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_i32())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn light_state_codes() {
        for state in [
            LightState::Red,
            LightState::Yellow,
            LightState::Green,
            LightState::Unknown,
        ] {
            assert_eq!(LightState::try_from(state.code()).unwrap(), state);
        }
        assert!(LightState::try_from(3).is_err());
    }

    #[test]
    fn light_state_serde_names() {
        let json = serde_json::to_string(&TrafficLight::new(LightState::Red)).unwrap();
        assert_eq!(json, r#"{"state":"RED"}"#);
        let light: TrafficLight = serde_json::from_str(r#"{"state":"GREEN"}"#).unwrap();
        assert_eq!(light.state, LightState::Green);
    }

    #[test]
    fn traffic_waypoint_wire_value() {
        assert_eq!(TrafficWaypoint::NONE.as_i32(), -1);
        assert_eq!(TrafficWaypoint(Some(292)).as_i32(), 292);
        assert_eq!(TrafficWaypoint(Some(292)).to_string(), "292");
    }

    #[test]
    fn frame_consistency() {
        let frame = CameraFrame::new(Timestamp::ZERO, 2, 2, PixelEncoding::Bgr8, vec![0; 12]);
        assert!(frame.is_consistent());
        assert!(CameraFrame::empty(Timestamp::ZERO).is_consistent());
        let frame = CameraFrame::new(Timestamp::ZERO, 2, 2, PixelEncoding::Mono8, vec![0; 12]);
        assert!(!frame.is_consistent());
    }
}
