// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Replay scenarios
//!
//! A scenario is the ordered list of feed updates handed to the detector,
//! either read from a JSON file or synthesized.

use anyhow::{Context, Error};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tl_detector::prelude::*;

/// Spacing of the synthetic road waypoints in meters
const ROAD_STEP: f64 = 2.0;
const ROAD_LENGTH: f64 = 400.0;
const SPEED: f64 = 8.0;
const FRAME_PERIOD: Duration = Duration::from_millis(100);
/// Green, yellow and red phase lengths in seconds
const PHASES: [(LightState, f64); 3] = [
    (LightState::Green, 8.0),
    (LightState::Yellow, 2.0),
    (LightState::Red, 6.0),
];
/// Phase offset of each synthetic light in seconds
const LIGHT_OFFSETS: [f64; 2] = [0.0, 5.0];

/// Stop lines of the synthetic road
pub fn synthetic_stop_lines() -> Vec<Point2> {
    vec![Point2::new(120.0, 2.0), Point2::new(300.0, 2.0)]
}

/// One feed update
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioEvent {
    /// Vehicle position, `t` in seconds
    Pose { x: f64, y: f64, t: f64 },
    Path { waypoints: Vec<[f64; 2]> },
    /// Light states ordered like the stop lines
    Lights { states: Vec<LightState> },
    /// Camera frame without pixel data, `t` in seconds
    Frame { t: f64 },
}

impl From<ScenarioEvent> for Event {
    fn from(event: ScenarioEvent) -> Self {
        match event {
            ScenarioEvent::Pose { x, y, t } => {
                Event::Pose(Pose::new(x, y, Timestamp::from_secs_f64(t)))
            }
            ScenarioEvent::Path { waypoints } => {
                Event::Path(waypoints.into_iter().map(Point2::from).collect())
            }
            ScenarioEvent::Lights { states } => {
                Event::Lights(states.into_iter().map(TrafficLight::new).collect())
            }
            ScenarioEvent::Frame { t } => {
                Event::Frame(CameraFrame::empty(Timestamp::from_secs_f64(t)))
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Scenario {
    pub events: Vec<ScenarioEvent>,
}

impl Scenario {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {path:?}"))?;
        serde_json::from_str(&json).with_context(|| format!("failed to parse scenario {path:?}"))
    }

    /// Drive along a straight road past two cycling lights.
    ///
    /// Every frame period the vehicle pose, the light states and a frame are
    /// emitted, in this order.
    pub fn synthetic() -> Self {
        let waypoints = (0..=(ROAD_LENGTH / ROAD_STEP) as usize)
            .map(|i| [i as f64 * ROAD_STEP, 0.0])
            .collect();
        let mut events = vec![
            ScenarioEvent::Pose {
                x: 0.0,
                y: 0.0,
                t: 0.0,
            },
            ScenarioEvent::Path { waypoints },
        ];

        let ticks = (ROAD_LENGTH / SPEED / FRAME_PERIOD.as_secs_f64()).round() as usize;
        for tick in 1..=ticks {
            let t = tick as f64 * FRAME_PERIOD.as_secs_f64();
            events.push(ScenarioEvent::Pose {
                x: SPEED * t,
                y: 0.0,
                t,
            });
            events.push(ScenarioEvent::Lights {
                states: LIGHT_OFFSETS.iter().map(|o| light_state_at(t + o)).collect(),
            });
            events.push(ScenarioEvent::Frame { t });
        }
        Scenario { events }
    }

    pub fn into_events(self) -> impl Iterator<Item = Event> {
        self.events.into_iter().map(Event::from)
    }
}

/// State of a light cycling through [PHASES] at `t` seconds
fn light_state_at(t: f64) -> LightState {
    let cycle: f64 = PHASES.iter().map(|(_, d)| d).sum();
    let mut t = t.rem_euclid(cycle);
    for (state, duration) in PHASES {
        if t < duration {
            return state;
        }
        t -= duration;
    }
    LightState::Unknown
}

#[cfg(test)]
mod test {
    use super::{light_state_at, synthetic_stop_lines, Scenario, ScenarioEvent};
    use tl_detector::prelude::*;

    #[test]
    fn parse_scenario() {
        let json = r#"{"events": [
            {"pose": {"x": 1.0, "y": 2.0, "t": 0.5}},
            {"path": {"waypoints": [[0.0, 0.0], [1.0, 0.0]]}},
            {"lights": {"states": ["RED", "GREEN"]}},
            {"frame": {"t": 0.6}}
        ]}"#;
        let scenario: Scenario = serde_json::from_str(json).unwrap();
        assert_eq!(
            scenario.events,
            vec![
                ScenarioEvent::Pose {
                    x: 1.0,
                    y: 2.0,
                    t: 0.5
                },
                ScenarioEvent::Path {
                    waypoints: vec![[0.0, 0.0], [1.0, 0.0]]
                },
                ScenarioEvent::Lights {
                    states: vec![LightState::Red, LightState::Green]
                },
                ScenarioEvent::Frame { t: 0.6 },
            ]
        );

        let events: Vec<Event> = scenario.into_events().collect();
        assert!(matches!(&events[1], Event::Path(w) if w.len() == 2));
        assert!(matches!(&events[2], Event::Lights(l) if l[0].state == LightState::Red));
        assert!(
            matches!(&events[3], Event::Frame(f) if f.timestamp == Timestamp::from_secs_f64(0.6))
        );
    }

    #[test]
    fn reject_unknown_event() {
        let json = r#"{"events": [{"odometry": {"x": 1.0}}]}"#;
        assert!(serde_json::from_str::<Scenario>(json).is_err());
    }

    #[test]
    fn light_cycle() {
        assert_eq!(light_state_at(0.0), LightState::Green);
        assert_eq!(light_state_at(8.5), LightState::Yellow);
        assert_eq!(light_state_at(12.0), LightState::Red);
        assert_eq!(light_state_at(16.0), LightState::Green);
    }

    #[test]
    fn synthetic_matches_stop_lines() {
        let scenario = Scenario::synthetic();
        assert!(matches!(scenario.events[1], ScenarioEvent::Path { .. }));
        let frames = scenario
            .events
            .iter()
            .filter(|e| matches!(e, ScenarioEvent::Frame { .. }))
            .count();
        assert_eq!(frames, 500);
        assert!(scenario.events.iter().all(|e| match e {
            ScenarioEvent::Lights { states } => states.len() == synthetic_stop_lines().len(),
            _ => true,
        }));
    }
}
