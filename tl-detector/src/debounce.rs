// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Temporal debouncing of per-frame light readings

use crate::messages::{LightState, TrafficWaypoint};
use log::debug;

/// Default number of repeated readings before a state is acted upon
pub const STATE_COUNT_THRESHOLD: u32 = 3;

/// Hysteresis over resolved light states.
///
/// A reading only changes the published waypoint once it has been seen on
/// `threshold` consecutive frames before the current one. The counter also
/// advances on the committing frame, so after a single flicker the previous
/// state needs `threshold + 1` frames to be committed again.
#[derive(Debug, Clone)]
pub struct Debouncer {
    threshold: u32,
    observed: LightState,
    stable: LightState,
    count: u32,
    last_published: TrafficWaypoint,
}

impl Debouncer {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            observed: LightState::Unknown,
            stable: LightState::Unknown,
            count: 0,
            last_published: TrafficWaypoint::NONE,
        }
    }

    /// Feed the reading of one frame and return the waypoint to publish.
    ///
    /// `waypoint` is the path waypoint of the candidate's stop line, if any.
    pub fn update(&mut self, waypoint: Option<usize>, state: LightState) -> TrafficWaypoint {
        if state != self.observed {
            self.observed = state;
            self.count = 0;
        } else if self.count >= self.threshold {
            let published = match state {
                LightState::Red => TrafficWaypoint(waypoint),
                _ => TrafficWaypoint::NONE,
            };
            if self.stable != state || self.last_published != published {
                debug!("Committing {state} after {} frames, publishing {published}", self.count);
            }
            self.stable = state;
            self.last_published = published;
        }
        self.count = self.count.saturating_add(1);
        self.last_published
    }

    /// State read on the most recent frames
    pub fn observed_state(&self) -> LightState {
        self.observed
    }

    /// Last committed state
    pub fn stable_state(&self) -> LightState {
        self.stable
    }

    pub fn consecutive_count(&self) -> u32 {
        self.count
    }

    pub fn last_published(&self) -> TrafficWaypoint {
        self.last_published
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Debouncer::new(STATE_COUNT_THRESHOLD)
    }
}
