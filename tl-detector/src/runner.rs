// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Event queue driving a [Pipeline] on its own thread
//!
//! Feeds may deliver their updates from any thread by sending [Event]s into
//! the queue. The runner thread owns the pipeline and handles one event at a
//! time, so a frame is always processed to completion before the next update
//! is applied.

use crate::error::{Error, Result};
use crate::messages::{CameraFrame, Point2, Pose, TrafficLight, TrafficWaypoint};
use crate::pipeline::Pipeline;
use crate::signalling::{Receiver, Sender};
use crate::timestamp::Timestamp;
use log::{debug, error, info};
use std::fmt::Display;
use std::thread;
use tracing::{span, Level};

/// Input delivered to the runner
#[derive(Debug, Clone)]
pub enum Event {
    Pose(Pose),
    /// Full ordered waypoint sequence of the path
    Path(Vec<Point2>),
    /// Full light list, replacing the previous one
    Lights(Vec<TrafficLight>),
    Frame(CameraFrame),
    /// Stop the runner after the events queued before
    Shutdown,
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Event::Pose(pose) => write!(f, "Pose({:?}, {})", pose.position, pose.timestamp),
            Event::Path(waypoints) => write!(f, "Path({} waypoints)", waypoints.len()),
            Event::Lights(lights) => write!(f, "Lights({} lights)", lights.len()),
            Event::Frame(frame) => write!(f, "Frame({})", frame.timestamp),
            Event::Shutdown => write!(f, "Shutdown"),
        }
    }
}

/// Waypoint published for the frame taken at `timestamp`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Published {
    pub timestamp: Timestamp,
    pub waypoint: TrafficWaypoint,
}

/// Handle of the runner thread
#[derive(Debug)]
pub struct Runner {
    thread: thread::JoinHandle<Result<Pipeline>>,
}

impl Runner {
    /// Move `pipeline` to a new thread processing `events`.
    ///
    /// One [Published] value is sent to `output` for every processed frame.
    pub fn spawn<R, S>(pipeline: Pipeline, events: R, output: S) -> Result<Runner>
    where
        R: Receiver<Event> + 'static,
        S: Sender<Published> + 'static,
    {
        let thread = thread::Builder::new()
            .name("tl-detector".to_owned())
            .spawn(move || run(pipeline, events, output))
            .map_err(|e| Error::Io((e, "failed to spawn runner thread")))?;
        Ok(Runner { thread })
    }

    /// Wait for the runner to stop and hand back the pipeline.
    ///
    /// The runner stops on [Event::Shutdown], once all event senders are
    /// gone, or on a fatal error which is returned here.
    pub fn join(self) -> Result<Pipeline> {
        self.thread
            .join()
            .map_err(|_| Error::Channel("runner thread panicked"))?
    }
}

/// Runner thread main function
fn run<R, S>(mut pipeline: Pipeline, mut events: R, mut output: S) -> Result<Pipeline>
where
    R: Receiver<Event>,
    S: Sender<Published>,
{
    info!("Detector running");
    loop {
        let Ok(event) = events.recv() else {
            debug!("All feeds disconnected");
            break;
        };
        let _span = span!(Level::DEBUG, "event", %event).entered();

        match event {
            Event::Pose(pose) => pipeline.on_pose(pose),
            Event::Path(waypoints) => {
                pipeline.on_path(&waypoints);
            }
            Event::Lights(lights) => {
                if let Err(e) = pipeline.on_lights(lights) {
                    error!("Stopping detector: {e}");
                    return Err(e);
                }
            }
            Event::Frame(frame) => {
                let timestamp = frame.timestamp;
                if let Some(waypoint) = pipeline.on_frame(frame) {
                    output.send(Published {
                        timestamp,
                        waypoint,
                    })?;
                }
            }
            Event::Shutdown => break,
        }
    }
    info!("Detector stopped");
    Ok(pipeline)
}
