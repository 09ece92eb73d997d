// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Traffic light classifiers
//!
//! A [Classifier] maps a camera frame to a light color. The vision model
//! itself lives outside this crate; the detector only depends on this trait,
//! so ground truth and learned classifiers are interchangeable.

use crate::error::{Error, Result};
use crate::messages::{CameraFrame, LightState, TrafficLight};
use crate::signalling::{self, IntraProcReceiver, IntraProcSender, Receiver, Sender};
use log::{debug, trace};
use std::thread;
use std::time::{Duration, Instant};

/// Classifier trait, to be implemented by anything mapping frames to light colors
pub trait Classifier: Send {
    /// Classify the light visible in `frame`.
    ///
    /// `light` is the observation of the candidate light; learned classifiers
    /// ignore it, ground truth classifiers read its state.
    fn classify(&mut self, frame: &CameraFrame, light: &TrafficLight) -> Result<LightState>;
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn classify(&mut self, frame: &CameraFrame, light: &TrafficLight) -> Result<LightState> {
        (**self).classify(frame, light)
    }
}

/// Classifier reporting the state delivered by the light observation feed.
///
/// Only useful where that feed carries ground truth, i.e. in simulation.
#[derive(Debug, Default, Clone, Copy)]
pub struct GroundTruthClassifier;

impl Classifier for GroundTruthClassifier {
    fn classify(&mut self, _frame: &CameraFrame, light: &TrafficLight) -> Result<LightState> {
        Ok(light.state)
    }
}

struct Request {
    seq: u64,
    frame: CameraFrame,
    light: TrafficLight,
}

struct Response {
    seq: u64,
    result: Result<LightState>,
}

/// Bound the time spent in a possibly stalling classifier.
///
/// The wrapped classifier runs on its own thread. A request that is not
/// answered within the timeout fails with [Error::ClassifierTimeout];
/// the answer arriving later is discarded.
///
/// At most one request is in flight. While a timed out request is still
/// being worked on, further calls fail immediately without queueing.
pub struct TimeoutClassifier {
    requests: IntraProcSender<Request>,
    responses: IntraProcReceiver<Response>,
    timeout: Duration,
    next_seq: u64,
    /// Request sent but not answered yet
    pending: Option<u64>,
}

impl TimeoutClassifier {
    /// Move `classifier` to a new thread and bound each call by `timeout`
    pub fn spawn<C: Classifier + 'static>(classifier: C, timeout: Duration) -> Result<Self> {
        let (requests, request_receiver) = signalling::channel::<Request>();
        let (response_sender, responses) = signalling::channel::<Response>();

        thread::Builder::new()
            .name("tl-classifier".to_owned())
            .spawn(move || run(classifier, request_receiver, response_sender))
            .map_err(|e| Error::Io((e, "failed to spawn classifier thread")))?;

        Ok(Self {
            requests,
            responses,
            timeout,
            next_seq: 0,
            pending: None,
        })
    }
}

impl TimeoutClassifier {
    /// Collect answers that arrived by now, clearing a stalled request once answered
    fn collect_late(&mut self) -> Result<()> {
        while let Some(pending) = self.pending {
            match self.responses.recv_timeout(Duration::ZERO)? {
                Some(response) => {
                    debug!("Discarding late classification of request {}", response.seq);
                    if response.seq == pending {
                        self.pending = None;
                    }
                }
                None => break,
            }
        }
        Ok(())
    }
}

impl Classifier for TimeoutClassifier {
    fn classify(&mut self, frame: &CameraFrame, light: &TrafficLight) -> Result<LightState> {
        self.collect_late()?;
        if let Some(pending) = self.pending {
            trace!("Request {pending} still in progress, skipping frame");
            return Err(Error::ClassifierTimeout);
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.requests.send(Request {
            seq,
            frame: frame.clone(),
            light: *light,
        })?;
        self.pending = Some(seq);

        let deadline = Instant::now() + self.timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.responses.recv_timeout(remaining)? {
                Some(response) if response.seq == seq => {
                    self.pending = None;
                    return response.result;
                }
                Some(response) => {
                    debug!("Discarding late classification of request {}", response.seq);
                }
                None => return Err(Error::ClassifierTimeout),
            }
        }
    }
}

/// Classifier thread main function
fn run<C: Classifier>(
    mut classifier: C,
    mut requests: IntraProcReceiver<Request>,
    mut responses: IntraProcSender<Response>,
) {
    // Ends once the owning TimeoutClassifier is dropped
    while let Ok(Request { seq, frame, light }) = requests.recv() {
        trace!("Classifying request {seq}");
        let result = classifier.classify(&frame, &light);
        if responses.send(Response { seq, result }).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Classifier, GroundTruthClassifier, TimeoutClassifier};
    use crate::error::{Error, Result};
    use crate::messages::{CameraFrame, LightState, TrafficLight};
    use crate::timestamp::Timestamp;
    use std::thread;
    use std::time::{Duration, Instant};

    /// Sleeps for the frame timestamp in milliseconds, then answers green
    struct SlowClassifier;

    impl Classifier for SlowClassifier {
        fn classify(&mut self, frame: &CameraFrame, _light: &TrafficLight) -> Result<LightState> {
            thread::sleep(frame.timestamp.0);
            Ok(LightState::Green)
        }
    }

    fn frame_after(millis: u64) -> CameraFrame {
        CameraFrame::empty(Timestamp(Duration::from_millis(millis)))
    }

    #[test]
    fn ground_truth_reports_observed_state() {
        let mut classifier = GroundTruthClassifier;
        let light = TrafficLight::new(LightState::Yellow);
        assert_eq!(
            classifier.classify(&frame_after(0), &light).unwrap(),
            LightState::Yellow
        );
    }

    #[test]
    fn timeout_classifier_passes_fast_answers() {
        let mut classifier =
            TimeoutClassifier::spawn(SlowClassifier, Duration::from_secs(5)).unwrap();
        let light = TrafficLight::default();
        assert_eq!(
            classifier.classify(&frame_after(0), &light).unwrap(),
            LightState::Green
        );
    }

    #[test]
    fn timeout_classifier_discards_late_answers() {
        let mut classifier =
            TimeoutClassifier::spawn(SlowClassifier, Duration::from_millis(50)).unwrap();
        let light = TrafficLight::default();

        let result = classifier.classify(&frame_after(300), &light);
        assert!(matches!(result, Err(Error::ClassifierTimeout)));

        // The late answer to the first request must not be taken for this one
        let mut classifier_result = classifier.classify(&frame_after(0), &light);
        while matches!(classifier_result, Err(Error::ClassifierTimeout)) {
            thread::sleep(Duration::from_millis(10));
            classifier_result = classifier.classify(&frame_after(0), &light);
        }
        assert_eq!(classifier_result.unwrap(), LightState::Green);
    }

    #[test]
    fn timeout_classifier_recovers_after_stall() {
        let mut classifier =
            TimeoutClassifier::spawn(SlowClassifier, Duration::from_millis(50)).unwrap();
        let light = TrafficLight::default();

        assert!(matches!(
            classifier.classify(&frame_after(300), &light),
            Err(Error::ClassifierTimeout)
        ));
        // Frames during the stall fail without waiting or queueing up
        let start = Instant::now();
        for _ in 0..20 {
            assert!(matches!(
                classifier.classify(&frame_after(0), &light),
                Err(Error::ClassifierTimeout)
            ));
        }
        assert!(start.elapsed() < Duration::from_millis(200));

        // Once the stalled request is done the next frame is answered
        thread::sleep(Duration::from_millis(400));
        for _ in 0..10 {
            assert_eq!(
                classifier.classify(&frame_after(0), &light).unwrap(),
                LightState::Green
            );
        }
    }

    #[test]
    fn boxed_classifier_delegates() {
        let mut classifier: Box<dyn Classifier> = Box::new(GroundTruthClassifier);
        let light = TrafficLight::new(LightState::Red);
        assert_eq!(
            classifier.classify(&frame_after(0), &light).unwrap(),
            LightState::Red
        );
    }
}
