// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Selection of the upcoming intersection

use crate::messages::{Point2, Pose, TrafficLight};

/// The intersection selected as relevant for the current frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Index into the light list and the stop line list
    pub index: usize,
    /// Distance from the vehicle to the stop line
    pub distance: f64,
    pub stop_line: Point2,
    pub light: TrafficLight,
}

/// Pick the closest intersection whose stop line lies ahead of the vehicle.
///
/// "Ahead" means the vector from the vehicle to the stop line has a positive
/// projection onto the motion since the previous pose. Without both poses the
/// motion is unknown and nothing is selected; a vehicle that has not moved
/// has nothing ahead either. Equidistant candidates resolve to the lowest index.
pub fn select(
    pose: Option<&Pose>,
    previous_pose: Option<&Pose>,
    stop_lines: &[Point2],
    lights: &[TrafficLight],
) -> Option<Candidate> {
    let (pose, previous_pose) = (pose?, previous_pose?);
    let car = pose.position;
    let motion = car - previous_pose.position;

    let mut closest: Option<Candidate> = None;
    for (index, (stop_line, light)) in stop_lines.iter().zip(lights).enumerate() {
        let distance = car.distance(*stop_line);
        let ahead = (*stop_line - car).dot(motion) > 0.0;
        if ahead && closest.map_or(true, |c| distance < c.distance) {
            closest = Some(Candidate {
                index,
                distance,
                stop_line: *stop_line,
                light: *light,
            });
        }
    }
    closest
}

#[cfg(test)]
mod test {
    use super::select;
    use crate::messages::{LightState, Point2, Pose, TrafficLight};
    use crate::timestamp::Timestamp;

    fn pose(x: f64, y: f64) -> Pose {
        Pose::new(x, y, Timestamp::ZERO)
    }

    fn lights(n: usize) -> Vec<TrafficLight> {
        vec![TrafficLight::new(LightState::Unknown); n]
    }

    #[test]
    fn selects_light_ahead_not_behind() {
        let stop_lines = [Point2::new(-5.0, 0.0), Point2::new(5.0, 0.0)];
        let candidate = select(
            Some(&pose(1.0, 0.0)),
            Some(&pose(0.0, 0.0)),
            &stop_lines,
            &lights(2),
        )
        .unwrap();
        assert_eq!(candidate.index, 1);
        assert_eq!(candidate.stop_line, Point2::new(5.0, 0.0));
        assert!((candidate.distance - 4.0).abs() < 1e-12);
    }

    #[test]
    fn selects_closest_ahead() {
        let stop_lines = [
            Point2::new(50.0, 0.0),
            Point2::new(20.0, 3.0),
            Point2::new(-2.0, 0.0),
        ];
        let candidate = select(
            Some(&pose(10.0, 0.0)),
            Some(&pose(9.0, 0.0)),
            &stop_lines,
            &lights(3),
        )
        .unwrap();
        assert_eq!(candidate.index, 1);
    }

    #[test]
    fn tie_resolves_to_first_index() {
        let stop_lines = [Point2::new(5.0, 5.0), Point2::new(5.0, -5.0)];
        let candidate = select(
            Some(&pose(1.0, 0.0)),
            Some(&pose(0.0, 0.0)),
            &stop_lines,
            &lights(2),
        )
        .unwrap();
        assert_eq!(candidate.index, 0);
    }

    #[test]
    fn missing_poses_select_nothing() {
        let stop_lines = [Point2::new(5.0, 0.0)];
        assert!(select(None, None, &stop_lines, &lights(1)).is_none());
        assert!(select(Some(&pose(1.0, 0.0)), None, &stop_lines, &lights(1)).is_none());
    }

    #[test]
    fn stationary_vehicle_selects_nothing() {
        let stop_lines = [Point2::new(5.0, 0.0)];
        let candidate = select(
            Some(&pose(1.0, 0.0)),
            Some(&pose(1.0, 0.0)),
            &stop_lines,
            &lights(1),
        );
        assert!(candidate.is_none());
    }

    #[test]
    fn perpendicular_stop_line_is_not_ahead() {
        let stop_lines = [Point2::new(1.0, 10.0)];
        let candidate = select(
            Some(&pose(1.0, 0.0)),
            Some(&pose(0.0, 0.0)),
            &stop_lines,
            &lights(1),
        );
        assert!(candidate.is_none());
    }

    #[test]
    fn no_lights_select_nothing() {
        let stop_lines = [Point2::new(5.0, 0.0)];
        let candidate = select(Some(&pose(1.0, 0.0)), Some(&pose(0.0, 0.0)), &stop_lines, &[]);
        assert!(candidate.is_none());
    }
}
