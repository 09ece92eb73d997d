// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Nearest waypoint lookup over the static vehicle path

use crate::error::{Error, Result};
use crate::messages::Point2;
use log::{debug, info, warn};
use rstar::primitives::GeomWithData;
use rstar::RTree;

/// Waypoint position tagged with its index in the path
type IndexedWaypoint = GeomWithData<[f64; 2], usize>;

/// Spatial index over the path waypoints.
///
/// The index is built exactly once from the first non-empty path. Indices
/// handed out to consumers refer to that path, so later paths are ignored.
#[derive(Default)]
pub enum WaypointIndex {
    /// No path received yet
    #[default]
    Empty,
    /// Built from the first path
    Built(RTree<IndexedWaypoint>),
}

impl WaypointIndex {
    /// Build the index from `waypoints` unless it has been built before.
    ///
    /// Returns true if this call built the index.
    pub fn build(&mut self, waypoints: &[Point2]) -> bool {
        if let WaypointIndex::Built(tree) = self {
            debug!(
                "Ignoring path update with {} waypoints, index already built from {}",
                waypoints.len(),
                tree.size()
            );
            return false;
        }
        if waypoints.is_empty() {
            debug!("Ignoring empty path");
            return false;
        }
        if let Some(i) = waypoints
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite()))
        {
            warn!("Ignoring path with non-finite waypoint {i}");
            return false;
        }

        let indexed = waypoints
            .iter()
            .enumerate()
            .map(|(index, p)| IndexedWaypoint::new((*p).into(), index))
            .collect();
        *self = WaypointIndex::Built(RTree::bulk_load(indexed));
        info!("Built waypoint index from {} waypoints", waypoints.len());
        true
    }

    pub fn is_built(&self) -> bool {
        matches!(self, WaypointIndex::Built(_))
    }

    /// Number of indexed waypoints
    pub fn len(&self) -> usize {
        match self {
            WaypointIndex::Empty => 0,
            WaypointIndex::Built(tree) => tree.size(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index of the waypoint closest to `point`.
    ///
    /// Equidistant waypoints resolve to the lowest index.
    pub fn nearest(&self, point: Point2) -> Result<usize> {
        let WaypointIndex::Built(tree) = self else {
            return Err(Error::IndexNotBuilt);
        };

        let query: [f64; 2] = point.into();
        let mut candidates = tree.nearest_neighbor_iter_with_distance_2(&query);
        let (first, min_distance_2) = candidates.next().ok_or(Error::IndexNotBuilt)?;
        let nearest = candidates
            .take_while(|(_, distance_2)| *distance_2 <= min_distance_2)
            .map(|(waypoint, _)| waypoint.data)
            .fold(first.data, usize::min);
        Ok(nearest)
    }
}

impl std::fmt::Debug for WaypointIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WaypointIndex::Empty => f.write_str("WaypointIndex::Empty"),
            WaypointIndex::Built(tree) => f
                .debug_struct("WaypointIndex::Built")
                .field("size", &tree.size())
                .finish(),
        }
    }
}
