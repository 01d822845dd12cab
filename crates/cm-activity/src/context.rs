//! Read-only world view lent to a model for one step.

use tracing::debug;

use cm_core::{Coord, Path, SimClock};
use cm_spatial::{MapGraph, PathFinder, SpatialError};

/// Everything a model may read while producing its next path.
///
/// Built by the tick loop once per tick and shared by every agent stepped in
/// that tick.  Models never mutate it.
pub struct MoveContext<'a> {
    pub clock:       &'a SimClock,
    pub map:         &'a MapGraph,
    pub path_finder: &'a dyn PathFinder,
}

impl<'a> MoveContext<'a> {
    #[inline]
    pub fn new(clock: &'a SimClock, map: &'a MapGraph, path_finder: &'a dyn PathFinder) -> Self {
        Self { clock, map, path_finder }
    }

    /// Simulated seconds since the start of the run.
    #[inline]
    pub fn now_secs(&self) -> f64 {
        self.clock.elapsed_secs() as f64
    }

    /// Upper-right corner of the map.
    #[inline]
    pub fn bounds(&self) -> Coord {
        self.map.bounds()
    }

    /// Shortest path between the nodes nearest `from` and `to`.
    ///
    /// The waypoints are the node positions along the route.  `None` when
    /// the map is empty or the two nodes are not connected.
    pub fn route(&self, from: Coord, to: Coord, speed: f64) -> Option<Path> {
        let a = self.map.node_by_coordinate(from)?;
        let b = self.map.node_by_coordinate(to)?;
        match self.path_finder.shortest_path(self.map, a, b) {
            Ok(nodes) => {
                let waypoints = nodes.iter().map(|&n| self.map.node_pos(n)).collect();
                Some(Path::with_waypoints(waypoints, speed))
            }
            Err(SpatialError::NoRoute { from, to }) => {
                debug!(%from, %to, "no route");
                None
            }
            Err(e) => {
                debug!(error = %e, "path finder failed");
                None
            }
        }
    }
}
