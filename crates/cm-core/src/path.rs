//! `Path`: one uninterrupted movement segment.

use crate::Coord;

/// Ordered waypoints walked at a constant speed.
///
/// Paths are handed out by value.  A model never keeps a reference to a path
/// it returned, so callers may mutate what they receive freely.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    waypoints: Vec<Coord>,
    /// Metres per second.
    speed: f64,
}

impl Path {
    /// An empty path travelled at `speed` m/s.
    pub fn new(speed: f64) -> Self {
        Self { waypoints: Vec::new(), speed }
    }

    /// A zero-length path holding the agent at `at`.
    pub fn stationary(at: Coord) -> Self {
        Self { waypoints: vec![at], speed: 1.0 }
    }

    pub fn with_waypoints(waypoints: Vec<Coord>, speed: f64) -> Self {
        Self { waypoints, speed }
    }

    pub fn add_waypoint(&mut self, c: Coord) {
        self.waypoints.push(c);
    }

    pub fn waypoints(&self) -> &[Coord] {
        &self.waypoints
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn first(&self) -> Option<Coord> {
        self.waypoints.first().copied()
    }

    pub fn last(&self) -> Option<Coord> {
        self.waypoints.last().copied()
    }

    /// Total polyline length in metres.
    pub fn length_m(&self) -> f64 {
        self.waypoints
            .windows(2)
            .map(|w| w[0].distance(w[1]))
            .sum()
    }

    /// Seconds needed to walk the whole path.  Zero for paths with fewer than
    /// two waypoints or a non-positive speed.
    pub fn travel_secs(&self) -> f64 {
        if self.speed <= 0.0 {
            return 0.0;
        }
        self.length_m() / self.speed
    }
}
