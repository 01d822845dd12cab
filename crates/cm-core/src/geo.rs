//! Planar coordinate type.
//!
//! Map space is a flat 2-D plane measured in metres with the origin at the
//! lower-left corner of the map.  `f64` keeps long walks free of rounding
//! drift when waypoints are accumulated over a multi-day run.

/// An immutable point in map space.
///
/// `Coord` is `Copy`: every consumer receives its own value, so one agent
/// adjusting a waypoint can never disturb another agent's copy.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub const ORIGIN: Coord = Coord { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in metres.
    #[inline]
    pub fn distance(self, other: Coord) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Squared distance, for comparisons.
    #[inline]
    pub fn distance_2(self, other: Coord) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Shift by `(dx, dy)`.
    #[inline]
    pub fn translate(self, dx: f64, dy: f64) -> Coord {
        Coord::new(self.x + dx, self.y + dy)
    }

    /// Flip the y axis (used for map data with a mirrored coordinate system).
    #[inline]
    pub fn mirrored(self) -> Coord {
        Coord::new(self.x, -self.y)
    }

    /// Clamp into the rectangle `[0, max.x] × [0, max.y]`.
    #[inline]
    pub fn clamp_to(self, max: Coord) -> Coord {
        Coord::new(self.x.clamp(0.0, max.x.max(0.0)), self.y.clamp(0.0, max.y.max(0.0)))
    }
}

impl From<[f64; 2]> for Coord {
    fn from([x, y]: [f64; 2]) -> Self {
        Coord::new(x, y)
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}
