//! Synthetic campus walkway network.
//!
//! A `cols × rows` lattice of junctions with jittered positions, two-way
//! paths between lattice neighbours, and the odd diagonal shortcut across a
//! quad.  The same seed always yields the same campus.

use cm_core::{Coord, NodeId, SimRng};
use cm_spatial::{MapGraph, MapGraphBuilder};

/// Shape of the generated campus.
#[derive(Copy, Clone, Debug)]
pub struct CampusLayout {
    pub cols:        usize,
    pub rows:        usize,
    /// Distance between lattice neighbours, in metres.
    pub spacing_m:   f64,
    /// Maximum displacement of a junction, as a fraction of `spacing_m`.
    pub jitter:      f64,
    /// Chance that a lattice cell gets a diagonal path.
    pub shortcut_p:  f64,
}

impl Default for CampusLayout {
    fn default() -> Self {
        Self { cols: 12, rows: 8, spacing_m: 60.0, jitter: 0.15, shortcut_p: 0.1 }
    }
}

pub fn build_campus(layout: CampusLayout, rng: &mut SimRng) -> MapGraph {
    let CampusLayout { cols, rows, spacing_m, jitter, shortcut_p } = layout;
    let mut b = MapGraphBuilder::new();

    let wobble = spacing_m * jitter;
    let mut grid: Vec<NodeId> = Vec::with_capacity(cols * rows);
    for r in 0..rows {
        for c in 0..cols {
            let dx = (rng.unit() * 2.0 - 1.0) * wobble;
            let dy = (rng.unit() * 2.0 - 1.0) * wobble;
            // Keep the border junctions inside the first quadrant.
            let x = (c as f64 * spacing_m + dx).max(0.0);
            let y = (r as f64 * spacing_m + dy).max(0.0);
            grid.push(b.add_node(Coord::new(x, y)));
        }
    }

    let at = |r: usize, c: usize| grid[r * cols + c];
    for r in 0..rows {
        for c in 0..cols {
            if c + 1 < cols {
                b.add_road(at(r, c), at(r, c + 1));
            }
            if r + 1 < rows {
                b.add_road(at(r, c), at(r + 1, c));
            }
            if c + 1 < cols && r + 1 < rows && rng.unit() < shortcut_p {
                b.add_road(at(r, c), at(r + 1, c + 1));
            }
        }
    }

    b.build()
}
