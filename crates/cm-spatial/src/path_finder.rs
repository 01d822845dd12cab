//! Shortest-path trait and default Dijkstra implementation.
//!
//! Activity models ask for paths through the [`PathFinder`] trait, so a
//! caller can swap in A* or a precomputed table without touching the models.
//!
//! # Determinism
//!
//! Edge weights are Euclidean lengths (`f64`).  The heap orders entries by
//! `(cost, NodeId)` using `f64::total_cmp`, so equal-cost frontiers are
//! always expanded in ascending node order and the same query on the same
//! graph always yields the same node sequence.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use cm_core::{EdgeId, NodeId};

use crate::map::MapGraph;
use crate::{SpatialError, SpatialResult};

// ── PathFinder trait ──────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
///
/// Implementations must be `Send + Sync` so one finder can serve every agent.
pub trait PathFinder: Send + Sync {
    /// Ordered node sequence from `from` to `to`, both endpoints included.
    ///
    /// `from == to` yields `[from]`.  Disconnected endpoints yield
    /// [`SpatialError::NoRoute`]; callers treat that as "no path", not as a
    /// fatal error.
    fn shortest_path(&self, map: &MapGraph, from: NodeId, to: NodeId) -> SpatialResult<Vec<NodeId>>;
}

/// Total Euclidean length of a node sequence.
pub fn path_length(map: &MapGraph, nodes: &[NodeId]) -> f64 {
    nodes
        .windows(2)
        .map(|w| map.node_pos(w[0]).distance(map.node_pos(w[1])))
        .sum()
}

// ── DijkstraPathFinder ────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the CSR map graph.
#[derive(Clone, Copy, Debug, Default)]
pub struct DijkstraPathFinder;

impl PathFinder for DijkstraPathFinder {
    fn shortest_path(&self, map: &MapGraph, from: NodeId, to: NodeId) -> SpatialResult<Vec<NodeId>> {
        dijkstra(map, from, to)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Totally ordered edge-cost wrapper.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Cost(f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

fn dijkstra(map: &MapGraph, from: NodeId, to: NodeId) -> SpatialResult<Vec<NodeId>> {
    let n = map.node_count();
    if from.index() >= n || to.index() >= n {
        return Err(SpatialError::NoRoute { from, to });
    }
    if from == to {
        return Ok(vec![from]);
    }

    let mut dist      = vec![f64::INFINITY; n];
    let mut prev_edge = vec![EdgeId::NONE; n];

    dist[from.index()] = 0.0;

    // Reverse turns the max-heap into a min-heap; NodeId is the tie-breaker.
    let mut heap: BinaryHeap<Reverse<(Cost, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((Cost(0.0), from)));

    while let Some(Reverse((Cost(cost), node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(map, &prev_edge, from, to));
        }

        // Stale heap entry.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in map.out_edges(node) {
            let neighbor = map.edge_to[edge.index()];
            let new_cost = cost + map.edge_length_m[edge.index()];

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((Cost(new_cost), neighbor)));
            }
        }
    }

    Err(SpatialError::NoRoute { from, to })
}

fn reconstruct(map: &MapGraph, prev_edge: &[EdgeId], from: NodeId, to: NodeId) -> Vec<NodeId> {
    let mut nodes = vec![to];
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        debug_assert_ne!(e, EdgeId::NONE, "settled node without predecessor");
        cur = map.edge_from[e.index()];
        nodes.push(cur);
    }
    nodes.reverse();
    nodes
}
