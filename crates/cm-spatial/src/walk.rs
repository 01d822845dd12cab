//! Random wandering over the map graph.

use cm_core::{AgentRng, NodeId};

use crate::map::MapGraph;

/// A random walk of `min_nodes..=max_nodes` nodes starting at `start`.
///
/// Each step picks a uniformly random neighbour other than the node just
/// left.  Stepping back is only allowed at a dead end.  The walk ends early
/// if `start` has no outgoing edges, so the result always holds at least
/// `start` itself.
pub fn random_walk(
    map:       &MapGraph,
    start:     NodeId,
    min_nodes: usize,
    max_nodes: usize,
    rng:       &mut AgentRng,
) -> Vec<NodeId> {
    let target = if max_nodes > min_nodes {
        rng.gen_range(min_nodes..=max_nodes)
    } else {
        min_nodes
    }
    .max(1);

    let mut nodes = Vec::with_capacity(target);
    nodes.push(start);

    let mut prev: Option<NodeId> = None;
    let mut cur = start;
    let mut options: Vec<NodeId> = Vec::new();

    while nodes.len() < target {
        options.clear();
        options.extend(map.neighbors(cur).filter(|&n| Some(n) != prev));
        if options.is_empty() {
            // Dead end: the only way on is back.
            options.extend(map.neighbors(cur));
        }

        let Some(&next) = rng.choose(&options) else {
            break;
        };
        nodes.push(next);
        prev = Some(cur);
        cur = next;
    }

    nodes
}
