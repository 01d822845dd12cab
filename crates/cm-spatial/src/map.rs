//! Map graph representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Edges are sorted by `(from, to)`, so iterating a node's neighbours always
//! yields the same order.  Both Dijkstra and the random walk rely on that.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps a coordinate to the nearest `NodeId`.  Models
//! use it to snap their current position and their target onto the graph.
//!
//! # Map space
//!
//! Externally supplied coordinates (venue files, fixed station coordinates)
//! are in the source data's frame.  [`MapGraph::to_map_space`] mirrors the y
//! axis when the map data was mirrored and then applies the map's offset.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use cm_core::{Coord, EdgeId, NodeId};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── MapGraph ──────────────────────────────────────────────────────────────────

/// Directed map graph in CSR format plus a spatial index for node snapping.
///
/// Read-only once built; share it between agents behind an `Arc`.
pub struct MapGraph {
    /// Position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<Coord>,

    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Source node of each edge.  Indexed by `EdgeId`.
    pub edge_from: Vec<NodeId>,

    /// Destination node of each edge.
    pub edge_to: Vec<NodeId>,

    /// Euclidean length of each edge in metres.  Dijkstra's edge weight.
    pub edge_length_m: Vec<f64>,

    offset:   Coord,
    mirrored: bool,
    max:      Coord,

    spatial_idx: RTree<NodeEntry>,
}

impl MapGraph {
    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// All node ids in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.node_pos.len()).map(NodeId::from_index)
    }

    #[inline]
    pub fn node_pos(&self, node: NodeId) -> Coord {
        self.node_pos[node.index()]
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Outgoing edges of `node`, a contiguous index range.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// Neighbours reachable over one outgoing edge, in ascending id order.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.out_edges(node).map(|e| self.edge_to[e.index()])
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The node nearest to `pos`.  `None` only if the map has no nodes.
    pub fn node_by_coordinate(&self, pos: Coord) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.x, pos.y])
            .map(|e| e.id)
    }

    // ── Frame of reference ────────────────────────────────────────────────

    /// Translation applied to external coordinates.
    pub fn offset(&self) -> Coord {
        self.offset
    }

    /// `true` when external coordinates have their y axis flipped.
    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    /// Upper-right corner of the map; the lower-left corner is the origin.
    pub fn bounds(&self) -> Coord {
        self.max
    }

    /// Convert an externally supplied point into map space.
    pub fn to_map_space(&self, raw: Coord) -> Coord {
        let c = if self.mirrored { raw.mirrored() } else { raw };
        c.translate(self.offset.x, self.offset.y)
    }
}

// ── MapGraphBuilder ───────────────────────────────────────────────────────────

/// Construct a [`MapGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use cm_core::Coord;
/// use cm_spatial::MapGraphBuilder;
///
/// let mut b = MapGraphBuilder::new();
/// let a = b.add_node(Coord::new(0.0, 0.0));
/// let c = b.add_node(Coord::new(30.0, 40.0));
/// b.add_road(a, c);
/// let map = b.build();
/// assert_eq!(map.node_count(), 2);
/// assert_eq!(map.edge_count(), 2); // bidirectional
/// assert_eq!(map.edge_length_m[0], 50.0);
/// ```
#[derive(Default)]
pub struct MapGraphBuilder {
    nodes:     Vec<Coord>,
    raw_edges: Vec<(NodeId, NodeId)>,
    offset:    Coord,
    mirrored:  bool,
    bounds:    Option<Coord>,
}

impl MapGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: Coord) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(pos);
        id
    }

    /// Add a **directed** edge.  Its length is the Euclidean distance
    /// between the endpoints.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId) {
        self.raw_edges.push((from, to));
    }

    /// Add edges in **both directions**.
    pub fn add_road(&mut self, a: NodeId, b: NodeId) {
        self.add_directed_edge(a, b);
        self.add_directed_edge(b, a);
    }

    /// Translation applied by [`MapGraph::to_map_space`].
    pub fn offset(mut self, offset: Coord) -> Self {
        self.offset = offset;
        self
    }

    /// Flip the y axis of external coordinates.
    pub fn mirrored(mut self, mirrored: bool) -> Self {
        self.mirrored = mirrored;
        self
    }

    /// Override the map's upper-right corner.  Defaults to the component-wise
    /// maximum over all node positions.
    pub fn bounds(mut self, max: Coord) -> Self {
        self.bounds = Some(max);
        self
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`MapGraph`].
    pub fn build(self) -> MapGraph {
        let node_count = self.nodes.len();

        let mut raw = self.raw_edges;
        raw.sort_by_key(|&(from, to)| (from, to));
        raw.dedup();

        let edge_from: Vec<NodeId> = raw.iter().map(|e| e.0).collect();
        let edge_to:   Vec<NodeId> = raw.iter().map(|e| e.1).collect();
        let edge_length_m: Vec<f64> = raw
            .iter()
            .map(|&(a, b)| self.nodes[a.index()].distance(self.nodes[b.index()]))
            .collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for &(from, _) in &raw {
            node_out_start[from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, raw.len());

        let max = self.bounds.unwrap_or_else(|| {
            self.nodes.iter().fold(Coord::ORIGIN, |m, p| Coord::new(m.x.max(p.x), m.y.max(p.y)))
        });

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, pos)| NodeEntry { point: [pos.x, pos.y], id: NodeId::from_index(i) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        MapGraph {
            node_pos: self.nodes,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_m,
            offset: self.offset,
            mirrored: self.mirrored,
            max,
            spatial_idx,
        }
    }
}
