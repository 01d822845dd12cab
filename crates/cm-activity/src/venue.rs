//! Where activities happen.

use std::path::PathBuf;

use serde::Deserialize;

use cm_core::{AgentRng, Coord};
use cm_spatial::{MapGraph, SpatialError, load_points};

use crate::{ActivityError, ActivityResult};

/// A list of venues (stations, classrooms, tables, smoking spots).
///
/// ```toml
/// venues = { fixed = [[120.0, 40.0], [300.0, 95.5]] }
/// venues = { file = "data/classes.wkt" }
/// venues = { map_nodes = { count = 30 } }
/// ```
///
/// `fixed` and `file` coordinates are in the source data's frame and go
/// through [`MapGraph::to_map_space`].  `map_nodes` picks every
/// `node_count / count`-th map node, which are already in map space.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum VenueSource {
    Fixed(Vec<[f64; 2]>),
    File(PathBuf),
    MapNodes { count: usize },
}

impl VenueSource {
    /// Venue coordinates in map space.  Never empty.
    pub fn resolve(&self, what: &'static str, map: &MapGraph) -> ActivityResult<Vec<Coord>> {
        let venues: Vec<Coord> = match self {
            VenueSource::Fixed(points) => points
                .iter()
                .map(|&p| map.to_map_space(Coord::from(p)))
                .collect(),
            VenueSource::File(path) => load_points(path)?
                .into_iter()
                .map(|p| map.to_map_space(p))
                .collect(),
            VenueSource::MapNodes { count } => {
                if *count == 0 {
                    return Err(ActivityError::config(what, "map_nodes count must be at least 1"));
                }
                if map.is_empty() {
                    return Err(SpatialError::EmptyMap.into());
                }
                let stride = (map.node_count() / count).max(1);
                map.nodes()
                    .filter(|n| n.index() % stride == 0)
                    .take(*count)
                    .map(|n| map.node_pos(n))
                    .collect()
            }
        };
        if venues.is_empty() {
            return Err(ActivityError::config(what, "venue list is empty"));
        }
        Ok(venues)
    }
}

/// A point near `center`: each axis shifted by up to `radius / 2` either way,
/// then clamped into the map.
pub fn settle(center: Coord, radius: f64, bounds: Coord, rng: &mut AgentRng) -> Coord {
    let dx = (0.5 - rng.unit()) * radius;
    let dy = (0.5 - rng.unit()) * radius;
    center.translate(dx, dy).clamp_to(bounds)
}
