//! `cm-spatial`: map graph, snapping, shortest paths, and venue files.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`map`]         | `MapGraph` (CSR + R-tree), `MapGraphBuilder`            |
//! | [`path_finder`] | `PathFinder` trait, `DijkstraPathFinder`                |
//! | [`walk`]        | `random_walk`, no-backtrack wandering over the graph    |
//! | [`points`]      | WKT / CSV point readers for venue lists                 |
//! | [`error`]       | `SpatialError`, `SpatialResult<T>`                      |
//!
//! Map construction from real map data is the caller's job; this crate only
//! offers the builder the caller feeds.

pub mod error;
pub mod map;
pub mod path_finder;
pub mod points;
pub mod walk;


pub use error::{SpatialError, SpatialResult};
pub use map::{MapGraph, MapGraphBuilder};
pub use path_finder::{DijkstraPathFinder, PathFinder, path_length};
pub use points::{load_points, read_csv_points, read_wkt_points};
pub use walk::random_walk;
