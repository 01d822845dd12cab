//! Spatial-subsystem error type.

use std::path::PathBuf;

use thiserror::Error;

use cm_core::NodeId;

/// Errors produced by `cm-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("map has no nodes")]
    EmptyMap,

    #[error("line {line}: {msg}")]
    Parse { line: usize, msg: String },

    #[error("unsupported location file format {0:?} (expected .wkt or .csv)")]
    UnsupportedFormat(String),

    #[error("{}: {source}", path.display())]
    InFile {
        path:   PathBuf,
        #[source]
        source: Box<SpatialError>,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
