//! Venue point files.
//!
//! Two formats are accepted:
//!
//! ```text
//! # classes.wkt                       classes.csv
//! POINT (120.5 340.0)                 x,y
//! POINT (410 95.25)                   120.5,340.0
//!                                     410,95.25
//! ```
//!
//! WKT keywords are case-insensitive; blank lines and `#` comments are
//! skipped.  Anything else is a parse error carrying the 1-based line
//! number.  A file either loads completely or not at all.
//!
//! The points are returned in the file's own frame.  Convert them with
//! [`MapGraph::to_map_space`](crate::MapGraph::to_map_space) before use.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use cm_core::Coord;

use crate::{SpatialError, SpatialResult};

// ── WKT ───────────────────────────────────────────────────────────────────────

/// Read every `POINT (x y)` from a WKT source.
pub fn read_wkt_points<R: BufRead>(reader: R) -> SpatialResult<Vec<Coord>> {
    let mut points = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let point = parse_wkt_point(trimmed)
            .map_err(|msg| SpatialError::Parse { line: i + 1, msg })?;
        points.push(point);
    }
    Ok(points)
}

fn parse_wkt_point(s: &str) -> Result<Coord, String> {
    let keyword = s.get(..5).unwrap_or("");
    if !keyword.eq_ignore_ascii_case("POINT") {
        return Err(format!("expected POINT, found {s:?}"));
    }
    let body = s[5..].trim();
    let inner = body
        .strip_prefix('(')
        .and_then(|b| b.strip_suffix(')'))
        .ok_or_else(|| format!("expected parenthesised coordinates, found {body:?}"))?;

    let mut parts = inner.split_whitespace();
    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected two coordinates, found {inner:?}"));
    };
    let x: f64 = x.parse().map_err(|_| format!("bad x coordinate {x:?}"))?;
    let y: f64 = y.parse().map_err(|_| format!("bad y coordinate {y:?}"))?;
    Ok(Coord::new(x, y))
}

// ── CSV ───────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PointRecord {
    x: f64,
    y: f64,
}

/// Read every row of an `x,y` CSV source (header required).
pub fn read_csv_points<R: Read>(reader: R) -> SpatialResult<Vec<Coord>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut points = Vec::new();
    for result in csv_reader.deserialize::<PointRecord>() {
        let row = result.map_err(|e| match e.position() {
            Some(pos) => SpatialError::Parse { line: pos.line() as usize, msg: e.to_string() },
            None => SpatialError::Csv(e),
        })?;
        points.push(Coord::new(row.x, row.y));
    }
    Ok(points)
}

// ── Files ─────────────────────────────────────────────────────────────────────

/// Load a point file, choosing the format from its extension
/// (`.wkt` or `.csv`).  Errors name the offending file.
pub fn load_points(path: &Path) -> SpatialResult<Vec<Coord>> {
    let points = load_points_inner(path).map_err(|e| SpatialError::InFile {
        path:   path.to_path_buf(),
        source: Box::new(e),
    })?;
    debug!(path = %path.display(), count = points.len(), "loaded venue points");
    Ok(points)
}

fn load_points_inner(path: &Path) -> SpatialResult<Vec<Coord>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "wkt" => read_wkt_points(BufReader::new(File::open(path)?)),
        "csv" => read_csv_points(File::open(path)?),
        _ => Err(SpatialError::UnsupportedFormat(ext)),
    }
}
