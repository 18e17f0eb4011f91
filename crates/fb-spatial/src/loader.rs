//! CSV road loader.
//!
//! # CSV format
//!
//! One row per undirected road:
//!
//! ```csv
//! from,to,weight
//! 0,1,5
//! 1,2,4
//! ```
//!
//! Vertex ids must lie in `[0, vertex_count)`.  Weights are non-negative
//! integers; negative or fractional weights fail to parse.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use fb_core::NodeId;

use crate::network::{RoadGraph, RoadGraphBuilder};
use crate::{SpatialError, SpatialResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RoadRecord {
    from:   u32,
    to:     u32,
    weight: u32,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a road graph with `vertex_count` vertices from a CSV file.
pub fn load_roads_csv(path: &Path, vertex_count: usize) -> SpatialResult<RoadGraph> {
    let file = std::fs::File::open(path)?;
    load_roads_reader(file, vertex_count)
}

/// Like [`load_roads_csv`] but accepts any `Read` source.
pub fn load_roads_reader<R: Read>(reader: R, vertex_count: usize) -> SpatialResult<RoadGraph> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut builder = RoadGraphBuilder::new(vertex_count);

    for (line, result) in csv_reader.deserialize::<RoadRecord>().enumerate() {
        // Header is line 1.
        let row = result.map_err(|e| SpatialError::Load(format!("row {}: {e}", line + 2)))?;
        builder.add_road(NodeId(row.from), NodeId(row.to), row.weight)?;
    }

    Ok(builder.build())
}
