//! Spatial-subsystem error type.

use thiserror::Error;

use fb_core::NodeId;

/// Errors produced by `fb-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// A vertex id outside `[0, vertex_count)`.  `node` is kept signed so a
    /// negative id typed by a client is reported as-is.
    #[error("node {node} out of range (graph has {vertex_count} vertices)")]
    OutOfRange { node: i64, vertex_count: usize },

    #[error("no route from {from} to {to}")]
    Unreachable { from: NodeId, to: NodeId },

    #[error("road data error: {0}")]
    Load(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
