//! Server error types.
//!
//! Two layers: [`CommandError`] covers a single request and is always turned
//! into an `ERROR` line for the client; [`ServerError`] covers startup
//! (configuration, road data, binding) and is the only kind that reaches
//! `main`.

use thiserror::Error;

use fb_incident::IncidentError;
use fb_spatial::SpatialError;

/// Why one request could not be answered.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("empty request")]
    Empty,

    #[error("unknown command {0:?}")]
    Unknown(String),

    /// Missing, extra, or unparsable arguments.
    #[error("{0}")]
    Malformed(String),

    /// Well-formed, but nothing can answer it (e.g. no station reachable).
    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Incident(#[from] IncidentError),
}

impl CommandError {
    /// Render as a protocol line (without the terminator).
    ///
    /// Empty requests and unknown keywords get a bare `ERROR`; everything
    /// else carries its reason: `ERROR|<reason>`.
    pub fn to_response(&self) -> String {
        match self {
            Self::Empty | Self::Unknown(_) => "ERROR".to_string(),
            other => format!("ERROR|{other}"),
        }
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

/// Startup and accept-loop failures.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("road network error: {0}")]
    Spatial(#[from] SpatialError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ServerResult<T> = Result<T, ServerError>;
