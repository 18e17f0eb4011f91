use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IncidentError {
    #[error("no incidents queued")]
    EmptyQueue,

    #[error("invalid severity {0} (expected 1=low, 2=medium, 3=critical)")]
    InvalidSeverity(i64),
}

pub type IncidentResult<T> = Result<T, IncidentError>;
