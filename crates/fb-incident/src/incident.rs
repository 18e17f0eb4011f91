//! Incident and severity types.

use std::fmt;

use fb_core::{GeoPoint, IncidentId, NodeId};

use crate::{IncidentError, IncidentResult};

// ── Severity ──────────────────────────────────────────────────────────────────

/// How serious a reported incident is.  The numeric level is what clients
/// send and receive on the wire.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Severity {
    Low      = 1,
    Medium   = 2,
    Critical = 3,
}

impl Severity {
    /// Parse a wire level (1, 2 or 3).
    pub fn from_level(level: i64) -> IncidentResult<Self> {
        match level {
            1 => Ok(Self::Low),
            2 => Ok(Self::Medium),
            3 => Ok(Self::Critical),
            other => Err(IncidentError::InvalidSeverity(other)),
        }
    }

    #[inline]
    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low      => "low",
            Self::Medium   => "medium",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Incident ──────────────────────────────────────────────────────────────────

/// A reported incident, tied to the graph vertex of the reporting station.
///
/// The station id is validated against the road graph by the caller before
/// the incident is built; the store itself is graph-agnostic.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Incident {
    pub station:  NodeId,
    pub severity: Severity,
    /// Where the fire was reported, when the client sent coordinates.
    pub location: Option<GeoPoint>,
    /// Assigned by [`IncidentStore::enqueue`](crate::IncidentStore::enqueue);
    /// `IncidentId::INVALID` until then.
    pub id:       IncidentId,
}

impl Incident {
    pub fn new(station: NodeId, severity: Severity) -> Self {
        Self { station, severity, location: None, id: IncidentId::INVALID }
    }

    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }
}
