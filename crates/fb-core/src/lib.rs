//! `fb-core` — foundational types for the fire-brigade dispatch service.
//!
//! This crate is a dependency of every other `fb-*` crate and has no
//! `fb-*` dependencies of its own.
//!
//! | Module  | Contents                    |
//! |---------|-----------------------------|
//! | [`ids`] | `NodeId`, `IncidentId`      |
//! | [`geo`] | `GeoPoint`, haversine distance |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use geo::GeoPoint;
pub use ids::{IncidentId, NodeId};
