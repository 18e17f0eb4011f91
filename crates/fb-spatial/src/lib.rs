//! `fb-spatial` — road graph, shortest-path routing, and the station catalog.
//!
//! # Crate layout
//!
//! | Module       | Contents                                         |
//! |--------------|--------------------------------------------------|
//! | [`network`]  | `RoadGraph`, `RoadGraphBuilder`, `Adjacent`      |
//! | [`router`]   | `Router` trait, `Route`, `DijkstraRouter`        |
//! | [`stations`] | `Station`, `StationCatalog` (R-tree snapping)    |
//! | [`loader`]   | `load_roads_csv`, `load_roads_reader`            |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`               |

pub mod error;
pub mod loader;
pub mod network;
pub mod router;
pub mod stations;


pub use error::{SpatialError, SpatialResult};
pub use loader::{load_roads_csv, load_roads_reader};
pub use network::{Adjacent, RoadGraph, RoadGraphBuilder};
pub use router::{DijkstraRouter, Route, Router};
pub use stations::{Station, StationCatalog};
