//! Fire-station catalog.
//!
//! Stations are static metadata layered over the road graph: each one has
//! a display name, a map position and the graph vertex it dispatches from.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest station.  Used to
//! snap a reported fire location to a station without touching the graph.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use fb_core::{GeoPoint, NodeId};

use crate::network::RoadGraph;
use crate::router::Router;
use crate::SpatialResult;

// ── Station ───────────────────────────────────────────────────────────────────

/// A fire station attached to a road-graph vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub node: NodeId,
    pub name: String,
    pub pos:  GeoPoint,
}

impl Station {
    pub fn new(node: NodeId, name: impl Into<String>, pos: GeoPoint) -> Self {
        Self { node, name: name.into(), pos }
    }
}

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a `[lat, lon]` point and the station's
/// position in the catalog.
#[derive(Clone)]
struct StationEntry {
    point: [f32; 2], // [lat, lon]
    slot:  usize,
}

impl RTreeObject for StationEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for StationEntry {
    /// Squared planar distance in degrees.
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── StationCatalog ────────────────────────────────────────────────────────────

/// Ordered, immutable list of stations plus a spatial index over them.
pub struct StationCatalog {
    stations:    Vec<Station>,
    spatial_idx: RTree<StationEntry>,
}

impl StationCatalog {
    /// Build the catalog.  Order is preserved for listing.
    pub fn new(stations: Vec<Station>) -> Self {
        let entries: Vec<StationEntry> = stations
            .iter()
            .enumerate()
            .map(|(slot, s)| StationEntry { point: [s.pos.lat, s.pos.lon], slot })
            .collect();
        Self {
            stations,
            spatial_idx: RTree::bulk_load(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Station> + '_ {
        self.stations.iter()
    }

    /// Check that every station vertex exists in `graph`.
    pub fn validate(&self, graph: &RoadGraph) -> SpatialResult<()> {
        self.stations.iter().try_for_each(|s| graph.check(s.node))
    }

    /// Geographically nearest station to `pos`.
    ///
    /// Returns `None` only if the catalog is empty.
    pub fn nearest_to(&self, pos: GeoPoint) -> Option<&Station> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lat, pos.lon])
            .map(|e| &self.stations[e.slot])
    }

    /// Station with the shortest road distance to `node`, and that distance.
    ///
    /// Roads are undirected, so a single search from `node` gives the
    /// station-to-incident distance for every station at once.  Ties go to
    /// the lower vertex id.  `Ok(None)` if no station can reach `node`.
    pub fn nearest_by_road<R: Router + ?Sized>(
        &self,
        graph:  &RoadGraph,
        router: &R,
        node:   NodeId,
    ) -> SpatialResult<Option<(&Station, u64)>> {
        let dist = router.distances(graph, node)?;
        Ok(self
            .stations
            .iter()
            .filter_map(|s| dist.get(s.node.index()).copied().flatten().map(|d| (s, d)))
            .min_by_key(|(s, d)| (*d, s.node)))
    }
}
