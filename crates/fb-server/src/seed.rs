//! Built-in city data: the Islamabad road grid and its fire stations.
//!
//! ```text
//!  Central core    0 Main Station   1 Blue Area    2 G-6        3 Margalla     4 Airport
//!  Northern zone   5 Saidpur        6 Pir Sohawa   7 F.J. Park  8 Aabpara      9 Kashmir Hwy
//!  Eastern zone   10 Shifa         11 Research    12 Chak Shahzad 13 Koral     14 Behlwal
//!  Western zone   15 Rawalpindi    16 Pirwadhai   17 Potters   18 Sector F    19 Westridge
//! ```
//!
//! Weights are road lengths in arbitrary whole units.

use fb_core::{GeoPoint, NodeId};
use fb_spatial::{RoadGraph, RoadGraphBuilder, SpatialResult, Station, StationCatalog};

pub const CITY_VERTICES: usize = 20;

/// `(a, b, weight)` for every undirected road in the grid.
const CITY_ROADS: [(u32, u32, u32); 33] = [
    // Central core
    (0, 1, 5),
    (1, 2, 4),
    (2, 3, 6),
    (3, 4, 7),
    (0, 2, 8),   // express
    (1, 3, 9),
    (0, 4, 14),
    // Northern zone
    (2, 5, 8),
    (3, 6, 7),
    (5, 6, 6),
    (5, 7, 5),
    (6, 8, 8),
    (7, 8, 7),
    (8, 9, 4),
    // Eastern zone
    (4, 10, 9),
    (10, 11, 6),
    (11, 12, 5),
    (12, 13, 7),
    (13, 14, 6),
    // Western zone
    (0, 15, 10),
    (15, 16, 8),
    (16, 17, 7),
    (17, 1, 9),
    (15, 18, 6),
    (18, 19, 5),
    // Cross-city
    (9, 14, 12),
    (8, 11, 10),
    (7, 10, 11),
    (4, 13, 15),
    (1, 19, 13),
    (19, 14, 14),
    (16, 10, 11),
    (12, 9, 10),
];

pub fn city_graph() -> SpatialResult<RoadGraph> {
    let mut b = RoadGraphBuilder::new(CITY_VERTICES);
    for (u, v, w) in CITY_ROADS {
        b.add_road(NodeId(u), NodeId(v), w)?;
    }
    Ok(b.build())
}

/// The five dispatching stations, in catalog order.
pub fn city_stations() -> StationCatalog {
    StationCatalog::new(vec![
        Station::new(NodeId(0),  "Downtown",   GeoPoint::new(33.7414, 74.3569)),
        Station::new(NodeId(4),  "Airport",    GeoPoint::new(33.5651, 74.2165)),
        Station::new(NodeId(3),  "Margalla",   GeoPoint::new(33.8186, 74.3289)),
        Station::new(NodeId(1),  "BlueArea",   GeoPoint::new(33.7738, 74.5175)),
        Station::new(NodeId(15), "Rawalpindi", GeoPoint::new(33.5895, 74.3055)),
    ])
}
