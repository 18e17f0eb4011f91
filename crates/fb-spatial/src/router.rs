//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! The command processor calls routing through the [`Router`] trait, so a
//! different engine (A*, precomputed tables) can be swapped in without
//! touching the server.
//!
//! # Unreachable destinations
//!
//! When no path exists the router returns [`SpatialError::Unreachable`]; it
//! never reports a direct `[from, to]` hop for a road that does not exist.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use fb_core::NodeId;

use crate::network::RoadGraph;
use crate::{SpatialError, SpatialResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query: the vertices visited and the total weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Vertices from source to destination, both inclusive.
    pub nodes: Vec<NodeId>,
    /// Sum of the road weights along `nodes`.
    pub distance: u64,
}

impl Route {
    /// Comma-separated vertex list, e.g. `0,1,2`.
    pub fn join_nodes(&self) -> String {
        self.nodes
            .iter()
            .map(NodeId::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`: one router instance is shared by
/// every connection handler thread.
pub trait Router: Send + Sync {
    /// Compute a shortest route from `from` to `to`.
    ///
    /// `from == to` yields the single-vertex route `[from]` with distance 0.
    ///
    /// # Errors
    ///
    /// - [`SpatialError::OutOfRange`] if either vertex is not in `graph`.
    /// - [`SpatialError::Unreachable`] if `to` is not connected to `from`.
    fn route(&self, graph: &RoadGraph, from: NodeId, to: NodeId) -> SpatialResult<Route>;

    /// Shortest distance from `from` to every vertex (`None` = unreachable),
    /// indexed by `NodeId`.
    fn distances(&self, graph: &RoadGraph, from: NodeId) -> SpatialResult<Vec<Option<u64>>>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Single-source Dijkstra with a binary min-heap and lazy deletion.
///
/// Stops as soon as the destination is settled; valid because road weights
/// are unsigned.  Heap entries are `(distance, NodeId)`, so equal distances
/// are settled in ascending vertex order and results are reproducible.
#[derive(Debug, Default, Clone, Copy)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, graph: &RoadGraph, from: NodeId, to: NodeId) -> SpatialResult<Route> {
        graph.check(from)?;
        graph.check(to)?;

        let search = dijkstra(graph, from, Some(to));
        if search.dist[to.index()] == u64::MAX {
            return Err(SpatialError::Unreachable { from, to });
        }
        Ok(search.reconstruct(to))
    }

    fn distances(&self, graph: &RoadGraph, from: NodeId) -> SpatialResult<Vec<Option<u64>>> {
        graph.check(from)?;

        let search = dijkstra(graph, from, None);
        Ok(search
            .dist
            .into_iter()
            .map(|d| (d != u64::MAX).then_some(d))
            .collect())
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

struct Search {
    /// dist[v] = best known distance to v; `u64::MAX` for unreached vertices.
    dist:   Vec<u64>,
    /// parent[v] = predecessor on the best known path; `NodeId::INVALID` for
    /// the source and unreached vertices.
    parent: Vec<NodeId>,
}

impl Search {
    /// Walk parent pointers back from `to` and return the route in order.
    fn reconstruct(&self, to: NodeId) -> Route {
        let mut nodes = Vec::new();
        let mut cur = to;
        while cur != NodeId::INVALID {
            nodes.push(cur);
            cur = self.parent[cur.index()];
        }
        nodes.reverse();
        Route {
            nodes,
            distance: self.dist[to.index()],
        }
    }
}

/// Run Dijkstra from `from`; stop early once `target` is settled.
///
/// Both vertices must already be validated against `graph`.
fn dijkstra(graph: &RoadGraph, from: NodeId, target: Option<NodeId>) -> Search {
    let n = graph.vertex_count();
    let mut dist    = vec![u64::MAX; n];
    let mut parent  = vec![NodeId::INVALID; n];
    let mut settled = vec![false; n];

    dist[from.index()] = 0;

    // Reverse makes BinaryHeap (max) behave as a min-heap.
    let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        // Skip stale heap entries before marking anything settled.
        if cost > dist[node.index()] || settled[node.index()] {
            continue;
        }
        settled[node.index()] = true;

        if Some(node) == target {
            break;
        }

        for adj in graph.adjacent(node) {
            if settled[adj.to.index()] {
                continue;
            }
            let new_cost = cost.saturating_add(u64::from(adj.weight));
            if new_cost < dist[adj.to.index()] {
                dist[adj.to.index()] = new_cost;
                parent[adj.to.index()] = node;
                heap.push(Reverse((new_cost, adj.to)));
            }
        }
    }

    Search { dist, parent }
}
