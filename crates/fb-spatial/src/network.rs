//! Road graph representation and builder.
//!
//! # Data layout
//!
//! One adjacency list per vertex, in insertion order.  Every road is stored
//! twice (`u → v` and `v → u`, same weight), so a vertex's neighbours are a
//! single contiguous slice scan in Dijkstra's inner loop.
//!
//! # Lifecycle
//!
//! Roads can only be added through [`RoadGraphBuilder`].  [`RoadGraph`] has
//! no mutators, so once built it is safe to share across connection threads
//! behind an `Arc` without any locking.

use fb_core::NodeId;

use crate::{SpatialError, SpatialResult};

// ── Adjacent ──────────────────────────────────────────────────────────────────

/// One adjacency entry: the neighbouring vertex and the road weight.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Adjacent {
    pub to:     NodeId,
    pub weight: u32,
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Undirected weighted road graph with a fixed vertex count.
///
/// Do not construct directly; use [`RoadGraphBuilder`].
#[derive(Debug, Clone)]
pub struct RoadGraph {
    adjacency:  Vec<Vec<Adjacent>>,
    road_count: usize,
}

impl RoadGraph {
    /// Number of vertices `V`, fixed at construction.
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected roads (each road has two adjacency entries).
    pub fn road_count(&self) -> usize {
        self.road_count
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Validate a raw (possibly negative) vertex id and convert it.
    pub fn node(&self, raw: i64) -> SpatialResult<NodeId> {
        let out_of_range = || SpatialError::OutOfRange {
            node:         raw,
            vertex_count: self.vertex_count(),
        };
        let index = usize::try_from(raw).map_err(|_| out_of_range())?;
        if index >= self.vertex_count() {
            return Err(out_of_range());
        }
        NodeId::try_from(index).map_err(|_| out_of_range())
    }

    /// `Ok(())` if `node` is a vertex of this graph.
    #[inline]
    pub fn check(&self, node: NodeId) -> SpatialResult<()> {
        check_node(node, self.vertex_count())
    }

    /// Neighbours of `node` with their road weights, in insertion order.
    pub fn neighbors(&self, node: NodeId) -> SpatialResult<&[Adjacent]> {
        self.check(node)?;
        Ok(&self.adjacency[node.index()])
    }

    /// Weight of the lightest road directly joining `a` and `b`, if any.
    pub fn road_weight(&self, a: NodeId, b: NodeId) -> SpatialResult<Option<u32>> {
        self.check(b)?;
        Ok(self
            .neighbors(a)?
            .iter()
            .filter(|adj| adj.to == b)
            .map(|adj| adj.weight)
            .min())
    }

    /// Unchecked neighbour slice for the router's inner loop.  Callers must
    /// have validated `node` already.
    #[inline]
    pub(crate) fn adjacent(&self, node: NodeId) -> &[Adjacent] {
        &self.adjacency[node.index()]
    }
}

#[inline]
fn check_node(node: NodeId, vertex_count: usize) -> SpatialResult<()> {
    if node.index() < vertex_count {
        Ok(())
    } else {
        Err(SpatialError::OutOfRange {
            node: i64::from(node.0),
            vertex_count,
        })
    }
}

// ── RoadGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`RoadGraph`] road by road, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use fb_core::NodeId;
/// use fb_spatial::RoadGraphBuilder;
///
/// let mut b = RoadGraphBuilder::new(3);
/// b.add_road(NodeId(0), NodeId(1), 5).unwrap();
/// b.add_road(NodeId(1), NodeId(2), 6).unwrap();
/// let graph = b.build();
/// assert_eq!(graph.vertex_count(), 3);
/// assert_eq!(graph.road_count(), 2);
/// ```
#[derive(Debug)]
pub struct RoadGraphBuilder {
    adjacency:  Vec<Vec<Adjacent>>,
    road_count: usize,
}

impl RoadGraphBuilder {
    /// Start a graph with `vertex_count` isolated vertices `0..vertex_count`.
    pub fn new(vertex_count: usize) -> Self {
        Self {
            adjacency:  vec![Vec::new(); vertex_count],
            road_count: 0,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn road_count(&self) -> usize {
        self.road_count
    }

    /// Add an undirected road between `a` and `b`.
    ///
    /// Appends `a → b` and `b → a` with the same weight.  Both ends are
    /// validated first, so a failed call leaves the builder untouched.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, weight: u32) -> SpatialResult<()> {
        check_node(a, self.vertex_count())?;
        check_node(b, self.vertex_count())?;

        self.adjacency[a.index()].push(Adjacent { to: b, weight });
        self.adjacency[b.index()].push(Adjacent { to: a, weight });
        self.road_count += 1;
        Ok(())
    }

    /// Consume the builder and freeze the graph.
    pub fn build(self) -> RoadGraph {
        RoadGraph {
            adjacency:  self.adjacency,
            road_count: self.road_count,
        }
    }
}
