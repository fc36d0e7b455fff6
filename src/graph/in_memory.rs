//! In-memory implementation of [`LayeredGraph`] and [`MutableLayeredGraph`].
//!
//! Vertex records live in an ordered map and adjacency is kept as symmetric
//! ordered sets, so every traversal is deterministic. A per-layer index is
//! built lazily and dropped on any structural change.

use std::collections::{BTreeMap, BTreeSet};
use std::num::NonZeroU64;

use once_cell::sync::OnceCell;

use super::cache::InvalidateCache;
use super::vertex::{Label, Position, VertexAttrs, VertexId};
use super::{LayeredGraph, MutableLayeredGraph};
use crate::debug_invariants::DebugInvariants;
use crate::grammar_error::GrammarError;

static NO_NEIGHBORS: BTreeSet<VertexId> = BTreeSet::new();

/// An undirected layered graph stored as per-vertex records plus adjacency sets.
#[derive(Clone, Debug, Default)]
pub struct InMemoryLayeredGraph {
    vertices: BTreeMap<VertexId, VertexAttrs>,
    adjacency: BTreeMap<VertexId, BTreeSet<VertexId>>,
    edge_count: usize,
    last_id: u64,
    layers: OnceCell<BTreeMap<u32, Vec<VertexId>>>,
}

impl InMemoryLayeredGraph {
    /// Creates a new, empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from vertex records and edges given by position in `vertices`.
    ///
    /// Ids are allocated in iteration order, starting at 1.
    pub fn from_parts<V, E>(vertices: V, edges: E) -> Result<(Self, Vec<VertexId>), GrammarError>
    where
        V: IntoIterator<Item = VertexAttrs>,
        E: IntoIterator<Item = (usize, usize)>,
    {
        let mut graph = Self::new();
        let ids: Vec<VertexId> = vertices.into_iter().map(|a| graph.add_vertex(a)).collect();
        for (a, b) in edges {
            let (Some(&va), Some(&vb)) = (ids.get(a), ids.get(b)) else {
                return Err(GrammarError::InvariantViolation(format!(
                    "edge ({a}, {b}) refers past {} vertices",
                    ids.len()
                )));
            };
            graph.add_edge(va, vb)?;
        }
        Ok((graph, ids))
    }

    /// Number of incident edges of `v`.
    pub fn degree(&self, v: VertexId) -> usize {
        self.adjacency.get(&v).map_or(0, BTreeSet::len)
    }

    fn layer_index(&self) -> &BTreeMap<u32, Vec<VertexId>> {
        self.layers.get_or_init(|| {
            let mut index: BTreeMap<u32, Vec<VertexId>> = BTreeMap::new();
            for (&v, attrs) in &self.vertices {
                index.entry(attrs.layer).or_default().push(v);
            }
            index
        })
    }

    /// One past the largest id ever issued; once `u64::MAX` is taken, the
    /// lowest id not currently in use.
    fn allocate_id(&mut self) -> VertexId {
        if let Some(next) = NonZeroU64::MIN.checked_add(self.last_id) {
            self.last_id = next.get();
            return VertexId::from(next);
        }
        let mut free = NonZeroU64::MIN;
        for v in self.vertices.keys() {
            if v.get() != free.get() {
                break;
            }
            free = free.saturating_add(1);
        }
        VertexId::from(free)
    }

    fn attrs_mut(&mut self, v: VertexId) -> Result<&mut VertexAttrs, GrammarError> {
        self.vertices
            .get_mut(&v)
            .ok_or(GrammarError::UnknownVertex(v))
    }
}

impl InvalidateCache for InMemoryLayeredGraph {
    #[inline]
    fn invalidate_cache(&mut self) {
        self.layers.take();
    }
}

impl LayeredGraph for InMemoryLayeredGraph {
    type NeighborIter<'a> = std::iter::Copied<std::collections::btree_set::Iter<'a, VertexId>>;

    #[inline]
    fn vertex(&self, v: VertexId) -> Option<&VertexAttrs> {
        self.vertices.get(&v)
    }

    fn neighbors<'a>(&'a self, v: VertexId) -> Self::NeighborIter<'a> {
        self.adjacency.get(&v).unwrap_or(&NO_NEIGHBORS).iter().copied()
    }

    #[inline]
    fn has_edge(&self, a: VertexId, b: VertexId) -> bool {
        self.adjacency.get(&a).is_some_and(|ns| ns.contains(&b))
    }

    fn vertices<'a>(&'a self) -> Box<dyn Iterator<Item = VertexId> + 'a> {
        Box::new(self.vertices.keys().copied())
    }

    fn vertices_at_layer<'a>(&'a self, layer: u32) -> Box<dyn Iterator<Item = VertexId> + 'a> {
        Box::new(self.layer_index().get(&layer).into_iter().flatten().copied())
    }

    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn edge_count(&self) -> usize {
        self.edge_count
    }
}

impl MutableLayeredGraph for InMemoryLayeredGraph {
    fn add_vertex(&mut self, attrs: VertexAttrs) -> VertexId {
        let id = self.allocate_id();
        self.vertices.insert(id, attrs);
        self.adjacency.insert(id, BTreeSet::new());
        self.invalidate_cache();
        id
    }

    fn insert_vertex(&mut self, id: VertexId, attrs: VertexAttrs) -> Result<(), GrammarError> {
        if self.vertices.contains_key(&id) {
            return Err(GrammarError::DuplicateVertex(id));
        }
        self.last_id = self.last_id.max(id.get());
        self.vertices.insert(id, attrs);
        self.adjacency.insert(id, BTreeSet::new());
        self.invalidate_cache();
        Ok(())
    }

    fn remove_vertex(&mut self, v: VertexId) -> Option<VertexAttrs> {
        let attrs = self.vertices.remove(&v)?;
        for n in self.adjacency.remove(&v).unwrap_or_default() {
            if let Some(ns) = self.adjacency.get_mut(&n) {
                ns.remove(&v);
            }
            self.edge_count -= 1;
        }
        self.invalidate_cache();
        crate::debug_invariants!(self.validate_invariants(), "InMemoryLayeredGraph::remove_vertex");
        Some(attrs)
    }

    fn add_edge(&mut self, a: VertexId, b: VertexId) -> Result<bool, GrammarError> {
        if a == b {
            return Err(GrammarError::SelfLoop(a));
        }
        for v in [a, b] {
            if !self.vertices.contains_key(&v) {
                return Err(GrammarError::UnknownVertex(v));
            }
        }
        let inserted = self.adjacency.entry(a).or_default().insert(b);
        if inserted {
            self.adjacency.entry(b).or_default().insert(a);
            self.edge_count += 1;
        }
        crate::debug_invariants!(self.validate_invariants(), "InMemoryLayeredGraph::add_edge");
        Ok(inserted)
    }

    fn remove_edge(&mut self, a: VertexId, b: VertexId) -> bool {
        let removed = self
            .adjacency
            .get_mut(&a)
            .is_some_and(|ns| ns.remove(&b));
        if removed {
            if let Some(ns) = self.adjacency.get_mut(&b) {
                ns.remove(&a);
            }
            self.edge_count -= 1;
        }
        removed
    }

    fn set_label(&mut self, v: VertexId, label: Label) -> Result<Label, GrammarError> {
        let attrs = self.attrs_mut(v)?;
        Ok(std::mem::replace(&mut attrs.label, label))
    }

    fn set_position(&mut self, v: VertexId, position: Position) -> Result<Position, GrammarError> {
        let attrs = self.attrs_mut(v)?;
        Ok(std::mem::replace(&mut attrs.position, position))
    }
}

impl DebugInvariants for InMemoryLayeredGraph {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "InMemoryLayeredGraph");
    }

    fn validate_invariants(&self) -> Result<(), GrammarError> {
        let mut half_edges = 0usize;
        for (&v, ns) in &self.adjacency {
            if !self.vertices.contains_key(&v) {
                return Err(GrammarError::InvariantViolation(format!(
                    "adjacency entry for missing vertex {v}"
                )));
            }
            for &n in ns {
                if n == v {
                    return Err(GrammarError::InvariantViolation(format!("self-loop on {v}")));
                }
                if !self.vertices.contains_key(&n) {
                    return Err(GrammarError::InvariantViolation(format!(
                        "edge {v}-{n} points to a missing vertex"
                    )));
                }
                if !self.adjacency.get(&n).is_some_and(|back| back.contains(&v)) {
                    return Err(GrammarError::InvariantViolation(format!(
                        "edge {v}-{n} has no mirror"
                    )));
                }
            }
            half_edges += ns.len();
        }
        if half_edges != 2 * self.edge_count {
            return Err(GrammarError::InvariantViolation(format!(
                "edge count {} disagrees with adjacency ({half_edges} half-edges)",
                self.edge_count
            )));
        }
        Ok(())
    }
}
