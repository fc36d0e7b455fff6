//! Layered attributed graph: the data model productions rewrite.
//!
//! Vertices carry a layer, a label and a position; edges are undirected and
//! carry nothing. Productions only see the graph through the
//! [`LayeredGraph`] / [`MutableLayeredGraph`] traits, and
//! [`InMemoryLayeredGraph`] is the in-crate implementation.

pub mod cache;
pub mod in_memory;
pub mod interior;
pub mod merge;
pub mod query;
pub mod vertex;

pub use cache::InvalidateCache;
pub use in_memory::InMemoryLayeredGraph;
pub use interior::add_interior;
pub use merge::merge_vertices;
pub use vertex::{Label, Position, VertexAttrs, VertexId};

use crate::debug_invariants::DebugInvariants;
use crate::grammar_error::GrammarError;

/// Read access to a layered graph.
pub trait LayeredGraph {
    type NeighborIter<'a>: Iterator<Item = VertexId>
    where
        Self: 'a;

    /// Attributes of `v`, or `None` if it does not exist.
    fn vertex(&self, v: VertexId) -> Option<&VertexAttrs>;

    /// All neighbors of `v`, in ascending id order. Empty for unknown vertices.
    fn neighbors<'a>(&'a self, v: VertexId) -> Self::NeighborIter<'a>;

    /// Whether the undirected edge `a`-`b` exists.
    fn has_edge(&self, a: VertexId, b: VertexId) -> bool;

    /// All vertex ids, in ascending order.
    fn vertices<'a>(&'a self) -> Box<dyn Iterator<Item = VertexId> + 'a>;

    /// Vertices on `layer`, in ascending id order.
    ///
    /// The default scans every vertex; implementations with a layer index
    /// should override it.
    fn vertices_at_layer<'a>(&'a self, layer: u32) -> Box<dyn Iterator<Item = VertexId> + 'a> {
        Box::new(self.vertices().filter(move |&v| self.layer(v) == Some(layer)))
    }

    fn vertex_count(&self) -> usize;

    fn edge_count(&self) -> usize;

    fn contains_vertex(&self, v: VertexId) -> bool {
        self.vertex(v).is_some()
    }

    /// Attributes of `v`, failing with [`GrammarError::UnknownVertex`].
    fn try_vertex(&self, v: VertexId) -> Result<&VertexAttrs, GrammarError> {
        self.vertex(v).ok_or(GrammarError::UnknownVertex(v))
    }

    fn layer(&self, v: VertexId) -> Option<u32> {
        self.vertex(v).map(|a| a.layer)
    }

    fn label(&self, v: VertexId) -> Option<Label> {
        self.vertex(v).map(|a| a.label)
    }

    fn position(&self, v: VertexId) -> Option<Position> {
        self.vertex(v).map(|a| a.position)
    }

    /// Every edge once, as `(low, high)` pairs in ascending order.
    fn edges<'a>(&'a self) -> Box<dyn Iterator<Item = (VertexId, VertexId)> + 'a> {
        Box::new(
            self.vertices()
                .flat_map(move |a| self.neighbors(a).filter(move |&b| a < b).map(move |b| (a, b))),
        )
    }
}

/// Structural mutation of a layered graph.
pub trait MutableLayeredGraph: LayeredGraph + InvalidateCache + DebugInvariants {
    /// Insert a vertex under a freshly allocated id.
    fn add_vertex(&mut self, attrs: VertexAttrs) -> VertexId;

    /// Insert a vertex under a caller-chosen id.
    fn insert_vertex(&mut self, id: VertexId, attrs: VertexAttrs) -> Result<(), GrammarError>;

    /// Remove `v` and all incident edges, returning its attributes.
    fn remove_vertex(&mut self, v: VertexId) -> Option<VertexAttrs>;

    /// Insert the edge `a`-`b`. Returns `false` if it already existed.
    fn add_edge(&mut self, a: VertexId, b: VertexId) -> Result<bool, GrammarError>;

    /// Remove the edge `a`-`b`. Returns `false` if it did not exist.
    fn remove_edge(&mut self, a: VertexId, b: VertexId) -> bool;

    /// Replace the label of `v`, returning the previous one.
    fn set_label(&mut self, v: VertexId, label: Label) -> Result<Label, GrammarError>;

    /// Replace the position of `v`, returning the previous one.
    fn set_position(&mut self, v: VertexId, position: Position) -> Result<Position, GrammarError>;
}
