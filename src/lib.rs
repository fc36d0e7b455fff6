//! # mesh-grammar
//!
//! mesh-grammar is a graph-grammar engine for hierarchical, layered triangular
//! meshes. A mesh is an undirected graph whose vertices live on numbered
//! layers; each layer refines the one above it. Productions locate a small
//! pattern (their left-hand side) among caller-supplied candidate vertices and
//! rewrite it in place.
//!
//! ## Features
//! - A layered attributed graph trait ([`graph::LayeredGraph`]) with a
//!   deterministic in-memory implementation
//! - The vertex-merge primitive and layer-scoped neighbor queries
//! - A growth production that promotes and subdivides one element
//! - A merge production that reconciles duplicate boundary vertices left by
//!   independently refined siblings
//! - Optional post-rewrite invariant checking (`strict-invariants`,
//!   `check-invariants` features, or [`grammar::ApplyOptions::strict`])
//!
//! ## Determinism
//!
//! Every query returns vertices in ascending id order, so a production makes
//! the same choices regardless of the order in which the graph was built.
//!
//! ## Usage
//! ```
//! use mesh_grammar::prelude::*;
//!
//! let corners = [(1.0, 2.0), (1.0, 1.0), (2.0, 1.0)]
//!     .map(|p| VertexAttrs::new(1, Label::Regular, p));
//! let (mut graph, ids) =
//!     InMemoryLayeredGraph::from_parts(corners, [(0, 1), (1, 2), (2, 0)]).unwrap();
//! let element = add_interior(&mut graph, [ids[0], ids[1], ids[2]]).unwrap();
//!
//! let children = GrowthProduction
//!     .apply(&mut graph, &[element], Orientation::Identity, &ApplyOptions::strict())
//!     .unwrap();
//! assert_eq!(children.len(), 2);
//! assert_eq!(graph.label(element), Some(Label::UpperElement));
//! ```

pub mod debug_invariants;
pub mod grammar;
pub mod grammar_error;
pub mod graph;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::grammar::{
        ApplyOptions, GrowthMatch, GrowthProduction, MergeMatch, MergeProduction, Orientation,
        Production,
    };
    pub use crate::grammar_error::{GrammarError, Violation};
    pub use crate::graph::query::find_overlapping;
    pub use crate::graph::{
        InMemoryLayeredGraph, InvalidateCache, Label, LayeredGraph, MutableLayeredGraph,
        Position, VertexAttrs, VertexId, add_interior, merge_vertices,
    };
}
