//! GrammarError: Unified error type for mesh-grammar public APIs
//!
//! Every fallible operation in the crate reports a [`GrammarError`]. Pattern
//! mismatches detected while validating a production's left-hand side carry a
//! [`Violation`] describing the first condition that failed.

use thiserror::Error;

use crate::graph::vertex::{Label, VertexId};

/// Unified error type for mesh-grammar operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GrammarError {
    /// Attempted to construct a VertexId with a zero value (invalid).
    #[error("VertexId must be non-zero (0 is reserved as invalid/sentinel)")]
    InvalidVertexId,
    /// A vertex id does not exist in the graph.
    #[error("Graph error: vertex `{0}` does not exist")]
    UnknownVertex(VertexId),
    /// A vertex id is already taken.
    #[error("Graph error: vertex `{0}` already exists")]
    DuplicateVertex(VertexId),
    /// Edges must join two distinct vertices.
    #[error("Graph error: self-loop on vertex `{0}` is not allowed")]
    SelfLoop(VertexId),
    /// The candidate set is not an instance of the production's left-hand side.
    #[error("{production}: {violation}")]
    PatternMismatch {
        production: &'static str,
        violation: Violation,
    },
    /// Raw orientation index outside the known enumeration.
    #[error("Unknown orientation index {0}")]
    UnknownOrientation(u8),
    /// The production has no left-hand-side embedding for this orientation.
    #[error("{production}: orientation {orientation:?} is not supported")]
    UnsupportedOrientation {
        production: &'static str,
        orientation: crate::grammar::Orientation,
    },
    /// A structural invariant of the graph does not hold.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl GrammarError {
    /// True when the error means "this candidate set does not match".
    pub fn is_pattern_mismatch(&self) -> bool {
        matches!(self, GrammarError::PatternMismatch { .. })
    }

    /// The violated condition, if this is a pattern mismatch.
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            GrammarError::PatternMismatch { violation, .. } => Some(violation),
            _ => None,
        }
    }
}

/// The condition of a left-hand-side pattern that a candidate set failed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Violation {
    #[error("expected {expected} distinct candidate vertices, found {found}")]
    CandidateCount { expected: usize, found: usize },
    #[error("candidate vertex `{0}` does not exist")]
    UnknownVertex(VertexId),
    #[error("{role} candidates are not on one layer")]
    LayerSplit { role: &'static str },
    #[error("layer {0} has no layer above it")]
    TopLayer(u32),
    #[error("lower layer {lower} is not directly below upper layer {upper}")]
    LayerGap { upper: u32, lower: u32 },
    #[error("vertex `{vertex}` has label {found}, expected {expected}")]
    Label {
        vertex: VertexId,
        expected: Label,
        found: Label,
    },
    #[error("vertex `{0}` is already a promoted element")]
    AlreadyPromoted(VertexId),
    #[error("lower marker `{0}` is not attached to either upper element")]
    Orphan(VertexId),
    #[error("lower marker `{0}` is attached to both upper elements")]
    AmbiguousOwner(VertexId),
    #[error("upper elements share {found} common neighbors, expected 2")]
    SharedPointCount { found: usize },
    #[error("shared points `{0}` and `{1}` are not connected")]
    SharedPointsDisconnected(VertexId, VertexId),
    #[error("{which}: expected {expected} coincident lower vertices, found {found}")]
    CoincidenceCount {
        which: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("{which}: coincident vertices are not contributed one per side")]
    BucketSides { which: &'static str },
    #[error("middle vertex `{middle}` is not connected to `{vertex}`")]
    DetachedMiddle { middle: VertexId, vertex: VertexId },
    #[error("the two sides do not share a boundary vertex")]
    NoSharedVertex,
    #[error("vertices to merge are one and the same (`{0}`)")]
    SelfMerge(VertexId),
    #[error("vertices to merge `{0}` and `{1}` are already connected")]
    AdjacentDuplicates(VertexId, VertexId),
    #[error("required edge `{0}`-`{1}` is missing")]
    MissingEdge(VertexId, VertexId),
    #[error("element `{element}` has {found} corners, expected 3")]
    CornerCount { element: VertexId, found: usize },
    #[error("boundary between corners `{0}` and `{1}` is broken")]
    BrokenBoundary(VertexId, VertexId),
    #[error("corners `{0}` and `{1}` are connected both directly and through hanging vertex `{2}`")]
    HangingWithEdge(VertexId, VertexId, VertexId),
}
