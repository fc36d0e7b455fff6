//! The contract every production satisfies.
//!
//! A production is applied in two phases. [`Production::validate`] only
//! reads the graph and either proves the candidate set is an instance of the
//! left-hand side, returning a typed match, or reports the first
//! [`Violation`]. [`Production::rewrite`] consumes that match and mutates the
//! graph; it is expressed purely in terms of facts the match already holds.

use std::collections::BTreeSet;

use crate::graph::vertex::{Label, VertexAttrs, VertexId};
use crate::graph::{LayeredGraph, MutableLayeredGraph};
use crate::grammar::Orientation;
use crate::grammar_error::{GrammarError, Violation};

/// Options shared by all productions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ApplyOptions {
    /// Coordinate tolerance for position coincidence. `0.0` is exact equality.
    pub position_tolerance: f64,
    /// Validate graph invariants after the rewrite.
    pub check_invariants: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            position_tolerance: 0.0,
            check_invariants: false,
        }
    }
}

impl ApplyOptions {
    /// Exact positions, invariants checked after every rewrite.
    pub fn strict() -> Self {
        Self {
            check_invariants: true,
            ..Self::default()
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.position_tolerance = tolerance;
        self
    }
}

/// A local, pattern-guarded graph rewrite.
pub trait Production {
    /// Everything `rewrite` needs, as established by `validate`.
    type Match;

    /// Name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Orientations this production accepts.
    fn orientations(&self) -> &'static [Orientation] {
        &[Orientation::Identity]
    }

    /// Check that `candidates` form this production's left-hand side.
    fn validate<G: LayeredGraph>(
        &self,
        graph: &G,
        candidates: &[VertexId],
        orientation: Orientation,
        options: &ApplyOptions,
    ) -> Result<Self::Match, Violation>;

    /// Turn a validated left-hand side into the right-hand side.
    ///
    /// Returns the ids of the markers created.
    fn rewrite<G: MutableLayeredGraph>(
        &self,
        graph: &mut G,
        matched: Self::Match,
    ) -> Result<Vec<VertexId>, GrammarError>;

    /// Validate, then rewrite in place.
    fn apply<G: MutableLayeredGraph>(
        &self,
        graph: &mut G,
        candidates: &[VertexId],
        orientation: Orientation,
        options: &ApplyOptions,
    ) -> Result<Vec<VertexId>, GrammarError> {
        if !self.orientations().contains(&orientation) {
            return Err(GrammarError::UnsupportedOrientation {
                production: self.name(),
                orientation,
            });
        }
        log::debug!(
            "{}: applying to {:?} ({orientation:?})",
            self.name(),
            candidates
        );
        let matched = self
            .validate(graph, candidates, orientation, options)
            .map_err(|violation| {
                log::debug!("{}: rejected: {violation}", self.name());
                GrammarError::PatternMismatch {
                    production: self.name(),
                    violation,
                }
            })?;
        let created = self.rewrite(graph, matched)?;
        if options.check_invariants {
            if let Err(e) = graph.validate_invariants() {
                log::warn!("{}: graph invariants broken after rewrite: {e}", self.name());
                return Err(e);
            }
        } else {
            graph.debug_assert_invariants();
        }
        log::debug!("{}: rewrite created {} markers", self.name(), created.len());
        Ok(created)
    }

    /// [`Production::apply`] with a raw orientation index.
    fn apply_indexed<G: MutableLayeredGraph>(
        &self,
        graph: &mut G,
        candidates: &[VertexId],
        orientation: u8,
        options: &ApplyOptions,
    ) -> Result<Vec<VertexId>, GrammarError> {
        let orientation = Orientation::try_from(orientation)?;
        self.apply(graph, candidates, orientation, options)
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Require exactly `expected` distinct candidate ids.
pub(crate) fn distinct_candidates(
    candidates: &[VertexId],
    expected: usize,
) -> Result<(), Violation> {
    let distinct: BTreeSet<VertexId> = candidates.iter().copied().collect();
    if candidates.len() != expected || distinct.len() != expected {
        return Err(Violation::CandidateCount {
            expected,
            found: distinct.len(),
        });
    }
    Ok(())
}

pub(crate) fn attrs_of<G: LayeredGraph>(graph: &G, v: VertexId) -> Result<&VertexAttrs, Violation> {
    graph.vertex(v).ok_or(Violation::UnknownVertex(v))
}

pub(crate) fn expect_label<G: LayeredGraph>(
    graph: &G,
    v: VertexId,
    expected: Label,
) -> Result<(), Violation> {
    let found = attrs_of(graph, v)?.label;
    if found != expected {
        return Err(Violation::Label {
            vertex: v,
            expected,
            found,
        });
    }
    Ok(())
}

pub(crate) fn require_edge<G: LayeredGraph>(
    graph: &G,
    a: VertexId,
    b: VertexId,
) -> Result<(), Violation> {
    if graph.has_edge(a, b) {
        Ok(())
    } else {
        Err(Violation::MissingEdge(a, b))
    }
}

/// All `vertices` on one layer, which is returned.
pub(crate) fn common_layer<G: LayeredGraph>(
    graph: &G,
    vertices: &[VertexId],
    role: &'static str,
) -> Result<u32, Violation> {
    let Some((&first, rest)) = vertices.split_first() else {
        return Err(Violation::LayerSplit { role });
    };
    let layer = attrs_of(graph, first)?.layer;
    for &v in rest {
        if attrs_of(graph, v)?.layer != layer {
            return Err(Violation::LayerSplit { role });
        }
    }
    Ok(layer)
}
