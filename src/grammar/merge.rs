//! Merge production: reconcile duplicate boundary vertices of two sibling elements.
//!
//! Two neighboring elements refined independently each create their own copy
//! of the points on the edge they share. Given the two promoted elements and
//! the three child markers below them, this production works out, from
//! topology and positions alone, which pair of lower-layer vertices is the
//! same point and folds one into the other.
//!
//! # Left-hand side
//! - Candidates `[upper, upper, lower, lower, lower]`; order within a layer
//!   is irrelevant.
//! - Uppers are `UpperElement` on layer `L`, lowers are `LowerElement` on
//!   `L + 1`, and every lower marker hangs off exactly one upper.
//! - The uppers share exactly two neighbors `v1`, `v2` on `L`, joined by an edge.
//! - Around the lower markers, `L + 1` holds one vertex at the `v1`-`v2`
//!   midpoint and one vertex per side at each of `v1` and `v2`. At one of the
//!   two points both sides already use the same vertex (the *single*); at the
//!   other they hold two distinct, unconnected duplicates.
//! - single–middle, single–far duplicate and middle–near duplicate are edges;
//!   the middle vertex touches every child of its own element; all four are
//!   `Regular`.
//!
//! # Right-hand side
//! The duplicate on the middle vertex's side is kept; the other is merged into it.

use std::collections::BTreeSet;

use crate::graph::merge::merge_vertices;
use crate::graph::query::{common_neighbors, neighbors_at, neighbors_at_position};
use crate::graph::vertex::{Label, Position, VertexId};
use crate::graph::{LayeredGraph, MutableLayeredGraph};
use crate::grammar::production::{
    ApplyOptions, Production, attrs_of, common_layer, distinct_candidates, expect_label,
    require_edge,
};
use crate::grammar::Orientation;
use crate::grammar_error::{GrammarError, Violation};

const NAME: &str = "merge";

/// Side index (0 or 1) into the upper pair.
type Side = usize;

/// The merge production.
#[derive(Clone, Copy, Debug, Default)]
pub struct MergeProduction;

/// A validated junction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeMatch {
    /// The two sibling elements, in candidate order.
    pub upper: [VertexId; 2],
    /// Their common neighbors on the upper layer.
    pub shared_points: [VertexId; 2],
    /// Lower vertex both sides already use for one shared point.
    pub single: VertexId,
    /// Lower vertex at the midpoint of the shared points.
    pub middle: VertexId,
    /// Duplicate owned by the middle vertex's element; survives.
    pub keep: VertexId,
    /// Duplicate owned by the other element; merged into `keep`.
    pub discard: VertexId,
}

impl Production for MergeProduction {
    type Match = MergeMatch;

    fn name(&self) -> &'static str {
        NAME
    }

    fn validate<G: LayeredGraph>(
        &self,
        graph: &G,
        candidates: &[VertexId],
        _orientation: Orientation,
        options: &ApplyOptions,
    ) -> Result<MergeMatch, Violation> {
        distinct_candidates(candidates, 5)?;
        for &v in candidates {
            attrs_of(graph, v)?;
        }
        let upper = [candidates[0], candidates[1]];
        let lower = [candidates[2], candidates[3], candidates[4]];

        let up_layer = common_layer(graph, &upper, "upper")?;
        let down_layer = common_layer(graph, &lower, "lower")?;
        if up_layer.checked_add(1) != Some(down_layer) {
            return Err(Violation::LayerGap {
                upper: up_layer,
                lower: down_layer,
            });
        }
        log::trace!("{NAME}: layers {up_layer}/{down_layer}");

        for v in upper {
            expect_label(graph, v, Label::UpperElement)?;
        }
        for v in lower {
            expect_label(graph, v, Label::LowerElement)?;
        }

        let mut sides: [Side; 3] = [0; 3];
        for (side, &v) in sides.iter_mut().zip(&lower) {
            *side = owner(graph, upper, v)?;
        }

        let shared = common_neighbors(graph, upper[0], upper[1], up_layer);
        let [v1, v2] = shared[..] else {
            return Err(Violation::SharedPointCount {
                found: shared.len(),
            });
        };
        if !graph.has_edge(v1, v2) {
            return Err(Violation::SharedPointsDisconnected(v1, v2));
        }
        let pos_v1 = attrs_of(graph, v1)?.position;
        let pos_v2 = attrs_of(graph, v2)?.position;
        let center = pos_v1.midpoint(pos_v2);
        log::trace!("{NAME}: shared points {v1} {v2}");

        let buckets = Buckets::collect(
            graph,
            &lower,
            &sides,
            down_layer,
            [pos_v1, pos_v2, center],
            options.position_tolerance,
        )?;
        let (middle, home) = buckets.middle;

        for n in neighbors_at(graph, upper[home], down_layer) {
            if !graph.has_edge(middle, n) {
                return Err(Violation::DetachedMiddle { middle, vertex: n });
            }
        }

        let (single, pair) = if buckets.at_v1[0] == buckets.at_v1[1] {
            (buckets.at_v1[0], buckets.at_v2)
        } else if buckets.at_v2[0] == buckets.at_v2[1] {
            (buckets.at_v2[0], buckets.at_v1)
        } else {
            return Err(Violation::NoSharedVertex);
        };
        let keep = pair[home];
        let discard = pair[1 - home];
        if keep == discard {
            return Err(Violation::SelfMerge(keep));
        }
        if graph.has_edge(keep, discard) {
            return Err(Violation::AdjacentDuplicates(keep, discard));
        }

        require_edge(graph, single, middle)?;
        require_edge(graph, single, discard)?;
        require_edge(graph, middle, keep)?;

        for v in [single, middle, keep, discard] {
            expect_label(graph, v, Label::Regular)?;
        }

        Ok(MergeMatch {
            upper,
            shared_points: [v1, v2],
            single,
            middle,
            keep,
            discard,
        })
    }

    fn rewrite<G: MutableLayeredGraph>(
        &self,
        graph: &mut G,
        matched: MergeMatch,
    ) -> Result<Vec<VertexId>, GrammarError> {
        let MergeMatch { keep, discard, .. } = matched;
        merge_vertices(graph, keep, discard)?;
        log::debug!("{NAME}: merged {discard} into {keep}");
        Ok(Vec::new())
    }
}

/// Which upper element `lower` belongs to.
fn owner<G: LayeredGraph>(
    graph: &G,
    upper: [VertexId; 2],
    lower: VertexId,
) -> Result<Side, Violation> {
    match (graph.has_edge(upper[0], lower), graph.has_edge(upper[1], lower)) {
        (true, false) => Ok(0),
        (false, true) => Ok(1),
        (true, true) => Err(Violation::AmbiguousOwner(lower)),
        (false, false) => Err(Violation::Orphan(lower)),
    }
}

/// Lower-layer vertices around the junction, grouped by the point they sit on.
struct Buckets {
    /// Vertex at `v1`, indexed by side.
    at_v1: [VertexId; 2],
    /// Vertex at `v2`, indexed by side.
    at_v2: [VertexId; 2],
    /// Midpoint vertex and the side it was reached from.
    middle: (VertexId, Side),
}

impl Buckets {
    fn collect<G: LayeredGraph>(
        graph: &G,
        lower: &[VertexId; 3],
        sides: &[Side; 3],
        layer: u32,
        [pos_v1, pos_v2, center]: [Position; 3],
        tolerance: f64,
    ) -> Result<Self, Violation> {
        let mut at_v1: Vec<(VertexId, Side)> = Vec::new();
        let mut at_v2: Vec<(VertexId, Side)> = Vec::new();
        let mut middle: BTreeSet<(VertexId, Side)> = BTreeSet::new();
        for (&marker, &side) in lower.iter().zip(sides) {
            let near = |target: Position| {
                neighbors_at_position(graph, marker, layer, target, tolerance)
                    .into_iter()
                    .map(move |n| (n, side))
            };
            at_v1.extend(near(pos_v1));
            at_v2.extend(near(pos_v2));
            middle.extend(near(center));
        }

        let at_v1 = per_side(&at_v1, "first shared point")?;
        let at_v2 = per_side(&at_v2, "second shared point")?;
        let found = middle.len();
        let (Some(mid), 1) = (middle.pop_first(), found) else {
            return Err(Violation::CoincidenceCount {
                which: "midpoint",
                expected: 1,
                found,
            });
        };
        Ok(Self {
            at_v1,
            at_v2,
            middle: mid,
        })
    }
}

/// Exactly one entry per side, returned indexed by side.
fn per_side(
    entries: &[(VertexId, Side)],
    which: &'static str,
) -> Result<[VertexId; 2], Violation> {
    let &[(a, side_a), (b, side_b)] = entries else {
        return Err(Violation::CoincidenceCount {
            which,
            expected: 2,
            found: entries.len(),
        });
    };
    match (side_a, side_b) {
        (0, 1) => Ok([a, b]),
        (1, 0) => Ok([b, a]),
        _ => Err(Violation::BucketSides { which }),
    }
}
