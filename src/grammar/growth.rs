//! Growth production: subdivide an undivided triangular element one layer down.
//!
//! # Left-hand side
//! - A single candidate: a `LowerElement` vertex on layer `L` whose
//!   neighbors on `L` are exactly three `Regular` corners.
//! - Each corner pair is either joined by an edge, or split by a `Regular`
//!   hanging vertex at the pair's midpoint that is adjacent to both corners
//!   (and then the pair must not also be joined directly).
//!
//! # Right-hand side
//! - The candidate becomes an `UpperElement`.
//! - The refined boundary (corners and hanging vertices) is copied to
//!   `L + 1` as fresh `Regular` vertices joined in a cycle.
//! - The triangle is split into sub-triangles, depending on how many edges
//!   carry a hanging vertex:
//!   - none: the longest edge is bisected by a new vertex on `L + 1`, then as below;
//!   - one: the midpoint is joined to the opposite corner (2 children);
//!   - two: the two midpoints are joined, and the midpoint of the longer
//!     split edge is joined to the far corner of the unsplit edge (3 children);
//!   - three: the midpoints form an inner triangle (4 children).
//! - Each sub-triangle gets a `LowerElement` marker on `L + 1` at its
//!   centroid, adjacent to its three corners and to the promoted element.
//!
//! Within `L + 1` a boundary vertex bordering `r` sub-triangles ends up with
//! degree `2r + 1`. Markers are returned in sub-triangle order, which starts
//! from the corner enumeration chosen by the orientation.

use crate::graph::query::{common_neighbors, neighbors_at};
use crate::graph::vertex::{Label, Position, VertexAttrs, VertexId};
use crate::graph::{LayeredGraph, MutableLayeredGraph};
use crate::grammar::Orientation;
use crate::grammar::production::{
    ApplyOptions, Production, attrs_of, distinct_candidates, expect_label,
};
use crate::grammar_error::{GrammarError, Violation};

const NAME: &str = "growth";

/// The growth production.
#[derive(Clone, Copy, Debug, Default)]
pub struct GrowthProduction;

/// A validated undivided element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrowthMatch {
    /// The element marker to promote.
    pub element: VertexId,
    /// Layer of the element and its corners.
    pub layer: u32,
    /// Corners in orientation order.
    pub corners: [VertexId; 3],
    /// `hanging[i]` splits the edge `corners[i]`-`corners[(i + 1) % 3]`.
    pub hanging: [Option<VertexId>; 3],
}

impl GrowthMatch {
    /// Number of corner pairs split by a hanging vertex.
    pub fn hanging_count(&self) -> usize {
        self.hanging.iter().flatten().count()
    }
}

impl Production for GrowthProduction {
    type Match = GrowthMatch;

    fn name(&self) -> &'static str {
        NAME
    }

    fn orientations(&self) -> &'static [Orientation] {
        &Orientation::ALL
    }

    fn validate<G: LayeredGraph>(
        &self,
        graph: &G,
        candidates: &[VertexId],
        orientation: Orientation,
        options: &ApplyOptions,
    ) -> Result<GrowthMatch, Violation> {
        distinct_candidates(candidates, 1)?;
        let element = candidates[0];
        let attrs = attrs_of(graph, element)?;
        match attrs.label {
            Label::LowerElement => {}
            Label::UpperElement => return Err(Violation::AlreadyPromoted(element)),
            found => {
                return Err(Violation::Label {
                    vertex: element,
                    expected: Label::LowerElement,
                    found,
                });
            }
        }
        let layer = attrs.layer;
        if layer.checked_add(1).is_none() {
            return Err(Violation::TopLayer(layer));
        }

        let found = neighbors_at(graph, element, layer);
        let [a, b, c] = found[..] else {
            return Err(Violation::CornerCount {
                element,
                found: found.len(),
            });
        };
        for v in [a, b, c] {
            expect_label(graph, v, Label::Regular)?;
        }
        let corners = orientation.apply([a, b, c]);

        let mut hanging = [None; 3];
        for (i, slot) in hanging.iter_mut().enumerate() {
            let (p, q) = (corners[i], corners[(i + 1) % 3]);
            *slot = hanging_vertex(graph, element, p, q, layer, options.position_tolerance)?;
        }
        log::trace!("{NAME}: element {element} corners {corners:?} hanging {hanging:?}");

        Ok(GrowthMatch {
            element,
            layer,
            corners,
            hanging,
        })
    }

    fn rewrite<G: MutableLayeredGraph>(
        &self,
        graph: &mut G,
        matched: GrowthMatch,
    ) -> Result<Vec<VertexId>, GrammarError> {
        let split_edges = matched.hanging_count();
        let GrowthMatch {
            element,
            layer,
            corners,
            hanging,
        } = matched;
        let child_layer = layer
            .checked_add(1)
            .ok_or(GrammarError::PatternMismatch {
                production: NAME,
                violation: Violation::TopLayer(layer),
            })?;
        graph.set_label(element, Label::UpperElement)?;

        let mut positions = [Position::default(); 3];
        let mut fine_corners = corners;
        for (i, &corner) in corners.iter().enumerate() {
            positions[i] = graph.try_vertex(corner)?.position;
            fine_corners[i] = copy_to_layer(graph, corner, child_layer)?;
        }
        let mut fine_hanging = [None; 3];
        for (slot, h) in fine_hanging.iter_mut().zip(hanging) {
            if let Some(h) = h {
                *slot = Some(copy_to_layer(graph, h, child_layer)?);
            }
        }
        if fine_hanging.iter().all(Option::is_none) {
            let i = longest_edge(positions);
            let mid = positions[i].midpoint(positions[(i + 1) % 3]);
            fine_hanging[i] = Some(graph.add_vertex(VertexAttrs::new(
                child_layer,
                Label::Regular,
                mid,
            )));
        }

        for i in 0..3 {
            let (p, q) = (fine_corners[i], fine_corners[(i + 1) % 3]);
            match fine_hanging[i] {
                Some(m) => {
                    graph.add_edge(p, m)?;
                    graph.add_edge(m, q)?;
                }
                None => {
                    graph.add_edge(p, q)?;
                }
            }
        }

        let triangles = sub_triangles(fine_corners, fine_hanging, positions);
        let mut markers = Vec::with_capacity(triangles.len());
        for tri in triangles {
            let mut tri_positions = [Position::default(); 3];
            for (slot, &v) in tri_positions.iter_mut().zip(&tri) {
                *slot = graph.try_vertex(v)?.position;
            }
            for i in 0..3 {
                graph.add_edge(tri[i], tri[(i + 1) % 3])?;
            }
            let marker = graph.add_vertex(VertexAttrs::new(
                child_layer,
                Label::LowerElement,
                Position::centroid(tri_positions),
            ));
            graph.add_edge(element, marker)?;
            for v in tri {
                graph.add_edge(marker, v)?;
            }
            markers.push(marker);
        }
        log::debug!(
            "{NAME}: promoted {element} ({split_edges} hanging) into {} children",
            markers.len()
        );
        Ok(markers)
    }
}

/// The vertex splitting the corner pair `p`-`q`, if any.
fn hanging_vertex<G: LayeredGraph>(
    graph: &G,
    element: VertexId,
    p: VertexId,
    q: VertexId,
    layer: u32,
    tolerance: f64,
) -> Result<Option<VertexId>, Violation> {
    let target = attrs_of(graph, p)?
        .position
        .midpoint(attrs_of(graph, q)?.position);
    let split = common_neighbors(graph, p, q, layer)
        .into_iter()
        .filter(|&m| m != element)
        .find(|&m| {
            graph
                .position(m)
                .is_some_and(|pos| pos.coincides(target, tolerance))
        });
    match (graph.has_edge(p, q), split) {
        (true, None) => Ok(None),
        (true, Some(m)) => Err(Violation::HangingWithEdge(p, q, m)),
        (false, Some(m)) => {
            expect_label(graph, m, Label::Regular)?;
            Ok(Some(m))
        }
        (false, None) => Err(Violation::BrokenBoundary(p, q)),
    }
}

fn copy_to_layer<G: MutableLayeredGraph>(
    graph: &mut G,
    v: VertexId,
    layer: u32,
) -> Result<VertexId, GrammarError> {
    let position = graph.try_vertex(v)?.position;
    Ok(graph.add_vertex(VertexAttrs::new(layer, Label::Regular, position)))
}

/// Index `i` of the longest edge `i`-`(i + 1) % 3`; ties go to the lowest index.
fn longest_edge(positions: [Position; 3]) -> usize {
    let mut best = 0;
    let mut best_len = f64::NEG_INFINITY;
    for i in 0..3 {
        let len = positions[i].distance_squared(positions[(i + 1) % 3]);
        if len > best_len {
            best = i;
            best_len = len;
        }
    }
    best
}

/// Reference 1→4 subdivision of a triangle given vertices and mid-edge points.
pub fn triangle_subdivision(
    vertices: [VertexId; 3],
    midpoints: [VertexId; 3],
) -> [[VertexId; 3]; 4] {
    let [v0, v1, v2] = vertices;
    let [m01, m12, m20] = midpoints;
    [
        [v0, m01, m20],
        [v1, m12, m01],
        [v2, m20, m12],
        [m01, m12, m20],
    ]
}

/// Sub-triangles of a triangle whose edges may carry midpoints.
///
/// `midpoints[i]` splits `corners[i]`-`corners[(i + 1) % 3]`; `positions`
/// are the corner positions, used to pick the diagonal when two edges are split.
/// An unsplit triangle is its own only child.
pub fn sub_triangles(
    corners: [VertexId; 3],
    midpoints: [Option<VertexId>; 3],
    positions: [Position; 3],
) -> Vec<[VertexId; 3]> {
    let at = |i: usize| corners[i % 3];
    match midpoints {
        [Some(m01), Some(m12), Some(m20)] => {
            triangle_subdivision(corners, [m01, m12, m20]).to_vec()
        }
        [None, None, None] => vec![corners],
        _ => {
            let split: Vec<usize> = (0..3).filter(|&i| midpoints[i].is_some()).collect();
            match split[..] {
                [i] => {
                    let (a, b, p) = (at(i), at(i + 1), at(i + 2));
                    let m = midpoints[i].unwrap_or(a);
                    vec![[a, m, p], [m, b, p]]
                }
                _ => {
                    // exactly one edge `j` is unsplit; `p` is opposite it
                    let j = (0..3).find(|&i| midpoints[i].is_none()).unwrap_or(0);
                    let (a, b, p) = (at(j), at(j + 1), at(j + 2));
                    let m_pa = midpoints[(j + 2) % 3].unwrap_or(p);
                    let m_bp = midpoints[(j + 1) % 3].unwrap_or(p);
                    let pos = |i: usize| positions[i % 3];
                    let len_bp = pos(j + 1).distance_squared(pos(j + 2));
                    let len_pa = pos(j + 2).distance_squared(pos(j));
                    if len_bp >= len_pa {
                        vec![[p, m_pa, m_bp], [m_pa, a, m_bp], [a, b, m_bp]]
                    } else {
                        vec![[p, m_pa, m_bp], [m_pa, a, b], [m_pa, b, m_bp]]
                    }
                }
            }
        }
    }
}
