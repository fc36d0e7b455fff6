//! Seeding undivided elements.

use super::vertex::{Label, Position, VertexAttrs, VertexId};
use super::MutableLayeredGraph;
use crate::grammar_error::GrammarError;

/// Add a `LowerElement` marker for the triangle with corners `corners`.
///
/// The marker is placed on the corners' layer (taken from the first corner)
/// at their centroid and connected to all three. This is the shape the growth
/// production expects as its candidate.
pub fn add_interior<G: MutableLayeredGraph>(
    graph: &mut G,
    corners: [VertexId; 3],
) -> Result<VertexId, GrammarError> {
    let first = graph.try_vertex(corners[0])?;
    let layer = first.layer;
    let mut positions = [first.position; 3];
    for (slot, &c) in positions.iter_mut().zip(&corners).skip(1) {
        *slot = graph.try_vertex(c)?.position;
    }
    let interior = graph.add_vertex(VertexAttrs::new(
        layer,
        Label::LowerElement,
        Position::centroid(positions),
    ));
    for c in corners {
        graph.add_edge(interior, c)?;
    }
    Ok(interior)
}
