//! Vertex-Merge Primitive.
//!
//! Collapses two ids that denote the same geometric entity into one. The
//! caller is responsible for knowing they really are the same point; nothing
//! here checks labels, layers or positions.

use super::vertex::VertexId;
use super::MutableLayeredGraph;
use crate::grammar_error::GrammarError;

/// Fold `discard` into `keep`.
///
/// Every edge of `discard` is re-created on `keep` (skipping `keep` itself and
/// edges `keep` already has), then `discard` is removed. The attributes of
/// `keep` are untouched. Merging a vertex with itself is a no-op.
///
/// Returns the number of edges newly added to `keep`.
pub fn merge_vertices<G: MutableLayeredGraph>(
    graph: &mut G,
    keep: VertexId,
    discard: VertexId,
) -> Result<usize, GrammarError> {
    if keep == discard {
        log::trace!("merge_vertices: {keep} is already merged");
        return Ok(0);
    }
    graph.try_vertex(keep)?;
    graph.try_vertex(discard)?;

    let moved: Vec<VertexId> = graph.neighbors(discard).filter(|&n| n != keep).collect();
    let mut added = 0;
    for n in moved {
        if graph.add_edge(keep, n)? {
            added += 1;
        }
    }
    graph.remove_vertex(discard);
    log::trace!("merge_vertices: folded {discard} into {keep} ({added} new edges)");
    Ok(added)
}
