//! Graph Query Collaborator: stateless lookups the productions are built from.
//!
//! All results are returned in ascending [`VertexId`] order so a production
//! sees the same answer regardless of how the graph was assembled.

use std::collections::BTreeMap;

use itertools::Itertools;

use super::vertex::{Position, VertexId};
use super::LayeredGraph;

/// Neighbors of `v` that lie on `layer`.
pub fn neighbors_at<G: LayeredGraph>(graph: &G, v: VertexId, layer: u32) -> Vec<VertexId> {
    graph
        .neighbors(v)
        .filter(|&n| graph.layer(n) == Some(layer))
        .collect()
}

/// Vertices on `layer` adjacent to both `a` and `b`.
pub fn common_neighbors<G: LayeredGraph>(
    graph: &G,
    a: VertexId,
    b: VertexId,
    layer: u32,
) -> Vec<VertexId> {
    graph
        .neighbors(a)
        .filter(|&n| n != b && graph.has_edge(b, n) && graph.layer(n) == Some(layer))
        .collect()
}

/// All vertices on `layer`.
pub fn vertices_at<G: LayeredGraph>(graph: &G, layer: u32) -> Vec<VertexId> {
    graph.vertices_at_layer(layer).collect()
}

/// Neighbors of `v` on `layer` whose position coincides with `target`.
pub fn neighbors_at_position<G: LayeredGraph>(
    graph: &G,
    v: VertexId,
    layer: u32,
    target: Position,
    tolerance: f64,
) -> Vec<VertexId> {
    graph
        .neighbors(v)
        .filter(|&n| {
            graph.vertex(n).is_some_and(|attrs| {
                attrs.layer == layer && attrs.position.coincides(target, tolerance)
            })
        })
        .collect()
}

/// Pairs of distinct non-marker vertices on one layer that share a position.
///
/// With `layer == None` every layer is scanned. Pairs are `(low, high)` and
/// sorted; a point held by `k` vertices yields all `k * (k - 1) / 2` pairs.
/// Positions are compared exactly.
pub fn find_overlapping<G: LayeredGraph>(
    graph: &G,
    layer: Option<u32>,
) -> Vec<(VertexId, VertexId)> {
    let mut by_point: BTreeMap<(u32, u64, u64), Vec<VertexId>> = BTreeMap::new();
    let scanned = match layer {
        Some(layer) => graph.vertices_at_layer(layer),
        None => graph.vertices(),
    };
    for v in scanned {
        let Some(attrs) = graph.vertex(v) else {
            continue;
        };
        if attrs.label.is_marker() {
            continue;
        }
        let key = (
            attrs.layer,
            canonical_bits(attrs.position.x),
            canonical_bits(attrs.position.y),
        );
        by_point.entry(key).or_default().push(v);
    }
    by_point
        .into_values()
        .filter(|group| group.len() > 1)
        .flat_map(|group| group.into_iter().tuple_combinations::<(_, _)>())
        .sorted()
        .collect()
}

// -0.0 and 0.0 are the same point.
fn canonical_bits(c: f64) -> u64 {
    if c == 0.0 {
        0.0f64.to_bits()
    } else {
        c.to_bits()
    }
}
