mod util;

use mesh_grammar::graph::query::{neighbors_at, vertices_at};
use mesh_grammar::prelude::*;
use util::{Fixture, assert_permutation, snapshot};

/// Triangle `e1 e3 e4` with hanging vertices `e2` on `e1`-`e3` and `e5` on `e4`-`e1`.
fn split_triangle() -> Fixture {
    let mut f = Fixture::new();
    f.vertex("e1", 1, 'E', (1.0, 2.0));
    f.vertex("e2", 1, 'E', (1.0, 1.5));
    f.vertex("e3", 1, 'E', (1.0, 1.0));
    f.vertex("e4", 1, 'E', (2.0, 1.0));
    f.vertex("e5", 1, 'E', (1.5, 1.5));
    for (a, b) in [("e1", "e2"), ("e2", "e3"), ("e3", "e4"), ("e4", "e5"), ("e5", "e1")] {
        f.edge(a, b);
    }
    f
}

fn seed(f: &mut Fixture, corners: [&str; 3]) -> VertexId {
    let corners = f.ids(corners);
    add_interior(&mut f.graph, corners).unwrap()
}

fn grow(
    f: &mut Fixture,
    element: VertexId,
    orientation: Orientation,
) -> Result<Vec<VertexId>, GrammarError> {
    GrowthProduction.apply(&mut f.graph, &[element], orientation, &ApplyOptions::strict())
}

/// The unique vertex on `layer` at `(x, y)`.
fn at(graph: &InMemoryLayeredGraph, layer: u32, x: f64, y: f64) -> VertexId {
    let found: Vec<VertexId> = vertices_at(graph, layer)
        .into_iter()
        .filter(|&v| graph.position(v) == Some(Position::new(x, y)))
        .collect();
    assert_eq!(found.len(), 1, "expected one vertex at ({x}, {y}) on layer {layer}");
    found[0]
}

fn marker_positions(graph: &InMemoryLayeredGraph, markers: &[VertexId]) -> Vec<Position> {
    markers.iter().map(|&m| graph.position(m).unwrap()).collect()
}

#[test]
fn subdivides_a_triangle_with_two_hanging_vertices() {
    let mut f = split_triangle();
    let i = seed(&mut f, ["e1", "e3", "e4"]);
    let children = grow(&mut f, i, Orientation::Identity).unwrap();

    assert_eq!(f.graph.vertex_count(), 14);
    assert_eq!(f.graph.edge_count(), 27);
    assert_eq!(f.graph.label(i), Some(Label::UpperElement));
    assert_eq!(f.graph.layer(i), Some(1));

    assert_eq!(children.len(), 3);
    for &child in &children {
        assert!(f.graph.has_edge(i, child));
        assert_eq!(f.graph.label(child), Some(Label::LowerElement));
        assert_eq!(f.graph.layer(child), Some(2));
        let corners = neighbors_at(&f.graph, child, 2);
        assert_eq!(corners.len(), 3);
        for c in corners {
            assert_eq!(f.graph.label(c), Some(Label::Regular));
        }
    }

    // a boundary vertex bordering r children has 2r + 1 neighbors on its layer
    let g = &f.graph;
    for ((x, y), degree) in [
        ((1.0, 2.0), 3),
        ((1.0, 1.5), 5),
        ((1.0, 1.0), 5),
        ((2.0, 1.0), 3),
        ((1.5, 1.5), 7),
    ] {
        let v = at(g, 2, x, y);
        assert_eq!(neighbors_at(g, v, 2).len(), degree, "vertex at ({x}, {y})");
    }

    // children come in triangle order: (e1 e2 e5), (e2 e3 e5), (e3 e4 e5)
    let first = neighbors_at(g, children[0], 2);
    assert_permutation(
        &first,
        &[at(g, 2, 1.0, 2.0), at(g, 2, 1.0, 1.5), at(g, 2, 1.5, 1.5)],
    );
    let last = neighbors_at(g, children[2], 2);
    assert_permutation(
        &last,
        &[at(g, 2, 1.0, 1.0), at(g, 2, 2.0, 1.0), at(g, 2, 1.5, 1.5)],
    );

    // the coarse layer is untouched apart from the promoted label
    assert_eq!(vertices_at(g, 1).len(), 6);
    assert_eq!(neighbors_at(g, i, 1), f.ids(["e1", "e3", "e4"]));
}

#[test]
fn match_records_corners_and_hanging_vertices() {
    let mut f = split_triangle();
    let i = seed(&mut f, ["e1", "e3", "e4"]);
    let [e1, e2, e3, e4, e5] = f.ids(["e1", "e2", "e3", "e4", "e5"]);
    let matched = GrowthProduction
        .validate(&f.graph, &[i], Orientation::Rotate1, &ApplyOptions::default())
        .unwrap();
    assert_eq!(matched.element, i);
    assert_eq!(matched.layer, 1);
    assert_eq!(matched.corners, [e3, e4, e1]);
    assert_eq!(matched.hanging, [None, Some(e5), Some(e2)]);
    assert_eq!(matched.hanging_count(), 2);
}

#[test]
fn every_orientation_produces_the_same_geometry() {
    let mut reference = split_triangle();
    let i = seed(&mut reference, ["e1", "e3", "e4"]);
    let expected = grow(&mut reference, i, Orientation::Identity).unwrap();
    let expected = marker_positions(&reference.graph, &expected);

    for orientation in [Orientation::Rotate1, Orientation::Rotate2] {
        let mut f = split_triangle();
        let i = seed(&mut f, ["e1", "e3", "e4"]);
        let children = grow(&mut f, i, orientation).unwrap();
        assert_eq!(f.graph.vertex_count(), 14);
        assert_eq!(f.graph.edge_count(), 27);
        let got = marker_positions(&f.graph, &children);
        for p in &expected {
            assert!(got.contains(p), "{orientation:?}: no child at {p:?}");
        }
    }
}

#[test]
fn unsplit_triangle_is_bisected_along_its_longest_edge() {
    let mut f = Fixture::new();
    f.vertex("a", 0, 'E', (1.0, 2.0));
    f.vertex("b", 0, 'E', (1.0, 1.0));
    f.vertex("c", 0, 'E', (2.0, 1.0));
    for (x, y) in [("a", "b"), ("b", "c"), ("c", "a")] {
        f.edge(x, y);
    }
    let i = seed(&mut f, ["a", "b", "c"]);
    let children = grow(&mut f, i, Orientation::Identity).unwrap();

    assert_eq!(children.len(), 2);
    assert_eq!(f.graph.vertex_count(), 10);
    assert_eq!(f.graph.edge_count(), 19);
    let g = &f.graph;
    let mid = at(g, 1, 1.5, 1.5);
    let b = at(g, 1, 1.0, 1.0);
    assert!(g.has_edge(mid, b));
    assert_eq!(neighbors_at(g, mid, 1).len(), 5);
    assert!(!g.has_edge(at(g, 1, 1.0, 2.0), at(g, 1, 2.0, 1.0)));
}

#[test]
fn one_hanging_vertex_is_joined_to_the_opposite_corner() {
    let mut f = Fixture::new();
    f.vertex("a", 0, 'E', (1.0, 2.0));
    f.vertex("m", 0, 'E', (1.0, 1.5));
    f.vertex("b", 0, 'E', (1.0, 1.0));
    f.vertex("c", 0, 'E', (2.0, 1.0));
    for (x, y) in [("a", "m"), ("m", "b"), ("b", "c"), ("c", "a")] {
        f.edge(x, y);
    }
    let i = seed(&mut f, ["a", "b", "c"]);
    let children = grow(&mut f, i, Orientation::Identity).unwrap();

    assert_eq!(children.len(), 2);
    assert_eq!(f.graph.vertex_count(), 11);
    assert_eq!(f.graph.edge_count(), 20);
    let g = &f.graph;
    assert!(g.has_edge(at(g, 1, 1.0, 1.5), at(g, 1, 2.0, 1.0)));
}

#[test]
fn three_hanging_vertices_give_four_children() {
    let mut f = Fixture::new();
    f.vertex("a", 0, 'E', (0.0, 0.0));
    f.vertex("b", 0, 'E', (4.0, 0.0));
    f.vertex("c", 0, 'E', (0.0, 4.0));
    f.vertex("ab", 0, 'E', (2.0, 0.0));
    f.vertex("bc", 0, 'E', (2.0, 2.0));
    f.vertex("ca", 0, 'E', (0.0, 2.0));
    for (x, y) in [
        ("a", "ab"),
        ("ab", "b"),
        ("b", "bc"),
        ("bc", "c"),
        ("c", "ca"),
        ("ca", "a"),
    ] {
        f.edge(x, y);
    }
    let template = f.clone();

    let i = seed(&mut f, ["a", "b", "c"]);
    let children = grow(&mut f, i, Orientation::Identity).unwrap();
    assert_eq!(children.len(), 4);
    assert_eq!(f.graph.vertex_count(), 17);
    assert_eq!(f.graph.edge_count(), 34);
    let centers = marker_positions(&f.graph, &children);
    assert!(centers[0].coincides(Position::new(2.0 / 3.0, 2.0 / 3.0), 1e-12));
    assert!(centers[3].coincides(Position::new(4.0 / 3.0, 4.0 / 3.0), 1e-12));

    // rotating starts the enumeration at the next corner
    let mut f = template;
    let i = seed(&mut f, ["a", "b", "c"]);
    let children = grow(&mut f, i, Orientation::Rotate1).unwrap();
    let centers = marker_positions(&f.graph, &children);
    assert!(centers[0].coincides(Position::new(8.0 / 3.0, 2.0 / 3.0), 1e-12));
    assert!(centers[3].coincides(Position::new(4.0 / 3.0, 4.0 / 3.0), 1e-12));
}

#[test]
fn promoted_element_is_rejected() {
    let mut f = split_triangle();
    let i = seed(&mut f, ["e1", "e3", "e4"]);
    f.graph.set_label(i, Label::UpperElement).unwrap();
    let before = snapshot(&f.graph);
    let err = grow(&mut f, i, Orientation::Identity).unwrap_err();
    assert_eq!(err.violation(), Some(&Violation::AlreadyPromoted(i)));
    assert_eq!(snapshot(&f.graph), before);
}

#[test]
fn growing_twice_is_rejected() {
    let mut f = split_triangle();
    let i = seed(&mut f, ["e1", "e3", "e4"]);
    grow(&mut f, i, Orientation::Identity).unwrap();
    let err = grow(&mut f, i, Orientation::Identity).unwrap_err();
    assert_eq!(err.violation(), Some(&Violation::AlreadyPromoted(i)));
}

#[test]
fn broken_boundary_is_rejected() {
    let mut f = split_triangle();
    f.remove_edge("e2", "e3");
    f.remove_edge("e4", "e5");
    let i = seed(&mut f, ["e1", "e3", "e4"]);
    let before = snapshot(&f.graph);
    let err = grow(&mut f, i, Orientation::Identity).unwrap_err();
    assert_eq!(
        err.violation(),
        Some(&Violation::BrokenBoundary(f.id("e1"), f.id("e3")))
    );
    assert_eq!(snapshot(&f.graph), before);
}

#[test]
fn corner_labels_must_be_regular() {
    let mut f = Fixture::new();
    f.vertex("e1", 1, 'E', (1.0, 2.0));
    f.vertex("e2", 1, 'A', (1.0, 1.5));
    f.vertex("e3", 1, 'D', (1.0, 1.0));
    f.vertex("e4", 1, 'G', (2.0, 1.0));
    f.vertex("e5", 1, 'B', (1.5, 1.5));
    for (a, b) in [("e1", "e2"), ("e2", "e3"), ("e3", "e4"), ("e4", "e5"), ("e5", "e1")] {
        f.edge(a, b);
    }
    let i = seed(&mut f, ["e1", "e3", "e4"]);
    let err = grow(&mut f, i, Orientation::Identity).unwrap_err();
    assert_eq!(
        err.violation(),
        Some(&Violation::Label {
            vertex: f.id("e3"),
            expected: Label::Regular,
            found: Label::Other('D'),
        })
    );
}

#[test]
fn hanging_vertex_label_must_be_regular() {
    let mut f = split_triangle();
    let e2 = f.id("e2");
    f.graph.set_label(e2, Label::Other('X')).unwrap();
    let i = seed(&mut f, ["e1", "e3", "e4"]);
    let err = grow(&mut f, i, Orientation::Identity).unwrap_err();
    assert!(matches!(
        err.violation(),
        Some(Violation::Label { vertex, .. }) if *vertex == e2
    ));
}

#[test]
fn element_needs_three_corners() {
    let mut f = split_triangle();
    let e1 = f.id("e1");
    f.graph.set_label(e1, Label::LowerElement).unwrap();
    let err = grow(&mut f, e1, Orientation::Identity).unwrap_err();
    assert_eq!(
        err.violation(),
        Some(&Violation::CornerCount {
            element: e1,
            found: 2
        })
    );
}

#[test]
fn hanging_vertex_next_to_a_direct_edge_is_rejected() {
    let mut f = split_triangle();
    f.edge("e1", "e3");
    let i = seed(&mut f, ["e1", "e3", "e4"]);
    let err = grow(&mut f, i, Orientation::Identity).unwrap_err();
    assert_eq!(
        err.violation(),
        Some(&Violation::HangingWithEdge(f.id("e1"), f.id("e3"), f.id("e2")))
    );
}

#[test]
fn top_layer_cannot_grow() {
    let mut f = Fixture::new();
    for (name, at) in [("a", (0.0, 0.0)), ("b", (1.0, 0.0)), ("c", (0.0, 1.0))] {
        f.vertex(name, u32::MAX, 'E', at);
    }
    for (x, y) in [("a", "b"), ("b", "c"), ("c", "a")] {
        f.edge(x, y);
    }
    let i = seed(&mut f, ["a", "b", "c"]);
    let err = grow(&mut f, i, Orientation::Identity).unwrap_err();
    assert_eq!(err.violation(), Some(&Violation::TopLayer(u32::MAX)));
}

#[test]
fn neighbors_grown_independently_leave_duplicates_to_merge() {
    let mut f = Fixture::new();
    f.vertex("a", 0, 'E', (0.0, 0.0));
    f.vertex("b", 0, 'E', (2.0, 0.0));
    f.vertex("c", 0, 'E', (0.0, 2.0));
    f.vertex("d", 0, 'E', (2.0, 2.0));
    for (x, y) in [("a", "b"), ("b", "c"), ("c", "a"), ("b", "d"), ("d", "c")] {
        f.edge(x, y);
    }
    let left = seed(&mut f, ["a", "b", "c"]);
    let right = seed(&mut f, ["b", "d", "c"]);
    grow(&mut f, left, Orientation::Identity).unwrap();
    grow(&mut f, right, Orientation::Identity).unwrap();

    // both sides copied b and c and bisected b-c
    let duplicates = find_overlapping(&f.graph, Some(1));
    assert_eq!(duplicates.len(), 3);
    assert!(find_overlapping(&f.graph, Some(0)).is_empty());

    let vertices = f.graph.vertex_count();
    for (keep, discard) in duplicates {
        merge_vertices(&mut f.graph, keep, discard).unwrap();
    }
    assert_eq!(f.graph.vertex_count(), vertices - 3);
    assert!(find_overlapping(&f.graph, None).is_empty());
    f.graph.validate_invariants().unwrap();
    // the merged midpoint borders all four children
    let g = &f.graph;
    let mid = at(g, 1, 1.0, 1.0);
    assert_eq!(
        g.neighbors(mid)
            .filter(|&n| g.label(n) == Some(Label::LowerElement))
            .count(),
        4
    );
}
