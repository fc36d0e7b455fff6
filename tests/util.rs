#![allow(dead_code)]
use std::collections::BTreeMap;

use mesh_grammar::prelude::*;

pub fn vid(u: u64) -> VertexId {
    VertexId::new(u).unwrap()
}

/// A graph whose vertices are addressed by short names in tests.
#[derive(Clone, Debug, Default)]
pub struct Fixture {
    pub graph: InMemoryLayeredGraph,
    names: BTreeMap<&'static str, VertexId>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex(&mut self, name: &'static str, layer: u32, label: char, at: (f64, f64)) {
        let id = self
            .graph
            .add_vertex(VertexAttrs::new(layer, Label::from(label), at));
        assert!(self.names.insert(name, id).is_none(), "duplicate name {name}");
    }

    pub fn edge(&mut self, a: &str, b: &str) {
        let (a, b) = (self.id(a), self.id(b));
        self.graph.add_edge(a, b).unwrap();
    }

    pub fn id(&self, name: &str) -> VertexId {
        self.names[name]
    }

    pub fn ids<const N: usize>(&self, names: [&str; N]) -> [VertexId; N] {
        names.map(|n| self.id(n))
    }

    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        self.graph.has_edge(self.id(a), self.id(b))
    }

    pub fn remove(&mut self, name: &str) {
        let id = self.id(name);
        self.graph.remove_vertex(id).unwrap();
    }

    pub fn remove_edge(&mut self, a: &str, b: &str) {
        let (a, b) = (self.id(a), self.id(b));
        assert!(self.graph.remove_edge(a, b), "no edge {a}-{b}");
    }
}

/// Every vertex with its attributes, plus every edge, in id order.
pub type Snapshot = (Vec<(VertexId, VertexAttrs)>, Vec<(VertexId, VertexId)>);

pub fn snapshot<G: LayeredGraph>(graph: &G) -> Snapshot {
    let vertices = graph
        .vertices()
        .map(|v| (v, graph.vertex(v).unwrap().clone()))
        .collect();
    (vertices, graph.edges().collect())
}

/// Assert vec is a permutation of another vec (order-agnostic).
pub fn assert_permutation<T: Ord + Copy + std::fmt::Debug>(got: &[T], want: &[T]) {
    let mut a = got.to_vec();
    a.sort_unstable();
    let mut b = want.to_vec();
    b.sort_unstable();
    assert_eq!(a, b, "not a permutation\n got={:?}\nwant={:?}", got, want);
}
