//! Graph analysis over a user's edge set.
//!
//! These are generic utilities: they work on any copyable, hashable node
//! identity, so the generators can feed them grid [`NodeId`](crate::grid::NodeId)s
//! while tests can use plain strings. Every structure here is derived fresh
//! from the edge list on each call and never cached.

pub mod trail;

pub use trail::{longest_trail, ping_pong_to_length};

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Undirected adjacency that remembers insertion order.
///
/// Nodes iterate in the order they were first seen, and each node's
/// neighbours in the order their edges were added. The longest-trail search
/// depends on this order for its tie-break.
#[derive(Debug, Clone)]
pub struct Adjacency<N> {
    order: Vec<N>,
    neighbors: HashMap<N, Vec<N>>,
}

impl<N: Copy + Eq + Hash> Adjacency<N> {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            neighbors: HashMap::new(),
        }
    }

    fn touch(&mut self, node: N) -> &mut Vec<N> {
        if !self.neighbors.contains_key(&node) {
            self.order.push(node);
        }
        self.neighbors.entry(node).or_default()
    }

    /// Add an undirected edge. Repeated edges and self-loops are ignored.
    pub fn add_edge(&mut self, a: N, b: N) {
        if a == b {
            return;
        }
        let from_a = self.touch(a);
        if !from_a.contains(&b) {
            from_a.push(b);
        }
        let from_b = self.touch(b);
        if !from_b.contains(&a) {
            from_b.push(a);
        }
    }

    /// Nodes in first-seen order.
    pub fn nodes(&self) -> &[N] {
        &self.order
    }

    /// Neighbours of `node` in edge order; empty if unknown.
    pub fn neighbors(&self, node: &N) -> &[N] {
        self.neighbors.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, node: &N) -> bool {
        self.neighbors.contains_key(node)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Size of the connected component containing each node.
    pub fn component_sizes(&self) -> HashMap<N, usize> {
        let mut sizes = HashMap::new();
        for &start in &self.order {
            if sizes.contains_key(&start) {
                continue;
            }
            let mut members = vec![start];
            let mut seen = HashSet::from([start]);
            let mut i = 0;
            while i < members.len() {
                for &n in self.neighbors(&members[i]) {
                    if seen.insert(n) {
                        members.push(n);
                    }
                }
                i += 1;
            }
            let size = members.len();
            for m in members {
                sizes.insert(m, size);
            }
        }
        sizes
    }
}

impl<N: Copy + Eq + Hash> Default for Adjacency<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Fold an edge list into an undirected adjacency map.
pub fn build_adjacency<N, I>(edges: I) -> Adjacency<N>
where
    N: Copy + Eq + Hash,
    I: IntoIterator<Item = (N, N)>,
{
    let mut adjacency = Adjacency::new();
    for (a, b) in edges {
        adjacency.add_edge(a, b);
    }
    adjacency
}

/// Count incident edges per node.
///
/// Edges are undirected: `(a, b)` and `(b, a)` are the same edge and a repeat
/// is counted once. Self-loops are ignored, as in [`Adjacency::add_edge`].
pub fn compute_degree_map<N, I>(edges: I) -> HashMap<N, usize>
where
    N: Copy + Eq + Hash,
    I: IntoIterator<Item = (N, N)>,
{
    let mut seen = HashSet::new();
    let mut degrees = HashMap::new();
    for (a, b) in edges {
        if a == b || seen.contains(&(b, a)) || !seen.insert((a, b)) {
            continue;
        }
        *degrees.entry(a).or_insert(0) += 1;
        *degrees.entry(b).or_insert(0) += 1;
    }
    degrees
}
