//! Longest simple path search and ping-pong resampling.

use std::collections::HashSet;
use std::hash::Hash;

use super::Adjacency;

/// Depth-first state for [`longest_trail`].
struct TrailSearch<'a, N> {
    adjacency: &'a Adjacency<N>,
    path: Vec<N>,
    visited: HashSet<N>,
    best: Vec<N>,
}

impl<'a, N: Copy + Eq + Hash> TrailSearch<'a, N> {
    fn extend(&mut self, node: N) {
        if self.path.len() > self.best.len() {
            self.best = self.path.clone();
        }
        // Only a strictly longer path can replace `best`, so a branch whose
        // every extension is capped at best's length is skipped outright.
        if self.path.len() + self.extension_bound(node) <= self.best.len() {
            return;
        }

        let adjacency = self.adjacency;
        for &next in adjacency.neighbors(&node) {
            if self.visited.insert(next) {
                self.path.push(next);
                self.extend(next);
                self.path.pop();
                self.visited.remove(&next);
            }
        }
    }

    /// Upper bound on how many more nodes a simple path leaving `node` can add.
    ///
    /// The path enters exactly one component of the unvisited graph, so only
    /// the largest (bounded) component counts. Inside a component every node
    /// except the last one needs two neighbours among the component and
    /// `node`, so of the nodes with one such neighbour at most one is usable.
    fn extension_bound(&self, node: N) -> usize {
        let mut claimed = HashSet::new();
        let mut bound = 0;
        for &entry in self.adjacency.neighbors(&node) {
            if self.visited.contains(&entry) || claimed.contains(&entry) {
                continue;
            }
            let component = self.unvisited_component(entry);
            let dead_ends = component
                .iter()
                .filter(|&&n| {
                    self.adjacency
                        .neighbors(&n)
                        .iter()
                        .filter(|&&m| m == node || component.contains(&m))
                        .count()
                        <= 1
                })
                .count();
            bound = bound.max(component.len() - dead_ends.saturating_sub(1));
            claimed.extend(component);
        }
        bound
    }

    /// Unvisited nodes connected to `start` without crossing the current path.
    fn unvisited_component(&self, start: N) -> HashSet<N> {
        let mut seen = HashSet::from([start]);
        let mut stack = vec![start];
        while let Some(n) = stack.pop() {
            for &next in self.adjacency.neighbors(&n) {
                if !self.visited.contains(&next) && seen.insert(next) {
                    stack.push(next);
                }
            }
        }
        seen
    }
}

/// The longest simple path (no repeated node) anywhere in the graph.
///
/// The search starts from every node in insertion order and walks neighbours
/// in insertion order; among paths of equal length the first one found wins.
/// Returns an empty path for an empty graph.
pub fn longest_trail<N: Copy + Eq + Hash>(adjacency: &Adjacency<N>) -> Vec<N> {
    let component_sizes = adjacency.component_sizes();
    let mut search = TrailSearch {
        adjacency,
        path: Vec::new(),
        visited: HashSet::new(),
        best: Vec::new(),
    };

    for &start in adjacency.nodes() {
        let size = component_sizes.get(&start).copied().unwrap_or(0);
        if size <= search.best.len() {
            continue;
        }
        search.path.push(start);
        search.visited.insert(start);
        search.extend(start);
        search.path.pop();
        search.visited.remove(&start);
    }

    search.best
}

/// Stretch `path` to exactly `target_len` entries by bouncing between its ends.
///
/// The index walks forward to the last element, reverses back to the first,
/// and repeats: `[a, b, c]` becomes `a b c b a b c b ...`. A single-node path
/// repeats that node; an empty path yields an empty result.
pub fn ping_pong_to_length<N: Copy>(path: &[N], target_len: usize) -> Vec<N> {
    if path.is_empty() {
        return Vec::new();
    }

    let last = path.len() - 1;
    let mut out = Vec::with_capacity(target_len);
    let mut index = 0usize;
    let mut forward = true;
    for _ in 0..target_len {
        out.push(path[index]);
        if last == 0 {
            continue;
        }
        if forward && index == last {
            forward = false;
        } else if !forward && index == 0 {
            forward = true;
        }
        if forward {
            index += 1;
        } else {
            index -= 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_adjacency;
    use crate::grid::{Grid, GridEdge};

    /// Unpruned reference search: every simple path from every node.
    fn naive_longest<N: Copy + Eq + Hash>(adjacency: &Adjacency<N>) -> Vec<N> {
        fn dfs<N: Copy + Eq + Hash>(
            adjacency: &Adjacency<N>,
            node: N,
            path: &mut Vec<N>,
            best: &mut Vec<N>,
        ) {
            if path.len() > best.len() {
                *best = path.clone();
            }
            for &next in adjacency.neighbors(&node) {
                if !path.contains(&next) {
                    path.push(next);
                    dfs(adjacency, next, path, best);
                    path.pop();
                }
            }
        }
        let mut best = Vec::new();
        for &start in adjacency.nodes() {
            let mut path = vec![start];
            dfs(adjacency, start, &mut path, &mut best);
        }
        best
    }

    fn assert_simple_path<N: Copy + Eq + Hash + std::fmt::Debug>(
        adjacency: &Adjacency<N>,
        path: &[N],
    ) {
        let distinct: HashSet<_> = path.iter().collect();
        assert_eq!(distinct.len(), path.len(), "repeated node in {path:?}");
        for pair in path.windows(2) {
            assert!(
                adjacency.neighbors(&pair[0]).contains(&pair[1]),
                "{:?} and {:?} are not adjacent",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn empty_graph_has_empty_trail() {
        let adj: Adjacency<&str> = build_adjacency(Vec::<(&str, &str)>::new());
        assert!(longest_trail(&adj).is_empty());
    }

    #[test]
    fn single_edge() {
        let adj = build_adjacency([("a", "b")]);
        assert_eq!(longest_trail(&adj), vec!["a", "b"]);
    }

    #[test]
    fn four_cycle_gives_simple_path_of_four() {
        let adj = build_adjacency([("A", "B"), ("B", "C"), ("C", "D"), ("D", "A")]);
        let trail = longest_trail(&adj);
        assert_eq!(trail.len(), 4);
        assert_simple_path(&adj, &trail);
        assert_eq!(trail, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn star_tie_break_is_first_found() {
        let adj = build_adjacency([("hub", "a"), ("hub", "b"), ("hub", "c")]);
        // From "hub" nothing exceeds two nodes; "a" is the first start that
        // reaches three, and its first neighbour chain goes hub -> b.
        assert_eq!(longest_trail(&adj), vec!["a", "hub", "b"]);
    }

    #[test]
    fn picks_longest_component() {
        let adj = build_adjacency([("x", "y"), ("a", "b"), ("b", "c"), ("c", "d")]);
        assert_eq!(longest_trail(&adj), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn matches_unpruned_search() {
        let graphs: Vec<Vec<(u8, u8)>> = vec![
            vec![(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 2)],
            vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)],
            vec![(5, 1), (1, 2), (2, 3), (3, 1), (7, 8), (8, 9), (9, 10), (10, 11)],
            vec![
                (0, 1),
                (1, 2),
                (0, 3),
                (1, 3),
                (1, 4),
                (2, 4),
                (3, 4),
                (3, 5),
                (4, 5),
            ],
            vec![(3, 0), (0, 4), (4, 6), (6, 0), (1, 2)],
            // Two triangles joined at a cut vertex, plus a tail.
            vec![(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 2), (4, 5), (5, 6)],
            // A spoke hub where the path can only enter one branch.
            vec![(0, 1), (1, 2), (0, 3), (3, 4), (4, 5), (0, 6), (6, 7), (7, 8), (8, 9)],
        ];
        for edges in graphs {
            let adj = build_adjacency(edges.clone());
            let fast = longest_trail(&adj);
            assert_eq!(fast, naive_longest(&adj), "graph {edges:?}");
            assert_simple_path(&adj, &fast);
        }
    }

    #[test]
    fn matches_unpruned_search_on_lattice_patches() {
        for rows in [&[2, 3, 2][..], &[3, 4, 3][..], &[3, 3, 3][..]] {
            let grid = Grid::new(rows, 1.0);
            let all = build_adjacency(grid.edges().iter().map(GridEdge::endpoints));
            assert_eq!(longest_trail(&all), naive_longest(&all), "rows {rows:?}");

            // Every third edge removed leaves dead ends and cut vertices.
            let sparse = build_adjacency(
                grid.edges()
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| i % 3 != 2)
                    .map(|(_, e)| e.endpoints()),
            );
            assert_eq!(longest_trail(&sparse), naive_longest(&sparse), "rows {rows:?}");
        }
    }

    #[test]
    fn full_standard_board_has_a_path_through_every_pin() {
        let grid = Grid::standard();
        let adj = build_adjacency(grid.edges().iter().map(GridEdge::endpoints));
        let trail = longest_trail(&adj);
        assert_eq!(trail.len(), grid.nodes().len());
        assert_simple_path(&adj, &trail);
    }

    #[test]
    fn ping_pong_exact_length() {
        let path = ["a", "b", "c"];
        for n in [0, 1, 2, 5, 64, 65] {
            assert_eq!(ping_pong_to_length(&path, n).len(), n);
        }
    }

    #[test]
    fn ping_pong_reflects_at_both_ends() {
        let out = ping_pong_to_length(&["a", "b", "c"], 9);
        assert_eq!(out, vec!["a", "b", "c", "b", "a", "b", "c", "b", "a"]);
    }

    #[test]
    fn ping_pong_two_nodes_alternate() {
        let out = ping_pong_to_length(&[1, 2], 5);
        assert_eq!(out, vec![1, 2, 1, 2, 1]);
    }

    #[test]
    fn ping_pong_single_node_repeats() {
        let out = ping_pong_to_length(&["solo"], 64);
        assert_eq!(out.len(), 64);
        assert!(out.iter().all(|&n| n == "solo"));
    }

    #[test]
    fn ping_pong_empty_path() {
        let empty: [&str; 0] = [];
        assert!(ping_pong_to_length(&empty, 64).is_empty());
    }

    #[test]
    fn ping_pong_zero_target() {
        assert!(ping_pong_to_length(&["a", "b"], 0).is_empty());
    }
}
