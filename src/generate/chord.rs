//! Chord generator: parallel strokes become chords.
//!
//! Edges are grouped by direction. The four heaviest groups (by total drawn
//! length) each become one chord of a four-bar progression; with fewer
//! groups the progression cycles through what there is.

use std::collections::HashSet;

use super::{GeneratedSequence, StepEvent, PROGRESSION_LENGTH};
use crate::grid::GridEdge;
use crate::notes::note_for;

/// Edges whose unit directions have an absolute dot product above this are
/// considered parallel (about 2.56 degrees).
const COLLINEAR_DOT: f64 = 0.999;

/// A group of edges pointing the same way.
#[derive(Debug, Clone)]
pub struct CollinearCluster {
    /// Unit direction of the first edge in the cluster.
    pub reference: (f64, f64),
    pub edges: Vec<GridEdge>,
    pub total_length: f64,
}

impl CollinearCluster {
    fn new(edge: GridEdge) -> Self {
        Self {
            reference: edge.unit_direction(),
            total_length: edge.length(),
            edges: vec![edge],
        }
    }

    fn accepts(&self, direction: (f64, f64)) -> bool {
        let dot = self.reference.0 * direction.0 + self.reference.1 * direction.1;
        dot.abs() > COLLINEAR_DOT
    }

    /// Distinct pitches of every endpoint, in first-seen order. Unmapped
    /// pins are skipped.
    pub fn pitches(&self) -> Vec<u8> {
        let mut pitches = Vec::new();
        for edge in &self.edges {
            for node in [edge.a(), edge.b()] {
                if let Some(pitch) = note_for(node.id) {
                    if !pitches.contains(&pitch) {
                        pitches.push(pitch);
                    }
                }
            }
        }
        pitches
    }
}

/// Group edges by direction, in order of first appearance.
///
/// Each edge joins the first cluster whose reference direction it parallels;
/// otherwise it starts a new one. A repeated edge key is only counted once.
pub fn collinear_clusters(edges: &[GridEdge]) -> Vec<CollinearCluster> {
    let mut seen = HashSet::new();
    let mut clusters: Vec<CollinearCluster> = Vec::new();
    for edge in edges {
        if !seen.insert(edge.key()) {
            continue;
        }
        let direction = edge.unit_direction();
        match clusters.iter_mut().find(|c| c.accepts(direction)) {
            Some(cluster) => {
                cluster.total_length += edge.length();
                cluster.edges.push(*edge);
            }
            None => clusters.push(CollinearCluster::new(*edge)),
        }
    }
    clusters
}

/// Build a four-chord progression from the heaviest stroke directions.
///
/// `node_order` lists every chord's pitches flattened, as text. A cluster
/// whose pins carry no pitch yields a rest in its slot. No edges, no chords.
pub fn generate_chords(edges: &[GridEdge]) -> GeneratedSequence {
    let mut clusters = collinear_clusters(edges);
    if clusters.is_empty() {
        return GeneratedSequence::default();
    }

    // Stable: equal lengths keep their first-appearance order.
    clusters.sort_by(|a, b| b.total_length.total_cmp(&a.total_length));
    clusters.truncate(PROGRESSION_LENGTH);

    let mut sequence = Vec::with_capacity(PROGRESSION_LENGTH);
    let mut node_order = Vec::new();
    for slot in 0..PROGRESSION_LENGTH {
        let pitches = clusters[slot % clusters.len()].pitches();
        node_order.extend(pitches.iter().map(u8::to_string));
        sequence.push(if pitches.is_empty() {
            None
        } else {
            Some(StepEvent::Chord { pitches })
        });
    }

    log::debug!(
        "chords: {} edges -> {} clusters, {} chords",
        edges.len(),
        clusters.len(),
        sequence.len()
    );
    GeneratedSequence {
        sequence,
        node_order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GridNode, NodeId};
    use crate::notes::get_note_from_node;
    use crate::track::EdgeSet;
    use assert_approx_eq::assert_approx_eq;

    fn pin(row: u8, col: u8, x: f64, y: f64) -> GridNode {
        GridNode {
            id: NodeId::new(row, col),
            x,
            y,
        }
    }

    fn pitch(row: usize, col: usize) -> u8 {
        get_note_from_node(row, col).unwrap()
    }

    fn chord_pitches(slot: &Option<StepEvent>) -> Vec<u8> {
        match slot {
            Some(StepEvent::Chord { pitches }) => pitches.clone(),
            other => panic!("expected a chord, got {other:?}"),
        }
    }

    #[test]
    fn empty_edges_give_empty_progression() {
        let out = generate_chords(&[]);
        assert!(out.sequence.is_empty());
        assert!(out.node_order.is_empty());
    }

    #[test]
    fn parallel_edges_share_a_cluster() {
        let e1 = GridEdge::new(pin(0, 0, 0.0, 0.0), pin(0, 1, 10.0, 0.0));
        let e2 = GridEdge::new(pin(1, 0, 0.0, 5.0), pin(1, 1, 20.0, 5.0));
        let e3 = GridEdge::new(pin(2, 0, 0.0, 0.0), pin(2, 1, 0.0, 10.0));
        let clusters = collinear_clusters(&[e1, e2, e3]);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].edges.len(), 2);
        assert_approx_eq!(clusters[0].total_length, 30.0);
        assert_approx_eq!(clusters[1].total_length, 10.0);
    }

    #[test]
    fn repeated_edge_adds_its_length_once() {
        let e = GridEdge::new(pin(0, 0, 0.0, 0.0), pin(0, 1, 10.0, 0.0));
        let flipped = GridEdge::new(pin(0, 1, 10.0, 0.0), pin(0, 0, 0.0, 0.0));
        let clusters = collinear_clusters(&[e, flipped, e]);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].edges.len(), 1);
        assert_approx_eq!(clusters[0].total_length, 10.0);
    }

    #[test]
    fn opposite_directions_are_collinear() {
        let e1 = GridEdge::new(pin(0, 0, 0.0, 0.0), pin(0, 1, 10.0, 0.0));
        let e2 = GridEdge::new(pin(1, 1, 10.0, 3.0), pin(1, 0, 0.0, 3.0));
        assert_eq!(collinear_clusters(&[e1, e2]).len(), 1);
    }

    #[test]
    fn slightly_off_direction_is_a_new_cluster() {
        let e1 = GridEdge::new(pin(0, 0, 0.0, 0.0), pin(0, 1, 10.0, 0.0));
        // About 5.7 degrees off horizontal.
        let e2 = GridEdge::new(pin(1, 0, 0.0, 0.0), pin(1, 1, 10.0, 1.0));
        assert_eq!(collinear_clusters(&[e1, e2]).len(), 2);
    }

    #[test]
    fn two_perpendicular_lines_alternate_long_short() {
        // Horizontal line of length 100 through row 0, vertical line of length 50 through row 1.
        let long = [
            GridEdge::new(pin(0, 0, 0.0, 0.0), pin(0, 1, 50.0, 0.0)),
            GridEdge::new(pin(0, 1, 50.0, 0.0), pin(0, 2, 100.0, 0.0)),
        ];
        let short = [GridEdge::new(pin(1, 0, 0.0, 10.0), pin(1, 1, 0.0, 60.0))];
        let edges = [short[0], long[0], long[1]];

        let out = generate_chords(&edges);
        assert_eq!(out.sequence.len(), 4);

        let long_chord = vec![pitch(0, 0), pitch(0, 1), pitch(0, 2)];
        let short_chord = vec![pitch(1, 0), pitch(1, 1)];
        assert_eq!(chord_pitches(&out.sequence[0]), long_chord);
        assert_eq!(chord_pitches(&out.sequence[1]), short_chord);
        assert_eq!(chord_pitches(&out.sequence[2]), long_chord);
        assert_eq!(chord_pitches(&out.sequence[3]), short_chord);
    }

    #[test]
    fn node_order_flattens_pitches_as_text() {
        let edges = [
            GridEdge::new(pin(0, 0, 0.0, 0.0), pin(0, 1, 50.0, 0.0)),
            GridEdge::new(pin(1, 0, 0.0, 10.0), pin(1, 1, 0.0, 30.0)),
        ];
        let out = generate_chords(&edges);
        let expected: Vec<String> = [
            pitch(0, 0),
            pitch(0, 1),
            pitch(1, 0),
            pitch(1, 1),
            pitch(0, 0),
            pitch(0, 1),
            pitch(1, 0),
            pitch(1, 1),
        ]
        .iter()
        .map(u8::to_string)
        .collect();
        assert_eq!(out.node_order, expected);
    }

    #[test]
    fn single_cluster_repeats_four_times() {
        let mut set = EdgeSet::new();
        set.draw(NodeId::new(3, 0), NodeId::new(3, 6)).unwrap();
        let out = generate_chords(set.as_slice());
        assert_eq!(out.sequence.len(), 4);
        let first = chord_pitches(&out.sequence[0]);
        assert_eq!(first.len(), 7);
        for slot in &out.sequence {
            assert_eq!(chord_pitches(slot), first);
        }
    }

    #[test]
    fn only_the_four_heaviest_clusters_play() {
        // Five directions of increasing length; the shortest must drop out.
        let mut edges = Vec::new();
        for (i, len) in [5.0, 10.0, 20.0, 30.0, 40.0].iter().enumerate() {
            let angle = i as f64 * 0.5;
            let row = i as u8;
            edges.push(GridEdge::new(
                pin(row, 0, 0.0, 0.0),
                pin(row, 1, len * angle.cos(), len * angle.sin()),
            ));
        }
        let out = generate_chords(&edges);
        assert_eq!(out.sequence.len(), 4);
        let first_rows: Vec<u8> = out
            .sequence
            .iter()
            .map(|s| chord_pitches(s)[0])
            .collect();
        assert_eq!(
            first_rows,
            vec![pitch(4, 0), pitch(3, 0), pitch(2, 0), pitch(1, 0)]
        );
    }

    #[test]
    fn unmapped_cluster_rests() {
        let edges = [GridEdge::new(pin(9, 0, 0.0, 0.0), pin(9, 1, 10.0, 0.0))];
        let out = generate_chords(&edges);
        assert_eq!(out.sequence, vec![None, None, None, None]);
        assert!(out.node_order.is_empty());
    }

    #[test]
    fn regeneration_is_identical() {
        let mut set = EdgeSet::new();
        set.draw(NodeId::new(3, 0), NodeId::new(3, 6)).unwrap();
        set.draw(NodeId::new(0, 0), NodeId::new(3, 3)).unwrap();
        set.draw(NodeId::new(6, 0), NodeId::new(3, 0)).unwrap();
        assert_eq!(generate_chords(set.as_slice()), generate_chords(set.as_slice()));
    }
}
