//! Rhythm generator: busier pins hit harder drums.

use super::{DrumHit, GeneratedSequence, StepEvent, Traversal};
use crate::grid::GridEdge;

/// Drum voice for a pin touched by `degree` edges. Pins on a plain line
/// (degree two or less) rest.
pub fn hit_for_degree(degree: usize) -> Option<DrumHit> {
    match degree {
        0..=2 => None,
        3 => Some(DrumHit::Kick),
        4 => Some(DrumHit::Snare),
        5 => Some(DrumHit::Clap),
        _ => Some(DrumHit::Hihat),
    }
}

/// Walk the longest trail, ping-ponged to 64 steps, and hit a drum wherever
/// the shape branches.
pub fn generate_rhythm(edges: &[GridEdge]) -> GeneratedSequence {
    let traversal = Traversal::of(edges);
    let sequence: Vec<Option<StepEvent>> = traversal
        .order
        .iter()
        .map(|node| hit_for_degree(traversal.degree(node)).map(StepEvent::Hit))
        .collect();

    let out = GeneratedSequence {
        sequence,
        node_order: traversal.node_order(),
    };
    log::debug!(
        "rhythm: {} edges -> {} steps, {} hits",
        edges.len(),
        out.len(),
        out.event_count()
    );
    out
}
