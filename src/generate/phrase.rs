//! Phrase generator: busy pins sing their own pitch.

use super::{GeneratedSequence, StepEvent, Traversal};
use crate::grid::GridEdge;
use crate::notes::note_for;

/// Degree at which velocity saturates.
const FULL_VELOCITY_DEGREE: f32 = 6.0;

/// Velocity for a pin of the given degree, capped at 1.0.
pub fn velocity_for_degree(degree: usize) -> f32 {
    (degree as f32 / FULL_VELOCITY_DEGREE).min(1.0)
}

/// Walk the same trail as the rhythm generator, but emit the pin's pitch
/// wherever the degree is three or more. Pins without a pitch rest.
pub fn generate_phrase(edges: &[GridEdge]) -> GeneratedSequence {
    let traversal = Traversal::of(edges);
    let sequence: Vec<Option<StepEvent>> = traversal
        .order
        .iter()
        .map(|node| {
            let degree = traversal.degree(node);
            if degree <= 2 {
                return None;
            }
            note_for(*node).map(|pitch| StepEvent::Note {
                pitch,
                velocity: velocity_for_degree(degree),
            })
        })
        .collect();

    let out = GeneratedSequence {
        sequence,
        node_order: traversal.node_order(),
    };
    log::debug!(
        "phrase: {} edges -> {} steps, {} notes",
        edges.len(),
        out.len(),
        out.event_count()
    );
    out
}
