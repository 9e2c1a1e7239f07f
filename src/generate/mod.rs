//! Sequence generators: turning a drawn shape into something playable.
//!
//! Three independent strategies read the same edge set:
//!
//! - [`rhythm`]: walks the longest trail and turns each pin's degree into a drum hit.
//! - [`phrase`]: walks the same trail and plays each busy pin's pitch.
//! - [`chord`]: groups edges into parallel lines and voices each line as a chord.
//!
//! Every call is pure: the same edges always give the same [`GeneratedSequence`].

pub mod chord;
pub mod phrase;
pub mod rhythm;

pub use chord::{collinear_clusters, generate_chords, CollinearCluster};
pub use phrase::generate_phrase;
pub use rhythm::generate_rhythm;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::graph::{build_adjacency, compute_degree_map, longest_trail, ping_pong_to_length};
use crate::grid::{GridEdge, NodeId};
use crate::track::TrackType;

/// Steps in a rhythm or phrase loop.
pub const SEQUENCE_LENGTH: usize = 64;

/// Chords in a progression.
pub const PROGRESSION_LENGTH: usize = 4;

/// A drum voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrumHit {
    Kick,
    Snare,
    Clap,
    Hihat,
}

impl DrumHit {
    pub fn name(self) -> &'static str {
        match self {
            Self::Kick => "kick",
            Self::Snare => "snare",
            Self::Clap => "clap",
            Self::Hihat => "hihat",
        }
    }
}

impl fmt::Display for DrumHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One slot of a generated sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum StepEvent {
    Hit(DrumHit),
    /// MIDI pitch with velocity in `0.0..=1.0`.
    Note { pitch: u8, velocity: f32 },
    /// Distinct pitches sounding together.
    Chord { pitches: Vec<u8> },
}

impl fmt::Display for StepEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hit(hit) => write!(f, "{hit}"),
            Self::Note { pitch, velocity } => write!(f, "{pitch}@{velocity:.2}"),
            Self::Chord { pitches } => {
                let names: Vec<String> = pitches.iter().map(u8::to_string).collect();
                write!(f, "[{}]", names.join(" "))
            }
        }
    }
}

/// A generated sequence and what each slot corresponds to.
///
/// `sequence` holds `None` for rests. For rhythms and phrases `node_order`
/// lists the pin id behind each slot, so a UI can highlight the pin as the
/// step plays. For chord progressions it instead lists every chord's pitches
/// flattened, as text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedSequence {
    pub sequence: Vec<Option<StepEvent>>,
    pub node_order: Vec<String>,
}

impl GeneratedSequence {
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Number of slots that actually sound.
    pub fn event_count(&self) -> usize {
        self.sequence.iter().filter(|s| s.is_some()).count()
    }
}

/// Run the generator for a track type.
pub fn generate(kind: TrackType, edges: &[GridEdge]) -> GeneratedSequence {
    match kind {
        TrackType::Rhythm => generate_rhythm(edges),
        TrackType::Phrase => generate_phrase(edges),
        TrackType::Chord => generate_chords(edges),
    }
}

/// Trail order and pin degrees shared by the rhythm and phrase generators.
pub(crate) struct Traversal {
    pub order: Vec<NodeId>,
    pub degrees: HashMap<NodeId, usize>,
}

impl Traversal {
    pub fn of(edges: &[GridEdge]) -> Self {
        let adjacency = build_adjacency(edges.iter().map(GridEdge::endpoints));
        let trail = longest_trail(&adjacency);
        let order = ping_pong_to_length(&trail, SEQUENCE_LENGTH);
        let degrees = compute_degree_map(edges.iter().map(GridEdge::endpoints));
        Self { order, degrees }
    }

    pub fn degree(&self, node: &NodeId) -> usize {
        self.degrees.get(node).copied().unwrap_or(0)
    }

    pub fn node_order(&self) -> Vec<String> {
        self.order.iter().map(NodeId::to_string).collect()
    }
}
