//! Note mapping: which pitch each pin plays.
//!
//! Pitches come from a two-dimensional table indexed by `(row, col)`. The
//! board's top rows sit highest, the widest row holds the middle register,
//! and every row is laid out in fifths-and-steps so that lines drawn across
//! the hexagon land on consonant sets.
//!
//! The table is installed once at startup (either the built-in one or a YAML
//! file named in the config) and is read-only afterwards.

use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::grid::NodeId;

const BUILTIN_ROWS: [&[u8]; 7] = [
    &[72, 74, 76, 79],
    &[67, 69, 72, 74, 76],
    &[62, 64, 67, 69, 72, 74],
    &[55, 57, 60, 62, 64, 67, 69],
    &[52, 55, 57, 60, 62, 64],
    &[48, 50, 52, 55, 57],
    &[43, 45, 48, 50],
];

/// MIDI pitch per pin. `None` marks a pin that plays nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchTable {
    pub rows: Vec<Vec<Option<u8>>>,
}

impl PitchTable {
    /// The table shipped with the crate, sized to the standard board.
    pub fn builtin() -> Self {
        Self {
            rows: BUILTIN_ROWS
                .iter()
                .map(|row| row.iter().map(|&p| Some(p)).collect())
                .collect(),
        }
    }

    /// Load a table from a YAML file of the form `rows: [[60, 62, ~], ...]`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Pitch at `(row, col)`, or `None` when unmapped or out of bounds.
    pub fn pitch(&self, row: usize, col: usize) -> Option<u8> {
        self.rows.get(row)?.get(col).copied().flatten()
    }
}

impl Default for PitchTable {
    fn default() -> Self {
        Self::builtin()
    }
}

static PITCH_TABLE: OnceLock<PitchTable> = OnceLock::new();

/// Install the process-wide pitch table.
///
/// Only the first call has any effect; returns `false` if a table was already
/// in place (including the built-in one after a lookup has happened).
pub fn install_pitch_table(table: PitchTable) -> bool {
    let installed = PITCH_TABLE.set(table).is_ok();
    if !installed {
        log::warn!("pitch table already installed; ignoring replacement");
    }
    installed
}

/// The process-wide pitch table, defaulting to [`PitchTable::builtin`].
pub fn pitch_table() -> &'static PitchTable {
    PITCH_TABLE.get_or_init(PitchTable::builtin)
}

/// Pitch for the pin at `(row, col)`, or `None` if there is none.
pub fn get_note_from_node(row: usize, col: usize) -> Option<u8> {
    pitch_table().pitch(row, col)
}

/// Pitch for a pin by id.
pub fn note_for(id: NodeId) -> Option<u8> {
    get_note_from_node(id.row as usize, id.col as usize)
}

/// Extract `(row, col)` from a node id of the form `r{row}c{col}`.
///
/// Malformed ids fall back to `(0, 0)` rather than failing. Use
/// `str::parse::<NodeId>()` where garbage must be rejected.
pub fn parse_node_id(id: &str) -> (u8, u8) {
    id.parse::<NodeId>()
        .map(|n| (n.row, n.col))
        .unwrap_or((0, 0))
}
