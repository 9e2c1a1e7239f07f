//! Board persistence: YAML load/save/reset for a set of tracks.
//!
//! Edges are stored as `[from, to]` pin pairs. Loading replays every pair
//! through gesture decomposition, so a hand-edited file may use long strokes
//! and still ends up as valid unit edges (or fails loudly).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PinboardError, Result};
use crate::event::is_playable_bpm;
use crate::grid::NodeId;
use crate::track::{Track, TrackType};

/// Stored form of one track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSpec {
    pub kind: TrackType,
    #[serde(default)]
    pub muted: bool,
    #[serde(default)]
    pub edges: Vec<[NodeId; 2]>,
}

impl From<&Track> for TrackSpec {
    fn from(track: &Track) -> Self {
        Self {
            kind: track.kind,
            muted: track.muted,
            edges: track
                .edges
                .iter()
                .map(|e| {
                    let (a, b) = e.endpoints();
                    [a, b]
                })
                .collect(),
        }
    }
}

impl TrackSpec {
    /// Rebuild the track, decomposing every stored stroke.
    pub fn to_track(&self) -> Result<Track> {
        let mut track = Track::new(self.kind);
        track.muted = self.muted;
        for [from, to] in &self.edges {
            track.draw(*from, *to)?;
        }
        Ok(track)
    }
}

/// A saved board: optional tempo and the tracks drawn on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Board {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm: Option<f64>,
    #[serde(default)]
    pub tracks: Vec<TrackSpec>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tracks(bpm: Option<f64>, tracks: &[Track]) -> Self {
        Self {
            bpm,
            tracks: tracks.iter().map(TrackSpec::from).collect(),
        }
    }

    /// Rebuild every track. Fails on the first stroke that is not on the lattice.
    pub fn to_tracks(&self) -> Result<Vec<Track>> {
        self.tracks.iter().map(TrackSpec::to_track).collect()
    }
}

/// Default board location, `~/.pinboard/board.yaml`.
pub fn default_board_path() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".pinboard");
    path.push("board.yaml");
    path
}

/// Load a board. A missing file is an empty board; a stored tempo the
/// transport cannot run at is an error.
pub fn load_board(path: &Path) -> Result<Board> {
    if !path.exists() {
        return Ok(Board::new());
    }
    let content = std::fs::read_to_string(path)?;
    let board: Board = serde_yaml::from_str(&content)?;
    match board.bpm {
        Some(bpm) if !is_playable_bpm(bpm) => Err(PinboardError::InvalidTempo(bpm)),
        _ => Ok(board),
    }
}

/// Save a board, creating parent directories as needed.
pub fn save_board(path: &Path, board: &Board) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let yaml = serde_yaml::to_string(board)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Delete a saved board and return an empty one.
pub fn reset_board(path: &Path) -> Result<Board> {
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    Ok(Board::new())
}
