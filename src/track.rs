//! Tracks and their edge sets.
//!
//! A [`Track`] is one voice on the board: a generator type, the unit edges
//! the user has drawn for it, and a mute flag. Drawing and erasing go
//! through gesture decomposition, so an [`EdgeSet`] only ever holds valid
//! unit edges, each once.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PinboardError, Result};
use crate::generate::{generate, GeneratedSequence};
use crate::grid::{EdgeKey, Grid, GridEdge, NodeId};

/// Which generator a track uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    Rhythm,
    Phrase,
    Chord,
}

impl TrackType {
    pub const ALL: [TrackType; 3] = [TrackType::Rhythm, TrackType::Phrase, TrackType::Chord];

    pub fn name(self) -> &'static str {
        match self {
            Self::Rhythm => "rhythm",
            Self::Phrase => "phrase",
            Self::Chord => "chord",
        }
    }
}

impl fmt::Display for TrackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TrackType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown track type {s:?} (expected rhythm, phrase, or chord)"))
    }
}

/// The unit edges drawn for one track, in drawing order, without duplicates.
#[derive(Debug, Clone, Default)]
pub struct EdgeSet {
    edges: Vec<GridEdge>,
    keys: HashSet<EdgeKey>,
}

impl EdgeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an edge. Returns `false` if an edge with the same key is already present.
    pub fn insert(&mut self, edge: GridEdge) -> bool {
        if !self.keys.insert(edge.key()) {
            return false;
        }
        self.edges.push(edge);
        true
    }

    /// Remove the edge with this key. Returns whether it was present.
    pub fn remove(&mut self, key: EdgeKey) -> bool {
        if !self.keys.remove(&key) {
            return false;
        }
        self.edges.retain(|e| e.key() != key);
        true
    }

    pub fn contains(&self, key: EdgeKey) -> bool {
        self.keys.contains(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridEdge> {
        self.edges.iter()
    }

    pub fn as_slice(&self) -> &[GridEdge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn clear(&mut self) {
        self.edges.clear();
        self.keys.clear();
    }

    /// Decompose a gesture on the standard grid and add its unit edges.
    ///
    /// Returns how many edges were new. A rejected gesture leaves the set untouched.
    pub fn draw(&mut self, from: NodeId, to: NodeId) -> Result<usize> {
        self.draw_on(Grid::standard(), from, to)
    }

    /// [`EdgeSet::draw`] on an explicit grid.
    pub fn draw_on(&mut self, grid: &Grid, from: NodeId, to: NodeId) -> Result<usize> {
        let segments = segments(grid, from, to)?;
        Ok(segments.into_iter().filter(|e| self.insert(*e)).count())
    }

    /// Decompose a gesture on the standard grid and remove its unit edges.
    ///
    /// Returns how many edges were removed. A rejected gesture leaves the set untouched.
    pub fn erase(&mut self, from: NodeId, to: NodeId) -> Result<usize> {
        self.erase_on(Grid::standard(), from, to)
    }

    /// [`EdgeSet::erase`] on an explicit grid.
    pub fn erase_on(&mut self, grid: &Grid, from: NodeId, to: NodeId) -> Result<usize> {
        let segments = segments(grid, from, to)?;
        Ok(segments.iter().filter(|e| self.remove(e.key())).count())
    }
}

impl<'a> IntoIterator for &'a EdgeSet {
    type Item = &'a GridEdge;
    type IntoIter = std::slice::Iter<'a, GridEdge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}

fn segments(grid: &Grid, from: NodeId, to: NodeId) -> Result<Vec<GridEdge>> {
    grid.edge_segments(from, to).map_err(|reason| {
        log::debug!("rejected gesture {from} -> {to}: {reason}");
        PinboardError::InvalidGesture { from, to, reason }
    })
}

/// One voice on the board.
#[derive(Debug, Clone)]
pub struct Track {
    pub kind: TrackType,
    pub edges: EdgeSet,
    pub muted: bool,
}

impl Track {
    pub fn new(kind: TrackType) -> Self {
        Self {
            kind,
            edges: EdgeSet::new(),
            muted: false,
        }
    }

    /// See [`EdgeSet::draw`].
    pub fn draw(&mut self, from: NodeId, to: NodeId) -> Result<usize> {
        self.edges.draw(from, to)
    }

    /// See [`EdgeSet::erase`].
    pub fn erase(&mut self, from: NodeId, to: NodeId) -> Result<usize> {
        self.edges.erase(from, to)
    }

    pub fn clear(&mut self) {
        self.edges.clear();
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Generate this track's sequence from its current edges.
    pub fn generate(&self) -> GeneratedSequence {
        generate(self.kind, self.edges.as_slice())
    }
}
