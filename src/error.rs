//! Crate error type.
//!
//! The mapping engine itself is total: graph analysis, note lookup, and the
//! generators never fail. Errors only arise at the edges of the crate, when a
//! drawing gesture cannot be laid onto the lattice or when boards and config
//! files are read from disk.

use std::io;

use thiserror::Error;

use crate::grid::NodeId;

/// Why a gesture could not be decomposed into unit edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GestureRejection {
    /// Start and end are the same node.
    #[error("zero-length gesture")]
    ZeroLength,
    /// An endpoint is not a node of the grid.
    #[error("endpoint is not a grid node")]
    UnknownNode,
    /// The gesture direction does not occur among the base edges.
    #[error("direction is not a lattice direction")]
    OffLattice,
    /// The gesture length is not a whole number of lattice steps.
    #[error("length is not a whole number of steps")]
    NotWholeSteps,
    /// A step lands on a coordinate with no pin.
    #[error("path leaves the grid")]
    LeavesGrid,
    /// Two consecutive pins are not joined by a base edge.
    #[error("segment is not a grid edge")]
    NotUnitEdge,
    /// The walk ended somewhere other than the target node.
    #[error("walk did not reach the target node")]
    MissedTarget,
}

/// Errors surfaced by track editing, persistence, and configuration.
#[derive(Debug, Error)]
pub enum PinboardError {
    #[error("no valid edge from {from} to {to}: {reason}")]
    InvalidGesture {
        from: NodeId,
        to: NodeId,
        reason: GestureRejection,
    },

    #[error("unknown node id: {0:?}")]
    UnknownNode(String),

    #[error("no track at index {0}")]
    TrackIndex(usize),

    #[error("tempo must be a positive number of BPM, got {0}")]
    InvalidTempo(f64),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, PinboardError>;
