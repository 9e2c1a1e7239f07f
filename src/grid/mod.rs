//! Grid geometry: the fixed pin lattice that shapes are drawn on.
//!
//! The board is a hexagon of pins laid out on a triangular tiling. Every pin
//! is a [`GridNode`]; every pair of neighbouring pins forms a unit
//! [`GridEdge`]. The whole lattice is built once ([`Grid::standard`]) and is
//! read-only afterwards. User gestures are only accepted when they can be
//! decomposed into a chain of unit edges (see [`Grid::edge_segments`]).

pub mod gesture;
pub mod lattice;

pub use gesture::Direction;
pub use lattice::{Grid, DEFAULT_ROW_COUNTS, DEFAULT_SPACING, MAX_LAYOUT_SIZE};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PinboardError;

/// Identity of a pin, derived from its grid coordinates.
///
/// Ordered by `(row, col)`. The text form is `r{row}c{col}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeId {
    pub row: u8,
    pub col: u8,
}

impl NodeId {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}c{}", self.row, self.col)
    }
}

/// Strict parse of `r{row}c{col}`. See [`crate::notes::parse_node_id`] for
/// the lenient variant used by note lookup.
impl FromStr for NodeId {
    type Err = PinboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || PinboardError::UnknownNode(s.to_string());
        let rest = s.strip_prefix('r').ok_or_else(bad)?;
        let (row, col) = rest.split_once('c').ok_or_else(bad)?;
        let row = row.parse().map_err(|_| bad())?;
        let col = col.parse().map_err(|_| bad())?;
        Ok(Self { row, col })
    }
}

impl TryFrom<String> for NodeId {
    type Error = PinboardError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.to_string()
    }
}

/// A pin on the board: identity plus planar position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridNode {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
}

impl GridNode {
    pub fn row(&self) -> u8 {
        self.id.row
    }

    pub fn col(&self) -> u8 {
        self.id.col
    }

    /// Euclidean distance to another pin.
    pub fn distance_to(&self, other: &GridNode) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Canonical key of an undirected edge: the smaller node id always comes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey(NodeId, NodeId);

impl EdgeKey {
    pub fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    pub fn first(&self) -> NodeId {
        self.0
    }

    pub fn second(&self) -> NodeId {
        self.1
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.0, self.1)
    }
}

/// An undirected edge between two pins. Equality is by [`EdgeKey`].
#[derive(Debug, Clone, Copy)]
pub struct GridEdge {
    a: GridNode,
    b: GridNode,
    key: EdgeKey,
}

impl GridEdge {
    /// Build an edge, storing the endpoints in canonical order.
    pub fn new(a: GridNode, b: GridNode) -> Self {
        let (a, b) = if a.id <= b.id { (a, b) } else { (b, a) };
        Self {
            a,
            b,
            key: EdgeKey(a.id, b.id),
        }
    }

    pub fn key(&self) -> EdgeKey {
        self.key
    }

    /// Endpoint with the smaller id.
    pub fn a(&self) -> &GridNode {
        &self.a
    }

    /// Endpoint with the larger id.
    pub fn b(&self) -> &GridNode {
        &self.b
    }

    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.a.id, self.b.id)
    }

    pub fn length(&self) -> f64 {
        self.a.distance_to(&self.b)
    }

    /// Unit direction vector from `a` to `b`. Zero for a degenerate edge.
    pub fn unit_direction(&self) -> (f64, f64) {
        let len = self.length();
        if len == 0.0 {
            return (0.0, 0.0);
        }
        ((self.b.x - self.a.x) / len, (self.b.y - self.a.y) / len)
    }
}

impl PartialEq for GridEdge {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for GridEdge {}
