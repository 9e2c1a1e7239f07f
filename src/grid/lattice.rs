//! Lattice construction: pins laid out row by row on a triangular tiling.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use super::gesture::{build_direction_catalogue, Direction};
use super::{EdgeKey, GridEdge, GridNode, NodeId};

/// Pins per row of the standard board: a hexagon of side 4 (37 pins).
pub const DEFAULT_ROW_COUNTS: [usize; 7] = [4, 5, 6, 7, 6, 5, 4];

/// Distance between neighbouring pins, in board units.
pub const DEFAULT_SPACING: f64 = 60.0;

/// Node ids store row and column as `u8`, so a layout may have at most this
/// many rows and this many pins per row.
pub const MAX_LAYOUT_SIZE: usize = u8::MAX as usize + 1;

/// Coordinates are compared after quantizing to this many steps per unit.
const COORD_SCALE: f64 = 1e6;

/// A coordinate pair quantized for exact hashing.
pub(crate) type CoordKey = (i64, i64);

pub(crate) fn coord_key(x: f64, y: f64) -> CoordKey {
    ((x * COORD_SCALE).round() as i64, (y * COORD_SCALE).round() as i64)
}

/// The full pin lattice: every node, every unit edge, and the catalogue of
/// lattice directions used to decompose long gestures.
#[derive(Debug)]
pub struct Grid {
    spacing: f64,
    row_counts: Vec<usize>,
    nodes: Vec<GridNode>,
    node_index: HashMap<NodeId, usize>,
    by_coord: HashMap<CoordKey, NodeId>,
    edges: Vec<GridEdge>,
    edge_keys: HashSet<EdgeKey>,
    pub(crate) directions: HashMap<CoordKey, Direction>,
}

impl Grid {
    /// The standard board, built on first use and shared for the life of the process.
    pub fn standard() -> &'static Grid {
        static GRID: OnceLock<Grid> = OnceLock::new();
        GRID.get_or_init(|| Grid::new(&DEFAULT_ROW_COUNTS, DEFAULT_SPACING))
    }

    /// Lay out a lattice from per-row pin counts.
    ///
    /// Shorter rows are centred against the widest one and rows sit one
    /// equilateral-triangle height apart. Neighbours within a row are joined;
    /// between rows the joining rule depends on whether the lower row grows,
    /// shrinks, or keeps the same count.
    ///
    /// # Panics
    ///
    /// If there are more than [`MAX_LAYOUT_SIZE`] rows or a row holds more
    /// than [`MAX_LAYOUT_SIZE`] pins, since node ids could no longer tell
    /// pins apart.
    pub fn new(row_counts: &[usize], spacing: f64) -> Self {
        let max_count = row_counts.iter().copied().max().unwrap_or(0);
        assert!(
            row_counts.len() <= MAX_LAYOUT_SIZE && max_count <= MAX_LAYOUT_SIZE,
            "layout of {} rows, widest {}, exceeds {MAX_LAYOUT_SIZE}",
            row_counts.len(),
            max_count
        );
        let row_height = spacing * 3f64.sqrt() / 2.0;

        let mut nodes = Vec::new();
        for (row, &count) in row_counts.iter().enumerate() {
            let offset = (max_count - count) as f64 * spacing / 2.0;
            for col in 0..count {
                nodes.push(GridNode {
                    id: NodeId::new(row as u8, col as u8),
                    x: offset + col as f64 * spacing,
                    y: row as f64 * row_height,
                });
            }
        }

        let node_index: HashMap<NodeId, usize> =
            nodes.iter().enumerate().map(|(i, n)| (n.id, i)).collect();
        let by_coord = nodes.iter().map(|n| (coord_key(n.x, n.y), n.id)).collect();

        let mut grid = Self {
            spacing,
            row_counts: row_counts.to_vec(),
            nodes,
            node_index,
            by_coord,
            edges: Vec::new(),
            edge_keys: HashSet::new(),
            directions: HashMap::new(),
        };

        for (row, &count) in row_counts.iter().enumerate() {
            let r = row as u8;
            for col in 1..count {
                grid.connect(NodeId::new(r, col as u8 - 1), NodeId::new(r, col as u8));
            }

            let Some(&below) = row_counts.get(row + 1) else {
                continue;
            };
            for col in 0..count {
                let upper = NodeId::new(r, col as u8);
                let lower = |c: usize| NodeId::new(r + 1, c as u8);
                if below == count + 1 {
                    grid.connect(upper, lower(col));
                    grid.connect(upper, lower(col + 1));
                } else if below + 1 == count {
                    if col >= 1 {
                        grid.connect(upper, lower(col - 1));
                    }
                    if col < below {
                        grid.connect(upper, lower(col));
                    }
                } else if below == count {
                    grid.connect(upper, lower(col));
                }
            }
        }

        grid.directions = build_direction_catalogue(&grid.edges);

        log::debug!(
            "built grid: {} nodes, {} edges, {} directions",
            grid.nodes.len(),
            grid.edges.len(),
            grid.directions.len()
        );
        grid
    }

    /// Add a unit edge, ignoring duplicates.
    fn connect(&mut self, a: NodeId, b: NodeId) {
        let (Some(na), Some(nb)) = (self.node(a), self.node(b)) else {
            return;
        };
        let edge = GridEdge::new(*na, *nb);
        if self.edge_keys.insert(edge.key()) {
            self.edges.push(edge);
        }
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    pub fn row_counts(&self) -> &[usize] {
        &self.row_counts
    }

    /// All pins in row-major order.
    pub fn nodes(&self) -> &[GridNode] {
        &self.nodes
    }

    /// All unit edges in construction order.
    pub fn edges(&self) -> &[GridEdge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&GridNode> {
        self.node_index.get(&id).map(|&i| &self.nodes[i])
    }

    /// Look up the pin at exactly `(x, y)` (up to quantization).
    pub fn node_at(&self, x: f64, y: f64) -> Option<&GridNode> {
        self.by_coord
            .get(&coord_key(x, y))
            .and_then(|&id| self.node(id))
    }

    pub fn is_unit_edge(&self, key: EdgeKey) -> bool {
        self.edge_keys.contains(&key)
    }

    /// The unit edge joining two neighbouring pins, if they are neighbours.
    pub fn unit_edge(&self, a: NodeId, b: NodeId) -> Option<GridEdge> {
        if !self.is_unit_edge(EdgeKey::new(a, b)) {
            return None;
        }
        Some(GridEdge::new(*self.node(a)?, *self.node(b)?))
    }
}
