//! Gesture decomposition: turning a drag between two pins into unit edges.
//!
//! A drag is only accepted along a direction that some base edge already has,
//! and only when its length is a whole number of lattice steps. The walk then
//! visits every pin in between; if any step lands off the board or crosses a
//! non-edge, the whole gesture is rejected.

use std::collections::HashMap;

use super::lattice::{coord_key, CoordKey};
use super::{EdgeKey, Grid, GridEdge, NodeId};
use crate::error::GestureRejection;

/// Tolerance for "whole number of steps" and zero-length checks.
const STEP_TOLERANCE: f64 = 1e-6;

/// Directions are keyed by their unit vector rounded to this precision.
const DIRECTION_SCALE: f64 = 1e6;

/// One lattice direction: the vector and length of a single step along it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction {
    pub step: (f64, f64),
    pub length: f64,
}

fn direction_key(dx: f64, dy: f64, length: f64) -> CoordKey {
    let ux = ((dx / length) * DIRECTION_SCALE).round() / DIRECTION_SCALE;
    let uy = ((dy / length) * DIRECTION_SCALE).round() / DIRECTION_SCALE;
    coord_key(ux, uy)
}

/// Index every base edge by its normalized direction, both ways round.
pub(crate) fn build_direction_catalogue(edges: &[GridEdge]) -> HashMap<CoordKey, Direction> {
    let mut catalogue = HashMap::new();
    for edge in edges {
        let length = edge.length();
        if length == 0.0 {
            continue;
        }
        let dx = edge.b().x - edge.a().x;
        let dy = edge.b().y - edge.a().y;
        catalogue
            .entry(direction_key(dx, dy, length))
            .or_insert(Direction {
                step: (dx, dy),
                length,
            });
        catalogue
            .entry(direction_key(-dx, -dy, length))
            .or_insert(Direction {
                step: (-dx, -dy),
                length,
            });
    }
    catalogue
}

impl Grid {
    /// All lattice directions, in no particular order.
    pub fn directions(&self) -> impl Iterator<Item = &Direction> {
        self.directions.values()
    }

    /// The base direction matching the vector `(dx, dy)`, if any.
    pub fn direction_for(&self, dx: f64, dy: f64) -> Option<&Direction> {
        let length = dx.hypot(dy);
        if length < STEP_TOLERANCE {
            return None;
        }
        self.directions.get(&direction_key(dx, dy, length))
    }

    /// Decompose a drag from `from` to `to` into the ordered chain of unit
    /// edges lying between them.
    ///
    /// Nothing is partially accepted: either every step is a valid base edge
    /// and the walk ends exactly on `to`, or the gesture is rejected.
    pub fn edge_segments(
        &self,
        from: NodeId,
        to: NodeId,
    ) -> Result<Vec<GridEdge>, GestureRejection> {
        let start = self.node(from).ok_or(GestureRejection::UnknownNode)?;
        let end = self.node(to).ok_or(GestureRejection::UnknownNode)?;
        if from == to {
            return Err(GestureRejection::ZeroLength);
        }

        let dx = end.x - start.x;
        let dy = end.y - start.y;
        let distance = dx.hypot(dy);
        if distance < STEP_TOLERANCE {
            return Err(GestureRejection::ZeroLength);
        }

        let direction = self
            .direction_for(dx, dy)
            .ok_or(GestureRejection::OffLattice)?;

        let exact_steps = distance / direction.length;
        let steps = exact_steps.round();
        if steps < 1.0 || (exact_steps - steps).abs() > STEP_TOLERANCE {
            return Err(GestureRejection::NotWholeSteps);
        }

        let mut segments = Vec::with_capacity(steps as usize);
        let mut current = *start;
        for i in 1..=steps as usize {
            let x = start.x + direction.step.0 * i as f64;
            let y = start.y + direction.step.1 * i as f64;
            let next = *self.node_at(x, y).ok_or(GestureRejection::LeavesGrid)?;
            if !self.is_unit_edge(EdgeKey::new(current.id, next.id)) {
                return Err(GestureRejection::NotUnitEdge);
            }
            segments.push(GridEdge::new(current, next));
            current = next;
        }

        if current.id != to {
            return Err(GestureRejection::MissedTarget);
        }
        Ok(segments)
    }
}
