//! Minimum-distance coordinate mapping for formation transitions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FormationError, Result};
use crate::hungarian::hungarian_algorithm;

/// A 2D field coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned bounding box of a coordinate set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Assigns each marcher a target position so that the total distance
/// travelled is minimal.
///
/// `current_positions_by_id` maps marcher id to current position;
/// `target_positions` is the destination formation. The counts must match.
/// Returns each marcher id paired with its assigned target. The map's
/// insertion order follows target order, and the assignment is total: every
/// marcher gets exactly one target and vice versa.
pub fn compute_optimal_coordinate_mapping(
    current_positions_by_id: &IndexMap<i64, Point>,
    target_positions: &[Point],
) -> Result<IndexMap<i64, Point>> {
    let marcher_count = current_positions_by_id.len();
    if target_positions.len() != marcher_count {
        return Err(FormationError::CountMismatch {
            marchers: marcher_count,
            targets: target_positions.len(),
        });
    }
    if marcher_count == 0 {
        return Ok(IndexMap::new());
    }

    debug!(marchers = marcher_count, "solving minimum-distance assignment");

    // cost[i][j] = distance from marcher i (map order) to target j.
    let cost: Vec<Vec<f64>> = current_positions_by_id
        .values()
        .map(|position| {
            target_positions
                .iter()
                .map(|target| position.distance_to(target))
                .collect()
        })
        .collect();

    let assignment = hungarian_algorithm(&cost, marcher_count);

    let ids: Vec<i64> = current_positions_by_id.keys().copied().collect();
    let mut mapping = IndexMap::with_capacity(marcher_count);
    for target_index in 1..=marcher_count {
        let marcher_index = assignment[target_index] - 1;
        mapping.insert(ids[marcher_index], target_positions[target_index - 1]);
    }
    Ok(mapping)
}

/// Bounding box of a coordinate set. An empty set yields an all-zero box;
/// a single point yields a zero-area box at that point.
pub fn bbox_from_coordinates(coordinates: &[Point]) -> CoordinateBounds {
    let Some(first) = coordinates.first() else {
        return CoordinateBounds {
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: 0.0,
        };
    };

    let mut min_x = first.x;
    let mut max_x = first.x;
    let mut min_y = first.y;
    let mut max_y = first.y;
    for point in coordinates {
        min_x = min_x.min(point.x);
        max_x = max_x.max(point.x);
        min_y = min_y.min(point.y);
        max_y = max_y.max(point.y);
    }

    CoordinateBounds {
        left: min_x,
        top: min_y,
        width: max_x - min_x,
        height: max_y - min_y,
    }
}
