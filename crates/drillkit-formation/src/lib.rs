//! # Drillkit Formation
//!
//! Optimal-assignment solving for formation transitions: given where each
//! marcher stands and where the next formation's spots are, find the
//! pairing that minimizes total distance travelled.

pub mod error;
pub mod hungarian;
pub mod mapping;

pub use error::{FormationError, Result};
pub use hungarian::hungarian_algorithm;
pub use mapping::{
    bbox_from_coordinates, compute_optimal_coordinate_mapping, CoordinateBounds, Point,
};
