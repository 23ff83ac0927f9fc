//! Error handling for the formation solver.

use thiserror::Error;

/// Errors raised while solving formation transitions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormationError {
    /// The assignment problem needs exactly as many targets as marchers.
    #[error("Marcher count ({marchers}) and destination count ({targets}) must match")]
    CountMismatch {
        /// Number of marchers supplied.
        marchers: usize,
        /// Number of target positions supplied.
        targets: usize,
    },
}

/// Result type using [`FormationError`].
pub type Result<T> = std::result::Result<T, FormationError>;
