//! Error taxonomy for maze operations.

use std::fmt;

/// Why a maze request was rejected.
///
/// All failures are local and non-fatal: the request is refused and prior
/// state is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MazeError {
    /// The operation is not valid in the current state, e.g. requesting a
    /// path before carving has completed.
    InvalidState,
    /// The selection is unusable: an endpoint is missing, out of bounds, or
    /// start and end coincide.
    InvalidSelection,
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidState => write!(f, "operation not valid in the current state"),
            Self::InvalidSelection => write!(f, "start/end selection is missing or unusable"),
        }
    }
}

impl std::error::Error for MazeError {}
