//! **daedal-core** — the maze model shared across the *daedal* workspace.
//!
//! Provides the geometry primitive ([`Point`]), the carvable cell grid
//! ([`MazeGrid`]), and a cooperative cancellation token ([`CancelToken`]).
//! Nothing in this crate knows about rendering or input; presentation
//! adapters observe the model through events and snapshots only.

pub mod cancel;
pub mod geom;
pub mod grid;

pub use cancel::CancelToken;
pub use geom::Point;
pub use grid::{Cell, MazeGrid};
