//! **daedal-maze** — maze algorithms over a [`daedal_core::MazeGrid`].
//!
//! Three layers, all rendering-agnostic:
//!
//! - [`carve`]: randomized depth-first carving, exposed as a lazy iterator of
//!   [`CarveStep`] events so a presentation adapter can pull steps and own
//!   all pacing.
//! - [`path`]: tree re-rooting ([`make_root`]) and unique-path extraction
//!   ([`path_between`]) over the carved spanning tree.
//! - [`session`]: the interactive controller — an explicit finite state
//!   machine owning the grid, the endpoint selection, and the carve/solve
//!   lifecycle.

pub mod carve;
pub mod error;
pub mod path;
pub mod session;

pub use carve::{CarveDir, CarveOutcome, CarveStep, Carver, carve_all};
pub use error::MazeError;
pub use path::{make_root, path_between, path_to_root};
pub use session::{Endpoint, Session, SessionState};
