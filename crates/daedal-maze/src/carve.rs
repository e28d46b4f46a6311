//! Randomized depth-first maze carving.
//!
//! [`Carver`] is a lazy, finite iterator of [`CarveStep`] events: one event
//! per DFS advance ([`CarveDir::Forward`]) and one per retreat
//! ([`CarveDir::Backward`]), in the exact order the traversal visits cells.
//! The consumer pulls events and controls all pacing — there are no timers
//! here. On a fresh `W × H` grid the sequence contains exactly `W*H - 1`
//! forward steps and `W*H` backward steps, the last of which has `to: None`.

use daedal_core::{MazeGrid, Point};
use rand::Rng;

use crate::error::MazeError;

/// Direction of travel of a single carve step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CarveDir {
    /// Advancing into a freshly carved cell.
    Forward,
    /// Backtracking out of a dead end.
    Backward,
}

/// One step of the carving traversal.
///
/// `to` is the cell being entered; it is `None` only on the final backward
/// step out of the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarveStep {
    pub at: Point,
    pub to: Option<Point>,
    pub dir: CarveDir,
}

/// How a driven carve run ended. `steps` counts events delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarveOutcome {
    Complete { steps: usize },
    Cancelled { steps: usize },
}

/// The carving iterator.
///
/// Holds the grid mutably for the duration of the traversal; the random
/// source is injected so callers can seed it. Dropping a `Carver` mid-run
/// leaves the grid partially carved — abort paths must
/// [`reset`](MazeGrid::reset) before reuse.
pub struct Carver<'g, R: Rng> {
    grid: &'g mut MazeGrid,
    rng: R,
    root: Point,
    current: Option<Point>,
    nbuf: Vec<Point>,
}

impl<'g, R: Rng> Carver<'g, R> {
    /// Start a carve rooted at `root`, marking it visited immediately.
    ///
    /// The grid is expected to be freshly [`reset`](MazeGrid::reset);
    /// an out-of-bounds root is rejected with
    /// [`MazeError::InvalidSelection`].
    pub fn new(grid: &'g mut MazeGrid, root: Point, rng: R) -> Result<Self, MazeError> {
        if !grid.contains(root) {
            return Err(MazeError::InvalidSelection);
        }
        grid.mark_visited(root);
        Ok(Self {
            grid,
            rng,
            root,
            current: Some(root),
            nbuf: Vec::with_capacity(4),
        })
    }

    /// The root cell of this carve.
    #[inline]
    pub fn root(&self) -> Point {
        self.root
    }
}

impl<R: Rng> Iterator for Carver<'_, R> {
    type Item = CarveStep;

    fn next(&mut self) -> Option<CarveStep> {
        let at = self.current?;
        self.grid.unvisited_neighbors(at, &mut self.nbuf);
        if self.nbuf.is_empty() {
            // Dead end: retreat along the parent link. At the root the
            // traversal is over.
            let to = self.grid.parent(at);
            self.current = to;
            Some(CarveStep {
                at,
                to,
                dir: CarveDir::Backward,
            })
        } else {
            let next = self.nbuf[self.rng.random_range(0..self.nbuf.len())];
            self.grid.set_parent(next, Some(at));
            self.grid.mark_visited(next);
            self.current = Some(next);
            Some(CarveStep {
                at,
                to: Some(next),
                dir: CarveDir::Forward,
            })
        }
    }
}

/// Carve the whole grid in one go, discarding step events.
///
/// Returns the number of steps taken. The grid graph is fully connected, so
/// every cell ends up visited and the parent links form a spanning tree
/// rooted at `root`.
pub fn carve_all<R: Rng>(grid: &mut MazeGrid, root: Point, rng: R) -> Result<usize, MazeError> {
    Ok(Carver::new(grid, root, rng)?.count())
}
