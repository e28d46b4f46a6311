//! Path extraction over the carved spanning tree.
//!
//! Any two cells of a fully carved grid are joined by exactly one simple
//! path. The general two-endpoint query works by *re-rooting*: flip the
//! parent links along the chain from the target to the current root so the
//! target becomes the new root, then walk parent links from the source.
//! Re-rooting changes edge orientation only — the edge set, and therefore
//! the maze's walls, are untouched.

use daedal_core::{MazeGrid, Point};

use crate::error::MazeError;

/// Re-root the spanning tree at `p` by flipping each parent edge along the
/// chain from `p` to the current root. Iterative, O(depth of `p`).
///
/// Errors with [`MazeError::InvalidState`] if the grid is not fully carved
/// and [`MazeError::InvalidSelection`] if `p` is out of bounds; the grid is
/// left unmodified on error.
pub fn make_root(grid: &mut MazeGrid, p: Point) -> Result<(), MazeError> {
    if !grid.contains(p) {
        return Err(MazeError::InvalidSelection);
    }
    if !grid.fully_carved() {
        return Err(MazeError::InvalidState);
    }
    let mut chain = vec![p];
    let mut cur = p;
    while let Some(q) = grid.parent(cur) {
        chain.push(q);
        cur = q;
    }
    for w in chain.windows(2) {
        grid.set_parent(w[1], Some(w[0]));
    }
    grid.set_parent(p, None);
    Ok(())
}

/// Walk parent links from `p` to the current root, returning the chain
/// `p..=root`.
pub fn path_to_root(grid: &MazeGrid, p: Point) -> Result<Vec<Point>, MazeError> {
    if !grid.contains(p) {
        return Err(MazeError::InvalidSelection);
    }
    if !grid.fully_carved() {
        return Err(MazeError::InvalidState);
    }
    let mut path = vec![p];
    let mut cur = p;
    while let Some(q) = grid.parent(cur) {
        path.push(q);
        cur = q;
    }
    Ok(path)
}

/// The unique simple path from `a` to `b`, inclusive of both endpoints.
///
/// Re-roots the tree at `b`, then walks from `a`; consecutive pairs of the
/// returned sequence are exactly the `(cell, parent)` hops in traversal
/// order after the re-rooting. `a == b` yields an empty path with no error.
///
/// Preconditions are checked before any mutation: an uncarved grid is
/// [`MazeError::InvalidState`], an out-of-bounds endpoint is
/// [`MazeError::InvalidSelection`].
pub fn path_between(grid: &mut MazeGrid, a: Point, b: Point) -> Result<Vec<Point>, MazeError> {
    if !grid.contains(a) || !grid.contains(b) {
        return Err(MazeError::InvalidSelection);
    }
    if !grid.fully_carved() {
        return Err(MazeError::InvalidState);
    }
    if a == b {
        return Ok(Vec::new());
    }
    make_root(grid, b)?;
    path_to_root(grid, a)
}
