//! The [`MazeGrid`] — a dense W × H grid of carvable cells.
//!
//! The grid is the single shared mutable resource of the system. It is owned
//! by one controller and mutated only through `&mut` methods; the set of
//! `parent` links is the maze itself, forming a spanning tree over all cells
//! once carving completes.

use crate::geom::Point;

/// A single grid cell.
///
/// `parent` is a back-reference into the owning grid, not an ownership edge.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub visited: bool,
    pub parent: Option<Point>,
}

/// A fixed-size rectangular grid of [`Cell`]s backed by a flat `Vec`.
///
/// Dimensions are fixed at construction. [`reset`](MazeGrid::reset) clears
/// carve state without reallocating.
#[derive(Debug, Clone)]
pub struct MazeGrid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl MazeGrid {
    /// Create a new grid of the given dimensions, all cells uncarved.
    /// Dimensions are clamped to at least 1 × 1.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            cells: vec![Cell::default(); (width * height) as usize],
        }
    }

    /// Width of the grid.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height of the grid.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: grids have at least one cell.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `p` is inside the grid bounds.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height
    }

    /// Convert a `Point` to a flat index. Returns `None` if out of bounds.
    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if self.contains(p) {
            Some((p.y * self.width + p.x) as usize)
        } else {
            None
        }
    }

    /// Convert a flat index back to a `Point`.
    #[inline]
    fn point(&self, idx: usize) -> Point {
        Point::new(idx as i32 % self.width, idx as i32 / self.width)
    }

    /// Read the cell at `p`, or `None` if out of bounds.
    #[inline]
    pub fn at(&self, p: Point) -> Option<Cell> {
        self.idx(p).map(|i| self.cells[i])
    }

    /// Whether the cell at `p` has been carved. False out of bounds.
    #[inline]
    pub fn visited(&self, p: Point) -> bool {
        self.idx(p).is_some_and(|i| self.cells[i].visited)
    }

    /// The parent link of the cell at `p`. `None` for the root, for uncarved
    /// cells, and out of bounds.
    #[inline]
    pub fn parent(&self, p: Point) -> Option<Point> {
        self.idx(p).and_then(|i| self.cells[i].parent)
    }

    /// Mark the cell at `p` as carved. No-op out of bounds.
    #[inline]
    pub fn mark_visited(&mut self, p: Point) {
        if let Some(i) = self.idx(p) {
            self.cells[i].visited = true;
        }
    }

    /// Set (or clear) the parent link of the cell at `p`. No-op out of bounds.
    #[inline]
    pub fn set_parent(&mut self, p: Point, parent: Option<Point>) {
        if let Some(i) = self.idx(p) {
            self.cells[i].parent = parent;
        }
    }

    /// Append the in-bounds cardinal neighbors of `p` into `buf`, in the
    /// carving order right, left, down, up. Clears `buf` first.
    pub fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        buf.clear();
        for n in p.neighbors_4() {
            if self.contains(n) {
                buf.push(n);
            }
        }
    }

    /// Like [`neighbors`](MazeGrid::neighbors), keeping only uncarved cells.
    pub fn unvisited_neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        buf.clear();
        for n in p.neighbors_4() {
            if self.contains(n) && !self.visited(n) {
                buf.push(n);
            }
        }
    }

    /// Clear `visited` and `parent` on every cell without reallocating.
    pub fn reset(&mut self) {
        for c in self.cells.iter_mut() {
            *c = Cell::default();
        }
    }

    /// Whether every cell has been carved, i.e. a complete spanning tree
    /// exists. Precondition gate for path extraction.
    pub fn fully_carved(&self) -> bool {
        self.cells.iter().all(|c| c.visited)
    }

    /// The tree root: the unique carved cell with no parent, or `None` if
    /// there is not exactly one such cell.
    pub fn root(&self) -> Option<Point> {
        let mut root = None;
        for (i, c) in self.cells.iter().enumerate() {
            if c.visited && c.parent.is_none() {
                if root.is_some() {
                    return None;
                }
                root = Some(self.point(i));
            }
        }
        root
    }

    /// Number of steps from `p` to the tree root along parent links.
    ///
    /// Returns `None` if `p` is out of bounds, uncarved, or if the walk does
    /// not reach a root within `len()` steps (which would mean a cycle).
    pub fn depth(&self, p: Point) -> Option<usize> {
        if !self.visited(p) {
            return None;
        }
        let mut cur = p;
        for d in 0..=self.len() {
            match self.parent(cur) {
                Some(next) => cur = next,
                None => return Some(d),
            }
        }
        None
    }

    /// Iterate over `(Point, Cell)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Cell)> + '_ {
        self.cells.iter().enumerate().map(|(i, &c)| (self.point(i), c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_and_bounds() {
        let g = MazeGrid::new(4, 3);
        assert_eq!(g.width(), 4);
        assert_eq!(g.height(), 3);
        assert_eq!(g.len(), 12);
        assert!(g.contains(Point::new(0, 0)));
        assert!(g.contains(Point::new(3, 2)));
        assert!(!g.contains(Point::new(4, 0)));
        assert!(!g.contains(Point::new(0, -1)));
    }

    #[test]
    fn dimensions_clamped_to_one() {
        let g = MazeGrid::new(0, -5);
        assert_eq!(g.width(), 1);
        assert_eq!(g.height(), 1);
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn visit_and_parent() {
        let mut g = MazeGrid::new(3, 3);
        let p = Point::new(1, 1);
        assert!(!g.visited(p));
        g.mark_visited(p);
        assert!(g.visited(p));
        g.set_parent(p, Some(Point::new(0, 1)));
        assert_eq!(g.parent(p), Some(Point::new(0, 1)));
        // Out-of-bounds access is total.
        assert!(!g.visited(Point::new(9, 9)));
        assert_eq!(g.parent(Point::new(9, 9)), None);
        g.mark_visited(Point::new(9, 9));
    }

    #[test]
    fn neighbors_bounds_checked_and_ordered() {
        let g = MazeGrid::new(3, 3);
        let mut buf = Vec::new();
        g.neighbors(Point::new(1, 1), &mut buf);
        assert_eq!(
            buf,
            vec![
                Point::new(2, 1),
                Point::new(0, 1),
                Point::new(1, 2),
                Point::new(1, 0),
            ]
        );
        g.neighbors(Point::new(0, 0), &mut buf);
        assert_eq!(buf, vec![Point::new(1, 0), Point::new(0, 1)]);
        g.neighbors(Point::new(2, 2), &mut buf);
        assert_eq!(buf, vec![Point::new(1, 2), Point::new(2, 1)]);
    }

    #[test]
    fn unvisited_neighbors_filters() {
        let mut g = MazeGrid::new(3, 3);
        g.mark_visited(Point::new(2, 1));
        g.mark_visited(Point::new(1, 0));
        let mut buf = Vec::new();
        g.unvisited_neighbors(Point::new(1, 1), &mut buf);
        assert_eq!(buf, vec![Point::new(0, 1), Point::new(1, 2)]);
    }

    #[test]
    fn reset_clears_without_resizing() {
        let mut g = MazeGrid::new(2, 2);
        g.mark_visited(Point::new(0, 0));
        g.set_parent(Point::new(1, 0), Some(Point::new(0, 0)));
        g.reset();
        assert_eq!(g.len(), 4);
        assert!(g.iter().all(|(_, c)| c == Cell::default()));
    }

    #[test]
    fn fully_carved_and_root() {
        let mut g = MazeGrid::new(2, 1);
        assert!(!g.fully_carved());
        assert_eq!(g.root(), None);
        g.mark_visited(Point::new(0, 0));
        g.mark_visited(Point::new(1, 0));
        g.set_parent(Point::new(1, 0), Some(Point::new(0, 0)));
        assert!(g.fully_carved());
        assert_eq!(g.root(), Some(Point::new(0, 0)));
    }

    #[test]
    fn depth_walks_to_root() {
        let mut g = MazeGrid::new(3, 1);
        for x in 0..3 {
            g.mark_visited(Point::new(x, 0));
        }
        g.set_parent(Point::new(1, 0), Some(Point::new(0, 0)));
        g.set_parent(Point::new(2, 0), Some(Point::new(1, 0)));
        assert_eq!(g.depth(Point::new(0, 0)), Some(0));
        assert_eq!(g.depth(Point::new(2, 0)), Some(2));
        assert_eq!(g.depth(Point::new(5, 0)), None);
    }

    #[test]
    fn depth_detects_cycle() {
        let mut g = MazeGrid::new(2, 1);
        let a = Point::new(0, 0);
        let b = Point::new(1, 0);
        g.mark_visited(a);
        g.mark_visited(b);
        g.set_parent(a, Some(b));
        g.set_parent(b, Some(a));
        assert_eq!(g.depth(a), None);
    }
}
