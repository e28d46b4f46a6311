//! Terminal rendering of the maze.
//!
//! [`Canvas`] is the adapter's own picture of the maze: per-cell shades and
//! wall openness, updated purely from carve/path events or rebuilt from a
//! grid snapshot. It never reaches back into the model — the visual state is
//! a projection, not a second source of truth.
//!
//! Screen layout: each maze cell occupies an odd/odd coordinate of a
//! `(2W+1) × (2H+1)` character lattice, wall segments sit between them, and
//! every lattice column is drawn two characters wide to keep the aspect
//! ratio roughly square.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};

use daedal_core::{MazeGrid, Point};
use daedal_maze::{CarveDir, CarveStep};

/// Visual state of a cell, ordered so that an open wall segment takes the
/// *lesser* shade of its two cells (a carved-and-unwound neighbor pulls the
/// shared wall back to plain white, exactly like the original animation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Shade {
    /// Not yet carved. Rendered like a wall.
    Unvisited,
    /// Carved and left behind by the backtrack.
    Open,
    /// On the active DFS stack during carving.
    Active,
    /// On the displayed path.
    Path,
}

/// Overrides applied at draw time only.
pub struct View<'a> {
    pub cursor: Option<Point>,
    pub start: Option<Point>,
    pub end: Option<Point>,
    pub status: &'a str,
}

/// The adapter-side picture of the maze.
pub struct Canvas {
    width: i32,
    height: i32,
    cells: Vec<Shade>,
    /// Wall between `(x, y)` and `(x+1, y)` is open. Indexed by the left
    /// cell; the last column is unused.
    right_open: Vec<bool>,
    /// Wall between `(x, y)` and `(x, y+1)` is open. Indexed by the upper
    /// cell; the last row is unused.
    down_open: Vec<bool>,
}

impl Canvas {
    pub fn new(width: i32, height: i32) -> Self {
        let n = (width * height) as usize;
        Self {
            width,
            height,
            cells: vec![Shade::Unvisited; n],
            right_open: vec![false; n],
            down_open: vec![false; n],
        }
    }

    #[inline]
    fn idx(&self, p: Point) -> usize {
        (p.y * self.width + p.x) as usize
    }

    #[inline]
    fn in_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height
    }

    /// Everything back to uncarved black.
    pub fn clear(&mut self) {
        self.cells.fill(Shade::Unvisited);
        self.right_open.fill(false);
        self.down_open.fill(false);
    }

    pub fn shade(&self, p: Point) -> Shade {
        self.cells[self.idx(p)]
    }

    pub fn set_shade(&mut self, p: Point, shade: Shade) {
        if self.in_bounds(p) {
            let i = self.idx(p);
            self.cells[i] = shade;
        }
    }

    /// Open the wall between two cardinally adjacent cells.
    pub fn open_between(&mut self, a: Point, b: Point) {
        if !self.in_bounds(a) || !self.in_bounds(b) || !a.adjacent_4(b) {
            return;
        }
        if a.y == b.y {
            let left = if a.x < b.x { a } else { b };
            let i = self.idx(left);
            self.right_open[i] = true;
        } else {
            let upper = if a.y < b.y { a } else { b };
            let i = self.idx(upper);
            self.down_open[i] = true;
        }
    }

    /// Whether the wall between two adjacent cells is open.
    pub fn is_open_between(&self, a: Point, b: Point) -> bool {
        if !self.in_bounds(a) || !self.in_bounds(b) || !a.adjacent_4(b) {
            return false;
        }
        if a.y == b.y {
            self.right_open[self.idx(if a.x < b.x { a } else { b })]
        } else {
            self.down_open[self.idx(if a.y < b.y { a } else { b })]
        }
    }

    /// Fold one carve event into the picture: advancing lights up the new
    /// cell and its doorway, backtracking settles the abandoned cell to
    /// plain open.
    pub fn apply_carve_step(&mut self, step: &CarveStep) {
        match step.dir {
            CarveDir::Forward => {
                self.set_shade(step.at, Shade::Active);
                if let Some(to) = step.to {
                    self.open_between(step.at, to);
                    self.set_shade(to, Shade::Active);
                }
            }
            CarveDir::Backward => {
                self.set_shade(step.at, Shade::Open);
            }
        }
    }

    /// Fold one path hop into the picture.
    pub fn apply_path_pair(&mut self, cell: Point, parent: Point) {
        self.set_shade(cell, Shade::Path);
        self.set_shade(parent, Shade::Path);
    }

    /// Drop path highlighting, keeping the carved maze visible.
    pub fn clear_path_shades(&mut self) {
        for s in self.cells.iter_mut() {
            if *s == Shade::Path {
                *s = Shade::Open;
            }
        }
    }

    /// Rebuild the whole picture from a grid snapshot: carved cells are
    /// open, walls are absent exactly where a parent edge joins two cells.
    pub fn rebuild(&mut self, grid: &MazeGrid) {
        self.clear();
        for (p, cell) in grid.iter() {
            if cell.visited {
                self.set_shade(p, Shade::Open);
            }
            if let Some(q) = cell.parent {
                self.open_between(p, q);
            }
        }
    }

    fn shade_color(shade: Shade) -> Color {
        match shade {
            Shade::Unvisited => Color::Black,
            Shade::Open => Color::White,
            Shade::Active | Shade::Path => Color::Blue,
        }
    }

    /// Background color of one lattice position.
    fn lattice_color(&self, gx: i32, gy: i32, view: &View<'_>) -> Color {
        let x_odd = gx % 2 == 1;
        let y_odd = gy % 2 == 1;
        match (x_odd, y_odd) {
            // A cell.
            (true, true) => {
                let p = Point::new(gx / 2, gy / 2);
                if view.cursor == Some(p) {
                    Color::Yellow
                } else if view.start == Some(p) {
                    Color::Green
                } else if view.end == Some(p) {
                    Color::Red
                } else {
                    Self::shade_color(self.shade(p))
                }
            }
            // A vertical wall segment between horizontal neighbors.
            (false, true) => {
                let right = Point::new(gx / 2, gy / 2);
                let left = right.shift(-1, 0);
                if self.is_open_between(left, right) {
                    Self::shade_color(self.shade(left).min(self.shade(right)))
                } else {
                    Color::Black
                }
            }
            // A horizontal wall segment between vertical neighbors.
            (true, false) => {
                let lower = Point::new(gx / 2, gy / 2);
                let upper = lower.shift(0, -1);
                if self.is_open_between(upper, lower) {
                    Self::shade_color(self.shade(upper).min(self.shade(lower)))
                } else {
                    Color::Black
                }
            }
            // A corner post.
            (false, false) => Color::Black,
        }
    }

    /// Draw the full frame: maze lattice plus a status line underneath.
    pub fn draw(&self, out: &mut impl Write, view: &View<'_>) -> io::Result<()> {
        let rows = 2 * self.height + 1;
        let cols = 2 * self.width + 1;
        for gy in 0..rows {
            queue!(out, MoveTo(0, gy as u16))?;
            for gx in 0..cols {
                let color = self.lattice_color(gx, gy, view);
                queue!(out, SetBackgroundColor(color), Print("  "))?;
            }
            queue!(out, ResetColor)?;
        }
        queue!(
            out,
            MoveTo(0, rows as u16),
            Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Grey),
            Print(view.status),
            ResetColor
        )?;
        out.flush()
    }
}
