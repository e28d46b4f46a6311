//! The interactive session controller.
//!
//! [`Session`] is the single owner of the grid and of all interaction state.
//! Every mutation goes through its methods and is guarded by an explicit
//! finite state machine — there are no ambient "input blocked" flags.
//! Re-entrancy during a carve is impossible by construction: driving the
//! carve holds `&mut self` for the whole run, and interruption goes through
//! a [`CancelToken`] instead.

use daedal_core::{CancelToken, MazeGrid, Point};
use log::debug;
use rand::Rng;

use crate::carve::{CarveOutcome, CarveStep, Carver};
use crate::error::MazeError;
use crate::path::path_between;

/// The controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionState {
    Idle,
    SelectingStart,
    SelectingEnd,
    Generating,
    PathDisplayed,
}

/// Which path endpoint a selection targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Endpoint {
    Start,
    End,
}

/// The interactive maze session.
///
/// Owns the grid, the random source, the start/end selection, and the most
/// recently extracted path. Invariant: whenever both endpoints are set,
/// `start != end`.
pub struct Session<R: Rng> {
    grid: MazeGrid,
    rng: R,
    state: SessionState,
    start: Option<Point>,
    end: Option<Point>,
    path: Vec<Point>,
    carved: bool,
}

impl<R: Rng> Session<R> {
    /// Create an idle session over a fresh `width × height` grid.
    pub fn new(width: i32, height: i32, rng: R) -> Self {
        Self {
            grid: MazeGrid::new(width, height),
            rng,
            state: SessionState::Idle,
            start: None,
            end: None,
            path: Vec::new(),
            carved: false,
        }
    }

    /// Current controller state.
    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Read-only view of the grid.
    #[inline]
    pub fn grid(&self) -> &MazeGrid {
        &self.grid
    }

    /// The selected start cell, if any.
    #[inline]
    pub fn start(&self) -> Option<Point> {
        self.start
    }

    /// The selected end cell, if any.
    #[inline]
    pub fn end(&self) -> Option<Point> {
        self.end
    }

    /// The most recently extracted path (empty unless in `PathDisplayed`).
    #[inline]
    pub fn path(&self) -> &[Point] {
        &self.path
    }

    /// Whether a complete maze currently exists.
    #[inline]
    pub fn carved(&self) -> bool {
        self.carved
    }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            debug!("session state {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    /// Toggle selection mode for the given endpoint.
    ///
    /// From `Idle`, enters the corresponding selecting state; toggling the
    /// active mode again returns to `Idle`; switching directly between the
    /// two modes re-targets. Rejected with [`MazeError::InvalidState`]
    /// before the first carve and outside `Idle`/selecting states.
    pub fn toggle_select(&mut self, which: Endpoint) -> Result<(), MazeError> {
        if !self.carved {
            return Err(MazeError::InvalidState);
        }
        let target = match which {
            Endpoint::Start => SessionState::SelectingStart,
            Endpoint::End => SessionState::SelectingEnd,
        };
        match self.state {
            SessionState::Idle => {
                self.transition(target);
                Ok(())
            }
            s if s == target => {
                self.transition(SessionState::Idle);
                Ok(())
            }
            SessionState::SelectingStart | SessionState::SelectingEnd => {
                self.transition(target);
                Ok(())
            }
            _ => Err(MazeError::InvalidState),
        }
    }

    /// Assign the cell `p` to the endpoint currently being selected and
    /// return to `Idle`.
    ///
    /// Keeps the `start != end` invariant: assigning one endpoint to the
    /// cell currently held by the other clears the other. Out-of-bounds
    /// points are [`MazeError::InvalidSelection`]; clicks outside a
    /// selecting state are [`MazeError::InvalidState`].
    pub fn click(&mut self, p: Point) -> Result<(), MazeError> {
        let which = match self.state {
            SessionState::SelectingStart => Endpoint::Start,
            SessionState::SelectingEnd => Endpoint::End,
            _ => return Err(MazeError::InvalidState),
        };
        if !self.grid.contains(p) {
            return Err(MazeError::InvalidSelection);
        }
        match which {
            Endpoint::Start => {
                self.start = Some(p);
                if self.end == Some(p) {
                    self.end = None;
                }
            }
            Endpoint::End => {
                self.end = Some(p);
                if self.start == Some(p) {
                    self.start = None;
                }
            }
        }
        debug!("selected {:?} = {p}", which);
        self.transition(SessionState::Idle);
        Ok(())
    }

    /// Carve a fresh maze from a uniformly random root, driving the step
    /// sequence through `on_step`.
    ///
    /// Clears any previous tree, selection, and path first. `on_step` is
    /// invoked once per carve event, in DFS order; its return acknowledges
    /// the step (adapters pace the animation inside it). The token is
    /// checked between steps: on cancellation the grid is reset so no
    /// half-carved maze is observable, and the session returns to `Idle`
    /// with no maze.
    pub fn carve(&mut self, ctx: &CancelToken, mut on_step: impl FnMut(&CarveStep)) -> CarveOutcome {
        self.start = None;
        self.end = None;
        self.path.clear();
        self.carved = false;
        self.grid.reset();
        self.transition(SessionState::Generating);

        let root = Point::new(
            self.rng.random_range(0..self.grid.width()),
            self.rng.random_range(0..self.grid.height()),
        );
        let carver =
            Carver::new(&mut self.grid, root, &mut self.rng).expect("carve root is in bounds");

        let mut steps = 0;
        for step in carver {
            if ctx.is_cancelled() {
                self.grid.reset();
                self.transition(SessionState::Idle);
                debug!("carve cancelled after {steps} steps");
                return CarveOutcome::Cancelled { steps };
            }
            on_step(&step);
            steps += 1;
        }

        self.carved = true;
        self.transition(SessionState::Idle);
        debug!("carve complete: root {root}, {steps} steps");
        CarveOutcome::Complete { steps }
    }

    /// Extract and display the path from the selected start to the selected
    /// end, invoking `on_pair` with each `(cell, parent)` hop in traversal
    /// order.
    ///
    /// Requires `Idle` with a carved maze ([`MazeError::InvalidState`]
    /// otherwise) and both endpoints set ([`MazeError::InvalidSelection`]).
    /// On success the tree ends up rooted at the end cell and the session
    /// enters `PathDisplayed`.
    pub fn solve(&mut self, mut on_pair: impl FnMut(Point, Point)) -> Result<&[Point], MazeError> {
        if self.state != SessionState::Idle || !self.carved {
            return Err(MazeError::InvalidState);
        }
        let (start, end) = match (self.start, self.end) {
            (Some(s), Some(e)) if s != e => (s, e),
            _ => return Err(MazeError::InvalidSelection),
        };
        let path = path_between(&mut self.grid, start, end)?;
        for w in path.windows(2) {
            on_pair(w[0], w[1]);
        }
        debug!("path {start} -> {end}: {} cells", path.len());
        self.path = path;
        self.transition(SessionState::PathDisplayed);
        Ok(&self.path)
    }

    /// Erase the displayed path, keeping the maze and the selection.
    pub fn clear_path(&mut self) -> Result<(), MazeError> {
        if self.state != SessionState::PathDisplayed {
            return Err(MazeError::InvalidState);
        }
        self.path.clear();
        self.transition(SessionState::Idle);
        Ok(())
    }

    /// Clear all tree state, selection, and path, returning to `Idle`.
    /// Selection stays blocked until the next carve.
    pub fn reset(&mut self) {
        self.grid.reset();
        self.start = None;
        self.end = None;
        self.path.clear();
        self.carved = false;
        self.transition(SessionState::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn session() -> Session<StdRng> {
        Session::new(5, 5, StdRng::seed_from_u64(1))
    }

    fn carved_session() -> Session<StdRng> {
        let mut s = session();
        let outcome = s.carve(&CancelToken::new(), |_| {});
        assert!(matches!(outcome, CarveOutcome::Complete { .. }));
        s
    }

    #[test]
    fn carve_produces_a_maze_and_returns_to_idle() {
        let mut s = session();
        let mut steps = 0;
        let outcome = s.carve(&CancelToken::new(), |_| steps += 1);
        assert_eq!(outcome, CarveOutcome::Complete { steps });
        assert_eq!(steps, 2 * 25 - 1);
        assert!(s.carved());
        assert!(s.grid().fully_carved());
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn cancel_mid_carve_resets_cleanly() {
        let mut s = session();
        let tok = CancelToken::new();
        let inner = tok.clone();
        let mut seen = 0;
        let outcome = s.carve(&tok, |_| {
            seen += 1;
            if seen == 5 {
                inner.cancel();
            }
        });
        assert_eq!(outcome, CarveOutcome::Cancelled { steps: 5 });
        assert_eq!(s.state(), SessionState::Idle);
        assert!(!s.carved());
        // Nothing half-carved is observable.
        assert!(s.grid().iter().all(|(_, c)| c == daedal_core::Cell::default()));
        // And selection is still blocked.
        assert_eq!(
            s.toggle_select(Endpoint::Start).unwrap_err(),
            MazeError::InvalidState
        );
    }

    #[test]
    fn selection_blocked_before_first_carve() {
        let mut s = session();
        assert_eq!(
            s.toggle_select(Endpoint::Start).unwrap_err(),
            MazeError::InvalidState
        );
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn toggle_select_transitions() {
        let mut s = carved_session();
        s.toggle_select(Endpoint::Start).unwrap();
        assert_eq!(s.state(), SessionState::SelectingStart);
        // Toggling the same mode turns it off.
        s.toggle_select(Endpoint::Start).unwrap();
        assert_eq!(s.state(), SessionState::Idle);
        // Switching modes re-targets.
        s.toggle_select(Endpoint::Start).unwrap();
        s.toggle_select(Endpoint::End).unwrap();
        assert_eq!(s.state(), SessionState::SelectingEnd);
    }

    #[test]
    fn click_assigns_endpoint_and_returns_to_idle() {
        let mut s = carved_session();
        s.toggle_select(Endpoint::Start).unwrap();
        s.click(Point::new(1, 1)).unwrap();
        assert_eq!(s.start(), Some(Point::new(1, 1)));
        assert_eq!(s.state(), SessionState::Idle);
        // Clicking while not selecting is rejected.
        assert_eq!(s.click(Point::ZERO).unwrap_err(), MazeError::InvalidState);
    }

    #[test]
    fn click_out_of_bounds_rejected_state_unchanged() {
        let mut s = carved_session();
        s.toggle_select(Endpoint::End).unwrap();
        assert_eq!(
            s.click(Point::new(5, 0)).unwrap_err(),
            MazeError::InvalidSelection
        );
        assert_eq!(s.state(), SessionState::SelectingEnd);
        assert_eq!(s.end(), None);
    }

    #[test]
    fn endpoints_never_coincide() {
        let mut s = carved_session();
        let p = Point::new(2, 2);
        s.toggle_select(Endpoint::Start).unwrap();
        s.click(p).unwrap();
        // Assigning the same cell as end displaces start.
        s.toggle_select(Endpoint::End).unwrap();
        s.click(p).unwrap();
        assert_eq!(s.end(), Some(p));
        assert_eq!(s.start(), None);
        // And the other way around.
        s.toggle_select(Endpoint::Start).unwrap();
        s.click(p).unwrap();
        assert_eq!(s.start(), Some(p));
        assert_eq!(s.end(), None);
    }

    #[test]
    fn solve_requires_both_endpoints() {
        let mut s = carved_session();
        assert_eq!(s.solve(|_, _| {}).unwrap_err(), MazeError::InvalidSelection);
        s.toggle_select(Endpoint::Start).unwrap();
        s.click(Point::ZERO).unwrap();
        assert_eq!(s.solve(|_, _| {}).unwrap_err(), MazeError::InvalidSelection);
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn solve_displays_the_path() {
        let mut s = carved_session();
        s.toggle_select(Endpoint::Start).unwrap();
        s.click(Point::ZERO).unwrap();
        s.toggle_select(Endpoint::End).unwrap();
        s.click(Point::new(4, 4)).unwrap();

        let mut pairs = Vec::new();
        let path = s.solve(|c, p| pairs.push((c, p))).unwrap().to_vec();
        assert_eq!(path[0], Point::ZERO);
        assert_eq!(*path.last().unwrap(), Point::new(4, 4));
        assert_eq!(pairs.len(), path.len() - 1);
        for (i, (c, p)) in pairs.iter().enumerate() {
            assert_eq!((*c, *p), (path[i], path[i + 1]));
        }
        assert_eq!(s.state(), SessionState::PathDisplayed);
        // The tree is now rooted at the end cell.
        assert_eq!(s.grid().root(), Some(Point::new(4, 4)));
    }

    #[test]
    fn solve_blocked_while_path_displayed() {
        let mut s = carved_session();
        s.toggle_select(Endpoint::Start).unwrap();
        s.click(Point::ZERO).unwrap();
        s.toggle_select(Endpoint::End).unwrap();
        s.click(Point::new(4, 4)).unwrap();
        s.solve(|_, _| {}).unwrap();
        assert_eq!(s.solve(|_, _| {}).unwrap_err(), MazeError::InvalidState);
        // So is selection.
        assert_eq!(
            s.toggle_select(Endpoint::Start).unwrap_err(),
            MazeError::InvalidState
        );
    }

    #[test]
    fn clear_path_keeps_maze_and_selection() {
        let mut s = carved_session();
        s.toggle_select(Endpoint::Start).unwrap();
        s.click(Point::ZERO).unwrap();
        s.toggle_select(Endpoint::End).unwrap();
        s.click(Point::new(3, 3)).unwrap();
        s.solve(|_, _| {}).unwrap();

        s.clear_path().unwrap();
        assert_eq!(s.state(), SessionState::Idle);
        assert!(s.path().is_empty());
        assert!(s.carved());
        assert_eq!(s.start(), Some(Point::ZERO));
        assert_eq!(s.end(), Some(Point::new(3, 3)));
        // Clearing twice is rejected.
        assert_eq!(s.clear_path().unwrap_err(), MazeError::InvalidState);
    }

    #[test]
    fn reset_clears_everything() {
        let mut s = carved_session();
        s.toggle_select(Endpoint::Start).unwrap();
        s.click(Point::ZERO).unwrap();
        s.reset();
        assert_eq!(s.state(), SessionState::Idle);
        assert!(!s.carved());
        assert_eq!(s.start(), None);
        assert_eq!(s.end(), None);
        assert!(s.grid().iter().all(|(_, c)| c == daedal_core::Cell::default()));
    }

    #[test]
    fn carve_from_selecting_state_clears_selection() {
        let mut s = carved_session();
        s.toggle_select(Endpoint::Start).unwrap();
        s.click(Point::new(1, 2)).unwrap();
        s.toggle_select(Endpoint::End).unwrap();
        // Carving is allowed mid-selection and wipes the selection.
        let outcome = s.carve(&CancelToken::new(), |_| {});
        assert!(matches!(outcome, CarveOutcome::Complete { .. }));
        assert_eq!(s.start(), None);
        assert_eq!(s.end(), None);
        assert_eq!(s.state(), SessionState::Idle);
    }
}
