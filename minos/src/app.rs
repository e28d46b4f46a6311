//! The interactive terminal application.
//!
//! Key bindings follow the original toy: `g` carves, `s`/`e` toggle
//! start/end selection, arrows move the cell cursor and Enter selects it,
//! `p` draws the path, `c` clears it, `r` resets, `q`/Esc quits. All pacing
//! lives here — the session just hands us step events and waits for each
//! callback to return.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use crossterm::cursor;
use crossterm::event::{self, Event, KeyCode, KeyEvent};
use crossterm::execute;
use crossterm::terminal::{self, ClearType};

use daedal_core::{CancelToken, Point};
use daedal_maze::{CarveOutcome, Endpoint, Session, SessionState};

use crate::render::{Canvas, View};

/// Delay between animation steps (the original's 16 ms timeout).
const STEP_DELAY: Duration = Duration::from_millis(16);

const HINTS: &str = "g carve | s/e select start/end | arrows+enter pick | p path | c clear | r reset | q quit";

/// Raw-mode terminal guard. Restores the terminal on drop, so panics and
/// early returns both leave the screen usable.
struct RawTerm;

impl RawTerm {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(
            io::stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        )?;
        Ok(Self)
    }
}

impl Drop for RawTerm {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Run the application over a `width × height` maze.
pub fn run(width: i32, height: i32) -> Result<(), Box<dyn std::error::Error>> {
    let _term = RawTerm::enter()?;
    App::new(width, height).main_loop()?;
    Ok(())
}

struct App {
    session: Session<rand::rngs::ThreadRng>,
    canvas: Canvas,
    cursor: Point,
    message: String,
}

impl App {
    fn new(width: i32, height: i32) -> Self {
        Self {
            session: Session::new(width, height, rand::rng()),
            canvas: Canvas::new(width, height),
            cursor: Point::ZERO,
            message: String::new(),
        }
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let mut out = io::stdout();
        loop {
            self.draw(&mut out)?;
            let Event::Key(KeyEvent { code, .. }) = event::read()? else {
                continue;
            };
            match code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char('g') => self.animate_carve(&mut out)?,
                KeyCode::Char('p') => self.animate_path(&mut out)?,
                KeyCode::Char('c') => self.clear_path(),
                KeyCode::Char('s') => self.toggle_select(Endpoint::Start),
                KeyCode::Char('e') => self.toggle_select(Endpoint::End),
                KeyCode::Char('r') => {
                    self.session.reset();
                    self.canvas.clear();
                    self.message.clear();
                }
                KeyCode::Up => self.move_cursor(0, -1),
                KeyCode::Down => self.move_cursor(0, 1),
                KeyCode::Left => self.move_cursor(-1, 0),
                KeyCode::Right => self.move_cursor(1, 0),
                KeyCode::Enter | KeyCode::Char(' ') => self.click(),
                _ => {}
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Input handlers
    // -----------------------------------------------------------------------

    fn move_cursor(&mut self, dx: i32, dy: i32) {
        let next = self.cursor.shift(dx, dy);
        if self.session.grid().contains(next) {
            self.cursor = next;
        }
    }

    fn toggle_select(&mut self, which: Endpoint) {
        match self.session.toggle_select(which) {
            Ok(()) => self.message.clear(),
            Err(e) => self.message = format!("cannot select: {e}"),
        }
    }

    fn click(&mut self) {
        match self.session.click(self.cursor) {
            Ok(()) => self.message.clear(),
            Err(e) => self.message = format!("cannot select: {e}"),
        }
    }

    fn clear_path(&mut self) {
        match self.session.clear_path() {
            Ok(()) => {
                self.canvas.clear_path_shades();
                self.message.clear();
            }
            Err(e) => self.message = format!("cannot clear: {e}"),
        }
    }

    // -----------------------------------------------------------------------
    // Animated sequences
    // -----------------------------------------------------------------------

    fn animate_carve(&mut self, out: &mut io::Stdout) -> io::Result<()> {
        self.canvas.clear();
        let token = CancelToken::new();
        let tripper = token.clone();
        let canvas = &mut self.canvas;
        let mut io_err: Option<io::Error> = None;

        let outcome = self.session.carve(&token, |step| {
            canvas.apply_carve_step(step);
            if io_err.is_none() {
                let view = View {
                    cursor: None,
                    start: None,
                    end: None,
                    status: "carving... (Esc cancels)",
                };
                if let Err(e) = canvas.draw(out, &view) {
                    io_err = Some(e);
                    tripper.cancel();
                    return;
                }
            }
            if cancel_requested() {
                tripper.cancel();
            }
            thread::sleep(STEP_DELAY);
        });

        if let Some(e) = io_err {
            return Err(e);
        }
        match outcome {
            CarveOutcome::Complete { .. } => self.message.clear(),
            CarveOutcome::Cancelled { .. } => {
                self.canvas.clear();
                self.message = "carve cancelled".into();
            }
        }
        Ok(())
    }

    fn animate_path(&mut self, out: &mut io::Stdout) -> io::Result<()> {
        let canvas = &mut self.canvas;
        let start = self.session.start();
        let end = self.session.end();
        let mut io_err: Option<io::Error> = None;

        let result = self.session.solve(|cell, parent| {
            canvas.apply_path_pair(cell, parent);
            if io_err.is_none() {
                let view = View {
                    cursor: None,
                    start,
                    end,
                    status: "drawing path...",
                };
                if let Err(e) = canvas.draw(out, &view) {
                    io_err = Some(e);
                    return;
                }
            }
            thread::sleep(STEP_DELAY);
        });

        if let Some(e) = io_err {
            return Err(e);
        }
        match result {
            Ok(_) => self.message.clear(),
            Err(e) => self.message = format!("cannot draw path: {e}"),
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Drawing
    // -----------------------------------------------------------------------

    fn draw(&mut self, out: &mut io::Stdout) -> io::Result<()> {
        let prompt = match self.session.state() {
            SessionState::SelectingStart => "select starting point (enter)",
            SessionState::SelectingEnd => "select end point (enter)",
            _ => "",
        };
        let status = if !self.message.is_empty() {
            format!("{} | {HINTS}", self.message)
        } else if !prompt.is_empty() {
            format!("{prompt} | {HINTS}")
        } else {
            HINTS.to_string()
        };
        let show_cursor = matches!(
            self.session.state(),
            SessionState::SelectingStart | SessionState::SelectingEnd
        );
        let view = View {
            cursor: show_cursor.then_some(self.cursor),
            start: self.session.start(),
            end: self.session.end(),
            status: &status,
        };
        self.canvas.draw(out, &view)?;
        out.flush()
    }
}

/// Drain pending input, reporting whether Esc was pressed.
fn cancel_requested() -> bool {
    let mut cancel = false;
    while event::poll(Duration::ZERO).unwrap_or(false) {
        if let Ok(Event::Key(KeyEvent {
            code: KeyCode::Esc, ..
        })) = event::read()
        {
            cancel = true;
        }
    }
    cancel
}
