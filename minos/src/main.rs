//! Minos — an animated maze carving and solving toy for the terminal.

mod app;
mod render;

use std::env;
use std::process;

const DEFAULT_WIDTH: i32 = 24;
const DEFAULT_HEIGHT: i32 = 16;
const MAX_DIM: i32 = 64;

fn parse_dim(arg: Option<String>, default: i32) -> Result<i32, String> {
    match arg {
        None => Ok(default),
        Some(s) => match s.parse::<i32>() {
            Ok(v) if (1..=MAX_DIM).contains(&v) => Ok(v),
            _ => Err(format!("invalid dimension {s:?} (expected 1..={MAX_DIM})")),
        },
    }
}

fn main() {
    let mut args = env::args().skip(1);
    let dims = parse_dim(args.next(), DEFAULT_WIDTH)
        .and_then(|w| parse_dim(args.next(), DEFAULT_HEIGHT).map(|h| (w, h)));
    let (width, height) = match dims {
        Ok(d) => d,
        Err(e) => {
            eprintln!("minos: {e}");
            eprintln!("usage: minos [WIDTH] [HEIGHT]");
            process::exit(2);
        }
    };

    if let Err(e) = app::run(width, height) {
        eprintln!("minos: {e}");
        process::exit(1);
    }
}
