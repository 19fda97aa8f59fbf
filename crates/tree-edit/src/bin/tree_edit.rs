//! `tree-edit`: run an edit script against a JSON document.
//!
//! Usage:
//!   tree-edit [--capacity N] '<script-json>'
//!
//! The document is read from stdin and the edited document is written to
//! stdout. Set `RUST_LOG=debug` to trace history activity.

use std::io::{self, Read, Write};

use tree_edit::cli::run_script_with_options;
use tree_edit::{EditorOptions, HistoryOptions};

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("{msg}");
    std::process::exit(1);
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let mut options = EditorOptions::default();
    let mut script = None;
    while let Some(arg) = args.next() {
        if arg == "--capacity" {
            let capacity = match args.next().map(|n| n.parse::<usize>()) {
                Some(Ok(n)) => n,
                _ => fail("--capacity expects a non-negative integer."),
            };
            options.history = HistoryOptions { capacity };
        } else {
            script = Some(arg);
        }
    }
    let Some(script) = script else {
        fail("First argument must be a JSON script array.");
    };

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        fail(e);
    }

    match run_script_with_options(buf.trim(), &script, options) {
        Ok(result) => {
            let mut out = io::stdout();
            if let Err(e) = out.write_all(result.as_bytes()).and_then(|_| out.write_all(b"\n")) {
                fail(e);
            }
        }
        Err(e) => fail(e),
    }
}
