//! Command handlers for the jstep CLI.
//!
//! Each submodule implements one command. Shared helpers for reading
//! source files and rendering errors live here.

use std::fmt::Write;

use jstep_eval::ErrorInfo;

mod debug;
mod run;

pub use debug::{lex_file, parse_file};
pub use run::{parse_run_options, run_file, step_file, RunOptions};

/// Read a source file, exiting with a readable message on failure.
pub(super) fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}

/// Render an execution error with the offending source line:
///
/// ```text
/// TypeError: Assignment to constant variable.
///   --> prog.js:2
///    |
///  2 | limit = 4;
/// ```
pub fn render_error(path: &str, source: &str, error: &ErrorInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}: {}", error.name, error.message);
    let _ = writeln!(out, "  --> {path}:{}", error.line);
    let index = usize::try_from(error.line)
        .unwrap_or(usize::MAX)
        .saturating_sub(1);
    if let Some(text) = source.lines().nth(index) {
        let gutter = error.line.to_string();
        let pad = " ".repeat(gutter.len());
        let _ = writeln!(out, " {pad} |");
        let _ = writeln!(out, " {gutter} | {text}");
    }
    out
}

#[cfg(test)]
mod tests;
