//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Output is formatted consistently and respects the quiet flag.
//! Diagnostics are the exception: a pushing client must always see why
//! its push was warned about or blocked, so they ignore `--quiet`.

use std::fmt::Display;

use crate::gate::Diagnostic;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a diagnostic for the pushing client (always shown).
///
/// With a ref, the line is prefixed by it so multi-ref pushes stay
/// readable: `refs/heads/main: (W) ...`.
pub fn diagnostic(refname: Option<&str>, diagnostic: &Diagnostic) {
    eprintln!("{}", format_diagnostic(refname, diagnostic));
}

/// Format a diagnostic line.
pub fn format_diagnostic(refname: Option<&str>, diagnostic: &Diagnostic) -> String {
    match refname {
        Some(name) => format!("{}: {}", name, diagnostic),
        None => diagnostic.to_string(),
    }
}
