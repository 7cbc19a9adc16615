//! User-facing output for pyproject-convert commands.
//!
//! The [`Printer`] decides whether messages reach stderr based on the
//! `--quiet` and `--verbose` flags. Errors are always printed.

use anstream::eprintln;
use owo_colors::OwoColorize;

/// Controls output for pyproject-convert commands.
#[derive(Copy, Clone, Debug)]
pub struct Printer {
    /// Verbosity level: 0 = normal, 1+ = verbose.
    verbosity: u8,
    /// Whether output is suppressed.
    quiet: bool,
}

impl Printer {
    /// Create a new printer with the given verbosity and quiet settings.
    pub fn new(verbosity: u8, quiet: bool) -> Self {
        Self { verbosity, quiet }
    }

    pub fn verbosity(self) -> u8 {
        self.verbosity
    }

    pub fn is_quiet(self) -> bool {
        self.quiet
    }

    /// Print an informational message to stderr.
    pub fn info(self, message: &str) {
        if !self.quiet {
            eprintln!("{message}");
        }
    }

    /// Print an error message to stderr, even in quiet mode.
    pub fn error(self, message: &str) {
        eprintln!("{}: {}", "error".red().bold(), message);
    }

    /// Print one `Caused by:` line of an error chain.
    pub fn cause(self, message: &str) {
        eprintln!("  {}: {}", "Caused by".red().bold(), message.trim());
    }
}
