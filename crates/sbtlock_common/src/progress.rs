//! Stderr progress reporting.
//!
//! All run narration goes to stderr so that stdout carries nothing but the
//! final lockfile JSON. Warnings are always printed; informational lines can
//! be silenced with the quiet flag.

/// Reports generation progress on stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct Progress {
    quiet: bool,
}

impl Progress {
    /// Creates a reporter. With `quiet` set, informational lines are dropped.
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Prints an informational line unless quiet mode is on.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            eprintln!("{message}");
        }
    }

    /// Prints a warning line. Warnings are never suppressed.
    pub fn warn(&self, message: &str) {
        eprintln!("Warning: {message}");
    }
}
