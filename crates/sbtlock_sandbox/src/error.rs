//! Error types for sandbox construction and subprocess orchestration.

use std::path::PathBuf;

/// Errors that can occur while building the sandbox or running tools in it.
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    /// An I/O error occurred while creating or cleaning sandbox directories.
    #[error("sandbox I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A subprocess could not be spawned at all (typically: binary missing
    /// from PATH).
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        /// The program that could not be started.
        program: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A fatal pipeline step exited non-zero. Carries the captured output so
    /// the failure can be diagnosed without re-running.
    #[error("{label} failed: {command}\n--- stdout ---\n{stdout}\n--- stderr ---\n{stderr}")]
    StepFailed {
        /// Human-readable step label (e.g. `sbt run (1/2)`).
        label: String,
        /// The rendered command line.
        command: String,
        /// Captured standard output.
        stdout: String,
        /// Captured standard error.
        stderr: String,
    },
}
