//! Strongly-typed generation configuration.

use serde::Deserialize;

/// Arguments for a single `sbt --batch` invocation.
///
/// Immutable once parsed; a generation run consumes each entry exactly once,
/// in order. Validation guarantees `args` is non-empty.
#[derive(Debug, Clone, Deserialize)]
pub struct SbtRun {
    /// Arguments passed to sbt after `--batch`.
    pub args: Vec<String>,
}

/// An artifact coordinate to fetch explicitly, with optional classifiers.
///
/// Used to backfill artifacts the sbt run itself doesn't pull into the cache
/// (e.g. `sources` or `javadoc` jars). Validation guarantees `coord` is
/// non-empty.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactFetch {
    /// Maven coordinate, e.g. `org.scala-lang:scala-library:2.13.12`.
    pub coord: String,

    /// Classifier names to additionally retrieve, in order.
    #[serde(default)]
    pub classifiers: Vec<String>,
}

/// Top-level configuration for a lockfile generation run.
///
/// Parsed once at startup and read-only thereafter.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    /// The sbt invocations to run, in order. Must be non-empty.
    pub sbt_runs: Vec<SbtRun>,

    /// Shell command lines to run before sbt (e.g. code generators), each an
    /// ordered argument list.
    #[serde(default)]
    pub shell_commands: Vec<Vec<String>>,

    /// Artifact coordinates to fetch after the sbt runs.
    #[serde(default)]
    pub fetch_artifacts: Vec<ArtifactFetch>,
}
