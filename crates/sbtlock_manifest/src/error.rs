//! Error types for cache scanning and lockfile construction.

use std::path::PathBuf;

use sbtlock_common::HashError;

/// Errors that can occur while scanning the cache or building the lockfile.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// An I/O error occurred while walking the cache tree.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An artifact file failed to hash.
    #[error(transparent)]
    Hash(#[from] HashError),

    /// A cache file's path contains no `https` segment, so it cannot be
    /// mapped back to a download URL. Indicates the cache layout assumption
    /// no longer holds.
    #[error("unexpected cache path structure (no 'https' segment): {path}")]
    NoSchemeSegment {
        /// The unmappable cache path.
        path: PathBuf,
    },

    /// The legacy Ivy cache contains artifacts, contradicting the assumption
    /// that modern sbt resolves through Coursier only.
    #[error(
        "found {count} Ivy artifacts, but modern sbt should use Coursier only; \
         first artifact: {example}"
    )]
    LegacyArtifacts {
        /// Number of artifact files found in the legacy cache.
        count: usize,
        /// One offending path, for diagnosis.
        example: PathBuf,
    },

    /// The populated cache contained no recognizable artifacts at all,
    /// which means the driven build silently fetched nothing.
    #[error("no Coursier artifacts found - sbt may have failed to download dependencies")]
    NoArtifacts,

    /// The lockfile could not be serialized to JSON.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}
