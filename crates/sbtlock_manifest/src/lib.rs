//! Lockfile construction from a populated Coursier cache.
//!
//! This crate implements phase 2 of generation: walk the sandboxed cache,
//! map each downloaded artifact back to its source URL, hash it, and emit
//! the deterministic `{version, artifacts}` lockfile. It never touches the
//! network; it only reads what the sandboxed tools left on disk.

#![warn(missing_docs)]

pub mod builder;
pub mod error;
pub mod scan;
pub mod url;

pub use builder::{build_lockfile, ArtifactEntry, BuildOptions, Lockfile};
pub use error::ManifestError;
pub use scan::{assert_no_legacy_artifacts, find_cached_artifacts};
pub use url::cache_path_to_url;
