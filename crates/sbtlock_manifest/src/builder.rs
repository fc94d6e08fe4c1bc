//! Deterministic lockfile assembly.

use std::collections::HashSet;
use std::path::Path;

use sbtlock_common::{ArtifactHasher, Progress};
use serde::{Deserialize, Serialize};

use crate::error::ManifestError;
use crate::scan::{assert_no_legacy_artifacts, find_cached_artifacts};
use crate::url::cache_path_to_url;

/// Current lockfile format version.
const LOCKFILE_VERSION: u32 = 1;

/// A single locked artifact: its download URL and Nix base-32 SHA-256 hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactEntry {
    /// Canonical download URL the artifact was fetched from.
    pub url: String,

    /// Nix base-32 encoding of the artifact's SHA-256 digest.
    pub sha256: String,
}

/// The complete lockfile: format version plus the sorted artifact list.
///
/// Immutable once built; `artifacts` is unique by URL and sorted ascending
/// by URL so repeated runs over the same cache produce byte-identical output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lockfile {
    /// Lockfile format version.
    pub version: u32,

    /// Locked artifacts, sorted ascending by URL, unique by URL.
    pub artifacts: Vec<ArtifactEntry>,
}

impl Lockfile {
    /// Serializes the lockfile as pretty-printed JSON (2-space indent) with
    /// a trailing newline.
    pub fn to_json(&self) -> Result<String, ManifestError> {
        let mut json = serde_json::to_string_pretty(self).map_err(|e| {
            ManifestError::Serialization {
                reason: e.to_string(),
            }
        })?;
        json.push('\n');
        Ok(json)
    }
}

/// Options controlling lockfile construction.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Whether to fail when the legacy Ivy cache contains artifacts.
    /// Defaults to on; sbt 1.3+ is expected to resolve via Coursier only.
    pub check_legacy_cache: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            check_legacy_cache: true,
        }
    }
}

/// Builds the lockfile from a populated Coursier cache.
///
/// Enforces the legacy-cache invariant, scans the cache, maps every artifact
/// to a `(url, sha256)` entry, deduplicates by URL keeping the first
/// occurrence (sbt and `cs fetch` may cache the same logical artifact at two
/// paths), and sorts by URL for deterministic output. An empty scan result
/// is fatal: it means the driven build downloaded nothing.
pub fn build_lockfile(
    coursier_cache: &Path,
    ivy_cache: &Path,
    options: &BuildOptions,
    progress: &Progress,
) -> Result<Lockfile, ManifestError> {
    if options.check_legacy_cache {
        assert_no_legacy_artifacts(ivy_cache)?;
    }

    let paths = find_cached_artifacts(coursier_cache)?;
    progress.info(&format!("Found {} Coursier artifacts", paths.len()));
    if paths.is_empty() {
        return Err(ManifestError::NoArtifacts);
    }

    let mut entries = Vec::with_capacity(paths.len());
    for (i, path) in paths.iter().enumerate() {
        let url = cache_path_to_url(path, coursier_cache)?;
        let sha256 = ArtifactHasher::hash_file(path)?;
        entries.push(ArtifactEntry { url, sha256 });

        if (i + 1) % 100 == 0 {
            progress.info(&format!("  Processed {} artifacts...", i + 1));
        }
    }

    let mut seen_urls = HashSet::new();
    entries.retain(|entry| seen_urls.insert(entry.url.clone()));
    entries.sort_by(|a, b| a.url.cmp(&b.url));

    progress.info(&format!("=== Done! Processed {} artifacts ===", entries.len()));

    Ok(Lockfile {
        version: LOCKFILE_VERSION,
        artifacts: entries,
    })
}
