//! Cache traversal and the legacy-cache invariant.

use std::path::{Path, PathBuf};

use crate::error::ManifestError;

/// File extensions that identify a dependency artifact: compiled archives
/// (`.jar`), Maven descriptors (`.pom`), and Ivy descriptors (`ivy.xml`).
const ARTIFACT_EXTENSIONS: [&str; 3] = ["jar", "pom", "xml"];

/// Extensions checked by the legacy-cache invariant. Descriptor `.xml` files
/// are tolerated there; only real payloads indicate a legacy resolver fell
/// back into use.
const LEGACY_EXTENSIONS: [&str; 2] = ["jar", "pom"];

/// Enumerates every artifact file in a Coursier cache directory.
///
/// Coursier places downloads either under `<cache>/cache/https/...` or
/// directly under `<cache>/https/...` depending on version; both layouts are
/// checked. Missing roots are skipped silently. Files are returned in
/// discovery order; callers that need determinism must sort.
pub fn find_cached_artifacts(cache_dir: &Path) -> Result<Vec<PathBuf>, ManifestError> {
    let https_dirs = [cache_dir.join("cache").join("https"), cache_dir.join("https")];

    let mut artifacts = Vec::new();
    for https_dir in &https_dirs {
        if !https_dir.exists() {
            continue;
        }
        collect_files(https_dir, &ARTIFACT_EXTENSIONS, &mut artifacts)?;
    }
    Ok(artifacts)
}

/// Asserts that the legacy Ivy cache holds no artifacts.
///
/// sbt 1.3+ resolves exclusively through Coursier; anything landing in
/// `~/.ivy2/cache` means the run drifted onto the legacy resolver and the
/// lockfile would be incomplete. An absent or empty directory passes.
pub fn assert_no_legacy_artifacts(ivy_cache: &Path) -> Result<(), ManifestError> {
    if !ivy_cache.exists() {
        return Ok(());
    }

    let mut artifacts = Vec::new();
    collect_files(ivy_cache, &LEGACY_EXTENSIONS, &mut artifacts)?;
    match artifacts.first() {
        Some(example) => Err(ManifestError::LegacyArtifacts {
            count: artifacts.len(),
            example: example.clone(),
        }),
        None => Ok(()),
    }
}

/// Recursively collects regular files under `dir` whose extension is in
/// `extensions`.
fn collect_files(
    dir: &Path,
    extensions: &[&str],
    out: &mut Vec<PathBuf>,
) -> Result<(), ManifestError> {
    let entries = std::fs::read_dir(dir).map_err(|e| ManifestError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;
    for entry in entries {
        let entry = entry.map_err(|e| ManifestError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, extensions, out)?;
        } else if path.is_file() {
            let matches = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| extensions.contains(&e));
            if matches {
                out.push(path);
            }
        }
    }
    Ok(())
}
