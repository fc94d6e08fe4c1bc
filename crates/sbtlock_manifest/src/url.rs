//! Mapping cache paths back to download URLs.

use std::path::Path;

use crate::error::ManifestError;

/// Reconstructs the download URL for a cached artifact.
///
/// Coursier mirrors the URL structure on disk:
/// `<cache>/[cache/]https/repo.example.com/path/to/artifact`. The path is
/// taken relative to `cache_dir`, everything after the first `https` segment
/// is rejoined with `/`, and the scheme prefix is restored.
///
/// A relative path with no `https` segment means the cache layout assumption
/// no longer holds; that is a hard error, never a silently malformed URL.
pub fn cache_path_to_url(path: &Path, cache_dir: &Path) -> Result<String, ManifestError> {
    let relative = path.strip_prefix(cache_dir).map_err(|_| {
        ManifestError::NoSchemeSegment {
            path: path.to_path_buf(),
        }
    })?;

    let parts: Vec<&str> = relative
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect();

    match parts.iter().position(|&p| p == "https") {
        Some(idx) => Ok(format!("https://{}", parts[idx + 1..].join("/"))),
        None => Err(ManifestError::NoSchemeSegment {
            path: path.to_path_buf(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn resolves_nested_cache_layout() {
        let root = PathBuf::from("/tmp/coursier");
        let path = root.join("cache/https/repo.example.com/g/a/1.0/a-1.0.jar");
        let url = cache_path_to_url(&path, &root).unwrap();
        assert_eq!(url, "https://repo.example.com/g/a/1.0/a-1.0.jar");
    }

    #[test]
    fn resolves_flat_cache_layout() {
        let root = PathBuf::from("/tmp/coursier");
        let path = root.join("https/repo1.maven.org/maven2/org/lib/lib.pom");
        let url = cache_path_to_url(&path, &root).unwrap();
        assert_eq!(url, "https://repo1.maven.org/maven2/org/lib/lib.pom");
    }

    #[test]
    fn missing_scheme_segment_errors() {
        let root = PathBuf::from("/tmp/coursier");
        let path = root.join("ftp/repo.example.com/a.jar");
        let err = cache_path_to_url(&path, &root).unwrap_err();
        assert!(matches!(err, ManifestError::NoSchemeSegment { .. }));
    }

    #[test]
    fn path_outside_cache_root_errors() {
        let root = PathBuf::from("/tmp/coursier");
        let path = PathBuf::from("/elsewhere/https/repo/a.jar");
        let err = cache_path_to_url(&path, &root).unwrap_err();
        assert!(matches!(err, ManifestError::NoSchemeSegment { .. }));
    }

    #[test]
    fn only_first_https_segment_is_the_scheme() {
        let root = PathBuf::from("/c");
        let path = root.join("cache/https/repo.example.com/https/nested/a.jar");
        let url = cache_path_to_url(&path, &root).unwrap();
        assert_eq!(url, "https://repo.example.com/https/nested/a.jar");
    }
}
