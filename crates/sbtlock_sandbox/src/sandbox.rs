//! The disposable sandbox root.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::SandboxError;

/// Prefix for sandbox directory names, so stray preserved sandboxes are
/// recognizable in the system temp directory.
const SANDBOX_PREFIX: &str = "sbtlock-";

/// An ephemeral filesystem root substituting for the user's home directory.
///
/// Owns the cache/state subdirectories created inside it for the run's
/// duration. Removal is RAII-guaranteed on every exit path via [`TempDir`],
/// unless the sandbox was created with `preserve`, in which case the tree
/// outlives the run for inspection. Never shared across concurrent runs.
#[derive(Debug)]
pub struct Sandbox {
    root: PathBuf,
    // `None` when preserved: nothing left to remove on drop.
    temp: Option<TempDir>,
}

impl Sandbox {
    /// Creates a fresh sandbox with its Coursier and sbt subdirectories.
    ///
    /// With `preserve` set the directory is detached from RAII cleanup and
    /// survives the run; the caller is expected to report its location.
    pub fn create(preserve: bool) -> Result<Self, SandboxError> {
        let temp = tempfile::Builder::new()
            .prefix(SANDBOX_PREFIX)
            .tempdir()
            .map_err(|e| SandboxError::Io {
                path: std::env::temp_dir(),
                source: e,
            })?;

        let (root, temp) = if preserve {
            (temp.keep(), None)
        } else {
            (temp.path().to_path_buf(), Some(temp))
        };

        let sandbox = Self { root, temp };
        for dir in [
            sandbox.coursier_cache(),
            sandbox.sbt_global_base(),
            sandbox.sbt_boot(),
        ] {
            std::fs::create_dir_all(&dir).map_err(|e| SandboxError::Io {
                path: dir.clone(),
                source: e,
            })?;
        }
        Ok(sandbox)
    }

    /// The sandbox root, standing in for `$HOME`.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The sandboxed Coursier cache directory.
    pub fn coursier_cache(&self) -> PathBuf {
        self.root.join(".cache").join("coursier")
    }

    /// The sandboxed sbt global base directory.
    pub fn sbt_global_base(&self) -> PathBuf {
        self.root.join(".sbt")
    }

    /// The sandboxed sbt boot directory.
    pub fn sbt_boot(&self) -> PathBuf {
        self.root.join(".sbt").join("boot")
    }

    /// Where the legacy Ivy cache would appear if anything wrote to it.
    pub fn ivy_cache(&self) -> PathBuf {
        self.root.join(".ivy2").join("cache")
    }

    /// Whether this sandbox survives the run.
    pub fn is_preserved(&self) -> bool {
        self.temp.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_cache_subdirectories() {
        let sandbox = Sandbox::create(false).unwrap();
        assert!(sandbox.coursier_cache().is_dir());
        assert!(sandbox.sbt_global_base().is_dir());
        assert!(sandbox.sbt_boot().is_dir());
        // The Ivy location is derived, not created.
        assert!(!sandbox.ivy_cache().exists());
        assert!(!sandbox.is_preserved());
    }

    #[test]
    fn root_is_removed_on_drop() {
        let root = {
            let sandbox = Sandbox::create(false).unwrap();
            sandbox.root().to_path_buf()
        };
        assert!(!root.exists());
    }

    #[test]
    fn preserved_root_survives_drop() {
        let root = {
            let sandbox = Sandbox::create(true).unwrap();
            assert!(sandbox.is_preserved());
            sandbox.root().to_path_buf()
        };
        assert!(root.exists());
        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn root_name_carries_prefix() {
        let sandbox = Sandbox::create(false).unwrap();
        let name = sandbox.root().file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("sbtlock-"));
    }

    #[test]
    fn sandboxes_are_distinct() {
        let a = Sandbox::create(false).unwrap();
        let b = Sandbox::create(false).unwrap();
        assert_ne!(a.root(), b.root());
    }
}
