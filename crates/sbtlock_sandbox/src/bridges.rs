//! Discovery of compiler-bridge artifacts in the populated cache.
//!
//! sbt compiles the Zinc compiler-bridge from sources at build time, but the
//! sources jar itself never lands in the Coursier cache. For offline replay
//! the bridge's main artifact, transitive dependencies, and companion
//! sources jar must be fetched explicitly; this module finds out which
//! bridge versions the sbt runs actually used.

use std::path::{Path, PathBuf};

use crate::error::SandboxError;

/// Directory prefix identifying a compiler-bridge artifact family.
const BRIDGE_PREFIX: &str = "compiler-bridge_";

/// A compiler-bridge (scala version, bridge version) pair found in the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerBridge {
    /// Scala binary version the bridge is built for (e.g. `2.13`).
    pub scala_version: String,
    /// Bridge artifact version (e.g. `1.9.6`).
    pub bridge_version: String,
}

impl CompilerBridge {
    /// The Maven coordinate for this bridge.
    pub fn coord(&self) -> String {
        format!(
            "org.scala-sbt:{BRIDGE_PREFIX}{}:{}",
            self.scala_version, self.bridge_version
        )
    }
}

/// Finds all compiler-bridge versions sbt pulled into the cache.
///
/// sbt stores them under
/// `<cache>/cache/https/repo1.maven.org/maven2/org/scala-sbt/compiler-bridge_<scala>/<version>/`.
/// An absent base directory simply means no bridges were used.
pub fn find_compiler_bridges(cache_dir: &Path) -> Result<Vec<CompilerBridge>, SandboxError> {
    let bridge_base: PathBuf = [
        "cache",
        "https",
        "repo1.maven.org",
        "maven2",
        "org",
        "scala-sbt",
    ]
    .iter()
    .fold(cache_dir.to_path_buf(), |p, seg| p.join(seg));

    if !bridge_base.exists() {
        return Ok(Vec::new());
    }

    let mut bridges = Vec::new();
    for entry in read_dir(&bridge_base)? {
        let dir = entry?.path();
        let Some(name) = dir.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(scala_version) = name.strip_prefix(BRIDGE_PREFIX) else {
            continue;
        };
        if !dir.is_dir() {
            continue;
        }
        for version_entry in read_dir(&dir)? {
            let version_dir = version_entry?.path();
            if !version_dir.is_dir() {
                continue;
            }
            if let Some(version) = version_dir.file_name().and_then(|n| n.to_str()) {
                bridges.push(CompilerBridge {
                    scala_version: scala_version.to_string(),
                    bridge_version: version.to_string(),
                });
            }
        }
    }
    Ok(bridges)
}

fn read_dir(
    dir: &Path,
) -> Result<impl Iterator<Item = Result<std::fs::DirEntry, SandboxError>> + '_, SandboxError> {
    let entries = std::fs::read_dir(dir).map_err(|e| SandboxError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;
    Ok(entries.map(move |entry| {
        entry.map_err(|e| SandboxError::Io {
            path: dir.to_path_buf(),
            source: e,
        })
    }))
}
