//! Streaming SHA-256 hashing of downloaded artifacts.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::nix32;

/// Chunk size for streaming file reads. Artifacts can be tens of megabytes,
/// so they are hashed incrementally rather than read whole.
const READ_CHUNK_SIZE: usize = 65536;

/// Errors that can occur while hashing an artifact file.
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    /// An I/O error occurred while opening or reading the file.
    #[error("failed to hash {path}: {source}")]
    Io {
        /// The path being hashed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The path resolved to something other than a regular file.
    #[error("expected a regular file for hashing, got: {path}")]
    NotAFile {
        /// The offending path.
        path: PathBuf,
    },
}

/// Computes Nix base-32 SHA-256 hashes of artifact files.
pub struct ArtifactHasher;

impl ArtifactHasher {
    /// Hashes a regular file, returning the Nix base-32 encoding of its
    /// SHA-256 digest.
    ///
    /// The path is canonicalized first so that symlinked cache entries hash
    /// their targets. Anything other than a regular file is rejected.
    pub fn hash_file(path: &Path) -> Result<String, HashError> {
        let resolved = path.canonicalize().map_err(|e| HashError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        if !resolved.is_file() {
            return Err(HashError::NotAFile { path: resolved });
        }

        let mut file = File::open(&resolved).map_err(|e| HashError::Io {
            path: resolved.clone(),
            source: e,
        })?;
        let mut hasher = Sha256::new();
        let mut chunk = vec![0u8; READ_CHUNK_SIZE];
        loop {
            let read = file.read(&mut chunk).map_err(|e| HashError::Io {
                path: resolved.clone(),
                source: e,
            })?;
            if read == 0 {
                break;
            }
            hasher.update(&chunk[..read]);
        }

        let digest = hasher.finalize();
        Ok(nix32::encode(digest.as_slice()))
    }
}
