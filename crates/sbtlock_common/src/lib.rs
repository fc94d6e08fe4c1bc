//! Shared leaf utilities for the sbtlock toolchain.
//!
//! Provides the Nix-compatible base-32 digest encoding, streaming SHA-256
//! artifact hashing, and the stderr progress reporter used by every phase of
//! lockfile generation.

#![warn(missing_docs)]

pub mod hash;
pub mod nix32;
pub mod progress;

pub use hash::{ArtifactHasher, HashError};
pub use progress::Progress;
