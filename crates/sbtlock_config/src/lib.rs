//! Parsing and validation of sbtlock generation configuration files.
//!
//! This crate reads the JSON configuration document that drives a lockfile
//! generation run and produces a strongly-typed, validated
//! [`GenerationConfig`]. Validation happens entirely up front, before any
//! subprocess is spawned.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::{ArtifactFetch, GenerationConfig, SbtRun};
