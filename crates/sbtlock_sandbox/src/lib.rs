//! Sandboxed cache population for lockfile generation.
//!
//! This crate implements phase 1 of generation: build a disposable home
//! directory, overlay the subprocess environment so every tool resolves its
//! caches inside it, and drive the configured sbt runs and auxiliary
//! Coursier fetches in order. Teardown is RAII-guaranteed; the sandbox can
//! be preserved on request for debugging.

#![warn(missing_docs)]

pub mod bridges;
pub mod env;
pub mod error;
pub mod orchestrator;
pub mod runner;
pub mod sandbox;
pub mod step;

pub use bridges::{find_compiler_bridges, CompilerBridge};
pub use env::EnvOverlay;
pub use error::SandboxError;
pub use orchestrator::Orchestrator;
pub use runner::{run_command, CommandOutput};
pub use sandbox::Sandbox;
pub use step::{FailurePolicy, ToolStep};
