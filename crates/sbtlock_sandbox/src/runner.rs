//! Synchronous subprocess execution with captured output.

use std::path::Path;
use std::process::Command;

use crate::env::EnvOverlay;
use crate::error::SandboxError;

/// Captured result of one subprocess invocation.
///
/// Both streams are captured separately rather than inherited, so diagnostic
/// output can be attributed to its step and surfaced only on failure (or for
/// specifically recognized lines).
#[derive(Debug)]
pub struct CommandOutput {
    /// Whether the process exited with status zero.
    pub success: bool,
    /// The exit code, if the process exited normally.
    pub code: Option<i32>,
    /// Captured standard output (lossily decoded).
    pub stdout: String,
    /// Captured standard error (lossily decoded).
    pub stderr: String,
}

/// Runs a command to completion inside the sandbox environment.
///
/// The child gets exactly the overlay environment (the parent environment is
/// cleared first, so nothing the overlay doesn't carry leaks through) and
/// runs in `cwd`. Blocks until exit; there is no timeout, matching the
/// batch nature of the workload.
pub fn run_command(
    program: &str,
    args: &[String],
    env: &EnvOverlay,
    cwd: &Path,
) -> Result<CommandOutput, SandboxError> {
    let output = Command::new(program)
        .args(args)
        .env_clear()
        .envs(env.vars())
        .current_dir(cwd)
        .output()
        .map_err(|e| SandboxError::Spawn {
            program: program.to_string(),
            source: e,
        })?;

    Ok(CommandOutput {
        success: output.status.success(),
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Renders a command line for labels and error messages.
pub fn render_command(program: &str, args: &[String]) -> String {
    let mut rendered = program.to_string();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(arg);
    }
    rendered
}
