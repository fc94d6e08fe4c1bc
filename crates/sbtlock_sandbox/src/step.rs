//! Typed pipeline steps with explicit failure policies.
//!
//! Every external invocation in a generation run is a [`ToolStep`] tagged
//! with what a non-zero exit means: abort the run, or log a warning and
//! continue. Making the policy data rather than control flow keeps the
//! retry/ignore decisions auditable in one place.

use std::path::Path;

use sbtlock_common::Progress;

use crate::env::EnvOverlay;
use crate::error::SandboxError;
use crate::runner::{render_command, run_command, CommandOutput};

/// What a non-zero exit status of a step means for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the entire run, surfacing the captured output.
    Fatal,
    /// Log a warning and continue; the step enriches the cache but does not
    /// gate manifest correctness.
    WarnAndContinue,
}

/// One external tool invocation in the generation pipeline.
#[derive(Debug, Clone)]
pub struct ToolStep {
    /// Human-readable label used in logs and errors.
    pub label: String,
    /// Program to invoke.
    pub program: String,
    /// Arguments, already expanded.
    pub args: Vec<String>,
    /// What a non-zero exit means.
    pub policy: FailurePolicy,
}

impl ToolStep {
    /// A step whose failure aborts the run.
    pub fn fatal(label: impl Into<String>, program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            label: label.into(),
            program: program.into(),
            args,
            policy: FailurePolicy::Fatal,
        }
    }

    /// A best-effort step whose failure is only warned about.
    pub fn best_effort(
        label: impl Into<String>,
        program: impl Into<String>,
        args: Vec<String>,
    ) -> Self {
        Self {
            label: label.into(),
            program: program.into(),
            args,
            policy: FailurePolicy::WarnAndContinue,
        }
    }

    /// The rendered command line.
    pub fn command(&self) -> String {
        render_command(&self.program, &self.args)
    }

    /// Runs the step and applies its failure policy.
    ///
    /// Returns the captured output even for a warned-and-ignored failure so
    /// callers can still inspect it. Spawn failures (program missing) are
    /// always errors regardless of policy: a missing tool is an environment
    /// problem, not a fetch hiccup.
    pub fn run(
        &self,
        env: &EnvOverlay,
        cwd: &Path,
        progress: &Progress,
    ) -> Result<CommandOutput, SandboxError> {
        let output = run_command(&self.program, &self.args, env, cwd)?;
        self.enforce(output, progress)
    }

    /// Applies this step's failure policy to an already-captured output.
    pub fn enforce(
        &self,
        output: CommandOutput,
        progress: &Progress,
    ) -> Result<CommandOutput, SandboxError> {
        if output.success {
            return Ok(output);
        }
        match self.policy {
            FailurePolicy::Fatal => Err(SandboxError::StepFailed {
                label: self.label.clone(),
                command: self.command(),
                stdout: output.stdout,
                stderr: output.stderr,
            }),
            FailurePolicy::WarnAndContinue => {
                progress.warn(&format!("{} failed: {}", self.label, output.stderr.trim()));
                Ok(output)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::Sandbox;
    use std::collections::BTreeMap;

    fn test_env(sandbox: &Sandbox) -> EnvOverlay {
        let mut base = BTreeMap::new();
        if let Ok(path) = std::env::var("PATH") {
            base.insert("PATH".to_string(), path);
        }
        EnvOverlay::build(base, sandbox)
    }

    #[cfg(unix)]
    #[test]
    fn fatal_step_errors_on_failure() {
        let sandbox = Sandbox::create(false).unwrap();
        let env = test_env(&sandbox);
        let step = ToolStep::fatal(
            "doomed step",
            "sh",
            vec!["-c".to_string(), "echo sad >&2; exit 1".to_string()],
        );
        let err = step.run(&env, sandbox.root(), &Progress::new(true)).unwrap_err();
        match err {
            SandboxError::StepFailed { label, stderr, .. } => {
                assert_eq!(label, "doomed step");
                assert!(stderr.contains("sad"));
            }
            other => panic!("expected StepFailed, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn best_effort_step_continues_on_failure() {
        let sandbox = Sandbox::create(false).unwrap();
        let env = test_env(&sandbox);
        let step = ToolStep::best_effort(
            "optional fetch",
            "sh",
            vec!["-c".to_string(), "exit 1".to_string()],
        );
        let output = step.run(&env, sandbox.root(), &Progress::new(true)).unwrap();
        assert!(!output.success);
    }

    #[cfg(unix)]
    #[test]
    fn successful_step_returns_output() {
        let sandbox = Sandbox::create(false).unwrap();
        let env = test_env(&sandbox);
        let step = ToolStep::fatal(
            "fine step",
            "sh",
            vec!["-c".to_string(), "echo done".to_string()],
        );
        let output = step.run(&env, sandbox.root(), &Progress::new(true)).unwrap();
        assert!(output.success);
        assert_eq!(output.stdout.trim(), "done");
    }

    #[test]
    fn missing_program_errors_even_for_best_effort() {
        let sandbox = Sandbox::create(false).unwrap();
        let env = test_env(&sandbox);
        let step = ToolStep::best_effort("fetch", "definitely-not-a-real-binary", vec![]);
        let err = step.run(&env, sandbox.root(), &Progress::new(true)).unwrap_err();
        assert!(matches!(err, SandboxError::Spawn { .. }));
    }
}
