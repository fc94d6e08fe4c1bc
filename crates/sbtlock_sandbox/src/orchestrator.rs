//! Sequencing of the cache-population phase.
//!
//! Runs the configured pre-build shell commands, the sbt invocations, and
//! the auxiliary Coursier fetches strictly in order inside the sandbox.
//! Later steps depend on cache state left by earlier ones, so nothing here
//! is concurrent; every subprocess completes (or aborts the run) before the
//! next starts.

use std::path::Path;

use sbtlock_common::Progress;
use sbtlock_config::{ArtifactFetch, GenerationConfig};

use crate::bridges::{find_compiler_bridges, CompilerBridge};
use crate::env::EnvOverlay;
use crate::error::SandboxError;
use crate::runner::run_command;
use crate::sandbox::Sandbox;
use crate::step::ToolStep;

/// Marker the sbt launcher prints on stderr; these lines are worth
/// forwarding even when the run succeeds, to diagnose bootstrap issues.
const LAUNCHER_MARKER: &str = "[launcher]";

/// Drives the populate phase of a generation run.
pub struct Orchestrator {
    /// The sbt executable to invoke. Overridable for tests.
    pub sbt_program: String,
    /// The Coursier CLI executable to invoke. Overridable for tests.
    pub cs_program: String,
    progress: Progress,
}

impl Orchestrator {
    /// Creates an orchestrator using the standard `sbt` and `cs` binaries.
    pub fn new(progress: Progress) -> Self {
        Self {
            sbt_program: "sbt".to_string(),
            cs_program: "cs".to_string(),
            progress,
        }
    }

    /// Populates the sandbox caches by running every configured step.
    ///
    /// Ordering is causal and fixed: clean stale build output, pre-build
    /// shell commands, sbt runs, compiler-bridge enrichment, explicit
    /// artifact fetches. Shell and sbt failures abort; fetch failures warn.
    pub fn populate(
        &self,
        project_dir: &Path,
        config: &GenerationConfig,
        sandbox: &Sandbox,
    ) -> Result<(), SandboxError> {
        let env = EnvOverlay::for_sandbox(sandbox);

        self.progress.info("=== Phase 1: Populating caches ===");
        self.progress
            .info(&format!("Home: {}", sandbox.root().display()));

        self.clean_target_dirs(project_dir)?;
        self.run_shell_commands(project_dir, config, &env)?;
        self.run_sbt(project_dir, config, &env)?;

        let bridges = find_compiler_bridges(&sandbox.coursier_cache())?;
        self.fetch_bridge_sources(project_dir, &bridges, &env)?;
        self.fetch_configured_artifacts(project_dir, &config.fetch_artifacts, &env)?;
        Ok(())
    }

    /// Removes stale build output so incremental state can't mask missing
    /// downloads. Covers the project and its nested build definition.
    fn clean_target_dirs(&self, project_dir: &Path) -> Result<(), SandboxError> {
        self.progress.info("Cleaning target directory...");
        for target in [
            project_dir.join("target"),
            project_dir.join("project").join("target"),
        ] {
            if target.exists() {
                std::fs::remove_dir_all(&target).map_err(|e| SandboxError::Io {
                    path: target.clone(),
                    source: e,
                })?;
            }
        }
        Ok(())
    }

    fn run_shell_commands(
        &self,
        project_dir: &Path,
        config: &GenerationConfig,
        env: &EnvOverlay,
    ) -> Result<(), SandboxError> {
        let total = config.shell_commands.len();
        for (i, cmd) in config.shell_commands.iter().enumerate() {
            let expanded: Vec<String> = cmd.iter().map(|arg| env.expand(arg)).collect();
            // Config validation rejects empty command lines up front.
            let Some((program, args)) = expanded.split_first() else {
                continue;
            };
            let step = ToolStep::fatal(
                format!("shell command ({}/{total})", i + 1),
                program.clone(),
                args.to_vec(),
            );
            self.progress
                .info(&format!("Running {}: {}", step.label, step.command()));
            step.run(env, project_dir, &self.progress)?;
        }
        Ok(())
    }

    fn run_sbt(
        &self,
        project_dir: &Path,
        config: &GenerationConfig,
        env: &EnvOverlay,
    ) -> Result<(), SandboxError> {
        let total = config.sbt_runs.len();
        for (i, run) in config.sbt_runs.iter().enumerate() {
            let mut args = vec!["--batch".to_string()];
            args.extend(run.args.iter().cloned());
            let step = ToolStep::fatal(
                format!("sbt run ({}/{total})", i + 1),
                self.sbt_program.clone(),
                args,
            );
            self.progress
                .info(&format!("Running {}: {}", step.label, step.command()));

            // Launcher lines are forwarded before the policy check so they
            // surface on success and failure alike.
            let output = run_command(&step.program, &step.args, env, project_dir)?;
            for line in output.stderr.lines() {
                if line.contains(LAUNCHER_MARKER) {
                    self.progress.info(&format!("[info] {}", line.trim()));
                }
            }
            step.enforce(output, &self.progress)?;
        }
        Ok(())
    }

    /// Fetches each discovered bridge's main artifact (for transitive
    /// dependencies) and then its sources jar. Both are best-effort: the
    /// sources enrich offline builds but don't gate manifest correctness.
    fn fetch_bridge_sources(
        &self,
        project_dir: &Path,
        bridges: &[CompilerBridge],
        env: &EnvOverlay,
    ) -> Result<(), SandboxError> {
        if bridges.is_empty() {
            return Ok(());
        }
        self.progress.info("=== Fetching compiler-bridge sources ===");

        for bridge in bridges {
            let coord = bridge.coord();
            self.progress
                .info(&format!("  Fetching sources and deps for {coord}"));

            ToolStep::best_effort(
                format!("fetch deps for {coord}"),
                self.cs_program.clone(),
                vec!["fetch".to_string(), coord.clone()],
            )
            .run(env, project_dir, &self.progress)?;

            let sources = ToolStep::best_effort(
                format!("fetch sources for {coord}"),
                self.cs_program.clone(),
                vec!["fetch".to_string(), "--sources".to_string(), coord.clone()],
            )
            .run(env, project_dir, &self.progress)?;
            if sources.success {
                for line in sources.stdout.lines() {
                    if !line.is_empty() && line.contains("sources") {
                        self.progress.info(&format!("    {line}"));
                    }
                }
            }
        }
        Ok(())
    }

    /// Fetches explicitly configured coordinates, then each requested
    /// classifier individually. All best-effort.
    fn fetch_configured_artifacts(
        &self,
        project_dir: &Path,
        fetches: &[ArtifactFetch],
        env: &EnvOverlay,
    ) -> Result<(), SandboxError> {
        if fetches.is_empty() {
            return Ok(());
        }
        self.progress.info("=== Fetching configured artifacts ===");

        for artifact in fetches {
            self.progress.info(&format!("  Fetching {}", artifact.coord));
            ToolStep::best_effort(
                format!("fetch {}", artifact.coord),
                self.cs_program.clone(),
                vec!["fetch".to_string(), artifact.coord.clone()],
            )
            .run(env, project_dir, &self.progress)?;

            for classifier in &artifact.classifiers {
                self.progress
                    .info(&format!("    Fetching classifier: {classifier}"));
                let fetched = ToolStep::best_effort(
                    format!("fetch {classifier} for {}", artifact.coord),
                    self.cs_program.clone(),
                    vec![
                        "fetch".to_string(),
                        format!("--classifier={classifier}"),
                        artifact.coord.clone(),
                    ],
                )
                .run(env, project_dir, &self.progress)?;
                if fetched.success {
                    for line in fetched.stdout.lines() {
                        if !line.is_empty() {
                            self.progress.info(&format!("      {line}"));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
