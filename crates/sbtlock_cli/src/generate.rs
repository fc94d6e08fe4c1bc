//! The end-to-end generate flow: sandbox, populate, build, emit.

use std::path::{Path, PathBuf};

use sbtlock_common::Progress;
use sbtlock_config::{load_config, ConfigError};
use sbtlock_manifest::{build_lockfile, BuildOptions, Lockfile, ManifestError};
use sbtlock_sandbox::{Orchestrator, Sandbox, SandboxError};

use crate::Cli;

/// Errors surfaced by the generate flow.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// Configuration loading or validation failed; nothing was executed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Sandbox construction or a fatal pipeline step failed.
    #[error(transparent)]
    Sandbox(#[from] SandboxError),

    /// Cache scanning or lockfile assembly failed.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// The current working directory could not be determined.
    #[error("failed to determine working directory: {0}")]
    CurrentDir(std::io::Error),

    /// The lockfile could not be written to disk.
    #[error("failed to write lockfile to {path}: {source}")]
    WriteFailed {
        /// The output path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Runs a full generation: config → sandbox → populate → manifest → output.
pub fn run(cli: &Cli) -> Result<(), GenerateError> {
    let progress = Progress::new(cli.quiet);
    let orchestrator = Orchestrator::new(progress);
    let project_dir = std::env::current_dir().map_err(GenerateError::CurrentDir)?;
    run_with(cli, &orchestrator, &project_dir, &progress)
}

/// Same as [`run`], with the orchestrator and project directory injected so
/// tests can substitute fake tools.
fn run_with(
    cli: &Cli,
    orchestrator: &Orchestrator,
    project_dir: &Path,
    progress: &Progress,
) -> Result<(), GenerateError> {
    // Validate before anything is spawned.
    let config = load_config(&cli.config)?;

    let sandbox = Sandbox::create(cli.keep_temp)?;
    if sandbox.is_preserved() {
        progress.info(&format!(
            "=== Debug mode: sandbox will be kept at {} ===",
            sandbox.root().display()
        ));
    }

    // The sandbox must be torn down (or its preserved location reported) on
    // every exit path, so the fallible phases run before the match below.
    let outcome = generate_in_sandbox(orchestrator, project_dir, &config, &sandbox, progress);

    if sandbox.is_preserved() {
        progress.info(&format!(
            "=== Sandbox preserved at: {} ===",
            sandbox.root().display()
        ));
    }
    drop(sandbox);

    let lockfile = outcome?;
    let json = lockfile.to_json()?;

    if !cli.dry_run {
        std::fs::write(&cli.output, &json).map_err(|e| GenerateError::WriteFailed {
            path: cli.output.clone(),
            source: e,
        })?;
        progress.info(&format!("Wrote lockfile to {}", cli.output.display()));
    }

    // stdout carries only the manifest; all narration went to stderr.
    print!("{json}");
    Ok(())
}

fn generate_in_sandbox(
    orchestrator: &Orchestrator,
    project_dir: &Path,
    config: &sbtlock_config::GenerationConfig,
    sandbox: &Sandbox,
    progress: &Progress,
) -> Result<Lockfile, GenerateError> {
    orchestrator.populate(project_dir, config, sandbox)?;

    progress.info("=== Phase 2: Generating lockfile ===");
    let lockfile = build_lockfile(
        &sandbox.coursier_cache(),
        &sandbox.ivy_cache(),
        &BuildOptions::default(),
        progress,
    )?;
    Ok(lockfile)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn fake_tool(dir: &Path, name: &str, script: &str) -> String {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path.display().to_string()
    }

    fn write_config(dir: &Path, json: &str) -> PathBuf {
        let path = dir.join("lockfile-config.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    fn cli_for(config: PathBuf, output: PathBuf, dry_run: bool) -> Cli {
        Cli {
            config,
            output,
            dry_run,
            keep_temp: false,
            quiet: true,
        }
    }

    fn quiet_orchestrator(sbt: String) -> Orchestrator {
        let mut orch = Orchestrator::new(Progress::new(true));
        orch.sbt_program = sbt;
        orch
    }

    /// A fake sbt that "downloads" three artifacts at distinct URLs.
    const THREE_ARTIFACT_SBT: &str = r#"
base="$COURSIER_CACHE/cache/https/repo1.maven.org/maven2"
mkdir -p "$base/org/c" "$base/org/a" "$base/org/b"
echo ccc > "$base/org/c/c-1.0.jar"
echo aaa > "$base/org/a/a-1.0.jar"
echo bbb > "$base/org/b/b-1.0.pom""#;

    #[test]
    fn end_to_end_writes_sorted_lockfile() {
        let project = tempfile::tempdir().unwrap();
        let sbt = fake_tool(project.path(), "fake-sbt", THREE_ARTIFACT_SBT);
        let config = write_config(project.path(), r#"{"sbt_runs": [{"args": ["compile"]}]}"#);
        let output = project.path().join("deps.lock.json");

        let cli = cli_for(config, output.clone(), false);
        run_with(
            &cli,
            &quiet_orchestrator(sbt),
            project.path(),
            &Progress::new(true),
        )
        .unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.ends_with('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["version"], 1);
        let artifacts = parsed["artifacts"].as_array().unwrap();
        assert_eq!(artifacts.len(), 3);
        let urls: Vec<&str> = artifacts
            .iter()
            .map(|a| a["url"].as_str().unwrap())
            .collect();
        assert_eq!(
            urls,
            vec![
                "https://repo1.maven.org/maven2/org/a/a-1.0.jar",
                "https://repo1.maven.org/maven2/org/b/b-1.0.pom",
                "https://repo1.maven.org/maven2/org/c/c-1.0.jar",
            ]
        );
        for a in artifacts {
            assert_eq!(a["sha256"].as_str().unwrap().len(), 52);
        }
    }

    #[test]
    fn dry_run_skips_file_write() {
        let project = tempfile::tempdir().unwrap();
        let sbt = fake_tool(project.path(), "fake-sbt", THREE_ARTIFACT_SBT);
        let config = write_config(project.path(), r#"{"sbt_runs": [{"args": ["compile"]}]}"#);
        let output = project.path().join("deps.lock.json");

        let cli = cli_for(config, output.clone(), true);
        run_with(
            &cli,
            &quiet_orchestrator(sbt),
            project.path(),
            &Progress::new(true),
        )
        .unwrap();
        assert!(!output.exists());
    }

    #[test]
    fn fatal_sbt_failure_writes_no_lockfile() {
        let project = tempfile::tempdir().unwrap();
        let sbt = fake_tool(project.path(), "fake-sbt", "exit 1");
        let config = write_config(project.path(), r#"{"sbt_runs": [{"args": ["compile"]}]}"#);
        let output = project.path().join("deps.lock.json");

        let cli = cli_for(config, output.clone(), false);
        let err = run_with(
            &cli,
            &quiet_orchestrator(sbt),
            project.path(),
            &Progress::new(true),
        )
        .unwrap_err();
        assert!(matches!(err, GenerateError::Sandbox(_)));
        assert!(!output.exists());
    }

    #[test]
    fn zero_artifacts_is_invariant_violation() {
        let project = tempfile::tempdir().unwrap();
        // sbt succeeds but downloads nothing.
        let sbt = fake_tool(project.path(), "fake-sbt", "true");
        let config = write_config(project.path(), r#"{"sbt_runs": [{"args": ["compile"]}]}"#);
        let output = project.path().join("deps.lock.json");

        let cli = cli_for(config, output.clone(), false);
        let err = run_with(
            &cli,
            &quiet_orchestrator(sbt),
            project.path(),
            &Progress::new(true),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            GenerateError::Manifest(ManifestError::NoArtifacts)
        ));
        assert!(!output.exists());
    }

    #[test]
    fn invalid_config_aborts_before_spawning() {
        let project = tempfile::tempdir().unwrap();
        // The fake sbt would create a marker if it ever ran.
        let sbt = fake_tool(project.path(), "fake-sbt", "touch \"$HOME/ran\"");
        let config = write_config(project.path(), r#"{"sbt_runs": []}"#);
        let output = project.path().join("deps.lock.json");

        let cli = cli_for(config, output, false);
        let err = run_with(
            &cli,
            &quiet_orchestrator(sbt),
            project.path(),
            &Progress::new(true),
        )
        .unwrap_err();
        assert!(matches!(err, GenerateError::Config(_)));
    }
}
