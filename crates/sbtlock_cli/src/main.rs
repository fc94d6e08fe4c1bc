//! sbtlock CLI — generates deterministic dependency lockfiles for sbt
//! projects.
//!
//! Runs the configured sbt invocations inside a disposable sandbox so every
//! dependency download lands in one inspectable cache, then converts that
//! cache into a sorted, hash-verified `deps.lock.json`.

#![warn(missing_docs)]

mod generate;

use std::path::PathBuf;
use std::process;

use clap::Parser;

/// Default lockfile filename when `--output` is not given.
const DEFAULT_LOCKFILE_NAME: &str = "deps.lock.json";

/// Generate a lockfile for an sbt project.
#[derive(Parser, Debug)]
#[command(name = "sbtlock", version, about = "Generate lockfiles for sbt projects")]
pub struct Cli {
    /// Path to the JSON config file with the sbt_runs definition.
    pub config: PathBuf,

    /// Output lockfile path.
    #[arg(short, long, default_value = DEFAULT_LOCKFILE_NAME)]
    pub output: PathBuf,

    /// Print to stdout only, do not write to file.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Keep the sandbox directory for debugging.
    #[arg(long)]
    pub keep_temp: bool,

    /// Suppress informational output on stderr.
    #[arg(short, long)]
    pub quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = generate::run(&cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_minimal() {
        let cli = Cli::parse_from(["sbtlock", "lockfile-config.json"]);
        assert_eq!(cli.config, PathBuf::from("lockfile-config.json"));
        assert_eq!(cli.output, PathBuf::from("deps.lock.json"));
        assert!(!cli.dry_run);
        assert!(!cli.keep_temp);
        assert!(!cli.quiet);
    }

    #[test]
    fn parse_output_short_flag() {
        let cli = Cli::parse_from(["sbtlock", "cfg.json", "-o", "out/deps.lock.json"]);
        assert_eq!(cli.output, PathBuf::from("out/deps.lock.json"));
    }

    #[test]
    fn parse_dry_run() {
        let cli = Cli::parse_from(["sbtlock", "cfg.json", "--dry-run"]);
        assert!(cli.dry_run);
        let cli = Cli::parse_from(["sbtlock", "cfg.json", "-n"]);
        assert!(cli.dry_run);
    }

    #[test]
    fn parse_keep_temp() {
        let cli = Cli::parse_from(["sbtlock", "cfg.json", "--keep-temp"]);
        assert!(cli.keep_temp);
    }

    #[test]
    fn parse_quiet() {
        let cli = Cli::parse_from(["sbtlock", "cfg.json", "--quiet"]);
        assert!(cli.quiet);
    }

    #[test]
    fn config_argument_is_required() {
        assert!(Cli::try_parse_from(["sbtlock"]).is_err());
    }
}
