//! Configuration file loading and validation.

use std::path::Path;

use crate::error::ConfigError;
use crate::types::GenerationConfig;

/// Loads and validates a generation config from a JSON file.
pub fn load_config(config_path: &Path) -> Result<GenerationConfig, ConfigError> {
    let content = std::fs::read_to_string(config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a generation config from a JSON string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<GenerationConfig, ConfigError> {
    let config: GenerationConfig =
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates structural invariants serde can't express: required arrays must
/// be non-empty. Error messages carry the full field path.
fn validate_config(config: &GenerationConfig) -> Result<(), ConfigError> {
    if config.sbt_runs.is_empty() {
        return Err(ConfigError::MissingField("sbt_runs".to_string()));
    }
    for (i, run) in config.sbt_runs.iter().enumerate() {
        if run.args.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "sbt_runs[{i}].args must not be empty"
            )));
        }
    }
    for (i, cmd) in config.shell_commands.iter().enumerate() {
        if cmd.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "shell_commands[{i}] must not be empty"
            )));
        }
    }
    for (i, fetch) in config.fetch_artifacts.iter().enumerate() {
        if fetch.coord.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "fetch_artifacts[{i}].coord must not be empty"
            )));
        }
    }
    Ok(())
}
