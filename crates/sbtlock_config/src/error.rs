//! Error types for configuration loading and validation.

/// Errors that can occur when loading or validating a generation config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The JSON content could not be parsed into the expected shape.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A required field is missing or empty. The message carries the full
    /// field path (e.g. `sbt_runs[2].args`).
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A configuration value failed validation. The message carries the full
    /// field path of the offending value.
    #[error("validation error: {0}")]
    ValidationError(String),
}
