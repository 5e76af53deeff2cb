//! Error types for the CLI.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Main error type for CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Error during source file discovery.
    #[error("Failed to scan sources: {0}")]
    Scan(#[from] ScanError),

    /// Error from the static analysis pipeline.
    #[error("Analysis failed: {0}")]
    Analyze(#[from] modkit_analyzer::AnalyzeError),

    /// Error during conversion or engine installation.
    #[error("Registration failed: {0}")]
    Registration(#[from] modkit::RegistrationError),

    /// Error loading configuration.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    /// Error writing output files.
    #[error("Failed to write output: {0}")]
    Write(#[from] WriteError),

    /// Metadata serialization failure.
    #[error("Failed to serialize metadata: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Validation failed (stale metadata, existing config, and the like).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Generic IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error during source file discovery.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Source directory does not exist.
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// No Rust files found under the configured paths.
    #[error("No Rust source files found in: {path}")]
    NoSourceFiles { path: PathBuf },

    /// Invalid include or exclude pattern.
    #[error("Invalid glob pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// IO error reading a discovered file.
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the directory walker.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),
}

impl ScanError {
    pub fn not_found(path: PathBuf) -> Self {
        Self::DirectoryNotFound { path }
    }

    pub fn no_source_files(path: PathBuf) -> Self {
        Self::NoSourceFiles { path }
    }

    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}

/// Error loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid TOML syntax.
    #[error("Invalid TOML in {path}: {message}")]
    InvalidToml { path: PathBuf, message: String },

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// IO error reading config.
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub fn invalid_toml(path: PathBuf, message: impl Into<String>) -> Self {
        Self::InvalidToml {
            path,
            message: message.into(),
        }
    }

    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Error writing output files.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to create a directory.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file.
    #[error("Failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_error_messages() {
        let err = ScanError::not_found(PathBuf::from("/missing"));
        assert!(err.to_string().contains("/missing"));

        let err = ScanError::invalid_pattern("[bad", "unclosed bracket");
        assert!(err.to_string().contains("[bad"));
        assert!(err.to_string().contains("unclosed bracket"));
    }

    #[test]
    fn test_analyze_error_converts_into_cli_error() {
        let err: CliError = modkit_analyzer::AnalyzeError::from(
            modkit_analyzer::ValidationError::DuplicateConstructor {
                type_name: "Backup".into(),
            },
        )
        .into();
        assert!(err.to_string().contains("Backup"));
    }
}
