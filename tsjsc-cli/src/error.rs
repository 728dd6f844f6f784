//! Error types for the CLI.
//!
//! Everything wrapped by [`CliError`] is fatal to a run. Per-type failures
//! ([`tsjsc::GeneratorError`] and [`WriteError`]) are recorded as outcomes by
//! the pipeline instead.

use std::path::PathBuf;
use thiserror::Error;

use tsjsc::BackendError;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Main error type for CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Error resolving the run configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Malformed type-name or file-name pattern.
    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),

    /// Error listing the input directory.
    #[error("Failed to scan directory: {0}")]
    Scan(#[from] ScanError),

    /// The schema backend could not be built.
    #[error("Failed to build schema backend: {0}")]
    Backend(#[from] BackendError),

    /// Error during file watching.
    #[error("Watch error: {0}")]
    Watch(#[from] WatchError),

    /// `init` would overwrite an existing file.
    #[error("Configuration file already exists: {path} (use --force to overwrite)")]
    ConfigExists { path: PathBuf },

    /// Artifacts on disk do not match the sources.
    #[error("Schemas are out of date: {0}")]
    OutOfDate(String),

    /// Generic IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error resolving the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required option is missing from every layer.
    #[error("Missing required option '{key}'")]
    MissingOption { key: &'static str },

    /// An explicitly named path does not exist.
    #[error("{what} not found: {path}")]
    NotFound { what: &'static str, path: PathBuf },

    /// The input path exists but is not a directory.
    #[error("Input path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// The declaration-scan backend needs a tsconfig.
    #[error("The declaration-scan backend requires a tsconfig path (--tsconfig)")]
    MissingTsconfig,

    /// Invalid TOML syntax or value.
    #[error("Invalid TOML in {path}: {message}")]
    InvalidToml { path: PathBuf, message: String },

    /// IO error reading config or the working directory.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Malformed regular expression.
#[derive(Debug, Error)]
#[error("Invalid {role} pattern '{pattern}': {message}")]
pub struct PatternError {
    /// Which option the pattern came from.
    pub role: &'static str,
    pub pattern: String,
    pub message: String,
}

/// Error listing source files.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Directory does not exist.
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Error from the directory walker.
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// IO error during scanning.
    #[error("IO error scanning {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error writing one schema artifact.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The schema could not be rendered as text.
    #[error("Failed to serialize schema for '{type_name}': {source}")]
    Serialization {
        type_name: String,
        #[source]
        source: serde_json::Error,
    },

    /// The artifact could not be written to disk.
    #[error("Failed to write {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error during file watching.
#[derive(Debug, Error)]
pub enum WatchError {
    /// Failed to initialize watcher.
    #[error("Failed to initialize file watcher: {0}")]
    Init(String),

    /// Error from notify crate.
    #[error("Watch notification error: {0}")]
    Notify(String),
}

impl ConfigError {
    /// Create a not found error.
    pub fn not_found(what: &'static str, path: impl Into<PathBuf>) -> Self {
        Self::NotFound {
            what,
            path: path.into(),
        }
    }

    /// Create an invalid TOML error.
    pub fn invalid_toml(path: PathBuf, message: impl Into<String>) -> Self {
        Self::InvalidToml {
            path,
            message: message.into(),
        }
    }
}

impl PatternError {
    /// Create a pattern error for the given option.
    pub fn new(role: &'static str, pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            role,
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}

impl ScanError {
    /// Create a directory not found error.
    pub fn not_found(path: PathBuf) -> Self {
        Self::DirectoryNotFound { path }
    }
}

impl WriteError {
    /// Create a persistence error.
    pub fn persistence(path: PathBuf, source: std::io::Error) -> Self {
        Self::Persistence { path, source }
    }
}
