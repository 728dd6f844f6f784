//! Error types for the declaration front end and the schema backends.
//!
//! Construction failures ([`BackendError`]) are fatal to a run, while
//! [`GeneratorError`] is scoped to the single type being generated.

use std::path::PathBuf;
use thiserror::Error;

/// Syntax error in TypeScript source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {line}:{column}")]
pub struct SyntaxError {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// What went wrong.
    pub message: String,
}

impl SyntaxError {
    /// Create a syntax error at the given position.
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

/// Error building a backend (program index, tsconfig, source glob).
#[derive(Debug, Error)]
pub enum BackendError {
    /// A source file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source file is not valid TypeScript.
    #[error("Syntax error in {path}: {source}")]
    Syntax {
        path: PathBuf,
        #[source]
        source: SyntaxError,
    },

    /// The tsconfig file is missing or malformed.
    #[error("Invalid tsconfig {path}: {message}")]
    Tsconfig { path: PathBuf, message: String },

    /// The source glob could not be evaluated.
    #[error("Invalid source glob '{pattern}': {message}")]
    Glob { pattern: String, message: String },

    /// Declarations reference types that do not exist.
    #[error("Unresolved type reference(s): {}", .names.join(", "))]
    TypeCheck { names: Vec<String> },
}

/// Failure to produce a schema for one named type.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Failed to generate schema for '{type_name}': {cause}")]
pub struct GeneratorError {
    /// The type that was requested.
    pub type_name: String,
    /// Underlying cause.
    #[source]
    pub cause: GenerateCause,
}

impl GeneratorError {
    /// Attach the requested type name to a cause.
    pub fn new(type_name: impl Into<String>, cause: GenerateCause) -> Self {
        Self {
            type_name: type_name.into(),
            cause,
        }
    }
}

/// Why a schema could not be generated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateCause {
    /// No declaration with this name exists.
    #[error("no type named '{0}'")]
    UnknownSymbol(String),

    /// The declaration exists but is not a root for this backend.
    #[error("'{0}' is not exported from the scanned declarations")]
    NotExported(String),

    /// A reference inside the type could not be resolved.
    #[error("reference to unknown type '{0}'")]
    UnknownReference(String),

    /// The type uses a construct with no JSON Schema mapping.
    #[error("unsupported type construct: {0}")]
    Unsupported(String),

    /// A generic type was given too many type arguments.
    #[error("type '{name}' expects at most {expected} type argument(s), found {found}")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },

    /// Generic expansion or inheritance does not terminate.
    #[error("expansion of '{0}' is too deeply nested")]
    RecursiveExpansion(String),
}

/// Result alias for schema generation internals.
pub type GenerateResult<T> = Result<T, GenerateCause>;
