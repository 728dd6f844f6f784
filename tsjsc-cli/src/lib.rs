//! # tsjsc-cli
//!
//! CLI library for generating JSON Schema artifacts from TypeScript
//! declarations.
//!
//! This crate drives the backends in [`tsjsc`] over a directory of `.ts`
//! files and writes one `<TypeName>JSC.ts` file per selected type.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Flag, config file and default layering
//! - [`scanner`] - Source file discovery
//! - [`filter`] - Type name selection
//! - [`writer`] - Artifact rendering and atomic writes
//! - [`pipeline`] - Run orchestration with per-type failure isolation
//! - [`watcher`] - File system watching for `--watch`
//! - [`logging`] - Verbosity levels and subscriber setup
//! - [`error`] - Error types and handling

pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod pipeline;
pub mod scanner;
pub mod watcher;
pub mod writer;

// Re-export main types for convenience
pub use config::{CliArgs, ConfigManager, ResolvedConfig};
pub use error::{CliError, CliResult};
pub use filter::SymbolFilter;
pub use logging::Verbosity;
pub use pipeline::{CheckReport, GenerationOutcome, RunOutcome, RunSummary};
pub use scanner::SourceScanner;
pub use watcher::FileWatcher;
pub use writer::SchemaWriter;
