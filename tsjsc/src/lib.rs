//! # tsjsc
//!
//! JSON Schema generation from TypeScript type declarations.
//!
//! This crate contains the pieces of `tsjsc` that know about TypeScript: a
//! front end for the declaration subset of the language, a whole-program
//! symbol index, and two schema backends behind a common trait. The
//! `tsjsc-cli` crate drives them over a directory and writes the artifacts.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tsjsc::{GeneratorBackend, SymbolTableBackend};
//!
//! let backend = SymbolTableBackend::new(&["models/Book.ts"])?;
//! for name in backend.enumerate() {
//!     let schema = backend.generate(&name)?;
//!     println!("{}", serde_json::to_string_pretty(&schema)?);
//! }
//! ```
//!
//! ## Backends
//!
//! | Backend | Built from | Root | `additionalProperties` | `null` in unions |
//! |---------|------------|------|------------------------|------------------|
//! | `symbol-table` | list of files | inlined | only when annotated | kept |
//! | `declaration-scan` | glob + tsconfig | `$ref` into `definitions` | `true` by default | per `strictNullChecks` |
//!
//! The two backends are not interchangeable; each [`SchemaDocument`] is
//! tagged with the [`BackendKind`] that produced it.
//!
//! ## Supported Declarations
//!
//! - `interface` (with `extends` and declaration merging)
//! - `type` aliases
//! - `enum` and `const enum`
//! - `class` property declarations
//!
//! Functions, variables, namespaces and imports are skipped.
//!
//! ## Annotations
//!
//! JSDoc text becomes `description`. These tags are copied onto the schema:
//!
//! | Tags | Value |
//! |------|-------|
//! | `@minimum` `@maximum` `@exclusiveMinimum` `@exclusiveMaximum` `@multipleOf` | number |
//! | `@minLength` `@maxLength` `@minItems` `@maxItems` `@minProperties` `@maxProperties` | number |
//! | `@pattern` `@format` `@title` | string |
//! | `@default` `@examples` `@const` | JSON, or a string if not valid JSON |
//! | `@additionalProperties` `@uniqueItems` | boolean |

pub mod error;
pub mod generator;
pub mod parser;
pub mod program;

pub use error::{BackendError, GenerateCause, GeneratorError, SyntaxError};
pub use generator::{
    BackendKind, CompilerOptions, DeclarationScanBackend, Dialect, GeneratorBackend,
    SchemaBuilder, SchemaDocument, ScanConfig, SymbolTableBackend, SymbolTableSettings, DRAFT_07,
};
pub use program::Program;
