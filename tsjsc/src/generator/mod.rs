//! JSON Schema generation.
//!
//! Two interchangeable backends implement [`GeneratorBackend`]:
//!
//! - [`SymbolTableBackend`] indexes a set of files and emits the requested
//!   type inline at the document root.
//! - [`DeclarationScanBackend`] scans a glob of declaration files with
//!   compiler options from a tsconfig and emits a top-level `$ref` into
//!   `definitions`, with object schemas permissive by default.
//!
//! Both share the translator in [`schema`]; they differ only in their index
//! and in the [`Dialect`] they hand to it.

pub(crate) mod annotations;
pub mod declaration_scan;
pub mod schema;
pub mod symbol_table;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::GeneratorError;

pub use declaration_scan::{CompilerOptions, DeclarationScanBackend, ScanConfig};
pub use schema::{Dialect, SchemaBuilder};
pub use symbol_table::{SymbolTableBackend, SymbolTableSettings};

/// `$schema` URI stamped on every document.
pub const DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

/// Which backend produced (or should produce) a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    #[default]
    SymbolTable,
    DeclarationScan,
}

impl BackendKind {
    /// Name used on the command line and in config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SymbolTable => "symbol-table",
            Self::DeclarationScan => "declaration-scan",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "symbol-table" => Ok(Self::SymbolTable),
            "declaration-scan" => Ok(Self::DeclarationScan),
            other => Err(format!(
                "unknown backend '{}' (expected 'symbol-table' or 'declaration-scan')",
                other
            )),
        }
    }
}

/// A generated schema, tagged with the backend dialect that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    backend: BackendKind,
    value: Value,
}

impl SchemaDocument {
    pub fn new(backend: BackendKind, value: Value) -> Self {
        Self { backend, value }
    }

    /// Backend that produced the document.
    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    /// The JSON Schema itself.
    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Serializes as the bare schema; the backend tag is not part of the output.
impl Serialize for SchemaDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

/// Schema engine behind one enumerate/generate contract.
pub trait GeneratorBackend {
    /// Dialect tag for emitted documents.
    fn kind(&self) -> BackendKind;

    /// Every type name the backend can be asked for, in a stable order.
    fn enumerate(&self) -> Vec<String>;

    /// Generate the schema for exactly one named type.
    fn generate(&self, name: &str) -> Result<SchemaDocument, GeneratorError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_backend_kind_round_trips_through_str() {
        for kind in [BackendKind::SymbolTable, BackendKind::DeclarationScan] {
            assert_eq!(kind.as_str().parse::<BackendKind>(), Ok(kind));
        }
        assert!("typescript-json-schema".parse::<BackendKind>().is_err());
    }

    #[test]
    fn test_backend_kind_serde_names() {
        let kind: BackendKind = serde_json::from_str("\"declaration-scan\"").unwrap();
        assert_eq!(kind, BackendKind::DeclarationScan);
        assert_eq!(BackendKind::default(), BackendKind::SymbolTable);
    }

    #[test]
    fn test_schema_document_serializes_bare_value() {
        let doc = SchemaDocument::new(BackendKind::SymbolTable, json!({"type": "string"}));
        assert_eq!(serde_json::to_string(&doc).unwrap(), r#"{"type":"string"}"#);
        assert_eq!(doc.backend(), BackendKind::SymbolTable);
    }
}
