//! Symbol-table backend.
//!
//! Indexes every declaration in a file set, type-checks references once at
//! construction, and resolves one symbol per [`generate`] call with the root
//! schema inlined at the top of the document.
//!
//! [`generate`]: GeneratorBackend::generate

use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use super::schema::{Dialect, SchemaBuilder};
use super::{BackendKind, GeneratorBackend, SchemaDocument, DRAFT_07};
use crate::error::{BackendError, GenerateCause, GeneratorError};
use crate::program::Program;

/// Fixed generation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolTableSettings {
    /// Emit `required` for non-optional properties.
    pub required: bool,
    /// Keep `null` in unions during type resolution.
    pub strict_null_checks: bool,
}

impl Default for SymbolTableSettings {
    fn default() -> Self {
        Self {
            required: true,
            strict_null_checks: true,
        }
    }
}

/// Backend over a whole-program symbol index.
#[derive(Debug)]
pub struct SymbolTableBackend {
    program: Program,
    settings: SymbolTableSettings,
}

impl SymbolTableBackend {
    /// Build from source files with the default settings.
    pub fn new<P: AsRef<Path>>(files: &[P]) -> Result<Self, BackendError> {
        Self::with_settings(files, SymbolTableSettings::default())
    }

    pub fn with_settings<P: AsRef<Path>>(
        files: &[P],
        settings: SymbolTableSettings,
    ) -> Result<Self, BackendError> {
        Self::from_program(Program::from_files(files)?, settings)
    }

    /// Wrap an existing program, failing if any reference is unresolved.
    pub fn from_program(
        program: Program,
        settings: SymbolTableSettings,
    ) -> Result<Self, BackendError> {
        let names = program.unresolved_references();
        if !names.is_empty() {
            return Err(BackendError::TypeCheck { names });
        }
        debug!(symbols = program.len(), "Symbol-table backend ready");
        Ok(Self { program, settings })
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    fn dialect(&self) -> Dialect {
        Dialect {
            strict_null_checks: self.settings.strict_null_checks,
            required: self.settings.required,
            additional_properties: None,
        }
    }

    fn build(&self, name: &str) -> Result<Value, GenerateCause> {
        let declaration = self
            .program
            .lookup(name)
            .ok_or_else(|| GenerateCause::UnknownSymbol(name.to_string()))?;
        let mut builder = SchemaBuilder::new(&self.program, self.dialect());
        let root = builder.root(declaration)?;
        let definitions = builder.finish()?;

        let mut document = Map::new();
        document.insert("$schema".to_string(), Value::String(DRAFT_07.to_string()));
        match root {
            Value::Object(entries) => document.extend(entries),
            other => {
                document.insert("allOf".to_string(), Value::Array(vec![other]));
            }
        }
        if !definitions.is_empty() {
            document.insert("definitions".to_string(), Value::Object(definitions));
        }
        Ok(Value::Object(document))
    }
}

impl GeneratorBackend for SymbolTableBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::SymbolTable
    }

    fn enumerate(&self) -> Vec<String> {
        self.program.user_symbols()
    }

    fn generate(&self, name: &str) -> Result<SchemaDocument, GeneratorError> {
        self.build(name)
            .map(|value| SchemaDocument::new(self.kind(), value))
            .map_err(|cause| GeneratorError::new(name, cause))
    }
}
