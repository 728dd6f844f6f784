//! Declaration-scan backend.
//!
//! Scans a glob of declaration files with compiler options read from a
//! tsconfig. Every exported declaration is a schema root; documents carry a
//! top-level `$ref` into `definitions`, and object schemas allow additional
//! properties unless told otherwise.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::schema::{Dialect, SchemaBuilder};
use super::{BackendKind, GeneratorBackend, SchemaDocument, DRAFT_07};
use crate::error::{BackendError, GenerateCause, GeneratorError};
use crate::program::Program;

/// Scan configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Glob selecting the declaration files.
    pub path: String,
    /// tsconfig supplying compiler options.
    pub tsconfig: PathBuf,
    /// Root type name, or `*` for every exported declaration.
    pub type_name: String,
    /// Emit the root as a `$ref` into `definitions`.
    pub top_ref: bool,
    /// `additionalProperties` for object schemas without an index signature.
    pub additional_properties: bool,
    /// Skip the reference check at construction.
    pub skip_type_check: bool,
}

impl ScanConfig {
    /// `<dir>/*.ts`, every export a root, permissive objects, no type check.
    pub fn for_directory(dir: &Path, tsconfig: impl Into<PathBuf>) -> Self {
        let escaped = glob::Pattern::escape(&dir.to_string_lossy());
        Self {
            path: format!("{}/*.ts", escaped.trim_end_matches('/')),
            tsconfig: tsconfig.into(),
            type_name: "*".to_string(),
            top_ref: true,
            additional_properties: true,
            skip_type_check: true,
        }
    }
}

/// The compiler options that influence translation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompilerOptions {
    pub strict_null_checks: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TsconfigFile {
    #[serde(default)]
    compiler_options: RawCompilerOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCompilerOptions {
    strict_null_checks: Option<bool>,
    strict: Option<bool>,
}

impl CompilerOptions {
    /// Read compiler options from a tsconfig file.
    pub fn load(path: &Path) -> Result<Self, BackendError> {
        let text = std::fs::read_to_string(path).map_err(|e| BackendError::Tsconfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&text).map_err(|message| BackendError::Tsconfig {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse tsconfig text (JSON with comments and trailing commas).
    ///
    /// `strictNullChecks` wins over `strict`; both default to off.
    pub fn parse(text: &str) -> Result<Self, String> {
        let file: TsconfigFile =
            serde_json::from_str(&strip_jsonc(text)).map_err(|e| e.to_string())?;
        let options = file.compiler_options;
        Ok(Self {
            strict_null_checks: options
                .strict_null_checks
                .or(options.strict)
                .unwrap_or(false),
        })
    }
}

/// Remove comments and trailing commas, leaving string contents alone.
fn strip_jsonc(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' => {
                out.push(c);
                i += 1;
                while i < chars.len() {
                    out.push(chars[i]);
                    if chars[i] == '\\' && i + 1 < chars.len() {
                        out.push(chars[i + 1]);
                        i += 2;
                        continue;
                    }
                    i += 1;
                    if chars[i - 1] == '"' {
                        break;
                    }
                }
            }
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    i += 1;
                }
                i += 2;
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                if !matches!(next, Some('}' | ']')) {
                    out.push(c);
                }
                i += 1;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

/// Backend over a glob of declaration files.
#[derive(Debug)]
pub struct DeclarationScanBackend {
    config: ScanConfig,
    options: CompilerOptions,
    program: Program,
    names: Vec<String>,
}

impl DeclarationScanBackend {
    /// Scan the glob and read the tsconfig.
    ///
    /// `name_source` supplies [`enumerate`](GeneratorBackend::enumerate), so
    /// that name filtering does not depend on which backend runs.
    pub fn new(config: ScanConfig, name_source: &Program) -> Result<Self, BackendError> {
        let files = scan(&config.path)?;
        let options = CompilerOptions::load(&config.tsconfig)?;
        let program = Program::from_files(&files)?;

        if !config.skip_type_check {
            let names = program.unresolved_references();
            if !names.is_empty() {
                return Err(BackendError::TypeCheck { names });
            }
        }

        debug!(
            pattern = %config.path,
            files = files.len(),
            strict_null_checks = options.strict_null_checks,
            "Declaration-scan backend ready"
        );
        Ok(Self {
            config,
            options,
            program,
            names: name_source.user_symbols(),
        })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn compiler_options(&self) -> CompilerOptions {
        self.options
    }

    fn is_root(&self, name: &str) -> bool {
        if self.config.type_name == "*" {
            self.program.lookup(name).is_some_and(|d| d.exported)
        } else {
            self.config.type_name == name
        }
    }

    fn build(&self, name: &str) -> Result<Value, GenerateCause> {
        let declaration = self
            .program
            .lookup(name)
            .ok_or_else(|| GenerateCause::UnknownSymbol(name.to_string()))?;
        if !self.is_root(name) {
            return Err(GenerateCause::NotExported(name.to_string()));
        }

        let dialect = Dialect {
            strict_null_checks: self.options.strict_null_checks,
            required: true,
            additional_properties: Some(self.config.additional_properties),
        };
        let mut builder = SchemaBuilder::new(&self.program, dialect);
        let mut document = Map::new();
        document.insert("$schema".to_string(), Value::String(DRAFT_07.to_string()));

        if self.config.top_ref {
            let reference = builder.define(name);
            document.insert("$ref".to_string(), reference["$ref"].clone());
        } else if let Value::Object(entries) = builder.root(declaration)? {
            document.extend(entries);
        }
        let definitions = builder.finish()?;
        if !definitions.is_empty() {
            document.insert("definitions".to_string(), Value::Object(definitions));
        }
        Ok(Value::Object(document))
    }
}

fn scan(pattern: &str) -> Result<Vec<PathBuf>, BackendError> {
    let entries = glob::glob(pattern).map_err(|e| BackendError::Glob {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| BackendError::Io {
            path: e.path().to_path_buf(),
            source: e.into_error(),
        })?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

impl GeneratorBackend for DeclarationScanBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::DeclarationScan
    }

    fn enumerate(&self) -> Vec<String> {
        self.names.clone()
    }

    fn generate(&self, name: &str) -> Result<SchemaDocument, GeneratorError> {
        self.build(name)
            .map(|value| SchemaDocument::new(self.kind(), value))
            .map_err(|cause| GeneratorError::new(name, cause))
    }
}
