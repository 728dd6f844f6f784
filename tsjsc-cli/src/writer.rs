//! Schema artifact writer.
//!
//! Each schema lands in `<output>/<TypeName>JSC.ts` as a default-exported
//! object literal. Files are written to a temporary sibling and renamed into
//! place, so a failed write never leaves a partial artifact.

use crate::error::WriteError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tsjsc::SchemaDocument;

/// Suffix appended to the type name to form the artifact file name.
pub const ARTIFACT_SUFFIX: &str = "JSC.ts";

/// Result of a write operation.
#[derive(Debug)]
pub enum WriteResult {
    /// File was written successfully.
    Written {
        /// Path to the written file.
        path: PathBuf,
        /// Number of bytes written.
        bytes: usize,
    },
    /// Dry run - content was not written.
    DryRun {
        /// Content that would have been written.
        content: String,
        /// Path where content would have been written.
        path: PathBuf,
    },
}

/// Writes schema artifacts into one output directory.
#[derive(Debug, Clone)]
pub struct SchemaWriter {
    output_dir: PathBuf,
    dry_run: bool,
}

impl SchemaWriter {
    pub fn new(output_dir: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            output_dir: output_dir.into(),
            dry_run,
        }
    }

    /// Where the artifact for `type_name` goes.
    pub fn artifact_path(&self, type_name: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}{}", type_name, ARTIFACT_SUFFIX))
    }

    /// Render a schema as artifact text: `export default ` followed by the
    /// schema as 2-space indented JSON, with no trailing newline.
    pub fn render(type_name: &str, doc: &SchemaDocument) -> Result<String, WriteError> {
        let json = serde_json::to_string_pretty(doc).map_err(|source| WriteError::Serialization {
            type_name: type_name.to_string(),
            source,
        })?;
        Ok(format!("export default {}", json))
    }

    /// Render and persist the artifact for `type_name`.
    ///
    /// In dry-run mode, returns the content without writing.
    pub fn write(&self, type_name: &str, doc: &SchemaDocument) -> Result<WriteResult, WriteError> {
        let content = Self::render(type_name, doc)?;
        let path = self.artifact_path(type_name);

        if self.dry_run {
            return Ok(WriteResult::DryRun { content, path });
        }

        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| WriteError::persistence(self.output_dir.clone(), e))?;

        let mut file = NamedTempFile::new_in(&self.output_dir)
            .map_err(|e| WriteError::persistence(path.clone(), e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| WriteError::persistence(path.clone(), e))?;
        file.persist(&path)
            .map_err(|e| WriteError::persistence(path.clone(), e.error))?;

        Ok(WriteResult::Written {
            path,
            bytes: content.len(),
        })
    }

    /// Check if running in dry-run mode.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

impl WriteResult {
    /// Get the path associated with this result.
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path, .. } => path,
            WriteResult::DryRun { path, .. } => path,
        }
    }

    /// Check if the write was successful (not dry-run).
    pub fn was_written(&self) -> bool {
        matches!(self, WriteResult::Written { .. })
    }
}
