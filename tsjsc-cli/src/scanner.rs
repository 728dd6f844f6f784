//! Source file discovery.
//!
//! Lists the `.ts` files directly under the input directory, optionally
//! narrowed by a file-name regex. Subdirectories are not descended into.

use crate::error::{CliResult, PatternError, ScanError};
use regex::Regex;
use std::path::PathBuf;
use tracing::trace;
use walkdir::WalkDir;

const SOURCE_EXTENSION: &str = ".ts";

/// Scanner for discovering TypeScript source files.
#[derive(Debug)]
pub struct SourceScanner {
    /// Directory to list.
    root: PathBuf,

    /// Optional file-name regex.
    filter: Option<Regex>,
}

impl SourceScanner {
    /// Create a new scanner for the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            filter: None,
        }
    }

    /// Only keep files whose name matches `pattern`.
    pub fn with_filter(mut self, pattern: &str) -> Result<Self, PatternError> {
        let regex =
            Regex::new(pattern).map_err(|e| PatternError::new("filematch", pattern, e.to_string()))?;
        self.filter = Some(regex);
        Ok(self)
    }

    /// List matching files as absolute paths, ordered by file name.
    pub fn scan(&self) -> CliResult<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(ScanError::not_found(self.root.clone()).into());
        }

        let root = if self.root.is_absolute() {
            self.root.clone()
        } else {
            std::env::current_dir()
                .map_err(|e| ScanError::Io {
                    path: self.root.clone(),
                    source: e,
                })?
                .join(&self.root)
        };

        let mut files = Vec::new();
        let walker = WalkDir::new(&root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(ScanError::Walk)?;
            if !entry.file_type().is_file() && !entry.path().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if !is_source_name(&name) {
                continue;
            }
            if let Some(ref filter) = self.filter {
                if !filter.is_match(&name) {
                    trace!("Skipping {} (filematch)", name);
                    continue;
                }
            }

            files.push(entry.into_path());
        }

        Ok(files)
    }
}

/// A non-empty stem followed by `.ts`.
fn is_source_name(name: &str) -> bool {
    name.len() > SOURCE_EXTENSION.len() && name.ends_with(SOURCE_EXTENSION)
}
