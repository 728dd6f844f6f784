//! File watcher for `generate --watch`.
//!
//! Watches the input directory (not its subdirectories) and reports
//! debounced changes to `.ts` files, one batch per debounce window. The
//! caller reruns the full pipeline once per batch.

use crate::error::{CliResult, WatchError};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, Debouncer};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

/// Event types for file changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A file was created or modified.
    Modified(PathBuf),
    /// A file was deleted.
    Deleted(PathBuf),
    /// An error occurred.
    Error(String),
}

/// File watcher for monitoring TypeScript source files.
pub struct FileWatcher {
    /// Directory to watch.
    root: PathBuf,
    /// Debounce duration in milliseconds.
    debounce_ms: u64,
}

impl FileWatcher {
    /// Create a new file watcher for the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            debounce_ms: 500,
        }
    }

    /// Set the debounce duration in milliseconds.
    pub fn with_debounce(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// Start watching for file changes.
    ///
    /// Event batches arrive on the returned receiver for as long as the
    /// debouncer is kept alive. Batches with no `.ts` changes are not sent.
    pub fn watch(&self) -> CliResult<(Debouncer<RecommendedWatcher>, Receiver<Vec<WatchEvent>>)> {
        let (tx, rx) = channel::<Vec<WatchEvent>>();

        let mut debouncer = new_debouncer(
            Duration::from_millis(self.debounce_ms),
            move |result: Result<Vec<DebouncedEvent>, notify::Error>| {
                let batch: Vec<WatchEvent> = match result {
                    Ok(events) => events
                        .into_iter()
                        .filter_map(|event| classify(event.path))
                        .collect(),
                    Err(e) => vec![WatchEvent::Error(e.to_string())],
                };
                if !batch.is_empty() {
                    let _ = tx.send(batch);
                }
            },
        )
        .map_err(|e| WatchError::Init(e.to_string()))?;

        debouncer
            .watcher()
            .watch(&self.root, RecursiveMode::NonRecursive)
            .map_err(|e| WatchError::Notify(e.to_string()))?;

        Ok((debouncer, rx))
    }

    /// Get the directory being watched.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Append every batch already queued on `rx` to `batch`.
///
/// Changes that pile up while a run is in progress collapse into a single
/// rerun.
pub fn drain_pending(mut batch: Vec<WatchEvent>, rx: &Receiver<Vec<WatchEvent>>) -> Vec<WatchEvent> {
    for queued in rx.try_iter() {
        batch.extend(queued);
    }
    batch
}

/// Whether a batch contains at least one file change.
pub fn has_changes(batch: &[WatchEvent]) -> bool {
    batch.iter().any(|event| !event.is_error())
}

/// Turn a changed path into an event, ignoring anything but `.ts` files.
fn classify(path: PathBuf) -> Option<WatchEvent> {
    if path.extension().map_or(true, |ext| ext != "ts") {
        return None;
    }

    Some(if path.exists() {
        WatchEvent::Modified(path)
    } else {
        WatchEvent::Deleted(path)
    })
}

impl WatchEvent {
    /// Get the path associated with this event.
    pub fn path(&self) -> Option<&Path> {
        match self {
            WatchEvent::Modified(p) | WatchEvent::Deleted(p) => Some(p),
            WatchEvent::Error(_) => None,
        }
    }

    /// Check if this is an error event.
    pub fn is_error(&self) -> bool {
        matches!(self, WatchEvent::Error(_))
    }

    /// Get the error message if this is an error event.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            WatchEvent::Error(msg) => Some(msg),
            _ => None,
        }
    }
}
