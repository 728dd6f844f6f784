//! Run orchestration.
//!
//! A run resolves nothing itself: it takes a [`ResolvedConfig`], discovers
//! sources, builds the selected backend, filters its type names and writes
//! one artifact per matched type. Failures before generation abort the run.
//! Failures for a single type are recorded and the run carries on.

use crate::config::ResolvedConfig;
use crate::error::{CliError, CliResult, ConfigError};
use crate::filter::SymbolFilter;
use crate::scanner::SourceScanner;
use crate::writer::{SchemaWriter, WriteResult};
use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, trace};
use tsjsc::{
    BackendKind, DeclarationScanBackend, GeneratorBackend, Program, ScanConfig, SymbolTableBackend,
};

/// Where a per-type failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePhase {
    Generation,
    Persistence,
}

impl fmt::Display for FailurePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generation => f.write_str("generation"),
            Self::Persistence => f.write_str("persistence"),
        }
    }
}

/// What happened to one matched type.
#[derive(Debug)]
pub enum GenerationOutcome {
    /// The artifact was written (or would have been, in a dry run).
    Written { type_name: String, path: PathBuf },
    Failed {
        type_name: String,
        phase: FailurePhase,
        cause: Box<dyn Error + Send + Sync>,
    },
}

impl GenerationOutcome {
    pub fn type_name(&self) -> &str {
        match self {
            Self::Written { type_name, .. } | Self::Failed { type_name, .. } => type_name,
        }
    }

    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

/// Counts and per-type outcomes of a completed run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub files_discovered: usize,
    pub symbols_enumerated: usize,
    pub symbols_matched: usize,
    pub dry_run: bool,
    /// One entry per matched type, in enumeration order.
    pub outcomes: Vec<GenerationOutcome>,
}

impl RunSummary {
    pub fn written(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_written()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.written()
    }

    /// Paths of the artifacts written, in order.
    pub fn written_paths(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                GenerationOutcome::Written { path, .. } => Some(path.as_path()),
                GenerationOutcome::Failed { .. } => None,
            })
            .collect()
    }
}

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// Discovery found nothing; no backend was built and nothing written.
    NoSourceFiles,
    Completed(RunSummary),
}

/// Result of comparing generated schemas with the artifacts on disk.
#[derive(Debug, Default)]
pub struct CheckReport {
    pub up_to_date: Vec<String>,
    pub missing: Vec<PathBuf>,
    pub stale: Vec<PathBuf>,
    /// Types that could not be generated or rendered.
    pub failed: Vec<String>,
}

impl CheckReport {
    pub fn is_current(&self) -> bool {
        self.missing.is_empty() && self.stale.is_empty()
    }
}

/// A backend ready to generate, with the filter to apply to it.
struct Prepared {
    backend: Box<dyn GeneratorBackend>,
    filter: SymbolFilter,
    files_discovered: usize,
}

/// Run the whole pipeline once.
pub fn run(config: &ResolvedConfig) -> CliResult<RunOutcome> {
    let Some(prepared) = prepare(config)? else {
        return Ok(RunOutcome::NoSourceFiles);
    };

    let writer = SchemaWriter::new(&config.output_path, config.dry_run);
    let summary = generate_all(
        prepared.backend.as_ref(),
        &prepared.filter,
        &writer,
        prepared.files_discovered,
    );

    info!(
        "Generated {} schema(s), {} failed",
        summary.written(),
        summary.failed()
    );
    Ok(RunOutcome::Completed(summary))
}

/// Regenerate in memory and compare against the artifacts on disk.
pub fn check(config: &ResolvedConfig) -> CliResult<CheckReport> {
    let mut report = CheckReport::default();
    let Some(prepared) = prepare(config)? else {
        return Ok(report);
    };

    let writer = SchemaWriter::new(&config.output_path, true);
    let names = prepared.filter.apply(&prepared.backend.enumerate());

    for name in names {
        let rendered = prepared
            .backend
            .generate(&name)
            .map_err(|e| e.to_string())
            .and_then(|doc| SchemaWriter::render(&name, &doc).map_err(|e| e.to_string()));
        let expected = match rendered {
            Ok(text) => text,
            Err(message) => {
                error!("{}", message);
                report.failed.push(name);
                continue;
            }
        };

        let path = writer.artifact_path(&name);
        match std::fs::read_to_string(&path) {
            Ok(actual) if actual == expected => report.up_to_date.push(name),
            Ok(_) => {
                debug!("Stale: {}", path.display());
                report.stale.push(path);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Missing: {}", path.display());
                report.missing.push(path);
            }
            Err(e) => return Err(CliError::Io(e)),
        }
    }

    Ok(report)
}

/// Generate and write every type the filter admits.
///
/// Never fails: each type's error is logged and recorded in the summary.
pub fn generate_all(
    backend: &dyn GeneratorBackend,
    filter: &SymbolFilter,
    writer: &SchemaWriter,
    files_discovered: usize,
) -> RunSummary {
    let names = backend.enumerate();
    let matched = filter.apply(&names);
    debug!(
        "{} backend: {} type(s) declared, {} matched",
        backend.kind(),
        names.len(),
        matched.len()
    );

    let outcomes = matched
        .iter()
        .map(|name| generate_one(backend, writer, name))
        .collect();

    RunSummary {
        files_discovered,
        symbols_enumerated: names.len(),
        symbols_matched: matched.len(),
        dry_run: writer.is_dry_run(),
        outcomes,
    }
}

fn generate_one(backend: &dyn GeneratorBackend, writer: &SchemaWriter, name: &str) -> GenerationOutcome {
    trace!("Generating schema for {}", name);
    let doc = match backend.generate(name) {
        Ok(doc) => doc,
        Err(e) => {
            error!("{}", e);
            return GenerationOutcome::Failed {
                type_name: name.to_string(),
                phase: FailurePhase::Generation,
                cause: Box::new(e),
            };
        }
    };

    match writer.write(name, &doc) {
        Ok(WriteResult::Written { path, bytes }) => {
            debug!("Wrote {} ({} bytes)", path.display(), bytes);
            GenerationOutcome::Written {
                type_name: name.to_string(),
                path,
            }
        }
        Ok(WriteResult::DryRun { content, path }) => {
            info!("Would write {}", path.display());
            trace!("{}", content);
            GenerationOutcome::Written {
                type_name: name.to_string(),
                path,
            }
        }
        Err(e) => {
            error!("{}", e);
            GenerationOutcome::Failed {
                type_name: name.to_string(),
                phase: FailurePhase::Persistence,
                cause: Box::new(e),
            }
        }
    }
}

/// Everything that can abort a run happens here.
fn prepare(config: &ResolvedConfig) -> CliResult<Option<Prepared>> {
    let filter = SymbolFilter::new(&config.type_pattern, config.exclude_pattern.as_deref())?;

    let mut scanner = SourceScanner::new(&config.input_path);
    if let Some(ref pattern) = config.file_pattern {
        scanner = scanner.with_filter(pattern)?;
    }
    let files = scanner.scan()?;
    if files.is_empty() {
        info!("Found no matching files to process.");
        return Ok(None);
    }
    debug!("Discovered {} source file(s)", files.len());
    for file in &files {
        trace!("  {}", file.display());
    }

    let backend = build_backend(config, &files)?;
    Ok(Some(Prepared {
        backend,
        filter,
        files_discovered: files.len(),
    }))
}

/// Construct the backend selected by the configuration.
pub fn build_backend(
    config: &ResolvedConfig,
    files: &[PathBuf],
) -> CliResult<Box<dyn GeneratorBackend>> {
    debug!("Building {} backend", config.backend);
    match config.backend {
        BackendKind::SymbolTable => Ok(Box::new(SymbolTableBackend::new(files)?)),
        BackendKind::DeclarationScan => {
            let tsconfig = config
                .tsconfig_path
                .clone()
                .ok_or(ConfigError::MissingTsconfig)?;
            let names = Program::from_files(files)?;
            let scan = ScanConfig::for_directory(&config.input_path, tsconfig);
            Ok(Box::new(DeclarationScanBackend::new(scan, &names)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Verbosity;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;
    use tsjsc::{GenerateCause, GeneratorError, SchemaDocument};

    /// Declares fixed names and fails on request.
    struct FakeBackend {
        names: Vec<String>,
        failing: Option<String>,
    }

    impl GeneratorBackend for FakeBackend {
        fn kind(&self) -> BackendKind {
            BackendKind::SymbolTable
        }

        fn enumerate(&self) -> Vec<String> {
            self.names.clone()
        }

        fn generate(&self, name: &str) -> Result<SchemaDocument, GeneratorError> {
            if self.failing.as_deref() == Some(name) {
                return Err(GeneratorError::new(
                    name,
                    GenerateCause::Unsupported("forced".to_string()),
                ));
            }
            Ok(SchemaDocument::new(
                BackendKind::SymbolTable,
                json!({ "title": name }),
            ))
        }
    }

    fn fake(names: &[&str], failing: Option<&str>) -> FakeBackend {
        FakeBackend {
            names: names.iter().map(|s| s.to_string()).collect(),
            failing: failing.map(str::to_string),
        }
    }

    fn config(dir: &Path) -> ResolvedConfig {
        ResolvedConfig {
            root_path: dir.to_path_buf(),
            input_path: dir.join("models"),
            output_path: dir.join("schema"),
            tsconfig_path: None,
            type_pattern: "Interface$".to_string(),
            file_pattern: None,
            exclude_pattern: None,
            backend: BackendKind::SymbolTable,
            verbosity: Verbosity::Info,
            dry_run: false,
            config_file: None,
        }
    }

    #[test]
    fn test_failure_is_isolated() {
        let dir = TempDir::new().unwrap();
        let backend = fake(&["AInterface", "BInterface", "CInterface"], Some("BInterface"));
        let filter = SymbolFilter::new(".", None).unwrap();
        let writer = SchemaWriter::new(dir.path(), false);

        let summary = generate_all(&backend, &filter, &writer, 1);

        assert_eq!(summary.written(), 2);
        assert_eq!(summary.failed(), 1);
        assert!(matches!(
            summary.outcomes[1],
            GenerationOutcome::Failed {
                phase: FailurePhase::Generation,
                ..
            }
        ));
        assert!(dir.path().join("AInterfaceJSC.ts").exists());
        assert!(!dir.path().join("BInterfaceJSC.ts").exists());
        assert!(dir.path().join("CInterfaceJSC.ts").exists());
    }

    #[test]
    fn test_persistence_failure_is_recorded() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("schema");
        fs::write(&blocker, "").unwrap();

        let backend = fake(&["AInterface"], None);
        let filter = SymbolFilter::new(".", None).unwrap();
        let writer = SchemaWriter::new(&blocker, false);

        let summary = generate_all(&backend, &filter, &writer, 1);
        assert!(matches!(
            summary.outcomes[0],
            GenerationOutcome::Failed {
                phase: FailurePhase::Persistence,
                ..
            }
        ));
    }

    #[test]
    fn test_counts() {
        let dir = TempDir::new().unwrap();
        let backend = fake(&["AInterface", "Helper"], None);
        let filter = SymbolFilter::new("Interface$", None).unwrap();
        let writer = SchemaWriter::new(dir.path(), true);

        let summary = generate_all(&backend, &filter, &writer, 3);
        assert_eq!(summary.files_discovered, 3);
        assert_eq!(summary.symbols_enumerated, 2);
        assert_eq!(summary.symbols_matched, 1);
        assert!(summary.dry_run);
        assert_eq!(summary.written_paths(), vec![dir.path().join("AInterfaceJSC.ts")]);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_run_without_sources() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("models")).unwrap();

        let outcome = run(&config(dir.path())).unwrap();
        assert!(matches!(outcome, RunOutcome::NoSourceFiles));
        assert!(!dir.path().join("schema").exists());
    }

    #[test]
    fn test_run_rejects_bad_pattern_before_discovery() {
        let dir = TempDir::new().unwrap();
        let mut config = config(dir.path());
        config.exclude_pattern = Some("(".to_string());

        let err = run(&config).unwrap_err();
        assert!(matches!(err, CliError::Pattern(_)));
    }

    #[test]
    fn test_run_and_check() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("models")).unwrap();
        fs::write(
            dir.path().join("models/Book.ts"),
            "export interface BookInterface { name: string }\nexport interface Helper { x: number }",
        )
        .unwrap();
        let config = config(dir.path());

        let report = check(&config).unwrap();
        assert!(!report.is_current());
        assert_eq!(report.missing.len(), 1);

        let RunOutcome::Completed(summary) = run(&config).unwrap() else {
            panic!("expected a completed run");
        };
        assert_eq!(summary.written(), 1);

        let report = check(&config).unwrap();
        assert!(report.is_current());
        assert_eq!(report.up_to_date, vec!["BookInterface"]);

        fs::write(dir.path().join("schema/BookInterfaceJSC.ts"), "export default {}").unwrap();
        let report = check(&config).unwrap();
        assert_eq!(report.stale.len(), 1);
    }
}
