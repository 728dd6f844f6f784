//! Integration tests for tsjsc-cli.
//!
//! These tests resolve a configuration inside a scratch project, run the
//! pipeline and inspect the artifacts on disk.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use serde_json::Value;
use tsjsc::{BackendError, BackendKind};
use tsjsc_cli::{
    config::{CliArgs, ConfigManager, ResolvedConfig, CONFIG_FILENAME},
    error::{CliError, ConfigError},
    pipeline::{self, FailurePhase, GenerationOutcome, RunOutcome, RunSummary},
};

/// Get the path to test fixtures.
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Create a temporary directory with test files.
fn create_temp_project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
    dir
}

/// A scratch project holding copies of the fixture models under
/// `src/models` and the fixture tsconfig at the root.
fn fixture_project(models: &[&str]) -> TempDir {
    let fixtures = fixtures_path();
    let mut files = vec![(
        "tsconfig.json".to_string(),
        fs::read_to_string(fixtures.join("tsconfig.json")).unwrap(),
    )];
    for model in models {
        files.push((
            format!("src/models/{}", model),
            fs::read_to_string(fixtures.join("models").join(model)).unwrap(),
        ));
    }

    let borrowed: Vec<(&str, &str)> = files
        .iter()
        .map(|(name, content)| (name.as_str(), content.as_str()))
        .collect();
    create_temp_project(&borrowed)
}

fn args(pattern: &str) -> CliArgs {
    CliArgs {
        path: Some(PathBuf::from("src/models")),
        type_pattern: Some(pattern.to_string()),
        ..Default::default()
    }
}

fn resolve(dir: &Path, args: &CliArgs) -> ResolvedConfig {
    ConfigManager::resolve_from(args, dir, Some(dir)).unwrap()
}

fn completed(config: &ResolvedConfig) -> RunSummary {
    match pipeline::run(config).unwrap() {
        RunOutcome::Completed(summary) => summary,
        RunOutcome::NoSourceFiles => panic!("expected source files"),
    }
}

fn artifact_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

/// Parse an artifact back into JSON.
fn read_artifact(path: &Path) -> Value {
    let text = fs::read_to_string(path).unwrap();
    let json = text.strip_prefix("export default ").unwrap();
    serde_json::from_str(json).unwrap()
}

// =============================================================================
// Symbol-table runs
// =============================================================================

#[test]
fn test_book_interface_artifact() {
    let dir = fixture_project(&["Book.ts"]);
    let config = resolve(dir.path(), &args("Interface$"));

    let summary = completed(&config);

    assert_eq!(summary.written(), 1);
    let schema_dir = dir.path().join("src/schema");
    assert_eq!(artifact_names(&schema_dir), vec!["BookInterfaceJSC.ts"]);

    let schema = read_artifact(&schema_dir.join("BookInterfaceJSC.ts"));
    assert_eq!(schema["$schema"], "http://json-schema.org/draft-07/schema#");
    assert_eq!(schema["type"], "object");
    assert_eq!(schema["properties"]["keywords"]["type"], "array");
    assert_eq!(schema["properties"]["keywords"]["items"]["type"], "string");
    let required: Vec<&str> = schema["required"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert!(!required.contains(&"keywords"));
    assert!(required.contains(&"barCode"));
}

#[test]
fn test_exclude_pattern() {
    let dir = fixture_project(&["Book.ts", "Library.ts", "Publication.ts"]);
    let config = resolve(
        dir.path(),
        &CliArgs {
            exclude: Some("^Publication".to_string()),
            ..args("Interface$")
        },
    );

    let summary = completed(&config);

    assert_eq!(summary.symbols_enumerated, 3);
    assert_eq!(summary.symbols_matched, 2);
    assert_eq!(
        artifact_names(&dir.path().join("src/schema")),
        vec!["BookInterfaceJSC.ts", "LibraryInterfaceJSC.ts"]
    );

    let library = read_artifact(&dir.path().join("src/schema/LibraryInterfaceJSC.ts"));
    assert!(library["definitions"]["PublicationInterface"].is_object());
}

#[test]
fn test_reruns_are_byte_identical() {
    let dir = fixture_project(&["Book.ts", "Library.ts", "Publication.ts"]);
    let config = resolve(dir.path(), &args("Interface$"));
    let artifact = dir.path().join("src/schema/LibraryInterfaceJSC.ts");

    completed(&config);
    let first = fs::read(&artifact).unwrap();
    completed(&config);
    let second = fs::read(&artifact).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_file_pattern_narrows_sources() {
    let dir = fixture_project(&["Book.ts", "Publication.ts"]);
    let config = resolve(
        dir.path(),
        &CliArgs {
            filematch: Some("^Pub".to_string()),
            ..args(".")
        },
    );

    let summary = completed(&config);
    assert_eq!(summary.files_discovered, 1);
    assert_eq!(summary.outcomes[0].type_name(), "PublicationInterface");
}

#[test]
fn test_file_pattern_keeps_imported_types_resolvable() {
    let dir = fixture_project(&["Book.ts", "Library.ts", "Publication.ts"]);
    let config = resolve(
        dir.path(),
        &CliArgs {
            filematch: Some("^Library".to_string()),
            ..args("Interface$")
        },
    );

    let summary = completed(&config);

    assert_eq!(summary.files_discovered, 1);
    assert_eq!(summary.symbols_enumerated, 1);
    assert_eq!(summary.written(), 1);
    let schema_dir = dir.path().join("src/schema");
    assert_eq!(artifact_names(&schema_dir), vec!["LibraryInterfaceJSC.ts"]);

    let library = read_artifact(&schema_dir.join("LibraryInterfaceJSC.ts"));
    assert!(library["definitions"]["BookInterface"].is_object());
    assert!(library["definitions"]["PublicationInterface"].is_object());
}

#[test]
fn test_file_pattern_with_declaration_scan_enumerates_selection_only() {
    let dir = fixture_project(&["Book.ts", "Library.ts", "Publication.ts"]);
    let config = resolve(
        dir.path(),
        &CliArgs {
            filematch: Some("^Library".to_string()),
            backend: Some(BackendKind::DeclarationScan),
            tsconfig: Some(PathBuf::from("tsconfig.json")),
            ..args("Interface$")
        },
    );

    let summary = completed(&config);

    assert_eq!(summary.symbols_enumerated, 1);
    assert_eq!(
        artifact_names(&dir.path().join("src/schema")),
        vec!["LibraryInterfaceJSC.ts"]
    );
}

#[test]
fn test_empty_discovery_writes_nothing() {
    let dir = fixture_project(&["Book.ts"]);
    let config = resolve(
        dir.path(),
        &CliArgs {
            filematch: Some("^Nothing".to_string()),
            ..args("Interface$")
        },
    );

    let outcome = pipeline::run(&config).unwrap();

    assert!(matches!(outcome, RunOutcome::NoSourceFiles));
    assert!(!dir.path().join("src/schema").exists());
}

#[test]
fn test_unresolved_import_is_fatal_for_symbol_table() {
    let dir = create_temp_project(&[(
        "src/models/School.ts",
        "import { StudentInterface } from './Student';\nexport interface SchoolInterface { student: StudentInterface }",
    )]);
    let config = resolve(dir.path(), &args("."));

    let err = pipeline::run(&config).unwrap_err();

    assert!(matches!(err, CliError::Backend(BackendError::TypeCheck { .. })));
    assert!(!dir.path().join("src/schema").exists());
}

#[test]
fn test_output_override_and_dry_run() {
    let dir = fixture_project(&["Book.ts"]);
    let config = resolve(
        dir.path(),
        &CliArgs {
            out: Some(PathBuf::from("gen")),
            dry_run: true,
            ..args("Interface$")
        },
    );
    assert_eq!(config.output_path, dir.path().join("gen"));

    let summary = completed(&config);

    assert!(summary.dry_run);
    assert_eq!(summary.written(), 1);
    assert!(!dir.path().join("gen").exists());
}

// =============================================================================
// Declaration-scan runs
// =============================================================================

#[test]
fn test_declaration_scan_requires_tsconfig() {
    let dir = fixture_project(&[]);
    fs::create_dir_all(dir.path().join("src/models")).unwrap();

    let err = ConfigManager::resolve_from(
        &CliArgs {
            backend: Some(BackendKind::DeclarationScan),
            ..args("Interface$")
        },
        dir.path(),
        Some(dir.path()),
    )
    .unwrap_err();

    assert!(matches!(err, CliError::Config(ConfigError::MissingTsconfig)));
}

#[test]
fn test_declaration_scan_artifacts() {
    let dir = fixture_project(&["Book.ts", "Library.ts", "Publication.ts"]);
    let config = resolve(
        dir.path(),
        &CliArgs {
            backend: Some(BackendKind::DeclarationScan),
            tsconfig: Some(PathBuf::from("tsconfig.json")),
            ..args("Interface$")
        },
    );

    let summary = completed(&config);
    assert_eq!(summary.written(), 3);

    let book = read_artifact(&dir.path().join("src/schema/BookInterfaceJSC.ts"));
    assert_eq!(book["$ref"], "#/definitions/BookInterface");
    assert_eq!(
        book["definitions"]["BookInterface"]["additionalProperties"],
        true
    );
}

#[test]
fn test_declaration_scan_isolates_unresolved_reference() {
    let dir = create_temp_project(&[
        ("tsconfig.json", "{}"),
        (
            "src/models/School.ts",
            "export interface SchoolInterface { student: StudentInterface }\nexport interface RoomInterface { seats: number }",
        ),
    ]);
    let config = resolve(
        dir.path(),
        &CliArgs {
            backend: Some(BackendKind::DeclarationScan),
            tsconfig: Some(PathBuf::from("tsconfig.json")),
            ..args("Interface$")
        },
    );

    let summary = completed(&config);

    assert_eq!(summary.written(), 1);
    assert_eq!(summary.failed(), 1);
    assert!(matches!(
        &summary.outcomes[0],
        GenerationOutcome::Failed {
            type_name,
            phase: FailurePhase::Generation,
            ..
        } if type_name == "SchoolInterface"
    ));
    assert_eq!(
        artifact_names(&dir.path().join("src/schema")),
        vec!["RoomInterfaceJSC.ts"]
    );
}

// =============================================================================
// Config file and check
// =============================================================================

#[test]
fn test_config_file_drives_run() {
    let dir = fixture_project(&["Book.ts", "Publication.ts"]);
    fs::write(
        dir.path().join(CONFIG_FILENAME),
        "[generate]\npath = \"src/models\"\nmatch = \"Interface$\"\nexclude = \"^Book\"\nout = \"schemas\"\n",
    )
    .unwrap();

    let config = resolve(dir.path(), &CliArgs::default());
    completed(&config);

    assert_eq!(
        artifact_names(&dir.path().join("schemas")),
        vec!["PublicationInterfaceJSC.ts"]
    );
}

#[test]
fn test_check_detects_source_change() {
    let dir = fixture_project(&["Book.ts"]);
    let config = resolve(dir.path(), &args("Interface$"));

    completed(&config);
    assert!(pipeline::check(&config).unwrap().is_current());

    let source = dir.path().join("src/models/Book.ts");
    let updated = fs::read_to_string(&source)
        .unwrap()
        .replace("price: number;", "price: number;\n  isbn: string;");
    fs::write(&source, updated).unwrap();

    let report = pipeline::check(&config).unwrap();
    assert!(!report.is_current());
    assert_eq!(
        report.stale,
        vec![dir.path().join("src/schema/BookInterfaceJSC.ts")]
    );
}
