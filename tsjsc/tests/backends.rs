//! Integration tests for the schema backends.
//!
//! These tests run both backends over the fixture models and check the
//! shape of the emitted documents.

use std::fs;
use std::path::{Path, PathBuf};

use proptest::prelude::*;
use serde_json::json;
use tempfile::TempDir;

use tsjsc::{
    BackendError, BackendKind, DeclarationScanBackend, GenerateCause, GeneratorBackend, Program,
    ScanConfig, SymbolTableBackend, DRAFT_07,
};

/// Get the path to the fixture models.
fn models_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/models")
}

fn tsconfig_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/tsconfig.json")
}

fn model_files() -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(models_path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "ts"))
        .collect();
    files.sort();
    files
}

fn scan_backend(dir: &Path, tsconfig: PathBuf) -> DeclarationScanBackend {
    let config = ScanConfig::for_directory(dir, tsconfig);
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "ts"))
        .collect();
    files.sort();
    let names = Program::from_files(&files).unwrap();
    DeclarationScanBackend::new(config, &names).unwrap()
}

// =============================================================================
// Symbol-table backend
// =============================================================================

#[test]
fn test_symbol_table_enumerates_fixture_types() {
    let backend = SymbolTableBackend::new(&model_files()).unwrap();
    assert_eq!(
        backend.enumerate(),
        vec!["BookInterface", "LibraryInterface", "PublicationInterface"]
    );
}

#[test]
fn test_symbol_table_book_schema() {
    let backend = SymbolTableBackend::new(&model_files()).unwrap();
    let doc = backend.generate("BookInterface").unwrap();

    assert_eq!(doc.backend(), BackendKind::SymbolTable);
    let schema = doc.value();
    assert_eq!(schema["$schema"], json!(DRAFT_07));
    assert_eq!(schema["type"], json!("object"));
    assert_eq!(
        schema["required"],
        json!(["name", "author", "publisher", "barCode", "price"])
    );
    for field in ["name", "author", "barCode"] {
        assert_eq!(schema["properties"][field]["type"], json!("string"));
    }
    assert_eq!(schema["properties"]["barCode"]["pattern"], json!("^[0-9a-fA-F]+$"));
    assert_eq!(schema["properties"]["price"]["minimum"], json!(0));
    assert_eq!(schema["additionalProperties"], json!(true));
    assert!(schema.get("definitions").is_none());
}

#[test]
fn test_symbol_table_library_pulls_in_definitions() {
    let backend = SymbolTableBackend::new(&model_files()).unwrap();
    let doc = backend.generate("LibraryInterface").unwrap();
    let definitions = doc.value()["definitions"].as_object().unwrap();
    let names: Vec<_> = definitions.keys().cloned().collect();
    assert_eq!(names, vec!["BookInterface", "PublicationInterface"]);
    assert_eq!(
        definitions["PublicationInterface"]["properties"]["issue"],
        json!({ "type": "string", "format": "date-time" })
    );
}

#[test]
fn test_symbol_table_rejects_unresolved_import() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("School.ts");
    fs::write(
        &path,
        "import { StudentInterface } from './Student';\nexport interface SchoolInterface { student: StudentInterface }",
    )
    .unwrap();

    let err = SymbolTableBackend::new(&[path]).unwrap_err();
    assert!(matches!(err, BackendError::TypeCheck { .. }));
    assert!(err.to_string().contains("StudentInterface"));
}

// =============================================================================
// Declaration-scan backend
// =============================================================================

#[test]
fn test_declaration_scan_uses_same_names() {
    let symbol_table = SymbolTableBackend::new(&model_files()).unwrap();
    let scan = scan_backend(&models_path(), tsconfig_path());
    assert_eq!(scan.enumerate(), symbol_table.enumerate());
    assert!(scan.compiler_options().strict_null_checks);
}

#[test]
fn test_declaration_scan_book_schema() {
    let scan = scan_backend(&models_path(), tsconfig_path());
    let doc = scan.generate("BookInterface").unwrap();

    assert_eq!(doc.backend(), BackendKind::DeclarationScan);
    let schema = doc.value();
    assert_eq!(schema["$ref"], json!("#/definitions/BookInterface"));
    let book = &schema["definitions"]["BookInterface"];
    assert_eq!(book["type"], json!("object"));
    assert_eq!(book["additionalProperties"], json!(true));
    assert_eq!(
        book["required"],
        json!(["name", "author", "publisher", "barCode", "price"])
    );
}

#[test]
fn test_declaration_scan_nested_objects_are_permissive() {
    let scan = scan_backend(&models_path(), tsconfig_path());
    let doc = scan.generate("LibraryInterface").unwrap();
    let publication = &doc.value()["definitions"]["PublicationInterface"];
    assert_eq!(publication["additionalProperties"], json!(true));
}

#[test]
fn test_backends_differ_in_dialect() {
    let symbol_table = SymbolTableBackend::new(&model_files()).unwrap();
    let scan = scan_backend(&models_path(), tsconfig_path());

    let a = symbol_table.generate("PublicationInterface").unwrap();
    let b = scan.generate("PublicationInterface").unwrap();
    assert_ne!(a.value(), b.value());
    assert!(a.value().get("$ref").is_none());
    assert!(b.value().get("$ref").is_some());
}

#[test]
fn test_declaration_scan_non_exported_root() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("Types.ts"),
        "interface Hidden { a: string }\nexport interface Visible { a: string }",
    )
    .unwrap();
    fs::write(dir.path().join("tsconfig.json"), "{}").unwrap();

    let scan = scan_backend(dir.path(), dir.path().join("tsconfig.json"));
    let err = scan.generate("Hidden").unwrap_err();
    assert_eq!(err.cause, GenerateCause::NotExported("Hidden".to_string()));
    assert!(scan.generate("Visible").is_ok());
}

// =============================================================================
// Properties
// =============================================================================

fn interface_source(name: &str, fields: &[String]) -> String {
    let body: String = fields
        .iter()
        .map(|field| format!("  {}: string;\n", field))
        .collect();
    format!("export interface {} {{\n{}}}\n", name, body)
}

proptest! {
    /// Generation is deterministic: the same program yields identical output.
    #[test]
    fn prop_generation_is_deterministic(
        fields in prop::collection::btree_set("[a-z][a-zA-Z0-9]{0,8}", 1..8)
    ) {
        let fields: Vec<String> = fields.into_iter().collect();
        let source = interface_source("Generated", &fields);
        let program = Program::from_sources([("Generated.ts", source.as_str())]).unwrap();
        let backend = SymbolTableBackend::from_program(program, Default::default()).unwrap();

        let first = serde_json::to_string_pretty(&backend.generate("Generated").unwrap()).unwrap();
        let second = serde_json::to_string_pretty(&backend.generate("Generated").unwrap()).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Properties keep declaration order and every field is required.
    #[test]
    fn prop_properties_follow_declaration_order(
        fields in prop::collection::btree_set("[a-z][a-zA-Z0-9]{0,8}", 1..8)
    ) {
        let mut fields: Vec<String> = fields.into_iter().collect();
        fields.reverse();
        let source = interface_source("Generated", &fields);
        let program = Program::from_sources([("Generated.ts", source.as_str())]).unwrap();
        let backend = SymbolTableBackend::from_program(program, Default::default()).unwrap();

        let doc = backend.generate("Generated").unwrap();
        let keys: Vec<String> = doc.value()["properties"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        prop_assert_eq!(&keys, &fields);
        prop_assert_eq!(doc.value()["required"].as_array().unwrap().len(), fields.len());
    }
}
