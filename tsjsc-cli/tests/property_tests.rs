//! Property-based tests for tsjsc-cli.
//!
//! Properties tested:
//! - Filter composition: a name is selected iff it matches the inclusion
//!   pattern and not the exclusion pattern, in enumeration order
//! - Output names: artifacts are exactly the filtered names minus failures
//! - Dry run safety: nothing is written in dry-run mode
//! - Idempotence: regenerating yields byte-identical artifacts

use proptest::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use serde_json::json;
use tsjsc::{BackendKind, GenerateCause, GeneratorBackend, GeneratorError, SchemaDocument};
use tsjsc_cli::{
    config::{CliArgs, ConfigManager},
    filter::SymbolFilter,
    pipeline::{self, RunOutcome},
    writer::SchemaWriter,
};

/// Backend with fixed names; the names in `failing` fail to generate.
struct ScriptedBackend {
    names: Vec<String>,
    failing: BTreeSet<String>,
}

impl GeneratorBackend for ScriptedBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::SymbolTable
    }

    fn enumerate(&self) -> Vec<String> {
        self.names.clone()
    }

    fn generate(&self, name: &str) -> Result<SchemaDocument, GeneratorError> {
        if self.failing.contains(name) {
            return Err(GeneratorError::new(
                name,
                GenerateCause::UnknownReference("Missing".to_string()),
            ));
        }
        Ok(SchemaDocument::new(
            BackendKind::SymbolTable,
            json!({ "type": "object", "title": name }),
        ))
    }
}

fn artifacts(dir: &Path) -> BTreeSet<String> {
    if !dir.exists() {
        return BTreeSet::new();
    }
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect()
}

// =============================================================================
// Generators for property tests
// =============================================================================

/// Type names built from a small alphabet so patterns hit often.
fn arb_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("(Book|Publication|Library|Helper)[A-C]{0,2}(Interface)?", 0..12)
        .prop_map(|names| names.into_iter().collect())
}

fn arb_pattern() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "Interface$", "^Book", "^Publication", "Helper", "A", "^[BL]", ".", "C$",
    ])
    .prop_map(str::to_string)
}

// =============================================================================
// Filter composition
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_filter_is_include_minus_exclude(
        names in arb_names(),
        include in arb_pattern(),
        exclude in proptest::option::of(arb_pattern()),
    ) {
        let filter = SymbolFilter::new(&include, exclude.as_deref()).unwrap();
        let include_re = regex::Regex::new(&include).unwrap();
        let exclude_re = exclude.as_deref().map(|p| regex::Regex::new(p).unwrap());

        let expected: Vec<String> = names
            .iter()
            .filter(|n| include_re.is_match(n))
            .filter(|n| !exclude_re.as_ref().is_some_and(|re| re.is_match(n)))
            .cloned()
            .collect();

        prop_assert_eq!(filter.apply(&names), expected);
    }

    #[test]
    fn prop_exclusion_only_removes(
        names in arb_names(),
        include in arb_pattern(),
        exclude in arb_pattern(),
    ) {
        let narrowed = SymbolFilter::new(&include, Some(&exclude)).unwrap().apply(&names);
        let wide = SymbolFilter::new(&include, None).unwrap().apply(&names);

        let mut remaining = wide.iter();
        for name in &narrowed {
            prop_assert!(remaining.any(|w| w == name));
        }
    }
}

// =============================================================================
// Output names and dry run
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_outputs_are_filtered_names_minus_failures(
        names in arb_names(),
        include in arb_pattern(),
        fail_mask in prop::collection::vec(any::<bool>(), 12),
    ) {
        let failing: BTreeSet<String> = names
            .iter()
            .zip(&fail_mask)
            .filter(|(_, fail)| **fail)
            .map(|(name, _)| name.clone())
            .collect();
        let backend = ScriptedBackend { names: names.clone(), failing: failing.clone() };
        let filter = SymbolFilter::new(&include, None).unwrap();
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("schema");
        let writer = SchemaWriter::new(&out, false);

        let summary = pipeline::generate_all(&backend, &filter, &writer, 1);

        let expected: BTreeSet<String> = filter
            .apply(&names)
            .into_iter()
            .filter(|name| !failing.contains(name))
            .map(|name| format!("{}JSC.ts", name))
            .collect();
        prop_assert_eq!(artifacts(&out), expected.clone());
        prop_assert_eq!(summary.written(), expected.len());
        prop_assert_eq!(summary.outcomes.len(), summary.symbols_matched);
    }

    #[test]
    fn prop_dry_run_never_writes(
        names in arb_names(),
        include in arb_pattern(),
    ) {
        let backend = ScriptedBackend { names, failing: BTreeSet::new() };
        let filter = SymbolFilter::new(&include, None).unwrap();
        let dir = TempDir::new().unwrap();
        let writer = SchemaWriter::new(dir.path().join("schema"), true);

        let summary = pipeline::generate_all(&backend, &filter, &writer, 1);

        prop_assert!(!dir.path().join("schema").exists());
        prop_assert_eq!(summary.written(), summary.symbols_matched);
    }
}

// =============================================================================
// Idempotence
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_regeneration_is_byte_identical(
        fields in prop::collection::btree_set("[a-z][a-zA-Z0-9]{0,8}", 1..6),
        optional in prop::collection::vec(any::<bool>(), 6),
    ) {
        let body: String = fields
            .iter()
            .zip(&optional)
            .map(|(field, opt)| format!("  {}{}: string;\n", field, if *opt { "?" } else { "" }))
            .collect();
        let dir = TempDir::new().unwrap();
        let models = dir.path().join("models");
        fs::create_dir(&models).unwrap();
        fs::write(
            models.join("Generated.ts"),
            format!("export interface GeneratedInterface {{\n{}}}\n", body),
        )
        .unwrap();

        let args = CliArgs {
            path: Some("models".into()),
            type_pattern: Some("Interface$".to_string()),
            ..Default::default()
        };
        let config = ConfigManager::resolve_from(&args, dir.path(), Some(dir.path())).unwrap();
        let artifact = dir.path().join("schema/GeneratedInterfaceJSC.ts");

        let first_run = pipeline::run(&config).unwrap();
        prop_assert!(matches!(first_run, RunOutcome::Completed(_)));
        let first = fs::read(&artifact).unwrap();
        pipeline::run(&config).unwrap();
        let second = fs::read(&artifact).unwrap();

        prop_assert_eq!(first, second);
    }
}
