//! Whole-program symbol index.
//!
//! A [`Program`] is built from a set of source files. Every file is read and
//! parsed up front, and the resulting declarations are indexed by name in
//! file order. Relative imports are followed so that referenced types from
//! files outside the selection still resolve; only the given files
//! contribute enumerable names. Both schema backends resolve references
//! through this index.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::BackendError;
use crate::parser::{parse_source, Declaration, DeclarationKind, Member, TypeExpr};

/// Global type names the translator knows how to map.
pub(crate) const BUILTIN_TYPES: &[&str] = &[
    "Date",
    "Array",
    "ReadonlyArray",
    "Record",
    "Partial",
    "Required",
    "Readonly",
    "Pick",
    "Omit",
    "String",
    "Number",
    "Boolean",
    "Object",
];

/// Declarations from a set of TypeScript files, indexed by name.
#[derive(Debug, Clone, Default)]
pub struct Program {
    order: Vec<String>,
    symbols: HashMap<String, Declaration>,
}

impl Program {
    /// Read and parse every file, then every file reachable from them
    /// through relative imports.
    pub fn from_files<P: AsRef<Path>>(files: &[P]) -> Result<Self, BackendError> {
        let mut program = Self::default();
        let mut loaded = HashSet::new();
        let mut pending = Vec::new();

        for file in files {
            let path = file.as_ref();
            loaded.insert(canonical(path));
            let source = read_source(path)?;
            pending.extend(program.add_source(path, &source, true)?);
        }

        let mut imported = 0usize;
        while let Some(path) = pending.pop() {
            if !loaded.insert(canonical(&path)) {
                continue;
            }
            let source = read_source(&path)?;
            pending.extend(program.add_source(&path, &source, false)?);
            imported += 1;
        }

        debug!(
            files = files.len(),
            imported,
            symbols = program.order.len(),
            "Built program symbol index"
        );
        Ok(program)
    }

    /// Build from in-memory `(path, source)` pairs.
    pub fn from_sources<'a, I>(sources: I) -> Result<Self, BackendError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut program = Self::default();
        for (path, source) in sources {
            program.add_source(Path::new(path), source, true)?;
        }
        Ok(program)
    }

    /// Index one file's declarations and return the files its relative
    /// imports resolve to. Names from non-user files are not enumerated.
    fn add_source(
        &mut self,
        path: &Path,
        source: &str,
        user: bool,
    ) -> Result<Vec<PathBuf>, BackendError> {
        let module = parse_source(source).map_err(|source| BackendError::Syntax {
            path: path.to_path_buf(),
            source,
        })?;
        trace!(
            path = %path.display(),
            declarations = module.declarations.len(),
            user,
            "Parsed source file"
        );
        for declaration in module.declarations {
            self.insert(declaration, user);
        }

        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(module
            .imports
            .iter()
            .filter_map(|specifier| {
                let resolved = resolve_import(dir, specifier);
                if resolved.is_none() && is_relative(specifier) {
                    debug!(from = %path.display(), specifier, "Relative import not found");
                }
                resolved
            })
            .collect())
    }

    fn insert(&mut self, declaration: Declaration, user: bool) {
        let Some(existing) = self.symbols.get_mut(&declaration.name) else {
            if user {
                self.order.push(declaration.name.clone());
            }
            self.symbols.insert(declaration.name.clone(), declaration);
            return;
        };

        match (&mut existing.kind, declaration.kind) {
            (
                DeclarationKind::Interface { extends, members },
                DeclarationKind::Interface {
                    extends: more_extends,
                    members: more_members,
                },
            ) => {
                extends.extend(more_extends);
                members.extend(more_members);
                existing.exported |= declaration.exported;
                if existing.doc.is_empty() {
                    existing.doc = declaration.doc;
                }
                debug!(name = %declaration.name, "Merged interface declarations");
            }
            _ => {
                debug!(
                    name = %declaration.name,
                    line = declaration.line,
                    "Ignoring duplicate declaration"
                );
            }
        }
    }

    /// Every declared type name, exported or not, in file order.
    pub fn user_symbols(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Look up a declaration by name.
    pub fn lookup(&self, name: &str) -> Option<&Declaration> {
        self.symbols.get(name)
    }

    /// Number of distinct declarations from the given files.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Referenced type names that resolve to neither a declaration, a type
    /// parameter in scope, nor a supported global. Sorted, without duplicates.
    pub fn unresolved_references(&self) -> Vec<String> {
        let mut unresolved = BTreeSet::new();
        for name in &self.order {
            let Some(declaration) = self.symbols.get(name) else {
                continue;
            };
            let scope: Vec<&str> = declaration
                .type_params
                .iter()
                .map(|p| p.name.as_str())
                .collect();
            let mut check = |reference: &str| {
                if !self.resolves(reference, &scope) {
                    unresolved.insert(reference.to_string());
                }
            };

            for param in &declaration.type_params {
                if let Some(default) = &param.default {
                    visit_references(default, &mut check);
                }
            }
            match &declaration.kind {
                DeclarationKind::Interface { extends, members } => {
                    for base in extends {
                        visit_references(base, &mut check);
                    }
                    visit_members(members, &mut check);
                }
                DeclarationKind::Class { extends, members } => {
                    if let Some(base) = extends {
                        visit_references(base, &mut check);
                    }
                    visit_members(members, &mut check);
                }
                DeclarationKind::Alias(ty) => visit_references(ty, &mut check),
                DeclarationKind::Enum(_) => {}
            }
        }
        unresolved.into_iter().collect()
    }

    fn resolves(&self, reference: &str, scope: &[&str]) -> bool {
        let head = reference.split('.').next().unwrap_or(reference);
        if reference.contains('.') {
            return self
                .symbols
                .get(head)
                .is_some_and(|d| matches!(d.kind, DeclarationKind::Enum(_)));
        }
        self.symbols.contains_key(reference)
            || scope.contains(&reference)
            || BUILTIN_TYPES.contains(&reference)
    }
}

fn read_source(path: &Path) -> Result<String, BackendError> {
    std::fs::read_to_string(path).map_err(|source| BackendError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn canonical(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn is_relative(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../")
}

/// Map a relative specifier to an existing TypeScript file.
///
/// `./Book` tries `Book.ts`, `Book.d.ts`, `Book.tsx` and `Book/index.ts`;
/// a `.js` suffix is swapped for `.ts`. Package imports are ignored.
fn resolve_import(dir: &Path, specifier: &str) -> Option<PathBuf> {
    if !is_relative(specifier) {
        return None;
    }
    let base = dir.join(specifier);
    let raw = base.to_string_lossy();

    let mut candidates = Vec::new();
    if raw.ends_with(".ts") || raw.ends_with(".tsx") {
        candidates.push(base.clone());
    }
    if let Some(stem) = raw.strip_suffix(".js") {
        candidates.push(PathBuf::from(format!("{}.ts", stem)));
    }
    for suffix in [".ts", ".d.ts", ".tsx"] {
        candidates.push(PathBuf::from(format!("{}{}", raw, suffix)));
    }
    candidates.push(base.join("index.ts"));
    candidates.push(base.join("index.d.ts"));

    candidates.into_iter().find(|candidate| candidate.is_file())
}

fn visit_members(members: &[Member], f: &mut impl FnMut(&str)) {
    for member in members {
        match member {
            Member::Property(property) => {
                if let Some(ty) = &property.ty {
                    visit_references(ty, f);
                }
            }
            Member::Index(index) => {
                visit_references(&index.key, f);
                visit_references(&index.value, f);
            }
            Member::Method { .. } => {}
        }
    }
}

/// Call `f` with the name of every type reference inside `ty`.
pub(crate) fn visit_references(ty: &TypeExpr, f: &mut impl FnMut(&str)) {
    match ty {
        TypeExpr::Reference { name, args } => {
            f(name);
            for arg in args {
                visit_references(arg, f);
            }
        }
        TypeExpr::Array(inner) => visit_references(inner, f),
        TypeExpr::Tuple(elements) => {
            for element in elements {
                visit_references(&element.ty, f);
            }
        }
        TypeExpr::Object(members) => visit_members(members, f),
        TypeExpr::Union(members) | TypeExpr::Intersection(members) => {
            for member in members {
                visit_references(member, f);
            }
        }
        TypeExpr::Keyword(_)
        | TypeExpr::Literal(_)
        | TypeExpr::Function
        | TypeExpr::Unsupported(_) => {}
    }
}
