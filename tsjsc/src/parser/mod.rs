//! TypeScript declaration front end.
//!
//! This module contains:
//! - The tokenizer
//! - Statement and member parsing (interfaces, aliases, enums, classes)
//! - Type expression parsing
//! - JSDoc extraction
//!
//! Anything that is not a type declaration (functions, variables,
//! namespaces, imports) is skipped by bracket depth; import specifiers
//! are recorded on the way.

pub mod ast;
pub mod declarations;
pub mod jsdoc;
pub mod lexer;
mod types;

pub use ast::{
    Declaration, DeclarationKind, EnumMember, EnumValue, IndexSignature, Keyword, LiteralType,
    Member, PropertySignature, SourceModule, TupleElement, TypeExpr, TypeParam,
};
pub use declarations::{parse_module, parse_source, Parser};
pub use jsdoc::{JsDoc, JsDocTag};
