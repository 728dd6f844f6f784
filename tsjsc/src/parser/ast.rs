//! Syntax tree for the declaration subset of TypeScript.

use super::jsdoc::JsDoc;

/// The parts of one source file the front end keeps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceModule {
    /// Type declarations in source order.
    pub declarations: Vec<Declaration>,
    /// Module specifiers of `import` and `export ... from` clauses.
    pub imports: Vec<String>,
}

/// A named type declaration at module level.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// Declared name.
    pub name: String,
    /// What kind of declaration this is.
    pub kind: DeclarationKind,
    /// Generic parameters, in order.
    pub type_params: Vec<TypeParam>,
    /// Leading JSDoc.
    pub doc: JsDoc,
    /// Whether the declaration is exported from its module.
    pub exported: bool,
    /// Line of the declared name (1-indexed).
    pub line: usize,
}

impl Declaration {
    /// Whether the declaration takes type parameters.
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }
}

/// Declaration kinds that can produce a schema.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclarationKind {
    /// `interface Name extends A, B { ... }`
    Interface {
        extends: Vec<TypeExpr>,
        members: Vec<Member>,
    },
    /// `type Name = ...`
    Alias(TypeExpr),
    /// `enum Name { ... }`
    Enum(Vec<EnumMember>),
    /// `class Name extends Base { ... }`
    Class {
        extends: Option<TypeExpr>,
        members: Vec<Member>,
    },
}

/// Generic parameter with optional default.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    pub name: String,
    pub default: Option<TypeExpr>,
}

/// Enum member with its resolved value.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub name: String,
    pub value: EnumValue,
}

/// Enum member value (explicit or auto-incremented).
#[derive(Debug, Clone, PartialEq)]
pub enum EnumValue {
    Number(f64),
    String(String),
    /// Computed initializer; its value is not known statically.
    Computed,
}

/// Member of an interface, class or object type literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Property(PropertySignature),
    Index(IndexSignature),
    /// Method, accessor, constructor or call signature.
    Method { name: String },
}

/// `name?: Type`
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySignature {
    pub name: String,
    pub optional: bool,
    pub readonly: bool,
    /// Missing for class fields without an annotation.
    pub ty: Option<TypeExpr>,
    pub doc: JsDoc,
}

/// `[key: string]: Type`
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSignature {
    pub key: TypeExpr,
    pub value: TypeExpr,
}

/// Type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Keyword(Keyword),
    Literal(LiteralType),
    /// Named type with optional type arguments (`Foo`, `Array<T>`, `ns.Foo`).
    Reference { name: String, args: Vec<TypeExpr> },
    /// `T[]`
    Array(Box<TypeExpr>),
    /// `[A, B?, ...C[]]`
    Tuple(Vec<TupleElement>),
    /// `{ a: string }`
    Object(Vec<Member>),
    Union(Vec<TypeExpr>),
    Intersection(Vec<TypeExpr>),
    /// Function or constructor type.
    Function,
    /// Parsed but without a schema mapping (`keyof T`, conditional types, ...).
    Unsupported(String),
}

impl TypeExpr {
    /// Reference without type arguments.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Reference {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Whether the type is `undefined` or `void`, or a union containing one.
    pub fn admits_undefined(&self) -> bool {
        match self {
            Self::Keyword(Keyword::Undefined | Keyword::Void) => true,
            Self::Union(members) => members.iter().any(Self::admits_undefined),
            _ => false,
        }
    }
}

/// Built-in keyword types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    String,
    Number,
    Boolean,
    BigInt,
    Null,
    Undefined,
    Void,
    Any,
    Unknown,
    Never,
    Object,
    Symbol,
}

impl Keyword {
    /// Keyword for a type-position identifier.
    pub fn from_ident(ident: &str) -> Option<Self> {
        let keyword = match ident {
            "string" => Self::String,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "bigint" => Self::BigInt,
            "null" => Self::Null,
            "undefined" => Self::Undefined,
            "void" => Self::Void,
            "any" => Self::Any,
            "unknown" => Self::Unknown,
            "never" => Self::Never,
            "object" => Self::Object,
            "symbol" => Self::Symbol,
            _ => return None,
        };
        Some(keyword)
    }
}

/// Literal type.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralType {
    String(String),
    Number(f64),
    Boolean(bool),
}

/// Tuple element.
#[derive(Debug, Clone, PartialEq)]
pub struct TupleElement {
    pub ty: TypeExpr,
    pub optional: bool,
    pub rest: bool,
}
