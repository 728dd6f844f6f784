//! Type-to-schema translation.
//!
//! [`SchemaBuilder`] walks declarations from a [`Program`] and produces
//! JSON Schema values. Non-generic named types become `$ref`s into a
//! `definitions` table that is filled breadth first by [`SchemaBuilder::finish`].
//! Generic types are expanded inline: type arguments are substituted into the
//! declaration body before translation, so every translated type is closed.

use std::collections::{HashMap, HashSet, VecDeque};

use serde_json::{json, Map, Value};
use tracing::trace;

use super::annotations::{self, number_value};
use crate::error::{GenerateCause, GenerateResult};
use crate::parser::{
    Declaration, DeclarationKind, EnumValue, JsDoc, Keyword, LiteralType, Member, TupleElement,
    TypeExpr,
};
use crate::program::Program;

/// Nesting limit for generic expansion and inheritance.
const MAX_EXPANSION_DEPTH: usize = 32;

/// Backend-specific translation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    /// Keep `null` in unions. When off, `T | null` translates as `T`.
    pub strict_null_checks: bool,
    /// Emit `required` for non-optional properties.
    pub required: bool,
    /// `additionalProperties` for object schemas without an index signature.
    /// `None` leaves the keyword out.
    pub additional_properties: Option<bool>,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            strict_null_checks: true,
            required: true,
            additional_properties: None,
        }
    }
}

type Env = HashMap<String, TypeExpr>;

/// Structural view of an object type, used for inheritance and utility types.
#[derive(Debug, Clone, Default)]
struct ObjectShape {
    properties: Vec<ShapeProperty>,
    index: Option<TypeExpr>,
}

#[derive(Debug, Clone)]
struct ShapeProperty {
    name: String,
    optional: bool,
    ty: Option<TypeExpr>,
    doc: JsDoc,
}

impl ObjectShape {
    /// Overlay `other`: same-named properties are replaced in place.
    fn merge(&mut self, other: ObjectShape) {
        for property in other.properties {
            match self.properties.iter_mut().find(|p| p.name == property.name) {
                Some(existing) => *existing = property,
                None => self.properties.push(property),
            }
        }
        if other.index.is_some() {
            self.index = other.index;
        }
    }
}

/// Translates declarations of one [`Program`] under one [`Dialect`].
pub struct SchemaBuilder<'a> {
    program: &'a Program,
    dialect: Dialect,
    definitions: Map<String, Value>,
    pending: VecDeque<String>,
    queued: HashSet<String>,
    depth: usize,
}

impl<'a> SchemaBuilder<'a> {
    pub fn new(program: &'a Program, dialect: Dialect) -> Self {
        Self {
            program,
            dialect,
            definitions: Map::new(),
            pending: VecDeque::new(),
            queued: HashSet::new(),
            depth: 0,
        }
    }

    /// Schema for a declaration. Type parameters take their defaults, or `{}`.
    pub fn root(&mut self, declaration: &Declaration) -> GenerateResult<Value> {
        self.declaration_schema(declaration, &[])
    }

    /// Queue a named declaration for `definitions`; returns its `$ref`.
    pub fn define(&mut self, name: &str) -> Value {
        if self.queued.insert(name.to_string()) {
            self.pending.push_back(name.to_string());
        }
        json!({ "$ref": format!("#/definitions/{}", name) })
    }

    /// Translate every queued definition, including ones queued on the way.
    pub fn finish(mut self) -> GenerateResult<Map<String, Value>> {
        while let Some(name) = self.pending.pop_front() {
            let program = self.program;
            let declaration = program
                .lookup(&name)
                .ok_or_else(|| GenerateCause::UnknownReference(name.clone()))?;
            let schema = self.declaration_schema(declaration, &[])?;
            trace!(definition = %name, "Added definition");
            self.definitions.insert(name, schema);
        }
        Ok(self.definitions)
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn declaration_schema(
        &mut self,
        declaration: &Declaration,
        args: &[TypeExpr],
    ) -> GenerateResult<Value> {
        let mut schema = match &declaration.kind {
            DeclarationKind::Interface { .. } | DeclarationKind::Class { .. } => {
                // Members are translated inside the expansion so that a
                // self-referencing generic hits the depth limit.
                self.nested(&declaration.name, |builder| {
                    let shape = builder.declaration_shape(declaration, args)?;
                    builder.object_schema(shape)
                })?
            }
            DeclarationKind::Alias(ty) => {
                let env = self.bind_params(declaration, args)?;
                let body = substitute(ty, &env);
                self.nested(&declaration.name, |builder| builder.translate(&body))?
            }
            DeclarationKind::Enum(members) => {
                let mut values = Vec::with_capacity(members.len());
                for member in members {
                    values.push(enum_value(&declaration.name, &member.name, &member.value)?);
                }
                enum_schema(values)
            }
        };
        annotations::apply(&mut schema, &declaration.doc);
        Ok(schema)
    }

    /// Map type parameters to arguments, filling in defaults.
    fn bind_params(&self, declaration: &Declaration, args: &[TypeExpr]) -> GenerateResult<Env> {
        let params = &declaration.type_params;
        if args.len() > params.len() {
            return Err(GenerateCause::Arity {
                name: declaration.name.clone(),
                expected: params.len(),
                found: args.len(),
            });
        }
        let mut env = Env::new();
        for (i, param) in params.iter().enumerate() {
            let bound = match (args.get(i), &param.default) {
                (Some(arg), _) => arg.clone(),
                (None, Some(default)) => substitute(default, &env),
                (None, None) => TypeExpr::Keyword(Keyword::Any),
            };
            env.insert(param.name.clone(), bound);
        }
        Ok(env)
    }

    /// Run `f` one expansion level deeper.
    fn nested<T>(
        &mut self,
        name: &str,
        f: impl FnOnce(&mut Self) -> GenerateResult<T>,
    ) -> GenerateResult<T> {
        if self.depth >= MAX_EXPANSION_DEPTH {
            return Err(GenerateCause::RecursiveExpansion(name.to_string()));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn declaration_shape(
        &mut self,
        declaration: &Declaration,
        args: &[TypeExpr],
    ) -> GenerateResult<ObjectShape> {
        let env = self.bind_params(declaration, args)?;
        self.nested(&declaration.name, |builder| match &declaration.kind {
            DeclarationKind::Interface { extends, members } => {
                let mut shape = ObjectShape::default();
                for base in extends {
                    shape.merge(builder.object_shape(&substitute(base, &env))?);
                }
                shape.merge(shape_from_members(members, &env));
                Ok(shape)
            }
            DeclarationKind::Class { extends, members } => {
                let mut shape = match extends {
                    Some(base) => builder.object_shape(&substitute(base, &env))?,
                    None => ObjectShape::default(),
                };
                shape.merge(shape_from_members(members, &env));
                Ok(shape)
            }
            DeclarationKind::Alias(ty) => builder.object_shape(&substitute(ty, &env)),
            DeclarationKind::Enum(_) => Err(GenerateCause::Unsupported(format!(
                "enum '{}' used as an object type",
                declaration.name
            ))),
        })
    }

    fn object_shape(&mut self, ty: &TypeExpr) -> GenerateResult<ObjectShape> {
        match ty {
            TypeExpr::Object(members) => Ok(shape_from_members(members, &Env::new())),
            TypeExpr::Intersection(parts) => {
                let mut shape = ObjectShape::default();
                for part in parts {
                    shape.merge(self.object_shape(part)?);
                }
                Ok(shape)
            }
            TypeExpr::Reference { name, args } => {
                let program = self.program;
                if let Some(declaration) = program.lookup(name) {
                    return self.declaration_shape(declaration, args);
                }
                self.utility_shape(name, args)?
                    .ok_or_else(|| GenerateCause::UnknownReference(name.clone()))
            }
            other => Err(GenerateCause::Unsupported(format!(
                "{} is not an object type",
                describe(other)
            ))),
        }
    }

    /// Shapes of the object-producing utility types.
    fn utility_shape(
        &mut self,
        name: &str,
        args: &[TypeExpr],
    ) -> GenerateResult<Option<ObjectShape>> {
        let arity = match name {
            "Partial" | "Required" | "Readonly" => 1,
            "Pick" | "Omit" | "Record" => 2,
            _ => return Ok(None),
        };
        if args.len() != arity {
            return Err(GenerateCause::Arity {
                name: name.to_string(),
                expected: arity,
                found: args.len(),
            });
        }

        let shape = match name {
            "Record" => self.record_shape(&args[0], &args[1])?,
            "Partial" | "Required" | "Readonly" => {
                let mut shape = self.object_shape(&args[0])?;
                for property in &mut shape.properties {
                    match name {
                        "Partial" => property.optional = true,
                        "Required" => {
                            property.optional = false;
                            property.ty = property.ty.take().map(|ty| without_undefined(&ty));
                        }
                        _ => {}
                    }
                }
                shape
            }
            _ => {
                let mut shape = self.object_shape(&args[0])?;
                let keys = self.literal_keys(&args[1])?;
                let keep = name == "Pick";
                shape
                    .properties
                    .retain(|p| keys.contains(&p.name) == keep);
                shape
            }
        };
        Ok(Some(shape))
    }

    fn record_shape(&mut self, key: &TypeExpr, value: &TypeExpr) -> GenerateResult<ObjectShape> {
        match key {
            TypeExpr::Keyword(Keyword::String | Keyword::Number | Keyword::Any) => {
                Ok(ObjectShape {
                    properties: Vec::new(),
                    index: Some(value.clone()),
                })
            }
            _ => {
                let properties = self
                    .literal_keys(key)?
                    .into_iter()
                    .map(|name| ShapeProperty {
                        name,
                        optional: false,
                        ty: Some(value.clone()),
                        doc: JsDoc::default(),
                    })
                    .collect();
                Ok(ObjectShape {
                    properties,
                    index: None,
                })
            }
        }
    }

    /// Property names named by a string literal (union) type.
    fn literal_keys(&self, ty: &TypeExpr) -> GenerateResult<Vec<String>> {
        match ty {
            TypeExpr::Literal(LiteralType::String(key)) => Ok(vec![key.clone()]),
            TypeExpr::Literal(LiteralType::Number(n)) => Ok(vec![n.to_string()]),
            TypeExpr::Union(members) => {
                let mut keys = Vec::new();
                for member in members {
                    keys.extend(self.literal_keys(member)?);
                }
                Ok(keys)
            }
            TypeExpr::Reference { name, args } if args.is_empty() => {
                match self.program.lookup(name).map(|d| &d.kind) {
                    Some(DeclarationKind::Alias(body)) => self.literal_keys(body),
                    Some(_) => Err(GenerateCause::Unsupported(format!(
                        "'{}' is not a set of property names",
                        name
                    ))),
                    None => Err(GenerateCause::UnknownReference(name.clone())),
                }
            }
            other => Err(GenerateCause::Unsupported(format!(
                "{} as a set of property names",
                describe(other)
            ))),
        }
    }

    fn object_schema(&mut self, shape: ObjectShape) -> GenerateResult<Value> {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for property in shape.properties {
            let optional = property.optional
                || property
                    .ty
                    .as_ref()
                    .is_some_and(TypeExpr::admits_undefined);
            let mut schema = match &property.ty {
                Some(ty) => self.translate(ty)?,
                None => json!({}),
            };
            annotations::apply(&mut schema, &property.doc);
            if !optional && self.dialect.required {
                required.push(Value::String(property.name.clone()));
            }
            properties.insert(property.name, schema);
        }

        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("object"));
        if !properties.is_empty() {
            schema.insert("properties".to_string(), Value::Object(properties));
        }
        if !required.is_empty() {
            schema.insert("required".to_string(), Value::Array(required));
        }
        match shape.index {
            Some(index) => {
                let additional = self.translate(&index)?;
                schema.insert("additionalProperties".to_string(), additional);
            }
            None => {
                if let Some(allowed) = self.dialect.additional_properties {
                    schema.insert("additionalProperties".to_string(), Value::Bool(allowed));
                }
            }
        }
        Ok(Value::Object(schema))
    }

    // =========================================================================
    // Type expressions
    // =========================================================================

    /// Translate a closed type expression.
    fn translate(&mut self, ty: &TypeExpr) -> GenerateResult<Value> {
        match ty {
            TypeExpr::Keyword(keyword) => keyword_schema(*keyword),
            TypeExpr::Literal(literal) => Ok(literal_schema(literal)),
            TypeExpr::Reference { name, args } => self.reference(name, args),
            TypeExpr::Array(inner) => Ok(json!({
                "type": "array",
                "items": self.translate(inner)?,
            })),
            TypeExpr::Tuple(elements) => self.tuple(elements),
            TypeExpr::Object(members) => {
                let shape = shape_from_members(members, &Env::new());
                self.object_schema(shape)
            }
            TypeExpr::Union(members) => self.union(members),
            TypeExpr::Intersection(members) => {
                let parts = members
                    .iter()
                    .map(|member| self.translate(member))
                    .collect::<GenerateResult<Vec<_>>>()?;
                Ok(json!({ "allOf": parts }))
            }
            TypeExpr::Function => Err(GenerateCause::Unsupported("function type".to_string())),
            TypeExpr::Unsupported(what) => Err(GenerateCause::Unsupported(what.clone())),
        }
    }

    fn reference(&mut self, name: &str, args: &[TypeExpr]) -> GenerateResult<Value> {
        let program = self.program;
        if let Some(declaration) = program.lookup(name) {
            if declaration.is_generic() || !args.is_empty() {
                return self.declaration_schema(declaration, args);
            }
            return Ok(self.define(name));
        }

        match name {
            "Date" => Ok(json!({ "type": "string", "format": "date-time" })),
            "String" => keyword_schema(Keyword::String),
            "Number" => keyword_schema(Keyword::Number),
            "Boolean" => keyword_schema(Keyword::Boolean),
            "Object" => keyword_schema(Keyword::Object),
            "Array" | "ReadonlyArray" => {
                let items = match args.first() {
                    Some(item) => self.translate(item)?,
                    None => json!({}),
                };
                Ok(json!({ "type": "array", "items": items }))
            }
            _ => {
                if let Some(shape) = self.utility_shape(name, args)? {
                    return self.object_schema(shape);
                }
                if let Some((owner, member)) = name.split_once('.') {
                    return self.enum_member(owner, member, name);
                }
                Err(GenerateCause::UnknownReference(name.to_string()))
            }
        }
    }

    /// `Enum.Member` used as a type.
    fn enum_member(&self, owner: &str, member: &str, full: &str) -> GenerateResult<Value> {
        let Some(DeclarationKind::Enum(members)) = self.program.lookup(owner).map(|d| &d.kind)
        else {
            return Err(GenerateCause::UnknownReference(full.to_string()));
        };
        let found = members
            .iter()
            .find(|m| m.name == member)
            .ok_or_else(|| GenerateCause::UnknownReference(full.to_string()))?;
        let value = enum_value(owner, &found.name, &found.value)?;
        let kind = if value.is_string() { "string" } else { "number" };
        Ok(json!({ "type": kind, "const": value }))
    }

    fn tuple(&mut self, elements: &[TupleElement]) -> GenerateResult<Value> {
        let mut items = Vec::new();
        let mut min_items = 0;
        let mut rest = None;
        for element in elements {
            if element.rest {
                let item = match &element.ty {
                    TypeExpr::Array(inner) => self.translate(inner)?,
                    TypeExpr::Reference { name, args } if name == "Array" && args.len() == 1 => {
                        self.translate(&args[0])?
                    }
                    _ => json!({}),
                };
                rest = Some(item);
                continue;
            }
            if !element.optional {
                min_items += 1;
            }
            items.push(self.translate(&element.ty)?);
        }

        let max_items = items.len();
        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("array"));
        schema.insert("items".to_string(), Value::Array(items));
        schema.insert("minItems".to_string(), json!(min_items));
        match rest {
            Some(item) => {
                schema.insert("additionalItems".to_string(), item);
            }
            None => {
                schema.insert("maxItems".to_string(), json!(max_items));
            }
        }
        Ok(Value::Object(schema))
    }

    fn union(&mut self, members: &[TypeExpr]) -> GenerateResult<Value> {
        let mut flat = Vec::new();
        flatten_union(members, &mut flat);
        let has_null = flat
            .iter()
            .any(|m| matches!(m, TypeExpr::Keyword(Keyword::Null)));
        let kept: Vec<&TypeExpr> = flat
            .into_iter()
            .filter(|m| !matches!(m, TypeExpr::Keyword(Keyword::Undefined | Keyword::Void)))
            .filter(|m| {
                self.dialect.strict_null_checks || !matches!(m, TypeExpr::Keyword(Keyword::Null))
            })
            .collect();

        match kept.as_slice() {
            [] if has_null => return Ok(json!({ "type": "null" })),
            [] => return Ok(json!({ "not": {} })),
            [single] => return self.translate(single),
            _ => {}
        }

        if let Some(types) = primitive_types(&kept) {
            return Ok(json!({ "type": types }));
        }
        if let Some(schema) = literal_enum(&kept) {
            return Ok(schema);
        }

        let mut any_of = Vec::with_capacity(kept.len());
        for member in kept {
            any_of.push(self.translate(member)?);
        }
        Ok(json!({ "anyOf": any_of }))
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn shape_from_members(members: &[Member], env: &Env) -> ObjectShape {
    let mut shape = ObjectShape::default();
    for member in members {
        match member {
            Member::Property(property) => {
                if matches!(property.ty, Some(TypeExpr::Function)) {
                    continue;
                }
                shape.properties.push(ShapeProperty {
                    name: property.name.clone(),
                    optional: property.optional,
                    ty: property.ty.as_ref().map(|ty| substitute(ty, env)),
                    doc: property.doc.clone(),
                });
            }
            Member::Index(index) => {
                if matches!(
                    index.key,
                    TypeExpr::Keyword(Keyword::String | Keyword::Number)
                ) {
                    shape.index = Some(substitute(&index.value, env));
                }
            }
            Member::Method { .. } => {}
        }
    }
    shape
}

/// Replace type parameter references with their bound arguments.
fn substitute(ty: &TypeExpr, env: &Env) -> TypeExpr {
    if env.is_empty() {
        return ty.clone();
    }
    match ty {
        TypeExpr::Reference { name, args } => {
            if args.is_empty() {
                if let Some(bound) = env.get(name) {
                    return bound.clone();
                }
            }
            TypeExpr::Reference {
                name: name.clone(),
                args: args.iter().map(|arg| substitute(arg, env)).collect(),
            }
        }
        TypeExpr::Array(inner) => TypeExpr::Array(Box::new(substitute(inner, env))),
        TypeExpr::Tuple(elements) => TypeExpr::Tuple(
            elements
                .iter()
                .map(|element| TupleElement {
                    ty: substitute(&element.ty, env),
                    optional: element.optional,
                    rest: element.rest,
                })
                .collect(),
        ),
        TypeExpr::Object(members) => TypeExpr::Object(
            members
                .iter()
                .map(|member| match member {
                    Member::Property(property) => {
                        let mut property = property.clone();
                        property.ty = property.ty.map(|ty| substitute(&ty, env));
                        Member::Property(property)
                    }
                    Member::Index(index) => {
                        let mut index = index.clone();
                        index.value = substitute(&index.value, env);
                        Member::Index(index)
                    }
                    method => method.clone(),
                })
                .collect(),
        ),
        TypeExpr::Union(members) => {
            TypeExpr::Union(members.iter().map(|m| substitute(m, env)).collect())
        }
        TypeExpr::Intersection(members) => {
            TypeExpr::Intersection(members.iter().map(|m| substitute(m, env)).collect())
        }
        other => other.clone(),
    }
}

fn flatten_union<'t>(members: &'t [TypeExpr], out: &mut Vec<&'t TypeExpr>) {
    for member in members {
        match member {
            TypeExpr::Union(inner) => flatten_union(inner, out),
            other => out.push(other),
        }
    }
}

fn without_undefined(ty: &TypeExpr) -> TypeExpr {
    match ty {
        TypeExpr::Union(members) => {
            let kept: Vec<TypeExpr> = members
                .iter()
                .filter(|m| !m.admits_undefined())
                .cloned()
                .collect();
            match kept.len() {
                1 => kept.into_iter().next().unwrap_or(TypeExpr::Keyword(Keyword::Any)),
                _ => TypeExpr::Union(kept),
            }
        }
        other => other.clone(),
    }
}

fn keyword_schema(keyword: Keyword) -> GenerateResult<Value> {
    let schema = match keyword {
        Keyword::String => json!({ "type": "string" }),
        Keyword::Number => json!({ "type": "number" }),
        Keyword::Boolean => json!({ "type": "boolean" }),
        Keyword::BigInt => json!({ "type": "integer" }),
        Keyword::Null => json!({ "type": "null" }),
        Keyword::Object => json!({ "type": "object" }),
        Keyword::Any | Keyword::Unknown => json!({}),
        Keyword::Never | Keyword::Undefined | Keyword::Void => json!({ "not": {} }),
        Keyword::Symbol => return Err(GenerateCause::Unsupported("symbol type".to_string())),
    };
    Ok(schema)
}

fn primitive_name(keyword: Keyword) -> Option<&'static str> {
    match keyword {
        Keyword::String => Some("string"),
        Keyword::Number => Some("number"),
        Keyword::Boolean => Some("boolean"),
        Keyword::BigInt => Some("integer"),
        Keyword::Null => Some("null"),
        _ => None,
    }
}

/// `string | number | null` as a `type` array, when every member is a primitive keyword.
fn primitive_types(members: &[&TypeExpr]) -> Option<Vec<&'static str>> {
    let mut types = Vec::new();
    for member in members {
        let TypeExpr::Keyword(keyword) = member else {
            return None;
        };
        let name = primitive_name(*keyword)?;
        if !types.contains(&name) {
            types.push(name);
        }
    }
    Some(types)
}

fn literal_schema(literal: &LiteralType) -> Value {
    match literal {
        LiteralType::String(s) => json!({ "type": "string", "const": s }),
        LiteralType::Number(n) => json!({ "type": "number", "const": number_value(*n) }),
        LiteralType::Boolean(b) => json!({ "type": "boolean", "const": b }),
    }
}

/// Literal unions (optionally with `null`) as `enum`; `true | false` as boolean.
fn literal_enum(members: &[&TypeExpr]) -> Option<Value> {
    let mut values = Vec::new();
    let mut types: Vec<&'static str> = Vec::new();
    for member in members {
        let (value, kind) = match member {
            TypeExpr::Literal(LiteralType::String(s)) => (json!(s), "string"),
            TypeExpr::Literal(LiteralType::Number(n)) => (number_value(*n), "number"),
            TypeExpr::Literal(LiteralType::Boolean(b)) => (json!(b), "boolean"),
            TypeExpr::Keyword(Keyword::Null) => (Value::Null, "null"),
            _ => return None,
        };
        if !values.contains(&value) {
            values.push(value);
        }
        if !types.contains(&kind) {
            types.push(kind);
        }
    }

    if types == ["boolean"] && values.len() == 2 {
        return Some(json!({ "type": "boolean" }));
    }
    let ty = match types.as_slice() {
        [single] => json!(single),
        many => json!(many),
    };
    Some(json!({ "type": ty, "enum": values }))
}

fn enum_value(owner: &str, member: &str, value: &EnumValue) -> GenerateResult<Value> {
    match value {
        EnumValue::Number(n) => Ok(number_value(*n)),
        EnumValue::String(s) => Ok(Value::String(s.clone())),
        EnumValue::Computed => Err(GenerateCause::Unsupported(format!(
            "computed value of enum member '{}.{}'",
            owner, member
        ))),
    }
}

fn enum_schema(values: Vec<Value>) -> Value {
    let has_number = values.iter().any(Value::is_number);
    let has_string = values.iter().any(Value::is_string);
    let ty = match (has_number, has_string) {
        (true, true) => json!(["number", "string"]),
        (false, true) => json!("string"),
        _ => json!("number"),
    };
    json!({ "type": ty, "enum": values })
}

fn describe(ty: &TypeExpr) -> String {
    match ty {
        TypeExpr::Keyword(keyword) => format!("{:?}", keyword).to_lowercase(),
        TypeExpr::Literal(_) => "literal type".to_string(),
        TypeExpr::Reference { name, .. } => format!("'{}'", name),
        TypeExpr::Array(_) => "array type".to_string(),
        TypeExpr::Tuple(_) => "tuple type".to_string(),
        TypeExpr::Object(_) => "object type".to_string(),
        TypeExpr::Union(_) => "union type".to_string(),
        TypeExpr::Intersection(_) => "intersection type".to_string(),
        TypeExpr::Function => "function type".to_string(),
        TypeExpr::Unsupported(what) => what.clone(),
    }
}
