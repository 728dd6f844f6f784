//! JSDoc annotations as schema keywords.

use serde_json::Value;
use tracing::debug;

use crate::parser::JsDoc;

const NUMBER_TAGS: &[&str] = &[
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "multipleOf",
    "minLength",
    "maxLength",
    "minItems",
    "maxItems",
    "minProperties",
    "maxProperties",
];

const STRING_TAGS: &[&str] = &["pattern", "format", "title"];

const JSON_TAGS: &[&str] = &["default", "examples", "const"];

const BOOLEAN_TAGS: &[&str] = &["additionalProperties", "uniqueItems"];

/// Copy the description and recognised tags of `doc` onto `schema`.
///
/// Later tags override earlier ones and override keywords the translator
/// already set. Non-object schemas are left untouched.
pub(crate) fn apply(schema: &mut Value, doc: &JsDoc) {
    let Value::Object(map) = schema else {
        return;
    };
    if let Some(description) = &doc.description {
        map.insert("description".to_string(), Value::String(description.clone()));
    }
    for tag in &doc.tags {
        if let Some(value) = tag_value(&tag.name, &tag.value) {
            map.insert(tag.name.clone(), value);
        }
    }
}

fn tag_value(name: &str, raw: &str) -> Option<Value> {
    if NUMBER_TAGS.contains(&name) {
        let parsed = raw.parse::<f64>().ok().map(number_value);
        if parsed.is_none() {
            debug!(tag = name, value = raw, "Ignoring non-numeric annotation");
        }
        return parsed;
    }
    if STRING_TAGS.contains(&name) {
        return (!raw.is_empty()).then(|| Value::String(raw.to_string()));
    }
    if JSON_TAGS.contains(&name) {
        return Some(serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())));
    }
    if BOOLEAN_TAGS.contains(&name) {
        return match raw {
            "" | "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        };
    }
    None
}

/// JSON number for an `f64`, integral values without a fractional part.
pub(crate) fn number_value(n: f64) -> Value {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE {
        return Value::from(n as i64);
    }
    serde_json::Number::from_f64(n)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
