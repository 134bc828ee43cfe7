//! Value schemas as data.
//!
//! Every structured entity describes its shape once as a [`Schema`]. The same
//! description is rendered into JSON Schema for the model prompt and used by
//! [`decode`] to validate whatever payload comes back, so bounds and closed
//! enumerations are enforced in one place for every pattern.

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use crate::error::{PatternError, Result, SchemaViolation};

#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Boolean,
    String,
    /// Whole number with inclusive bounds.
    Integer { min: i64, max: i64 },
    /// Any JSON number with inclusive bounds.
    Number { min: f64, max: f64 },
    /// String restricted to a closed set of values.
    Enum(&'static [&'static str]),
    Array(Box<FieldType>),
    Object(Vec<Field>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub ty: FieldType,
}

impl Field {
    pub fn boolean(name: &'static str) -> Self {
        Self { name, ty: FieldType::Boolean }
    }

    pub fn string(name: &'static str) -> Self {
        Self { name, ty: FieldType::String }
    }

    pub fn integer(name: &'static str, min: i64, max: i64) -> Self {
        Self { name, ty: FieldType::Integer { min, max } }
    }

    pub fn number(name: &'static str, min: f64, max: f64) -> Self {
        Self { name, ty: FieldType::Number { min, max } }
    }

    pub fn enumeration(name: &'static str, values: &'static [&'static str]) -> Self {
        Self { name, ty: FieldType::Enum(values) }
    }

    pub fn strings(name: &'static str) -> Self {
        Self { name, ty: FieldType::Array(Box::new(FieldType::String)) }
    }

    pub fn objects(name: &'static str, fields: Vec<Field>) -> Self {
        Self {
            name,
            ty: FieldType::Array(Box::new(FieldType::Object(fields))),
        }
    }
}

/// Named top-level object schema. All fields are required; keys not listed
/// are ignored, both when validating and in the rendered JSON Schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub name: &'static str,
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn new(name: &'static str, fields: Vec<Field>) -> Self {
        Self { name, fields }
    }

    /// Collects every violation rather than stopping at the first one.
    pub fn validate(&self, value: &Value) -> Vec<SchemaViolation> {
        let mut violations = Vec::new();
        check_object(&self.fields, value, "$", &mut violations);
        violations
    }

    pub fn to_json_schema(&self) -> Value {
        object_schema(&self.fields)
    }
}

/// An entity that can be produced by a structured model call.
pub trait Structured: DeserializeOwned {
    fn schema() -> Schema;
}

/// Validates `value` against `T::schema()` and decodes it.
pub fn decode<T: Structured>(value: Value) -> Result<T> {
    let schema = T::schema();
    let violations = schema.validate(&value);
    if !violations.is_empty() {
        return Err(PatternError::schema(schema.name, violations));
    }

    serde_json::from_value(value).map_err(|e| {
        PatternError::schema(schema.name, vec![SchemaViolation::new("$", e.to_string())])
    })
}

fn check_object(fields: &[Field], value: &Value, path: &str, out: &mut Vec<SchemaViolation>) {
    let Some(object) = value.as_object() else {
        out.push(SchemaViolation::new(path, format!("expected object, got {}", kind(value))));
        return;
    };

    for field in fields {
        let field_path = format!("{path}.{}", field.name);
        match object.get(field.name) {
            Some(v) => check(&field.ty, v, &field_path, out),
            None => out.push(SchemaViolation::new(field_path, "missing required field")),
        }
    }
}

fn check(ty: &FieldType, value: &Value, path: &str, out: &mut Vec<SchemaViolation>) {
    match ty {
        FieldType::Boolean => {
            if !value.is_boolean() {
                out.push(SchemaViolation::new(path, format!("expected boolean, got {}", kind(value))));
            }
        }
        FieldType::String => {
            if !value.is_string() {
                out.push(SchemaViolation::new(path, format!("expected string, got {}", kind(value))));
            }
        }
        FieldType::Integer { min, max } => match value.as_i64() {
            Some(n) if n < *min || n > *max => out.push(SchemaViolation::new(
                path,
                format!("{n} is outside the range [{min}, {max}]"),
            )),
            Some(_) => {}
            None => out.push(SchemaViolation::new(path, format!("expected integer, got {}", kind(value)))),
        },
        FieldType::Number { min, max } => match value.as_f64() {
            Some(n) if n < *min || n > *max => out.push(SchemaViolation::new(
                path,
                format!("{n} is outside the range [{min}, {max}]"),
            )),
            Some(_) => {}
            None => out.push(SchemaViolation::new(path, format!("expected number, got {}", kind(value)))),
        },
        FieldType::Enum(allowed) => match value.as_str() {
            Some(s) if allowed.contains(&s) => {}
            Some(s) => out.push(SchemaViolation::new(
                path,
                format!("'{s}' is not one of [{}]", allowed.join(", ")),
            )),
            None => out.push(SchemaViolation::new(path, format!("expected string, got {}", kind(value)))),
        },
        FieldType::Array(item) => match value.as_array() {
            Some(items) => {
                for (i, v) in items.iter().enumerate() {
                    check(item, v, &format!("{path}[{i}]"), out);
                }
            }
            None => out.push(SchemaViolation::new(path, format!("expected array, got {}", kind(value)))),
        },
        FieldType::Object(fields) => check_object(fields, value, path, out),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn object_schema(fields: &[Field]) -> Value {
    let mut properties = Map::new();
    for field in fields {
        properties.insert(field.name.to_string(), type_schema(&field.ty));
    }
    let required: Vec<&str> = fields.iter().map(|f| f.name).collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn type_schema(ty: &FieldType) -> Value {
    match ty {
        FieldType::Boolean => json!({ "type": "boolean" }),
        FieldType::String => json!({ "type": "string" }),
        FieldType::Integer { min, max } => json!({ "type": "integer", "minimum": min, "maximum": max }),
        FieldType::Number { min, max } => json!({ "type": "number", "minimum": min, "maximum": max }),
        FieldType::Enum(values) => json!({ "type": "string", "enum": values }),
        FieldType::Array(item) => json!({ "type": "array", "items": type_schema(item) }),
        FieldType::Object(fields) => object_schema(fields),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Schema {
        Schema::new(
            "sample",
            vec![
                Field::boolean("ok"),
                Field::integer("score", 1, 10),
                Field::enumeration("level", &["low", "high"]),
                Field::objects("items", vec![Field::string("name")]),
            ],
        )
    }

    #[test]
    fn test_valid_payload_has_no_violations() {
        let value = json!({
            "ok": true,
            "score": 10,
            "level": "low",
            "items": [{ "name": "a" }],
            "extra": "ignored"
        });
        assert!(sample().validate(&value).is_empty());
    }

    #[test]
    fn test_collects_every_violation() {
        let value = json!({
            "ok": "yes",
            "score": 11,
            "level": "medium",
            "items": [{ "name": 3 }, {}]
        });
        let paths: Vec<String> = sample().validate(&value).into_iter().map(|v| v.path).collect();
        assert_eq!(
            paths,
            vec!["$.ok", "$.score", "$.level", "$.items[0].name", "$.items[1].name"]
        );
    }

    #[test]
    fn test_fractional_number_is_not_an_integer() {
        let value = json!({ "ok": true, "score": 7.5, "level": "low", "items": [] });
        let violations = sample().validate(&value);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].reason.contains("expected integer"));
    }

    #[test]
    fn test_number_accepts_fractions_within_bounds() {
        let schema = Schema::new("temp", vec![Field::number("celsius", 16.0, 40.0)]);
        assert!(schema.validate(&json!({ "celsius": 21.5 })).is_empty());
        assert!(schema.validate(&json!({ "celsius": 40 })).is_empty());

        let violations = schema.validate(&json!({ "celsius": 41.2 }));
        assert_eq!(violations.len(), 1);
        assert!(violations[0].reason.contains("outside the range"));
        assert_eq!(schema.validate(&json!({ "celsius": "warm" }))[0].reason, "expected number, got string");
    }

    #[test]
    fn test_missing_field_and_non_object() {
        let violations = sample().validate(&json!({ "ok": true }));
        assert_eq!(violations.len(), 3);
        assert!(violations.iter().all(|v| v.reason == "missing required field"));

        let violations = sample().validate(&json!([1, 2]));
        assert_eq!(violations, vec![SchemaViolation::new("$", "expected object, got array")]);
    }

    #[test]
    fn test_json_schema_rendering() {
        let rendered = sample().to_json_schema();
        assert_eq!(rendered["properties"]["score"]["maximum"], 10);
        assert_eq!(rendered["properties"]["level"]["enum"], json!(["low", "high"]));
        assert_eq!(rendered["properties"]["items"]["items"]["required"], json!(["name"]));
        assert_eq!(rendered["required"].as_array().map(Vec::len), Some(4));
    }

    #[test]
    fn test_rendered_schema_allows_what_validation_allows() {
        let rendered = sample().to_json_schema();
        assert!(rendered.get("additionalProperties").is_none());
        assert!(rendered["properties"]["items"]["items"].get("additionalProperties").is_none());

        let value = json!({ "ok": true, "score": 1, "level": "high", "items": [{ "name": "a", "note": "x" }] });
        assert!(sample().validate(&value).is_empty());
    }
}
