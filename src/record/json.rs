use serde_json::Value as Json;

use super::{ConvertError, Record, Value};
use crate::schema::{Field, FieldKind, PhysicalType, Repetition, SchemaDefinition};

/// Convert a JSON object into a [`Record`] shaped by `schema`
///
/// Numbers are narrowed to the column's physical type; strings become bytes;
/// `null` and missing keys become [`Value::Null`]. Keys the schema does not
/// know are rejected.
pub fn record_from_json(schema: &SchemaDefinition, json: &Json) -> Result<Record, ConvertError> {
    object_to_record(schema.fields(), json, "")
}

fn object_to_record(fields: &[Field], json: &Json, parent: &str) -> Result<Record, ConvertError> {
    let object = json.as_object().ok_or_else(|| ConvertError::Mismatch {
        path: if parent.is_empty() { "<root>".to_string() } else { parent.to_string() },
        expected: "object".to_string(),
        found: json_kind(json).to_string(),
    })?;

    let mut record = Record::with_capacity(object.len());
    for (key, value) in object {
        let path = join(parent, key);
        let field = fields
            .iter()
            .find(|f| &f.name == key)
            .ok_or_else(|| ConvertError::UnknownField(path.clone()))?;
        record.insert(key.clone(), field_value(field, value, &path)?);
    }
    Ok(record)
}

fn field_value(field: &Field, json: &Json, path: &str) -> Result<Value, ConvertError> {
    if json.is_null() {
        return Ok(Value::Null);
    }
    if field.repetition == Repetition::Repeated {
        let items = json.as_array().ok_or_else(|| ConvertError::Mismatch {
            path: path.to_string(),
            expected: "array".to_string(),
            found: json_kind(json).to_string(),
        })?;
        return items
            .iter()
            .map(|item| element_value(field, item, path))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List);
    }
    element_value(field, json, path)
}

fn element_value(field: &Field, json: &Json, path: &str) -> Result<Value, ConvertError> {
    if json.is_null() {
        return Ok(Value::Null);
    }
    match &field.kind {
        FieldKind::Group(children) => object_to_record(children, json, path).map(Value::Group),
        FieldKind::Primitive(physical) => primitive_value(*physical, json, path),
    }
}

fn primitive_value(physical: PhysicalType, json: &Json, path: &str) -> Result<Value, ConvertError> {
    let mismatch = |expected: &str| ConvertError::Mismatch {
        path: path.to_string(),
        expected: expected.to_string(),
        found: json_kind(json).to_string(),
    };

    match physical {
        PhysicalType::Boolean => json.as_bool().map(Value::Boolean).ok_or_else(|| mismatch("boolean")),
        PhysicalType::Int32 => {
            let n = json.as_i64().ok_or_else(|| mismatch("integer"))?;
            i32::try_from(n)
                .map(Value::Int32)
                .map_err(|_| ConvertError::OutOfRange {
                    path: path.to_string(),
                    value: n.to_string(),
                    target: "int32".to_string(),
                })
        }
        PhysicalType::Int64 => json.as_i64().map(Value::Int64).ok_or_else(|| mismatch("integer")),
        PhysicalType::Float => json
            .as_f64()
            .map(|f| Value::Float(f as f32))
            .ok_or_else(|| mismatch("number")),
        PhysicalType::Double => json.as_f64().map(Value::Double).ok_or_else(|| mismatch("number")),
        PhysicalType::ByteArray | PhysicalType::FixedLenByteArray(_) => json
            .as_str()
            .map(|s| Value::Bytes(s.as_bytes().to_vec()))
            .ok_or_else(|| mismatch("string")),
    }
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(n) if n.is_f64() => "float",
        Json::Number(_) => "integer",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}
