use super::{ConvertError, Value};
use crate::schema::{Field, FieldKind, PhysicalType, Repetition};

/// Parse a text cell (e.g. from CSV) into a value for `field`
///
/// An empty cell is null. Only non-repeated leaf fields can be read this way.
pub fn parse_text_value(field: &Field, cell: &str) -> Result<Value, ConvertError> {
    let physical = match (&field.kind, field.repetition) {
        (FieldKind::Primitive(p), Repetition::Required | Repetition::Optional) => *p,
        _ => return Err(ConvertError::Nested(field.name.clone())),
    };
    if cell.is_empty() {
        return Ok(Value::Null);
    }

    let parse_error = |target: &str| ConvertError::Parse {
        path: field.name.clone(),
        input: cell.to_string(),
        target: target.to_string(),
    };
    let trimmed = cell.trim();

    match physical {
        PhysicalType::Boolean => match trimmed.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(Value::Boolean(true)),
            "false" | "0" | "no" => Ok(Value::Boolean(false)),
            _ => Err(parse_error("boolean")),
        },
        PhysicalType::Int32 => trimmed
            .parse()
            .map(Value::Int32)
            .map_err(|_| parse_error("int32")),
        PhysicalType::Int64 => trimmed
            .parse()
            .map(Value::Int64)
            .map_err(|_| parse_error("int64")),
        PhysicalType::Float => trimmed
            .parse()
            .map(Value::Float)
            .map_err(|_| parse_error("float")),
        PhysicalType::Double => trimmed
            .parse()
            .map(Value::Double)
            .map_err(|_| parse_error("double")),
        PhysicalType::ByteArray | PhysicalType::FixedLenByteArray(_) => {
            Ok(Value::Bytes(cell.as_bytes().to_vec()))
        }
    }
}
