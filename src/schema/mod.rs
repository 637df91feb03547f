//! # Schema definitions
//!
//! A [`SchemaDefinition`] describes the logical record tree written to a file.
//! It can be built programmatically from [`Field`]s or parsed from the usual
//! Parquet message syntax:
//!
//! ```text
//! message event {
//!   required int64 id;
//!   optional binary name (STRING);
//!   optional group location {
//!     required double lat;
//!     required double lon;
//!   }
//!   repeated binary tags (UTF8);
//! }
//! ```
//!
//! A definition is validated once when it is created, so every instance held
//! by a writer is structurally sound. The footer stores the tree flattened
//! depth-first ([`SchemaDefinition::to_schema_elements`]); the serializer works
//! on its leaves ([`SchemaDefinition::columns`]).

mod error;
mod parser;
mod types;


use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::format::{FieldRepetitionType, SchemaElement, ThriftConvertedType};

pub use error::SchemaError;
pub use types::{ColumnDescriptor, ConvertedType, Field, FieldKind, PhysicalType, Repetition};

/// Nesting deeper than this cannot be represented by 16-bit levels in practice
const MAX_DEPTH: usize = 128;

/// A validated schema tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDefinition {
    name: String,
    fields: Vec<Field>,
}

impl SchemaDefinition {
    /// Build and validate a schema from top-level fields
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Result<Self, SchemaError> {
        let name = name.into();
        if fields.is_empty() {
            return Err(SchemaError::Empty(name));
        }
        validate_fields(&fields, "", 1)?;
        Ok(Self { name, fields })
    }

    /// Parse the textual `message name { ... }` form
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        let (name, fields) = parser::parse(text)?;
        Self::new(name, fields)
    }

    /// Message name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Top-level fields
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a top-level field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether every top-level field is a leaf column
    pub fn is_flat(&self) -> bool {
        self.fields
            .iter()
            .all(|f| matches!(f.kind, FieldKind::Primitive(_)))
    }

    /// Flatten the tree depth-first, root element first
    pub fn to_schema_elements(&self) -> Vec<SchemaElement> {
        let mut out = Vec::with_capacity(1 + self.fields.len());
        out.push(schema_element(
            self.name.clone(),
            None,
            Some(self.fields.len() as i32),
            None,
        ));
        for field in &self.fields {
            flatten_field(field, &mut out);
        }
        out
    }

    /// Leaf columns in schema order
    pub fn columns(&self) -> Vec<ColumnDescriptor> {
        let mut out = Vec::new();
        let mut path = Vec::new();
        for field in &self.fields {
            collect_columns(field, &mut path, 0, 0, &mut out);
        }
        out
    }
}

impl FromStr for SchemaDefinition {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SchemaDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "message {} {{", self.name)?;
        for field in &self.fields {
            write_field(f, field, 1)?;
        }
        write!(f, "}}")
    }
}

fn write_field(f: &mut fmt::Formatter<'_>, field: &Field, indent: usize) -> fmt::Result {
    let pad = "  ".repeat(indent);
    let annotation = field
        .converted_type
        .map(|c| format!(" ({})", c))
        .unwrap_or_default();
    match &field.kind {
        FieldKind::Primitive(physical) => writeln!(
            f,
            "{}{} {} {}{};",
            pad, field.repetition, physical, field.name, annotation
        ),
        FieldKind::Group(children) => {
            writeln!(
                f,
                "{}{} group {}{} {{",
                pad, field.repetition, field.name, annotation
            )?;
            for child in children {
                write_field(f, child, indent + 1)?;
            }
            writeln!(f, "{}}}", pad)
        }
    }
}

fn validate_fields(fields: &[Field], parent: &str, depth: usize) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    for field in fields {
        let path = if parent.is_empty() {
            field.name.clone()
        } else {
            format!("{}.{}", parent, field.name)
        };
        let invalid = |message: String| SchemaError::InvalidField {
            path: path.clone(),
            message,
        };

        if field.name.is_empty() {
            return Err(invalid("field name is empty".to_string()));
        }
        if !seen.insert(field.name.as_str()) {
            return Err(invalid("duplicate field name".to_string()));
        }
        if depth > MAX_DEPTH {
            return Err(invalid(format!("nesting deeper than {} levels", MAX_DEPTH)));
        }

        match &field.kind {
            FieldKind::Primitive(physical) => {
                if let PhysicalType::FixedLenByteArray(n) = physical {
                    if *n <= 0 {
                        return Err(invalid(format!("fixed length must be positive, got {}", n)));
                    }
                }
                if let Some(ct) = field.converted_type {
                    if !ct.accepts_primitive(*physical) {
                        return Err(invalid(format!("annotation {} not valid for {}", ct, physical)));
                    }
                }
            }
            FieldKind::Group(children) => {
                if children.is_empty() {
                    return Err(invalid("group has no fields".to_string()));
                }
                if let Some(ct) = field.converted_type {
                    if !ct.accepts_group() {
                        return Err(invalid(format!("annotation {} not valid for a group", ct)));
                    }
                }
                validate_fields(children, &path, depth + 1)?;
            }
        }
    }
    Ok(())
}

fn flatten_field(field: &Field, out: &mut Vec<SchemaElement>) {
    let repetition = Some(field.repetition.to_thrift());
    let converted_type = field.converted_type.map(|c| c.to_thrift());
    match &field.kind {
        FieldKind::Primitive(physical) => {
            let mut element = schema_element(field.name.clone(), repetition, None, converted_type);
            element.type_ = Some(physical.to_thrift());
            element.type_length = physical.type_length();
            out.push(element);
        }
        FieldKind::Group(children) => {
            out.push(schema_element(
                field.name.clone(),
                repetition,
                Some(children.len() as i32),
                converted_type,
            ));
            for child in children {
                flatten_field(child, out);
            }
        }
    }
}

fn schema_element(
    name: String,
    repetition_type: Option<FieldRepetitionType>,
    num_children: Option<i32>,
    converted_type: Option<ThriftConvertedType>,
) -> SchemaElement {
    SchemaElement {
        type_: None,
        type_length: None,
        repetition_type,
        name,
        num_children,
        converted_type,
        scale: None,
        precision: None,
        field_id: None,
        logical_type: None,
    }
}

fn collect_columns(
    field: &Field,
    path: &mut Vec<String>,
    parent_def: i16,
    parent_rep: i16,
    out: &mut Vec<ColumnDescriptor>,
) {
    let (def, rep) = match field.repetition {
        Repetition::Required => (parent_def, parent_rep),
        Repetition::Optional => (parent_def + 1, parent_rep),
        Repetition::Repeated => (parent_def + 1, parent_rep + 1),
    };
    path.push(field.name.clone());
    match &field.kind {
        FieldKind::Primitive(physical) => out.push(ColumnDescriptor {
            path: path.clone(),
            physical_type: *physical,
            max_def_level: def,
            max_rep_level: rep,
        }),
        FieldKind::Group(children) => {
            for child in children {
                collect_columns(child, path, def, rep, out);
            }
        }
    }
    path.pop();
}
