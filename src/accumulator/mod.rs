//! # Row-group accumulator
//!
//! The accumulator turns row-oriented [`Record`]s into column-oriented
//! buffers, one [`ColumnBuffer`] per leaf of the schema. Nested and repeated
//! data is flattened with definition and repetition levels (record shredding),
//! so each leaf column can be written on its own.
//!
//! The file writer only talks to the narrow [`Accumulator`] trait; the
//! production implementation is [`SchemaAccumulator`].

mod column;
mod error;


use std::ops::Range;

use crate::format::SchemaElement;
use crate::record::{Record, Value};
use crate::schema::{Field, FieldKind, Repetition, SchemaDefinition};

pub use column::{ColumnBuffer, ColumnValues};
pub use error::EncodeError;

/// Buffer for the row group currently being assembled
pub trait Accumulator {
    /// Buffer one record; on error nothing of the record is kept
    fn add_record(&mut self, record: &Record) -> Result<(), EncodeError>;

    /// Estimated PLAIN-encoded size of the buffered values, in bytes
    fn buffered_size(&self) -> u64;

    /// Records buffered since the last reset
    fn num_records(&self) -> u64;

    /// Discard all buffered data
    fn reset(&mut self);

    /// The schema flattened for the footer
    fn schema_elements(&self) -> Vec<SchemaElement>;

    /// Leaf column buffers in schema order
    fn columns(&self) -> &[ColumnBuffer];
}

/// Node of the precomputed shredding tree
#[derive(Debug, Clone)]
struct ShredNode {
    name: String,
    path: String,
    repetition: Repetition,
    /// Definition level of a present value of this field
    def: i16,
    /// Repetition level used for the second and later list elements
    rep: i16,
    /// Leaf columns below this node
    leaves: Range<usize>,
    children: Option<Vec<ShredNode>>,
}

/// Accumulator driven by a [`SchemaDefinition`]
#[derive(Debug, Clone)]
pub struct SchemaAccumulator {
    schema: SchemaDefinition,
    roots: Vec<ShredNode>,
    columns: Vec<ColumnBuffer>,
    num_records: u64,
}

impl SchemaAccumulator {
    /// Create an empty accumulator for `schema`
    pub fn new(schema: SchemaDefinition) -> Self {
        let columns = schema.columns().into_iter().map(ColumnBuffer::new).collect();
        let mut next_leaf = 0;
        let roots = schema
            .fields()
            .iter()
            .map(|f| build_node(f, "", 0, 0, &mut next_leaf))
            .collect();

        Self {
            schema,
            roots,
            columns,
            num_records: 0,
        }
    }

    /// The schema records are checked against
    pub fn schema(&self) -> &SchemaDefinition {
        &self.schema
    }
}

impl Accumulator for SchemaAccumulator {
    fn add_record(&mut self, record: &Record) -> Result<(), EncodeError> {
        let checkpoints: Vec<_> = self.columns.iter().map(ColumnBuffer::checkpoint).collect();

        if let Err(e) = shred_group(&self.roots, record, "", 0, 0, &mut self.columns) {
            for (column, checkpoint) in self.columns.iter_mut().zip(checkpoints) {
                column.rollback(checkpoint);
            }
            return Err(e);
        }

        self.num_records += 1;
        Ok(())
    }

    fn buffered_size(&self) -> u64 {
        self.columns.iter().map(ColumnBuffer::data_size).sum()
    }

    fn num_records(&self) -> u64 {
        self.num_records
    }

    fn reset(&mut self) {
        for column in &mut self.columns {
            column.clear();
        }
        self.num_records = 0;
    }

    fn schema_elements(&self) -> Vec<SchemaElement> {
        self.schema.to_schema_elements()
    }

    fn columns(&self) -> &[ColumnBuffer] {
        &self.columns
    }
}

fn build_node(
    field: &Field,
    parent_path: &str,
    parent_def: i16,
    parent_rep: i16,
    next_leaf: &mut usize,
) -> ShredNode {
    let path = if parent_path.is_empty() {
        field.name.clone()
    } else {
        format!("{}.{}", parent_path, field.name)
    };
    let (def, rep) = match field.repetition {
        Repetition::Required => (parent_def, parent_rep),
        Repetition::Optional => (parent_def + 1, parent_rep),
        Repetition::Repeated => (parent_def + 1, parent_rep + 1),
    };

    let start = *next_leaf;
    let children = match &field.kind {
        FieldKind::Primitive(_) => {
            *next_leaf += 1;
            None
        }
        FieldKind::Group(children) => Some(
            children
                .iter()
                .map(|c| build_node(c, &path, def, rep, next_leaf))
                .collect(),
        ),
    };

    ShredNode {
        name: field.name.clone(),
        path,
        repetition: field.repetition,
        def,
        rep,
        leaves: start..*next_leaf,
        children,
    }
}

fn shred_group(
    nodes: &[ShredNode],
    record: &Record,
    parent_path: &str,
    parent_def: i16,
    rep: i16,
    columns: &mut [ColumnBuffer],
) -> Result<(), EncodeError> {
    if let Some(unknown) = record
        .keys()
        .find(|key| !nodes.iter().any(|n| &n.name == *key))
    {
        let path = if parent_path.is_empty() {
            unknown.clone()
        } else {
            format!("{}.{}", parent_path, unknown)
        };
        return Err(EncodeError::UnknownField(path));
    }

    for node in nodes {
        let value = record.get(&node.name).filter(|v| !v.is_null());
        shred_field(node, value, parent_def, rep, columns)?;
    }
    Ok(())
}

fn shred_field(
    node: &ShredNode,
    value: Option<&Value>,
    parent_def: i16,
    rep: i16,
    columns: &mut [ColumnBuffer],
) -> Result<(), EncodeError> {
    match node.repetition {
        Repetition::Required => {
            let value = value.ok_or_else(|| EncodeError::MissingRequired(node.path.clone()))?;
            shred_present(node, value, rep, columns)
        }
        Repetition::Optional => match value {
            Some(value) => shred_present(node, value, rep, columns),
            None => {
                push_nulls(node, parent_def, rep, columns);
                Ok(())
            }
        },
        Repetition::Repeated => {
            let items = match value {
                None => &[][..],
                Some(Value::List(items)) => items.as_slice(),
                Some(other) => {
                    return Err(EncodeError::NotAList {
                        path: node.path.clone(),
                        found: other.kind(),
                    })
                }
            };
            if items.is_empty() {
                push_nulls(node, parent_def, rep, columns);
                return Ok(());
            }
            for (i, item) in items.iter().enumerate() {
                if item.is_null() {
                    return Err(EncodeError::NullListElement(node.path.clone()));
                }
                let item_rep = if i == 0 { rep } else { node.rep };
                shred_present(node, item, item_rep, columns)?;
            }
            Ok(())
        }
    }
}

fn shred_present(
    node: &ShredNode,
    value: &Value,
    rep: i16,
    columns: &mut [ColumnBuffer],
) -> Result<(), EncodeError> {
    match &node.children {
        None => columns[node.leaves.start].push_value(value, node.def, rep),
        Some(children) => match value {
            Value::Group(record) => shred_group(children, record, &node.path, node.def, rep, columns),
            other => Err(EncodeError::NotAGroup {
                path: node.path.clone(),
                found: other.kind(),
            }),
        },
    }
}

fn push_nulls(node: &ShredNode, def: i16, rep: i16, columns: &mut [ColumnBuffer]) {
    for column in &mut columns[node.leaves.clone()] {
        column.push_null(def, rep);
    }
}
