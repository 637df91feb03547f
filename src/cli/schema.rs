use std::path::PathBuf;

use anyhow::{Context, Result};

use pqwrite::schema::SchemaDefinition;

/// Validate a schema definition and print its normalised form and leaf columns
pub fn run(file: PathBuf) -> Result<()> {
    let text = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read schema file: {}", file.display()))?;
    let schema = SchemaDefinition::parse(&text)
        .with_context(|| format!("Invalid schema in {}", file.display()))?;

    println!("{}", schema);
    println!();
    println!("Columns:");
    for (i, column) in schema.columns().iter().enumerate() {
        println!(
            "  {:3}. {} ({}, max def {}, max rep {})",
            i + 1,
            column.dotted_path(),
            column.physical_type,
            column.max_def_level,
            column.max_rep_level
        );
    }
    Ok(())
}
