use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::{debug, info};

use pqwrite::page::PageVersion;
use pqwrite::record::{parse_text_value, record_from_json, Record};
use pqwrite::schema::SchemaDefinition;
use pqwrite::writer::{FileWriter, WriterConfig};

use super::{CodecArg, Config, ConvertArgs, InputFormat};

/// Convert JSON lines or CSV records to a Parquet file
pub fn run(args: ConvertArgs) -> Result<()> {
    if !args.input.exists() {
        bail!("Input file does not exist: {}", args.input.display());
    }

    let schema_text = std::fs::read_to_string(&args.schema)
        .with_context(|| format!("Failed to read schema file: {}", args.schema.display()))?;
    let schema = SchemaDefinition::parse(&schema_text)
        .with_context(|| format!("Invalid schema in {}", args.schema.display()))?;

    let file_config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let format = args.format.unwrap_or_else(|| detect_format(&args.input));
    let config = build_config(&args, file_config, schema.clone())?;

    info!("pqwrite convert");
    info!("Input:  {} ({:?})", args.input.display(), format);
    info!("Output: {}", args.output.display());
    info!("Compression: {}", config.compression);
    info!("Row group threshold: {} bytes", config.max_row_group_size);

    let mut writer = FileWriter::new_file(&args.output, config)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;

    let records = match format {
        InputFormat::Jsonl => write_jsonl(&args.input, &schema, &mut writer)?,
        InputFormat::Csv => write_csv(&args.input, &schema, &mut writer)?,
    };
    debug!("Read {} records", records);

    let stats = writer.close().context("Failed to finish output file")?;
    println!("{}", stats);
    Ok(())
}

fn detect_format(input: &Path) -> InputFormat {
    match input.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => InputFormat::Csv,
        _ => InputFormat::Jsonl,
    }
}

/// Merge file settings and flags into a writer configuration; flags win
fn build_config(args: &ConvertArgs, file: Config, schema: SchemaDefinition) -> Result<WriterConfig> {
    let mut config = WriterConfig::default().with_schema(schema);
    let section = file.writer;

    let codec = args.compression.or(section.compression).unwrap_or(CodecArg::Uncompressed);
    let level = args.level.or(section.compression_level);
    config.compression = codec.with_level(level)?;

    if let Some(bytes) = args.row_group_size.or(section.max_row_group_size) {
        config.max_row_group_size = bytes;
    }
    config.page_version = if args.page_v2 {
        PageVersion::V2
    } else {
        section.page_version.unwrap_or_default()
    };
    if let Some(created_by) = args.created_by.clone().or(section.created_by) {
        config.created_by = created_by;
    }
    if let Some(version) = section.format_version {
        config.format_version = version;
    }

    config.key_value_metadata = file.metadata;
    for (key, value) in &args.metadata {
        config.key_value_metadata.insert(key.clone(), value.clone());
    }
    Ok(config)
}

fn write_jsonl<W: Write>(input: &Path, schema: &SchemaDefinition, writer: &mut FileWriter<W>) -> Result<u64> {
    let file = File::open(input).with_context(|| format!("Failed to open {}", input.display()))?;
    let mut count = 0;

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("Failed to read line {}", line_no))?;
        if line.trim().is_empty() {
            continue;
        }
        let json: serde_json::Value =
            serde_json::from_str(&line).with_context(|| format!("Invalid JSON on line {}", line_no))?;
        let record = record_from_json(schema, &json).with_context(|| format!("Line {}", line_no))?;
        writer
            .add_data(&record)
            .with_context(|| format!("Failed to write record on line {}", line_no))?;
        count += 1;
    }
    Ok(count)
}

fn write_csv<W: Write>(input: &Path, schema: &SchemaDefinition, writer: &mut FileWriter<W>) -> Result<u64> {
    if !schema.is_flat() {
        bail!("CSV input needs a flat schema; `{}` has nested or repeated fields", schema.name());
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(input)
        .with_context(|| format!("Failed to open {}", input.display()))?;

    let fields = reader
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(|name| {
            schema
                .field(name)
                .with_context(|| format!("CSV column `{}` is not part of the schema", name))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut count = 0;
    for (index, row) in reader.records().enumerate() {
        // header is line 1
        let line_no = index + 2;
        let row = row.with_context(|| format!("Failed to read CSV line {}", line_no))?;

        let mut record = Record::with_capacity(fields.len());
        for (field, cell) in fields.iter().zip(row.iter()) {
            let value = parse_text_value(field, cell).with_context(|| format!("Line {}", line_no))?;
            record.insert(field.name.clone(), value);
        }
        writer
            .add_data(&record)
            .with_context(|| format!("Failed to write record on line {}", line_no))?;
        count += 1;
    }
    Ok(count)
}
