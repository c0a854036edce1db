//! jobs-export: Flatten job posting documents into CSV rows
//!
//! Usage:
//!   # Read a JSON array (or a single object) from a file, CSV to stdout
//!   jobs-export jobs.json
//!
//!   # Read NDJSON from stdin
//!   cat jobs.jsonl | jobs-export --ndjson
//!
//!   # Inspect the intermediate flat records or the unwound rows
//!   jobs-export --format flat jobs.json
//!   jobs-export --format rows jobs.json
//!
//!   # Custom columns, validated against the job schema, into a file
//!   jobs-export --typed --fields id,title,skills -o jobs.csv jobs.json

// Use MiMalloc allocator for better performance (recommended by simd-json)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use jobflat::export::{CsvExporter, ExportConfig, JsonLinesWriter};
use jobflat::flatten::{unwind, Flattener};
use jobflat::Job;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// CSV projected onto the export columns
    Csv,
    /// Flattened records as NDJSON, before unwinding
    Flat,
    /// Unwound scalar rows as NDJSON, before projection
    Rows,
}

#[derive(Parser, Debug)]
#[command(name = "jobs-export")]
#[command(about = "Flatten job posting documents into CSV rows", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Process newline-delimited JSON (one document per line)
    #[arg(long)]
    ndjson: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Comma-separated CSV columns (default: the job export columns)
    #[arg(long)]
    fields: Option<String>,

    /// Separator placed between nested keys (default: "_")
    #[arg(long)]
    separator: Option<String>,

    /// Parse every document as a job posting before exporting it
    #[arg(long)]
    typed: bool,

    /// Output file (use stdout if omitted)
    #[arg(long, short = 'o')]
    output: Option<String>,

    /// Log per-document details
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    // Build config
    let mut config = ExportConfig::default();
    if let Some(sep) = args.separator.clone() {
        config.flatten.separator = sep;
    }
    if let Some(fields_str) = &args.fields {
        config.fields = fields_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    let reader = if let Some(file_path) = &args.input {
        Box::new(BufReader::new(
            File::open(file_path).with_context(|| format!("Failed to open {}", file_path))?,
        )) as Box<dyn Read>
    } else {
        Box::new(std::io::stdin()) as Box<dyn Read>
    };
    let documents = read_documents(reader, args.ndjson)?;
    info!(documents = documents.len(), "read input");

    let documents = if args.typed {
        normalize_jobs(documents)?
    } else {
        documents
    };

    let output = if let Some(path) = &args.output {
        Box::new(File::create(path).with_context(|| format!("Failed to create {}", path))?)
            as Box<dyn Write>
    } else {
        Box::new(std::io::stdout()) as Box<dyn Write>
    };
    let output = BufWriter::new(output);

    match args.format {
        Format::Csv => write_csv(output, documents, config),
        Format::Flat | Format::Rows => {
            write_json_lines(output, documents, config, args.format == Format::Rows)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "jobflat=debug,jobs_export=debug"
    } else {
        "jobflat=info,jobs_export=info"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

/// Read every document using SIMD-accelerated JSON parsing when possible
///
/// A top-level array is treated as a stream of documents. Input that does not
/// parse as a single JSON value falls back to line-by-line NDJSON parsing.
fn read_documents(reader: Box<dyn Read>, ndjson: bool) -> Result<Vec<Value>> {
    let mut content = Vec::new();
    let mut buf_reader = BufReader::new(reader);
    buf_reader
        .read_to_end(&mut content)
        .context("Failed to read input")?;

    if !ndjson {
        // simd-json parses in place, keep the original bytes for the fallback
        let mut scratch = content.clone();
        match simd_json::to_owned_value(&mut scratch) {
            Ok(simd_json::OwnedValue::Array(arr)) => {
                let mut documents = Vec::with_capacity(arr.len());
                for elem in arr.iter() {
                    documents.push(simd_to_serde(elem)?);
                }
                return Ok(documents);
            }
            Ok(elem) => return Ok(vec![simd_to_serde(&elem)?]),
            Err(e) => {
                debug!(error = %e, "input is not a single JSON value, trying NDJSON");
            }
        }
    }

    let content_str = std::str::from_utf8(&content).context("Input is not valid UTF-8")?;
    let mut documents = Vec::new();
    for (idx, line) in content_str.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line)
            .with_context(|| format!("Failed to parse JSON on line {}", idx + 1))?;
        documents.push(value);
    }
    Ok(documents)
}

fn simd_to_serde(value: &simd_json::OwnedValue) -> Result<Value> {
    let json_str = simd_json::to_string(value)?;
    Ok(serde_json::from_str(&json_str)?)
}

/// Round-trip documents through the job schema
fn normalize_jobs(documents: Vec<Value>) -> Result<Vec<Value>> {
    documents
        .into_iter()
        .enumerate()
        .map(|(idx, value)| {
            let job: Job = serde_json::from_value(value)
                .with_context(|| format!("Document {} is not a valid job posting", idx))?;
            Ok(job.to_document()?)
        })
        .collect()
}

fn write_csv(output: impl Write, documents: Vec<Value>, config: ExportConfig) -> Result<()> {
    let mut exporter = CsvExporter::new(output, config);
    exporter.write_header()?;

    let total = documents.len();
    for (idx, document) in documents.into_iter().enumerate() {
        let rows = exporter
            .write_document(document)
            .with_context(|| format!("Failed to export document {}", idx))?;
        debug!(document = idx, rows, "document exported");
    }

    exporter.flush().context("Failed to flush output")?;
    info!(documents = total, rows = exporter.rows_written(), "export finished");
    Ok(())
}

fn write_json_lines(
    output: impl Write,
    documents: Vec<Value>,
    config: ExportConfig,
    unwound: bool,
) -> Result<()> {
    let flattener = Flattener::new(config.flatten);
    let mut writer = JsonLinesWriter::new(output);
    let mut lines = 0usize;

    for (idx, document) in documents.into_iter().enumerate() {
        let flat = flattener
            .flatten(document)
            .with_context(|| format!("Failed to flatten document {}", idx))?;

        if unwound {
            for row in unwind(flat) {
                writer.write_record(&row)?;
                lines += 1;
            }
        } else {
            writer.write_record(&flat)?;
            lines += 1;
        }
    }

    writer.flush().context("Failed to flush output")?;
    info!(lines, "export finished");
    Ok(())
}
