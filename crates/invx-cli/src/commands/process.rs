//! Process command - extract fields from a single invoice file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use invx_core::{DocumentKind, ExtractedFields, FileTextSource, InvoiceParser, TextSource};

use super::batch::write_csv;
use super::{build_parser, load_config};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or extracted text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show fields that could not be extracted
    #[arg(long)]
    show_warnings: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let parser = build_parser(&config)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    match DocumentKind::from_path(&args.input) {
        Some(kind) if kind.is_document() => {}
        Some(_) => anyhow::bail!("Archives are only accepted by the batch command"),
        None => anyhow::bail!("Unsupported file format: {}", args.input.display()),
    }

    info!("Processing file: {}", args.input.display());

    let text = FileTextSource.read_text(&args.input)?;
    if text.trim().is_empty() {
        anyhow::bail!("No text could be extracted from {}", args.input.display());
    }

    let result = parser.parse(&text);
    let output = format_fields(&result.fields, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        print!("{}", output);
    }

    if args.show_warnings && !result.warnings.is_empty() {
        eprintln!("{}", style("Warnings:").yellow());
        for warning in &result.warnings {
            eprintln!("  - {}", warning);
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_fields(fields: &ExtractedFields, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(fields)?)),
        OutputFormat::Csv => {
            let mut buf = Vec::new();
            write_csv(&mut buf, std::slice::from_ref(fields))?;
            Ok(String::from_utf8(buf)?)
        }
        OutputFormat::Text => Ok(format_text(fields)),
    }
}

fn format_text(fields: &ExtractedFields) -> String {
    let width = ExtractedFields::columns()
        .iter()
        .map(|c| c.len())
        .max()
        .unwrap_or(0);

    ExtractedFields::columns()
        .iter()
        .zip(fields.record())
        .map(|(column, value)| format!("{:<width$}  {}\n", column, value, width = width))
        .collect()
}
