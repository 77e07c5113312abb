//! Batch command - extract a deduplicated CSV from many invoices.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use invx_core::{
    BatchAggregator, BatchReport, DocumentKind, ExtractedFields, FileTextSource, InvoiceParser,
    InvxError, StagedDocument, StagingSession, TemplateParser, TextSource,
};

use super::{build_parser, load_config};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files, zip archives or glob patterns
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output CSV file (default: invoices.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of parallel workers
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Per-document timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Keep the staging directory instead of removing it
    #[arg(long)]
    keep_staging: bool,

    /// Also write a JSON report with rows and failures
    #[arg(long)]
    report: Option<PathBuf>,
}

/// Outcome of one document, as handed to the aggregator.
type DocumentOutcome = Result<ExtractedFields, String>;

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let parser = Arc::new(build_parser(&config)?);

    let jobs = args.jobs.unwrap_or(config.batch.jobs).max(1);
    let timeout = Duration::from_secs(args.timeout.unwrap_or(config.batch.timeout_secs).max(1));
    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.file_name));
    let keep_staging = args.keep_staging || config.output.keep_staging;

    let files = expand_inputs(&args.inputs)?;

    // Stage copies of every input; a bad archive is skipped
    let mut session = StagingSession::new()?;
    for path in &files {
        match session.stage(path) {
            Ok(count) => debug!("Staged {} documents from {}", count, path.display()),
            Err(InvxError::Archive(e)) => {
                warn!("Skipping archive {}: {}", path.display(), e);
                println!(
                    "{} {} is not a valid ZIP.",
                    style("⚠").yellow(),
                    path.display()
                );
            }
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                println!("{} Skipped {}: {}", style("⚠").yellow(), path.display(), e);
            }
        }
    }

    if session.is_empty() {
        println!("{} No PDFs found.", style("⚠").yellow());
        session.purge()?;
        return Ok(());
    }

    let documents = session.documents().to_vec();
    println!(
        "{} Found {} documents to process",
        style("ℹ").blue(),
        documents.len()
    );

    let report = extract_batch(&documents, parser, jobs, timeout).await?;

    print_failures(&report);

    if report.is_empty() {
        println!("{} No invoices extracted.", style("⚠").yellow());
        finish_staging(session, keep_staging)?;
        return Ok(());
    }

    write_output(&output_path, &report.rows)?;
    println!(
        "{} Wrote {} invoices to {}",
        style("✓").green(),
        report.rows.len(),
        output_path.display()
    );

    if let Some(report_path) = &args.report {
        serde_json::to_writer_pretty(File::create(report_path)?, &report)?;
        println!(
            "{} Report written to {}",
            style("✓").green(),
            report_path.display()
        );
    }

    print_summary(&report, start);

    // The CSV is on disk; staged copies are no longer needed
    finish_staging(session, keep_staging)?;

    Ok(())
}

/// Resolve literal paths and glob patterns into supported input files.
fn expand_inputs(inputs: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        let literal = Path::new(input);
        let candidates: Vec<PathBuf> = if literal.exists() {
            vec![literal.to_path_buf()]
        } else {
            glob(input)?.filter_map(|r| r.ok()).collect()
        };

        if candidates.is_empty() {
            warn!("No files match {}", input);
        }

        for path in candidates {
            if path.is_file() && DocumentKind::from_path(&path).is_some() {
                if !files.contains(&path) {
                    files.push(path);
                }
            } else {
                debug!("Ignoring {}", path.display());
            }
        }
    }

    Ok(files)
}

/// Extract staged documents with a progress bar and aggregate the outcomes.
async fn extract_batch(
    documents: &[StagedDocument],
    parser: Arc<TemplateParser>,
    jobs: usize,
    timeout: Duration,
) -> anyhow::Result<BatchReport> {
    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let outcomes = extract_documents(documents, parser, jobs, timeout, &pb).await;
    pb.finish_and_clear();

    // Strictly input order
    let mut aggregator = BatchAggregator::new();
    for (doc, outcome) in documents.iter().zip(outcomes) {
        aggregator.record(doc.label.as_str(), outcome);
    }

    Ok(aggregator.finish())
}

/// Extract every document on a bounded worker pool.
///
/// Results come back in the order of `documents`, regardless of which worker
/// finishes first. A document that panics or exceeds `timeout` becomes a
/// failure for that document only.
async fn extract_documents(
    documents: &[StagedDocument],
    parser: Arc<TemplateParser>,
    jobs: usize,
    timeout: Duration,
    pb: &ProgressBar,
) -> Vec<DocumentOutcome> {
    let semaphore = Arc::new(Semaphore::new(jobs));

    let handles: Vec<_> = documents
        .iter()
        .map(|doc| {
            let semaphore = Arc::clone(&semaphore);
            let parser = Arc::clone(&parser);
            let path = doc.path.clone();

            tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => return Err(e.to_string()),
                };

                let work = tokio::task::spawn_blocking(move || {
                    FileTextSource
                        .read_text(&path)
                        .map(|text| parser.parse(&text).fields)
                });

                match tokio::time::timeout(timeout, work).await {
                    Ok(Ok(Ok(fields))) => Ok(fields),
                    Ok(Ok(Err(e))) => Err(e.to_string()),
                    Ok(Err(e)) => Err(format!("extraction aborted: {}", e)),
                    Err(_) => Err(format!("timed out after {}s", timeout.as_secs())),
                }
            })
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for handle in handles {
        let outcome = handle.await.unwrap_or_else(|e| Err(e.to_string()));
        pb.inc(1);
        outcomes.push(outcome);
    }
    outcomes
}

/// Write rows as CSV with the fixed header.
pub fn write_csv<W: Write>(writer: W, rows: &[ExtractedFields]) -> anyhow::Result<W> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(ExtractedFields::columns())?;
    for row in rows {
        wtr.write_record(row.record())?;
    }

    wtr.flush()?;
    wtr.into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush CSV: {}", e.error()))
}

/// Write the CSV and make sure it reached the disk.
fn write_output(path: &Path, rows: &[ExtractedFields]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = write_csv(File::create(path)?, rows)?;
    file.sync_all()?;
    Ok(())
}

fn finish_staging(session: StagingSession, keep: bool) -> anyhow::Result<()> {
    if keep {
        let path = session.keep();
        println!(
            "{} Staged files kept in {}",
            style("ℹ").blue(),
            path.display()
        );
    } else {
        session.purge()?;
        debug!("Temporary files removed");
    }
    Ok(())
}

fn print_failures(report: &BatchReport) {
    for failure in &report.failures {
        println!(
            "{} Failed: {} ({})",
            style("⚠").yellow(),
            failure.id,
            failure.reason
        );
    }
}

fn print_summary(report: &BatchReport, start: Instant) {
    println!();
    println!(
        "{} Processed {} documents in {:?}",
        style("✓").green(),
        report.documents,
        start.elapsed()
    );
    println!(
        "   {} rows, {} failed, {} duplicates, {} without invoice number",
        style(report.rows.len()).green(),
        style(report.failures.len()).red(),
        report.duplicates,
        report.missing_invoice_number
    );
    println!("   Grand total: ₹{}", report.grand_total_sum());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::block_on;
    use std::sync::mpsc;
    use std::thread;

    fn invoice(number: &str) -> String {
        format!("Invoice Number #{}\nGrand Total ₹ 10.00\n", number)
    }

    /// Run `f` on its own thread, panicking if it has not returned by `limit`.
    fn returns_within<T, F>(limit: Duration, f: F) -> T
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(f());
        });
        rx.recv_timeout(limit).expect("call did not return in time")
    }

    #[test]
    fn test_write_csv_header_and_quoting() {
        let rows = vec![ExtractedFields {
            invoice_number: "INV1".to_string(),
            order_name: "Shirt, Blue".to_string(),
            ..Default::default()
        }];

        let buf = write_csv(Vec::new(), &rows).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Date,Invoice number,Order ID,Order name,Model,Grand total amount\n\
             ,INV1,,\"Shirt, Blue\",,\n"
        );
    }

    #[test]
    fn test_expand_inputs_filters_and_dedups() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.pdf", "b.txt", "c.zip", "d.png"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        let pattern = format!("{}/*", dir.path().display());
        let literal = dir.path().join("a.pdf").display().to_string();
        let files = expand_inputs(&[literal, pattern]).unwrap();

        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.pdf", "b.txt", "c.zip"]);
    }

    #[tokio::test]
    async fn test_extract_documents_keeps_input_order() {
        let mut session = StagingSession::new().unwrap();
        for n in 0..6 {
            let text = format!("Invoice Number #N{}\n", n);
            session.stage_bytes(&format!("{}.txt", n), text.as_bytes()).unwrap();
        }
        session.stage_bytes("broken.pdf", b"garbage").unwrap();

        let pb = ProgressBar::hidden();
        let outcomes = extract_documents(
            session.documents(),
            Arc::new(TemplateParser::new()),
            3,
            Duration::from_secs(30),
            &pb,
        )
        .await;

        let numbers: Vec<String> = outcomes
            .iter()
            .map(|o| match o {
                Ok(fields) => fields.invoice_number.clone(),
                Err(_) => "ERR".to_string(),
            })
            .collect();
        assert_eq!(numbers, ["N0", "N1", "N2", "N3", "N4", "N5", "ERR"]);
        assert_eq!(pb.position(), 7);
    }

    #[cfg(unix)]
    #[test]
    fn test_stuck_document_times_out_without_blocking_exit() {
        let mut session = StagingSession::new().unwrap();
        session.stage_bytes("a.txt", invoice("INVA").as_bytes()).unwrap();
        session.stage_bytes("b.txt", invoice("INVB").as_bytes()).unwrap();

        // Reading a FIFO with no writer never returns
        let stuck = session.path().join("stuck.txt");
        let status = std::process::Command::new("mkfifo").arg(&stuck).status().unwrap();
        assert!(status.success());

        let mut documents = session.documents().to_vec();
        documents.insert(
            1,
            StagedDocument {
                path: stuck,
                label: "stuck.txt".to_string(),
            },
        );

        let report = returns_within(Duration::from_secs(20), move || {
            block_on(extract_batch(
                &documents,
                Arc::new(TemplateParser::new()),
                2,
                Duration::from_secs(1),
            ))
            .unwrap()
            .unwrap()
        });

        let numbers: Vec<&str> = report.rows.iter().map(|r| r.invoice_number.as_str()).collect();
        assert_eq!(numbers, ["INVA", "INVB"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].id, "stuck.txt");
        assert_eq!(report.failures[0].reason, "timed out after 1s");

        let out = tempfile::tempdir().unwrap();
        let csv = out.path().join("invoices.csv");
        write_output(&csv, &report.rows).unwrap();
        assert_eq!(fs::read_to_string(&csv).unwrap().lines().count(), 3);
    }

    #[test]
    fn test_block_on_returns_output() {
        let value = block_on(async { 40 + 2 }).unwrap();
        assert_eq!(value, 42);
    }
}
