//! Batch processing command for multiple provider responses.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use devis_core::models::config::ReviewConfig;
use devis_core::{ExtractedRecord, ExtractionPipeline, ReviewReport};

use super::load_config;
use super::process::{OutputFormat, render};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    processed: Option<(ExtractedRecord, ReviewReport)>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "json" | "txt" | "md")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    // Create output directory if specified
    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let pipeline = Arc::new(ExtractionPipeline::from_config(&config)?);
    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut handles = Vec::with_capacity(files.len());

    for path in files {
        let permit = Arc::clone(&semaphore).acquire_owned().await?;
        let pipeline = Arc::clone(&pipeline);
        let review = config.review.clone();
        let progress = progress.clone();

        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let file_start = Instant::now();
            let outcome = process_single_file(&path, &pipeline, &review);
            let processing_time_ms = file_start.elapsed().as_millis() as u64;
            progress.inc(1);

            match outcome {
                Ok(processed) => FileResult {
                    path,
                    processed: Some(processed),
                    error: None,
                    processing_time_ms,
                },
                Err(e) => FileResult {
                    path,
                    processed: None,
                    error: Some(e.to_string()),
                    processing_time_ms,
                },
            }
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let result = handle.await?;
        if let Some(error_msg) = &result.error {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), error_msg);
            } else {
                error!("Failed to process {}: {}", result.path.display(), error_msg);
                progress.abandon();
                anyhow::bail!("Processing failed for {}: {}", result.path.display(), error_msg);
            }
        }
        results.push(result);
    }

    progress.finish_with_message("Complete");

    // Write outputs
    let successful: Vec<_> = results.iter().filter(|r| r.processed.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        let mut used_names = HashSet::new();
        for result in &successful {
            if let Some((record, report)) = &result.processed {
                let output_name =
                    output_file_name(&result.path, args.format.extension(), &mut used_names);

                let output_path = output_dir.join(output_name);
                fs::write(&output_path, render(record, report, args.format, false)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    // Generate summary if requested
    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    // Print summary
    let ready = successful
        .iter()
        .filter_map(|r| r.processed.as_ref())
        .filter(|(_, report)| report.ready_for_auto_insert)
        .count();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful ({} ready for auto-insert), {} failed",
        style(successful.len()).green(),
        style(ready).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Output name for `path`: the stem plus `extension`, or the full file name
/// plus `extension` when another input already took that stem.
fn output_file_name(path: &Path, extension: &str, used: &mut HashSet<String>) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("devis");
    let candidate = format!("{}.{}", stem, extension);
    if used.insert(candidate.clone()) {
        return candidate;
    }

    let file_name = path.file_name().and_then(|s| s.to_str()).unwrap_or(stem);
    let mut fallback = format!("{}.{}", file_name, extension);
    let mut n = 1;
    while !used.insert(fallback.clone()) {
        fallback = format!("{}-{}.{}", file_name, n, extension);
        n += 1;
    }
    fallback
}

fn process_single_file(
    path: &Path,
    pipeline: &ExtractionPipeline,
    review: &ReviewConfig,
) -> anyhow::Result<(ExtractedRecord, ReviewReport)> {
    let text = fs::read_to_string(path)?;
    let record = pipeline.process_response_text(&text, &[])?;
    let report = ReviewReport::from_record(&record, review);
    Ok((record, report))
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "overall_confidence",
        "ready_for_auto_insert",
        "review_count",
        "metiers",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result.path.file_name().and_then(|s| s.to_str()).unwrap_or("");

        if let Some((record, report)) = &result.processed {
            let metiers: Vec<&str> = record.metiers.iter().filter_map(|m| m.matched_value()).collect();
            wtr.write_record([
                filename,
                "success",
                &format!("{:.2}", report.overall_confidence),
                &report.ready_for_auto_insert.to_string(),
                &report.review_count().to_string(),
                &metiers.join("|"),
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
