//! Process command - validate a single provider response.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::{debug, info};

use devis_core::{ExtractedRecord, ExtractionPipeline, FieldName, ReviewReport};

use super::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Provider response (JSON, or LLM text with a ```json block)
    #[arg(required = true)]
    input: PathBuf,

    /// Text to scan for trades (repeatable; default: subject and message)
    #[arg(short, long = "source")]
    sources: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Emit only the review report
    #[arg(long)]
    report_only: bool,
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

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let text = fs::read_to_string(&args.input)?;
    let pipeline = ExtractionPipeline::from_config(&config)?;

    let sources: Vec<&str> = args.sources.iter().map(String::as_str).collect();
    let record = pipeline.process_response_text(&text, &sources)?;
    let report = ReviewReport::from_record(&record, &config.review);

    let output = render(&record, &report, args.format, args.report_only)?;

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

#[derive(Serialize)]
struct ProcessOutput<'a> {
    record: &'a ExtractedRecord,
    report: &'a ReviewReport,
}

/// Render a processed record in the requested format.
pub fn render(
    record: &ExtractedRecord,
    report: &ReviewReport,
    format: OutputFormat,
    report_only: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if report_only => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&ProcessOutput { record, report })?),
        OutputFormat::Csv => format_csv(record, report),
        OutputFormat::Text if report_only => Ok(report.to_string()),
        OutputFormat::Text => Ok(format_text(record, report)),
    }
}

const CSV_FIELDS: [FieldName; 9] = [
    FieldName::ClientSurname,
    FieldName::ClientGivenName,
    FieldName::Address,
    FieldName::PostalCode,
    FieldName::City,
    FieldName::RequestDate,
    FieldName::Phone,
    FieldName::Email,
    FieldName::QuoteNumber,
];

fn format_csv(record: &ExtractedRecord, report: &ReviewReport) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    // Write header
    let mut header: Vec<&str> = CSV_FIELDS.iter().map(|f| f.key()).collect();
    header.extend([
        "metiers",
        "agence",
        "overall_confidence",
        "ready_for_auto_insert",
        "review_count",
    ]);
    wtr.write_record(&header)?;

    // Write data
    let mut row: Vec<String> = CSV_FIELDS
        .iter()
        .map(|name| {
            record
                .field(*name)
                .and_then(|f| f.value.as_ref())
                .map(|v| v.to_string())
                .unwrap_or_default()
        })
        .collect();
    row.push(
        record
            .metiers
            .iter()
            .filter_map(|m| m.matched_value())
            .collect::<Vec<_>>()
            .join("|"),
    );
    row.push(
        record
            .agency
            .as_ref()
            .and_then(|a| a.matched_value())
            .unwrap_or_default()
            .to_string(),
    );
    row.push(format!("{:.2}", report.overall_confidence));
    row.push(report.ready_for_auto_insert.to_string());
    row.push(report.review_count().to_string());
    wtr.write_record(&row)?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &ExtractedRecord, report: &ReviewReport) -> String {
    let mut output = String::new();

    output.push_str("Champs extraits :\n");
    for (name, field) in record.required_fields().chain(record.optional_fields()) {
        let value = field.value.as_ref().map(|v| v.to_string()).unwrap_or_default();
        output.push_str(&format!(
            "  {:<26} {} ({:.0}%, {})\n",
            format!("{}:", name.label()),
            value,
            field.confidence() * 100.0,
            field.confidence_level().as_str()
        ));
    }
    output.push('\n');
    output.push_str(&report.to_string());

    output
}
