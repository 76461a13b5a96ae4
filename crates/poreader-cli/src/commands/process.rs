//! Process command - read one purchase order from a local file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use poreader_core::{OrderRecord, Pipeline, UploadedDocument, classify};

use super::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF, image, or Word document)
    #[arg(required = true)]
    input: PathBuf,

    /// Declared media type (default: guessed from the file extension)
    #[arg(short, long)]
    media_type: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output, same shape as the HTTP response
    Json,
    /// CSV output, one row per line item
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let media_type = args
        .media_type
        .clone()
        .unwrap_or_else(|| guess_media_type(&args.input));

    // Reject before loading OCR models.
    classify(&media_type)?;

    let data = fs::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let filename = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.input.display().to_string());

    info!("Processing file: {} ({})", args.input.display(), media_type);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Reading purchase order...");

    let pipeline = Pipeline::from_config(&config)?;
    let result = pipeline
        .process(UploadedDocument::new(data, media_type, filename))
        .await;
    pb.finish_and_clear();
    let record = result?;

    let output = format_record(&record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
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

fn guess_media_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

fn format_record(record: &OrderRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_csv(record: &OrderRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["po_number", "name", "quantity", "price"])?;

    for item in &record.items {
        wtr.write_record([
            record.po_number.as_str(),
            item.name.as_str(),
            &item.quantity.map(|q| q.to_string()).unwrap_or_default(),
            item.price.as_deref().unwrap_or(""),
        ])?;
    }

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(record: &OrderRecord) -> String {
    let mut output = format!("PO number: {}\n", record.po_number);

    if record.items.is_empty() {
        output.push_str("\nNo line items found.\n");
        return output;
    }

    output.push('\n');
    for (i, item) in record.items.iter().enumerate() {
        output.push_str(&format!("{}. {}\n", i + 1, item.name));
        if let Some(quantity) = item.quantity {
            output.push_str(&format!("   Quantity: {}\n", quantity));
        }
        if let Some(price) = &item.price {
            output.push_str(&format!("   Price:    {}\n", price));
        }
    }
    output.push_str(&format!("\nTotal quantity: {}\n", record.total_quantity()));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use poreader_core::LineItem;

    fn record() -> OrderRecord {
        OrderRecord::new(
            "4521",
            vec![
                LineItem::named("Widget").with_quantity(10).with_price("5.00"),
                LineItem::named("Bolts, M6"),
            ],
        )
    }

    #[test]
    fn test_guess_media_type() {
        assert_eq!(guess_media_type(Path::new("po.pdf")), "application/pdf");
        assert_eq!(guess_media_type(Path::new("scan.PNG")), "image/png");
        assert_eq!(
            guess_media_type(Path::new("po.docx")),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
        assert_eq!(guess_media_type(Path::new("blob")), "application/octet-stream");
    }

    #[test]
    fn test_csv_has_row_per_item() {
        let csv = format_csv(&record()).unwrap();
        assert_eq!(
            csv,
            "po_number,name,quantity,price\n4521,Widget,10,5.00\n4521,\"Bolts, M6\",,\n"
        );
    }

    #[test]
    fn test_text_lists_items() {
        let text = format_text(&record());
        assert!(text.starts_with("PO number: 4521\n"));
        assert!(text.contains("1. Widget\n   Quantity: 10\n   Price:    5.00\n"));
        assert!(text.contains("2. Bolts, M6\n"));
        assert!(text.ends_with("Total quantity: 10\n"));
    }

    #[test]
    fn test_text_without_items() {
        let text = format_text(&OrderRecord::default());
        assert_eq!(text, "PO number: Unknown\n\nNo line items found.\n");
    }
}
