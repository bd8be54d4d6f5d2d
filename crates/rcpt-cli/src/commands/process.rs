//! Process command - extract data from a single receipt.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use rcpt_core::models::config::RcptConfig;
use rcpt_core::models::receipt::ReceiptRecord;
use rcpt_core::receipt::rules::{extract_date, DateExtractor, FieldExtractor, TotalExtractor};
use rcpt_core::receipt::{ExtractionResult, ReceiptExtractor, ReceiptParser};
use rcpt_core::{OcrEngine, OcrResult, TesseractEngine};

/// File extensions read directly as OCR text.
pub const TEXT_EXTENSIONS: &[&str] = &["txt", "text", "ocr"];

/// File extensions sent through the OCR engine.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp", "gif", "webp"];

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (OCR text, image, or "-" for stdin)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Validate extracted data
    #[arg(long)]
    validate: bool,

    /// Print the normalized lines, date candidates and labelled totals
    #[arg(long)]
    show_raw: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per line item
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;
    let registry = config.build_registry()?;
    let parser = ReceiptParser::with_registry(&registry);

    let from_stdin = args.input.as_os_str() == "-";
    if !from_stdin && !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing receipt: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.set_message("Reading receipt...");

    let ocr = if from_stdin {
        OcrResult::from_text(std::io::read_to_string(std::io::stdin())?, "stdin")
    } else {
        if is_image(&args.input) {
            pb.set_message("Running OCR...");
        }
        load_ocr_text(&args.input, &config).await?
    };

    if ocr.is_blank() {
        warn!("No text recognized in {}", args.input.display());
    }

    pb.set_message("Extracting receipt data...");
    let result = parser.extract(&ocr);
    pb.finish_and_clear();

    for warning in &result.warnings {
        debug!("{}", warning);
    }

    if args.show_raw {
        eprint!("{}", format_raw(&result));
    }

    // Validate if requested
    if args.validate {
        let issues = result.record.validate();
        if !issues.is_empty() {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    let output = format_record(&result.record, args.format, args.pretty)?;

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

/// Whether a path names an image that needs OCR.
pub fn is_image(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Whether a path is something the CLI can turn into receipt text.
pub fn is_supported(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| {
        TEXT_EXTENSIONS.contains(&ext.as_str()) || IMAGE_EXTENSIONS.contains(&ext.as_str())
    })
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Read receipt text from a text file, or recognize it from an image.
pub async fn load_ocr_text(path: &Path, config: &RcptConfig) -> anyhow::Result<OcrResult> {
    if is_image(path) {
        let engine = TesseractEngine::new(config.ocr.clone());
        let image = path.to_path_buf();
        // The engine blocks on a child process.
        let result = tokio::task::spawn_blocking(move || engine.recognize(&image)).await??;
        return Ok(result);
    }

    match extension_of(path) {
        Some(ext) if TEXT_EXTENSIONS.contains(&ext.as_str()) => {
            Ok(OcrResult::from_text(fs::read_to_string(path)?, "text-file"))
        }
        Some(ext) => anyhow::bail!("Unsupported file format: {}", ext),
        None => anyhow::bail!("Unsupported file format: {}", path.display()),
    }
}

/// Normalized lines plus every date and labelled total the extractors saw.
fn format_raw(result: &ExtractionResult) -> String {
    let mut output = String::new();
    let text = result.lines.join("\n");

    output.push_str(&format!("{}\n", style("Normalized lines:").blue()));
    for line in &result.lines {
        output.push_str(&format!("  | {}\n", line));
    }

    output.push_str(&format!("{}\n", style("Date candidates:").blue()));
    for found in DateExtractor::new().extract_all(&text) {
        output.push_str(&format!("  {} ({:?})\n", found.source, found.value.shape));
    }

    output.push_str(&format!("{}\n", style("Labelled totals:").blue()));
    for found in TotalExtractor::new().extract_all(&text) {
        output.push_str(&format!("  {} -> {:.2}\n", found.source, found.value));
    }
    output.push('\n');

    output
}

pub fn format_record(
    record: &ReceiptRecord,
    format: OutputFormat,
    pretty: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Json => Ok(serde_json::to_string(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_csv(record: &ReceiptRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["store", "date", "name", "quantity", "price", "total"])?;

    let store = record.store.clone().unwrap_or_default();
    let date = record.date.clone().unwrap_or_default();

    if record.items.is_empty() {
        wtr.write_record([store.as_str(), date.as_str(), "", "", "", ""])?;
    }

    for item in &record.items {
        wtr.write_record([
            &store,
            &date,
            &item.name,
            &item.quantity.normalize().to_string(),
            &format!("{:.2}", item.price),
            &format!("{:.2}", item.total),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &ReceiptRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("Store: {}\n", record.store_or_unknown()));

    let iso_date = record
        .date
        .as_deref()
        .and_then(extract_date)
        .and_then(|m| m.value.to_naive_date());
    match iso_date {
        Some(date) => output.push_str(&format!("Date: {} ({})\n", record.date_or_unknown(), date)),
        None => output.push_str(&format!("Date: {}\n", record.date_or_unknown())),
    }
    output.push('\n');

    output.push_str("Items:\n");
    if record.items.is_empty() {
        output.push_str("  No items detected\n");
    } else {
        output.push_str(&format!(
            "  {:<30} {:>8} {:>10} {:>10}\n",
            "Name", "Qty", "Price", "Total"
        ));
        for item in &record.items {
            output.push_str(&format!(
                "  {:<30} {:>8} {:>10} {:>10}\n",
                item.name,
                item.quantity.normalize().to_string(),
                format!("{:.2}", item.price),
                format!("{:.2}", item.total),
            ));
        }
    }
    output.push('\n');

    output.push_str(&format!("Total: {:.2}\n", record.total));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rcpt_core::LineItem;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_record() -> ReceiptRecord {
        ReceiptRecord {
            store: Some("Target".to_string()),
            date: Some("05/12/2023".to_string()),
            items: vec![
                LineItem {
                    name: "Apple".to_string(),
                    quantity: dec("2"),
                    price: dec("1.50"),
                    total: dec("3.00"),
                },
                LineItem::single("Milk", dec("3.49")),
            ],
            total: dec("6.49"),
        }
    }

    #[test]
    fn test_csv_has_one_row_per_item() {
        let csv = format_csv(&sample_record()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "store,date,name,quantity,price,total",
                "Target,05/12/2023,Apple,2,1.50,3.00",
                "Target,05/12/2023,Milk,1,3.49,3.49",
            ]
        );
    }

    #[test]
    fn test_csv_without_items_keeps_one_row() {
        let record = ReceiptRecord {
            store: None,
            date: None,
            items: Vec::new(),
            total: Decimal::ZERO,
        };
        let csv = format_csv(&record).unwrap();
        assert_eq!(csv.lines().nth(1), Some(",,,,,"));
    }

    #[test]
    fn test_text_summary() {
        let text = format_text(&sample_record());
        assert!(text.contains("Store: Target"));
        assert!(text.contains("Date: 05/12/2023 (2023-05-12)"));
        assert!(text.contains("Apple"));
        assert!(text.contains("Total: 6.49"));
    }

    #[test]
    fn test_text_summary_for_unknown_fields() {
        let record = ReceiptRecord {
            store: None,
            date: None,
            items: Vec::new(),
            total: Decimal::ZERO,
        };
        let text = format_text(&record);
        assert!(text.contains("Store: Unknown Store"));
        assert!(text.contains("Date: Unknown Date"));
        assert!(text.contains("No items detected"));
        assert!(text.contains("Total: 0.00"));
    }

    #[test]
    fn test_raw_output_lists_candidates() {
        let result = ReceiptParser::new()
            .parse("Target\n05/12/2023\nSoap 2.99\nSubtotal 2.99\nTOTAL 3.20");
        let raw = console::strip_ansi_codes(&format_raw(&result)).to_string();

        assert!(raw.contains("  | Soap 2.99"));
        assert!(raw.contains("  05/12/2023 (Numeric)"));
        assert!(raw.contains("  total 2.99 -> 2.99"));
        assert!(raw.contains("  TOTAL 3.20 -> 3.20"));
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported(Path::new("receipt.TXT")));
        assert!(is_supported(Path::new("scan.jpeg")));
        assert!(is_image(Path::new("scan.PNG")));
        assert!(!is_image(Path::new("receipt.txt")));
        assert!(!is_supported(Path::new("invoice.pdf")));
        assert!(!is_supported(Path::new("README")));
    }
}
