use clap::Args;
use soil_card::config::AppConfig;
use soil_card::error::AppError;
use soil_card::workflows::bulk::{BatchFailure, BulkCardIngestor, BulkOutcome};
use soil_card::workflows::soil_card::{NutrientCatalog, OutputFormat, SoilCardGenerator, SoilRecord};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

const SUMMARY_ERROR_LIMIT: usize = 4;

#[derive(Args, Debug)]
pub(crate) struct CardArgs {
    /// JSON soil record: metadata fields, a `nutrients` map and optional `remarks`
    #[arg(long)]
    pub(crate) record: PathBuf,
    /// Output file (defaults to soil_card_<farmer>.<ext> in the configured directory)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Output format: pdf or json
    #[arg(long, value_parser = parse_format)]
    pub(crate) format: Option<OutputFormat>,
}

#[derive(Args, Debug)]
pub(crate) struct BulkArgs {
    /// CSV file with a header row naming metadata fields and nutrient keys
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Directory receiving one card per row (created if missing)
    #[arg(long)]
    pub(crate) output_dir: PathBuf,
    /// Output format: pdf or json
    #[arg(long, value_parser = parse_format)]
    pub(crate) format: Option<OutputFormat>,
}

fn parse_format(raw: &str) -> Result<OutputFormat, String> {
    OutputFormat::parse(raw)
        .ok_or_else(|| format!("unsupported format '{raw}' (expected pdf or json)"))
}

pub(crate) fn run_card(args: CardArgs, config: &AppConfig) -> Result<(), AppError> {
    let CardArgs {
        record,
        output,
        format,
    } = args;

    let reader = BufReader::new(File::open(&record)?);
    let soil_record: SoilRecord = serde_json::from_reader(reader)?;

    let format = format.unwrap_or(config.output.format);
    let generator = SoilCardGenerator::new(format.renderer());

    let path = match output {
        Some(path) => {
            generator.generate(&soil_record, &path)?;
            path
        }
        None => {
            std::fs::create_dir_all(&config.output.directory)?;
            generator.generate_into(&soil_record, &config.output.directory)?
        }
    };

    info!(record = %record.display(), path = %path.display(), "card generated");
    println!("Card generated:\n{}", path.display());
    Ok(())
}

pub(crate) fn run_bulk(args: BulkArgs, config: &AppConfig) -> Result<(), AppError> {
    let BulkArgs {
        csv,
        output_dir,
        format,
    } = args;

    std::fs::create_dir_all(&output_dir)?;

    let format = format.unwrap_or(config.output.format);
    let ingestor = BulkCardIngestor::new(SoilCardGenerator::new(format.renderer()));
    let outcome = ingestor.run(&csv, &output_dir);

    if outcome.source_failed() {
        let source = outcome.failures.into_iter().find_map(|failure| match failure {
            BatchFailure::Source(err) => Some(err),
            BatchFailure::Row { .. } => None,
        });
        if let Some(err) = source {
            return Err(err.into());
        }
        return Ok(());
    }

    println!("{}", bulk_summary(&outcome, &output_dir));
    Ok(())
}

fn bulk_summary(outcome: &BulkOutcome, output_dir: &Path) -> String {
    let row_errors: Vec<String> = outcome
        .failures
        .iter()
        .filter(|failure| matches!(failure, BatchFailure::Row { .. }))
        .map(ToString::to_string)
        .collect();

    if row_errors.is_empty() {
        return format!(
            "Generated all {} soil health cards in:\n{}",
            outcome.generated(),
            output_dir.display()
        );
    }

    let first = row_errors
        .iter()
        .take(SUMMARY_ERROR_LIMIT)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Generated {} cards.\n{} errors.\nFirst errors:\n{}",
        outcome.generated(),
        row_errors.len(),
        first
    )
}

pub(crate) fn run_catalog() {
    println!("{:<24} {:>8} {:>8}  Unit", "Nutrient", "Low", "Medium");
    for spec in NutrientCatalog::standard().specs() {
        println!(
            "{:<24} {:>8} {:>8}  {}",
            spec.key(),
            spec.low,
            spec.medium,
            if spec.unit.is_empty() { "-" } else { spec.unit }
        );
    }
}
