use crate::commands::{run_bulk, run_card, run_catalog, BulkArgs, CardArgs};
use clap::{Parser, Subcommand};
use soil_card::config::AppConfig;
use soil_card::error::AppError;
use soil_card::telemetry;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "soil-card",
    about = "Generate soil health cards with nutrient status and fertilizer recommendations",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one card from a JSON soil record
    Card(CardArgs),
    /// Generate one card per row of a CSV file
    Bulk(BulkArgs),
    /// List the nutrient reference thresholds
    Catalog,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(
        ?config.environment,
        output = %config.output.directory.display(),
        "configuration loaded"
    );

    match cli.command {
        Command::Card(args) => run_card(args, &config),
        Command::Bulk(args) => run_bulk(args, &config),
        Command::Catalog => {
            run_catalog();
            Ok(())
        }
    }
}
