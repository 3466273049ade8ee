mod naming;
mod parser;

pub use naming::{bulk_card_file_name, sanitize_file_stem};

use crate::workflows::soil_card::{CardError, SoilCardGenerator};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Why a whole import could not start.
#[derive(Debug, thiserror::Error)]
pub enum BulkSourceError {
    #[error("Failed to read CSV: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Why a single row produced no card. The batch carries on regardless.
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    #[error("invalid value '{value}' for column '{column}'")]
    InvalidNumber { column: String, value: String },
    #[error("malformed row: {0}")]
    Malformed(#[from] csv::Error),
    #[error(transparent)]
    Card(#[from] CardError),
}

#[derive(Debug)]
pub enum BatchFailure {
    Source(BulkSourceError),
    /// `row` counts data rows from 1; the header is not counted.
    Row { row: usize, error: RowError },
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchFailure::Source(err) => write!(f, "{err}"),
            BatchFailure::Row { row, error } => write!(f, "Row {row}: {error}"),
        }
    }
}

/// Result of one import: every card written plus every failure, both in
/// source row order.
#[derive(Debug, Default)]
pub struct BulkOutcome {
    pub written: Vec<PathBuf>,
    pub failures: Vec<BatchFailure>,
}

impl BulkOutcome {
    pub fn generated(&self) -> usize {
        self.written.len()
    }

    pub fn errors(&self) -> Vec<String> {
        self.failures.iter().map(ToString::to_string).collect()
    }

    pub fn source_failed(&self) -> bool {
        self.failures
            .iter()
            .any(|failure| matches!(failure, BatchFailure::Source(_)))
    }

    fn from_source_error(error: BulkSourceError) -> Self {
        Self {
            written: Vec::new(),
            failures: vec![BatchFailure::Source(error)],
        }
    }
}

/// Generates one card per CSV row into an output directory.
#[derive(Debug)]
pub struct BulkCardIngestor {
    generator: SoilCardGenerator,
}

impl BulkCardIngestor {
    pub fn new(generator: SoilCardGenerator) -> Self {
        Self { generator }
    }

    pub fn run<P: AsRef<Path>>(&self, csv_path: P, output_dir: &Path) -> BulkOutcome {
        let csv_path = csv_path.as_ref();
        match std::fs::File::open(csv_path) {
            Ok(file) => self.run_reader(file, output_dir),
            Err(err) => {
                warn!(path = %csv_path.display(), error = %err, "bulk source unreadable");
                BulkOutcome::from_source_error(err.into())
            }
        }
    }

    pub fn run_reader<R: Read>(&self, reader: R, output_dir: &Path) -> BulkOutcome {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = match csv_reader.headers() {
            Ok(headers) => headers.clone(),
            Err(err) => {
                warn!(error = %err, "bulk source header unreadable");
                return BulkOutcome::from_source_error(err.into());
            }
        };
        let targets = parser::column_targets(&headers);

        let mut outcome = BulkOutcome::default();
        for (index, row) in csv_reader.records().enumerate() {
            let row_number = index + 1;
            let fatal = matches!(&row, Err(err) if err.is_io_error());

            let result = row
                .map_err(RowError::from)
                .and_then(|row| parser::record_from_row(&headers, &targets, &row))
                .and_then(|record| {
                    let name = bulk_card_file_name(
                        record.metadata.farmer_name.as_deref(),
                        row_number,
                        self.generator.file_extension(),
                    );
                    let path = output_dir.join(name);
                    self.generator.generate(&record, &path)?;
                    Ok(path)
                });

            match result {
                Ok(path) => {
                    info!(row = row_number, path = %path.display(), "soil health card generated");
                    outcome.written.push(path);
                }
                Err(error) => {
                    warn!(row = row_number, %error, "skipping row");
                    outcome.failures.push(BatchFailure::Row {
                        row: row_number,
                        error,
                    });
                }
            }

            // The underlying reader failed; further reads cannot make progress.
            if fatal {
                break;
            }
        }

        info!(
            generated = outcome.generated(),
            failed = outcome.failures.len(),
            "bulk generation finished"
        );
        outcome
    }
}
