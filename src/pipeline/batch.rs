use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;

use super::TriagePipeline;
use crate::classify::is_affirmative;
use crate::output::{CsvAppender, OutputRow, ERROR_DECISION};

/// One video to check, read from the input CSV
#[derive(Debug, Clone, PartialEq)]
pub struct InputRow {
    pub title: String,
    /// `None` when the record is too short to reach the `link` column
    pub link: Option<String>,
}

/// Positions of the required columns in the input header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    title: usize,
    link: usize,
}

impl InputRow {
    /// Take title and link from a raw record, tolerating short or long records
    fn from_record(record: &csv::ByteRecord, columns: Columns) -> Self {
        let field = |index: usize| {
            record
                .get(index)
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        };

        Self {
            title: field(columns.title).unwrap_or_default(),
            link: field(columns.link),
        }
    }
}

/// Counters for a finished batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub affirmative: usize,
    pub errors: usize,
}

impl BatchSummary {
    fn record(&mut self, decision: &str, failed: bool) {
        self.processed += 1;
        if failed {
            self.errors += 1;
        } else if is_affirmative(decision) {
            self.affirmative += 1;
        }
    }
}

/// Process every row of `input`, appending one decision per row to `output`.
///
/// Rows whose link is missing, unparsable, or whose fetch or classification
/// fails are recorded as `error` and the run goes on. Each row is durably
/// written before the pause that precedes the next row.
pub async fn run_batch(
    pipeline: &TriagePipeline,
    input: &Path,
    output: &Path,
    pause: Duration,
) -> Result<BatchSummary> {
    tracing::info!("Processing CSV file: {}", input.display());

    let file = fs_err::File::open(input).context("Failed to open input CSV")?;
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);

    let headers = reader.byte_headers()?;
    if headers.is_empty() {
        tracing::info!("{} has no header, nothing to process", input.display());
        return Ok(BatchSummary::default());
    }
    let columns = find_columns(headers)
        .with_context(|| format!("Invalid input CSV {}", input.display()))?;

    let appender = CsvAppender::new(output);
    let mut summary = BatchSummary::default();

    for (index, record) in reader.byte_records().enumerate() {
        let number = index + 1;
        let record = record.with_context(|| format!("Failed to read row {} of {}", number, input.display()))?;
        let row = InputRow::from_record(&record, columns);

        if number > 1 && !pause.is_zero() {
            tracing::debug!("Sleeping for {:.1} seconds...", pause.as_secs_f64());
            tokio::time::sleep(pause).await;
        }

        tracing::info!("Processing row {}: {}", number, row.title);
        let (decision, failed) = match &row.link {
            Some(link) => match pipeline.decide(link).await {
                Ok(decision) => (decision, false),
                Err(err) => {
                    tracing::error!("Error processing {}: {}", link, err);
                    (ERROR_DECISION.to_string(), true)
                }
            },
            None => {
                tracing::error!("Error processing row {}: record has no `link` field", number);
                (ERROR_DECISION.to_string(), true)
            }
        };

        summary.record(&decision, failed);
        appender
            .append(&OutputRow {
                title: row.title,
                link: row.link.unwrap_or_default(),
                needs_wiki_page: decision,
            })
            .with_context(|| format!("Failed to record row {} in {}", number, output.display()))?;
    }

    tracing::info!(
        "Finished {}: {} rows, {} yes, {} errors",
        input.display(),
        summary.processed,
        summary.affirmative,
        summary.errors
    );
    Ok(summary)
}

fn find_columns(headers: &csv::ByteRecord) -> Result<Columns> {
    let position = |column: &str| {
        headers
            .iter()
            .position(|header| header == column.as_bytes())
            .ok_or_else(|| anyhow::anyhow!("missing required column `{}`", column))
    };

    Ok(Columns {
        title: position("title")?,
        link: position("link")?,
    })
}
