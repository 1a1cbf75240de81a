use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Header of the decision file
pub const OUTPUT_HEADER: [&str; 3] = ["title", "link", "needs_wiki_page"];

/// Decision recorded when fetching or classifying a row failed
pub const ERROR_DECISION: &str = "error";

/// One line of the decision file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRow {
    pub title: String,
    pub link: String,
    pub needs_wiki_page: String,
}

/// Appends decision rows to a CSV file, one durable write per row
pub struct CsvAppender {
    path: PathBuf,
}

impl CsvAppender {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row and force it to disk.
    ///
    /// The header goes in only when the file did not exist before this call. The
    /// file is opened, written, flushed, synced and closed every time.
    pub fn append(&self, row: &OutputRow) -> Result<()> {
        let write_header = !self.path.exists();

        let mut file = fs_err::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .context("Failed to open output file")?;

        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(&mut file);

            if write_header {
                writer.write_record(OUTPUT_HEADER)?;
            }
            writer.serialize(row)?;
            writer.flush().context("Failed to flush output file")?;
        }

        file.sync_all().context("Failed to sync output file")?;
        Ok(())
    }
}
