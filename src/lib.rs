//! Transcript Triage - pull a video's captions and ask a language model whether it
//! deserves a consumer-rights wiki page.
//!
//! The library holds the caption retrieval, the classifier and the drivers shared by
//! the `transcript-triage` and `get-transcript` binaries.

pub mod classify;
pub mod cli;
pub mod config;
pub mod extractors;
pub mod output;
pub mod pipeline;
pub mod utils;

pub use classify::{Classifier, CompletionService};
pub use cli::{Cli, TranscriptCli};
pub use config::Config;
pub use extractors::{extract_video_id, CaptionFragment, CaptionSource, TranscriptFetcher};
pub use output::{CsvAppender, OutputRow};
pub use pipeline::{SingleOutcome, TriagePipeline};

/// Result type used throughout the library
pub type Result<T, E = TriageError> = std::result::Result<T, E>;

/// Error types specific to transcript triage
#[derive(thiserror::Error, Debug)]
pub enum TriageError {
    #[error("Could not extract video ID from URL: {0}")]
    InvalidUrl(String),

    #[error("Transcript unavailable: {0}")]
    TranscriptUnavailable(String),

    #[error("Classification service error: {0}")]
    ClassificationService(String),

    #[error("Usage error: {0}")]
    Usage(String),
}
