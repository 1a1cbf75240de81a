use crate::classify::openai::OpenAiClient;
use crate::classify::{is_affirmative, Classifier};
use crate::config::Config;
use crate::extractors::youtube::YoutubeCaptions;
use crate::extractors::TranscriptFetcher;
use crate::{Result, TriageError};

pub mod batch;

/// Fetch-then-classify for one link
pub struct TriagePipeline {
    fetcher: TranscriptFetcher,
    classifier: Classifier,
}

impl TriagePipeline {
    pub fn new(fetcher: TranscriptFetcher, classifier: Classifier) -> Self {
        Self { fetcher, classifier }
    }

    /// Build the YouTube + OpenAI pipeline from configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            TranscriptFetcher::new(Box::new(YoutubeCaptions::new(&config.captions))),
            Classifier::new(Box::new(OpenAiClient::new(&config.openai))),
        )
    }

    /// Fetch the transcript behind `url` and return the normalized decision
    pub async fn decide(&self, url: &str) -> Result<String> {
        let transcript = self.fetcher.fetch(url).await?;
        self.classifier.classify(&transcript).await
    }
}

/// Result of a single-shot check
#[derive(Debug)]
pub enum SingleOutcome {
    Decided(String),
    Failed(TriageError),
}

impl SingleOutcome {
    /// 0 for "yes", 1 for any other answer, 2 when fetching or classifying failed
    pub fn exit_code(&self) -> u8 {
        match self {
            SingleOutcome::Decided(decision) if is_affirmative(decision) => 0,
            SingleOutcome::Decided(_) => 1,
            SingleOutcome::Failed(_) => 2,
        }
    }
}

/// Run one URL through the pipeline without any fault isolation
pub async fn run_single(pipeline: &TriagePipeline, url: &str) -> SingleOutcome {
    tracing::info!("Checking {}", url);

    match pipeline.decide(url).await {
        Ok(decision) => SingleOutcome::Decided(decision),
        Err(err) => {
            tracing::error!("Error: {}", err);
            SingleOutcome::Failed(err)
        }
    }
}
