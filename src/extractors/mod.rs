use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod youtube;

use crate::{Result, TriageError};

/// One timed caption line as returned by the caption service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionFragment {
    /// Caption text
    pub text: String,

    /// Start offset in seconds
    pub start: f64,

    /// Duration in seconds
    pub duration: f64,
}

impl CaptionFragment {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }
}

/// Trait for services that hand out captions keyed by video identifier
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaptionSource: Send + Sync {
    /// Fetch the ordered caption fragments of a video
    async fn fetch_fragments(&self, video_id: &str) -> Result<Vec<CaptionFragment>>;

    /// Get the name of this service
    fn service_name(&self) -> &'static str;
}

/// Extract the caption-service identifier from a playback URL.
///
/// Plain substring splitting: the text between the first and second `v=`, cut at
/// `&`, otherwise the text between the first and second `youtu.be/`, cut at `?`.
/// Scheme and host are not checked.
pub fn extract_video_id(url: &str) -> Result<String> {
    tracing::debug!("Extracting video ID from URL: {}", url);

    let video_id = if let Some(segment) = second_segment(url, "v=") {
        segment.split('&').next().unwrap_or_default()
    } else if let Some(segment) = second_segment(url, "youtu.be/") {
        segment.split('?').next().unwrap_or_default()
    } else {
        return Err(TriageError::InvalidUrl(url.to_string()));
    };

    tracing::debug!("Extracted video ID: {}", video_id);
    Ok(video_id.to_string())
}

/// The piece of `text` after the first `needle` and before the next one
fn second_segment<'a>(text: &'a str, needle: &str) -> Option<&'a str> {
    text.split(needle).nth(1)
}

/// Join fragment texts with single spaces, in order
pub fn join_fragments(fragments: &[CaptionFragment]) -> String {
    fragments
        .iter()
        .map(|fragment| fragment.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Turns a playback URL into one flat transcript string
pub struct TranscriptFetcher {
    source: Box<dyn CaptionSource>,
}

impl TranscriptFetcher {
    pub fn new(source: Box<dyn CaptionSource>) -> Self {
        Self { source }
    }

    /// Fetch the transcript for `url`
    pub async fn fetch(&self, url: &str) -> Result<String> {
        tracing::debug!("Getting transcript for URL: {}", url);

        let video_id = extract_video_id(url)?;
        let fragments = self.source.fetch_fragments(&video_id).await?;
        let transcript = join_fragments(&fragments);

        tracing::debug!(
            "Retrieved transcript from {}: {} fragments, {} characters",
            self.source.service_name(),
            fragments.len(),
            transcript.len()
        );
        Ok(transcript)
    }
}
