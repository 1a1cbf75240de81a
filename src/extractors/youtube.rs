use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{CaptionFragment, CaptionSource};
use crate::config::CaptionConfig;
use crate::{Result, TriageError};

const API_KEY_MARKER: &str = "\"INNERTUBE_API_KEY\":\"";
const RECAPTCHA_MARKER: &str = "class=\"g-recaptcha\"";
const ANDROID_CLIENT_NAME: &str = "ANDROID";
const ANDROID_CLIENT_VERSION: &str = "20.10.38";

/// Innertube player response, reduced to what caption lookup needs
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    playability_status: Option<PlayabilityStatus>,
    captions: Option<PlayerCaptions>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: String,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerCaptions {
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<CaptionTrack>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
    /// `asr` for auto-generated tracks
    kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

/// Timedtext `fmt=json3` document
#[derive(Debug, Deserialize)]
struct Json3Document {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    d_duration_ms: u64,
    segs: Option<Vec<Json3Segment>>,
}

#[derive(Debug, Deserialize)]
struct Json3Segment {
    #[serde(default)]
    utf8: String,
}

/// YouTube caption client speaking the watch page, innertube and timedtext endpoints
pub struct YoutubeCaptions {
    client: Client,
    base_url: String,
    languages: Vec<String>,
}

impl YoutubeCaptions {
    pub fn new(config: &CaptionConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            languages: config.languages.clone(),
        }
    }

    /// Read the innertube API key from the watch page
    async fn fetch_api_key(&self, video_id: &str) -> Result<String> {
        let url = format!("{}/watch?v={}", self.base_url, urlencoding::encode(video_id));
        tracing::debug!("Fetching watch page: {}", url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US")
            .send()
            .await
            .map_err(unavailable)?;

        if !response.status().is_success() {
            return Err(TriageError::TranscriptUnavailable(format!(
                "watch page returned HTTP {}",
                response.status()
            )));
        }

        let html = response.text().await.map_err(unavailable)?;
        extract_api_key(&html)
    }

    /// Ask the innertube player endpoint for the caption track list
    async fn fetch_player(&self, video_id: &str, api_key: &str) -> Result<PlayerResponse> {
        let url = format!(
            "{}/youtubei/v1/player?key={}",
            self.base_url,
            urlencoding::encode(api_key)
        );
        let body = json!({
            "context": {
                "client": {
                    "clientName": ANDROID_CLIENT_NAME,
                    "clientVersion": ANDROID_CLIENT_VERSION,
                }
            },
            "videoId": video_id,
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(unavailable)?;

        if !response.status().is_success() {
            return Err(TriageError::TranscriptUnavailable(format!(
                "player endpoint returned HTTP {}",
                response.status()
            )));
        }

        response.json().await.map_err(unavailable)
    }

    /// Download one caption track as json3 and flatten it into fragments
    async fn fetch_track(&self, track: &CaptionTrack) -> Result<Vec<CaptionFragment>> {
        let url = json3_url(&track.base_url);
        let kind = if track.is_generated() { "generated" } else { "manual" };
        tracing::debug!("Fetching {} captions ({})", track.language_code, kind);

        let response = self.client.get(&url).send().await.map_err(unavailable)?;

        if !response.status().is_success() {
            return Err(TriageError::TranscriptUnavailable(format!(
                "timedtext endpoint returned HTTP {}",
                response.status()
            )));
        }

        let body = response.text().await.map_err(unavailable)?;
        parse_json3(&body)
    }
}

#[async_trait]
impl CaptionSource for YoutubeCaptions {
    async fn fetch_fragments(&self, video_id: &str) -> Result<Vec<CaptionFragment>> {
        let api_key = self.fetch_api_key(video_id).await?;
        let player = self.fetch_player(video_id, &api_key).await?;
        let tracks = caption_tracks(player)?;
        let track = select_track(&tracks, &self.languages)?;

        self.fetch_track(track).await
    }

    fn service_name(&self) -> &'static str {
        "YouTube"
    }
}

fn unavailable(err: reqwest::Error) -> TriageError {
    TriageError::TranscriptUnavailable(err.to_string())
}

fn extract_api_key(html: &str) -> Result<String> {
    if let Some((_, rest)) = html.split_once(API_KEY_MARKER) {
        if let Some((key, _)) = rest.split_once('"') {
            return Ok(key.to_string());
        }
    }

    if html.contains(RECAPTCHA_MARKER) {
        return Err(TriageError::TranscriptUnavailable(
            "YouTube is blocking requests from this IP (captcha challenge)".to_string(),
        ));
    }

    Err(TriageError::TranscriptUnavailable(
        "could not find the player configuration on the watch page".to_string(),
    ))
}

fn caption_tracks(player: PlayerResponse) -> Result<Vec<CaptionTrack>> {
    if let Some(playability) = player.playability_status {
        let reason = playability.reason.unwrap_or_default();
        match playability.status.as_str() {
            "OK" => {}
            "LOGIN_REQUIRED" => {
                return Err(TriageError::TranscriptUnavailable(format!(
                    "video is private or age restricted: {}",
                    reason
                )))
            }
            status => {
                return Err(TriageError::TranscriptUnavailable(format!(
                    "video is unplayable ({}): {}",
                    status, reason
                )))
            }
        }
    }

    let tracks = player
        .captions
        .and_then(|captions| captions.player_captions_tracklist_renderer)
        .map(|renderer| renderer.caption_tracks)
        .unwrap_or_default();

    if tracks.is_empty() {
        return Err(TriageError::TranscriptUnavailable(
            "subtitles are disabled for this video".to_string(),
        ));
    }

    Ok(tracks)
}

/// Pick the first preferred language, manual tracks before generated ones
fn select_track<'a>(tracks: &'a [CaptionTrack], languages: &[String]) -> Result<&'a CaptionTrack> {
    for language in languages {
        let manual = tracks
            .iter()
            .find(|track| &track.language_code == language && !track.is_generated());
        let any = tracks.iter().find(|track| &track.language_code == language);

        if let Some(track) = manual.or(any) {
            return Ok(track);
        }
    }

    let available = tracks
        .iter()
        .map(|track| track.language_code.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    Err(TriageError::TranscriptUnavailable(format!(
        "no transcript found for languages [{}], available: [{}]",
        languages.join(", "),
        available
    )))
}

fn json3_url(base_url: &str) -> String {
    let base = base_url.replace("&fmt=srv3", "");
    if base.contains('?') {
        format!("{}&fmt=json3", base)
    } else {
        format!("{}?fmt=json3", base)
    }
}

fn parse_json3(body: &str) -> Result<Vec<CaptionFragment>> {
    if body.trim().is_empty() {
        return Err(TriageError::TranscriptUnavailable(
            "caption track is empty".to_string(),
        ));
    }

    let document: Json3Document = serde_json::from_str(body)
        .map_err(|e| TriageError::TranscriptUnavailable(format!("malformed caption track: {}", e)))?;

    let fragments = document
        .events
        .into_iter()
        .filter_map(|event| {
            let text: String = event.segs?.into_iter().map(|seg| seg.utf8).collect();
            if text.trim().is_empty() {
                return None;
            }
            Some(CaptionFragment::new(
                text,
                event.t_start_ms as f64 / 1000.0,
                event.d_duration_ms as f64 / 1000.0,
            ))
        })
        .collect();

    Ok(fragments)
}
