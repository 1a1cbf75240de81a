//! OpenAI chat completions backend

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::CompletionService;
use crate::config::OpenAiConfig;
use crate::{Result, TriageError};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint
pub struct OpenAiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key_env: String,
}

impl OpenAiClient {
    pub fn new(config: &OpenAiConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key_env: config.api_key_env.clone(),
        }
    }

    /// Read the credential; looked up on every call
    fn api_key(&self) -> Result<String> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(TriageError::ClassificationService(format!(
                "authentication failed: {} is not set",
                self.api_key_env
            ))),
        }
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<Vec<String>> {
        let api_key = self.api_key()?;
        let request = build_request(&self.model, prompt);

        tracing::debug!("Sending request to {} ({})", self.endpoint, self.model);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| TriageError::ClassificationService(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TriageError::ClassificationService(e.to_string()))?;

        if !status.is_success() {
            return Err(TriageError::ClassificationService(format!(
                "API error ({}): {}",
                status,
                error_message(&body)
            )));
        }

        parse_choices(&body)
    }
}

fn build_request<'a>(model: &'a str, prompt: &'a str) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: vec![ChatMessage {
            role: "user",
            content: prompt,
        }],
    }
}

/// Completion texts in the order the service ranked them.
///
/// A first choice without text (refusal or tool call) is an error; later empty
/// choices become empty strings.
fn parse_choices(body: &str) -> Result<Vec<String>> {
    let response: ChatResponse = serde_json::from_str(body).map_err(|e| {
        TriageError::ClassificationService(format!("Failed to parse API response: {}", e))
    })?;

    let mut texts = Vec::with_capacity(response.choices.len());
    for (index, choice) in response.choices.into_iter().enumerate() {
        match choice.message.content {
            Some(text) => texts.push(text),
            None if index == 0 => {
                return Err(TriageError::ClassificationService(
                    "response contained no text".to_string(),
                ))
            }
            None => texts.push(String::new()),
        }
    }

    Ok(texts)
}

/// Prefer the service's own error message over the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}
