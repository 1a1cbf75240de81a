use async_trait::async_trait;

pub mod openai;

use crate::utils::truncate_for_log;
use crate::{Result, TriageError};

/// The only decision treated as affirmative
pub const AFFIRMATIVE: &str = "yes";

/// Trait for remote text-completion services
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Send a single-turn prompt, returning the completion texts in ranked order
    async fn complete(&self, prompt: &str) -> Result<Vec<String>>;
}

/// Build the wiki-page question around a transcript
pub fn build_prompt(transcript: &str) -> String {
    format!(
        r#"Does this video cover a specific consumer rights topic that warrants a dedicated wiki page where consumers can share their experiences on this topic and collaborate on how to not get screwed by the vendor?

Examples of topics that warrant a wiki page:
"discussion of specific politician screwing right to repair bill after receiving $3300 from AT&T lobbyist"
"ford filing patent on how to use in-car-spyware to advertise to passengers during drive"

Examples of topics that DO NOT warrant a wiki page:
"cat video"
"random rant"

Video transcript: {transcript}
Please respond with a simple "yes" or "no"
"#
    )
}

/// Trim and lower-case a model answer. Anything besides yes/no passes through.
pub fn normalize_decision(answer: &str) -> String {
    answer.trim().to_lowercase()
}

/// Whether a normalized decision counts as "yes"
pub fn is_affirmative(decision: &str) -> bool {
    decision == AFFIRMATIVE
}

/// Asks a completion service the wiki-page question
pub struct Classifier {
    service: Box<dyn CompletionService>,
}

impl Classifier {
    pub fn new(service: Box<dyn CompletionService>) -> Self {
        Self { service }
    }

    /// Classify a transcript, returning the normalized answer
    pub async fn classify(&self, transcript: &str) -> Result<String> {
        let prompt = build_prompt(transcript);
        tracing::debug!("Prompt length: {} characters", prompt.len());

        let choices = self.service.complete(&prompt).await?;
        let first = choices.first().ok_or_else(|| {
            TriageError::ClassificationService("response contained no choices".to_string())
        })?;

        let decision = normalize_decision(first);
        tracing::debug!("Model response: {}", truncate_for_log(&decision, 200));
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier_answering(answers: Vec<&'static str>) -> Classifier {
        let mut service = MockCompletionService::new();
        service
            .expect_complete()
            .times(1)
            .returning(move |_| Ok(answers.iter().map(|a| a.to_string()).collect()));
        Classifier::new(Box::new(service))
    }

    #[test]
    fn test_prompt_layout() {
        let prompt = build_prompt("they bricked my tractor");
        assert!(prompt.starts_with("Does this video cover a specific consumer rights topic"));
        assert!(prompt.contains("$3300 from AT&T lobbyist"));
        assert!(prompt.contains("\"cat video\"\n\"random rant\""));
        assert!(prompt.contains("Video transcript: they bricked my tractor\n"));
        assert!(prompt.ends_with("Please respond with a simple \"yes\" or \"no\"\n"));
    }

    #[test]
    fn test_normalize_decision() {
        assert_eq!(normalize_decision(" YES \n"), "yes");
        assert_eq!(normalize_decision("No."), "no.");
        assert!(is_affirmative(&normalize_decision("\tYes")));
        assert!(!is_affirmative("yes."));
    }

    #[tokio::test]
    async fn test_classify_normalizes_first_choice() {
        let classifier = classifier_answering(vec![" YES \n", "no"]);
        assert_eq!(classifier.classify("transcript").await.unwrap(), "yes");
    }

    #[tokio::test]
    async fn test_classify_passes_through_unexpected_text() {
        let classifier = classifier_answering(vec!["Maybe, it depends"]);
        assert_eq!(classifier.classify("transcript").await.unwrap(), "maybe, it depends");
    }

    #[tokio::test]
    async fn test_classify_sends_transcript_in_prompt() {
        let mut service = MockCompletionService::new();
        service
            .expect_complete()
            .withf(|prompt: &str| prompt.contains("Video transcript: ink cartridges with DRM"))
            .returning(|_| Ok(vec!["no".to_string()]));

        let classifier = Classifier::new(Box::new(service));
        assert_eq!(classifier.classify("ink cartridges with DRM").await.unwrap(), "no");
    }

    #[tokio::test]
    async fn test_classify_without_choices_fails() {
        let classifier = classifier_answering(vec![]);
        let err = classifier.classify("transcript").await.unwrap_err();
        assert!(matches!(err, TriageError::ClassificationService(_)));
    }

    #[tokio::test]
    async fn test_classify_propagates_service_error() {
        let mut service = MockCompletionService::new();
        service.expect_complete().returning(|_| {
            Err(TriageError::ClassificationService("quota exceeded".to_string()))
        });

        let classifier = Classifier::new(Box::new(service));
        let err = classifier.classify("transcript").await.unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }
}
