use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::utils::seconds_to_duration;

const LOCAL_CONFIG: &str = "transcript-triage.yaml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Completion service settings
    pub openai: OpenAiConfig,

    /// Caption retrieval settings
    pub captions: CaptionConfig,

    /// Batch run defaults
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API root, the chat endpoint is `{base_url}/chat/completions`
    pub base_url: String,

    /// Model identifier sent with every request
    pub model: String,

    /// Environment variable holding the API key
    pub api_key_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionConfig {
    /// YouTube origin
    pub base_url: String,

    /// Caption languages in order of preference
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Output CSV path
    pub output: PathBuf,

    /// Pause between rows, in seconds
    pub sleep_seconds: f64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.youtube.com".to_string(),
            languages: vec!["en".to_string()],
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("output.csv"),
            sleep_seconds: 3.0,
        }
    }
}

impl Config {
    /// Load configuration from `explicit`, the working directory or the user config
    /// directory, falling back to defaults when no file exists
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover(),
        };

        let Some(path) = path else {
            tracing::debug!("No config file found, using defaults");
            return Ok(Self::default());
        };

        tracing::debug!("Loading config from {}", path.display());
        let content = fs_err::read_to_string(&path).context("Failed to read config file")?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(config)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to an empty map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the first existing config file path
    fn discover() -> Option<PathBuf> {
        let local_config = PathBuf::from(LOCAL_CONFIG);
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir()
            .map(|dir| dir.join("transcript-triage").join("config.yaml"))
            .filter(|path| path.exists())
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.openai.model.trim().is_empty() {
            anyhow::bail!("openai.model must not be empty");
        }

        if self.openai.api_key_env.trim().is_empty() {
            anyhow::bail!("openai.api_key_env must not be empty");
        }

        if self.captions.languages.is_empty() {
            anyhow::bail!("captions.languages must list at least one language code");
        }

        self.sleep().map_err(anyhow::Error::msg)?;

        Ok(())
    }

    /// Configured pause between batch rows
    pub fn sleep(&self) -> Result<Duration, String> {
        seconds_to_duration(self.batch.sleep_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.openai.model, "gpt-4");
        assert_eq!(config.openai.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.captions.languages, vec!["en"]);
        assert_eq!(config.batch.output, PathBuf::from("output.csv"));
        assert_eq!(config.sleep(), Ok(Duration::from_secs(3)));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml("openai:\n  model: gpt-4o-mini\nbatch:\n  sleep_seconds: 0.5\n")
            .unwrap();
        assert_eq!(config.openai.model, "gpt-4o-mini");
        assert_eq!(config.openai.base_url, "https://api.openai.com/v1");
        assert_eq!(config.captions.base_url, "https://www.youtube.com");
        assert_eq!(config.batch.output, PathBuf::from("output.csv"));
        assert_eq!(config.sleep(), Ok(Duration::from_millis(500)));
    }

    #[test]
    fn test_empty_yaml() {
        let config = Config::from_yaml("  \n").unwrap();
        assert_eq!(config.openai.model, "gpt-4");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Config::from_yaml("batch:\n  sleep_seconds: -2\n").is_err());
        assert!(Config::from_yaml("captions:\n  languages: []\n").is_err());
        assert!(Config::from_yaml("openai:\n  model: ''\n").is_err());
        assert!(Config::from_yaml("openai: [1, 2]\n").is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("triage.yaml");
        fs_err::write(&path, "captions:\n  languages: [de, en]\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.captions.languages, vec!["de", "en"]);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("absent.yaml"))).is_err());
    }
}
