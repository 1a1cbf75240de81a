use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::utils::parse_seconds;

#[derive(Parser, Debug)]
#[command(
    name = "transcript-triage",
    about = "Transcript Triage - Decide whether YouTube videos warrant a consumer-rights wiki page",
    version,
    long_about = "Fetches the captions of a YouTube video, asks an OpenAI model whether the video covers a consumer-rights topic worth a wiki page, and reports yes or no. Pass a single URL for a one-off check, or --csv to work through a list and append the decisions to an output CSV."
)]
pub struct Cli {
    /// Process YouTube URLs from a CSV file with `title` and `link` columns
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// Output CSV file for batch mode [default: output.csv]
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Sleep time between rows in seconds [default: 3.0]
    #[arg(long, value_name = "SECONDS", value_parser = parse_seconds)]
    pub sleep: Option<Duration>,

    /// Configuration file (YAML)
    #[arg(long, value_name = "FILE", env = "TRIAGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// YouTube video URL to analyze
    #[arg(value_name = "URL")]
    pub url: Option<String>,
}

/// What the classifier binary was asked to do
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Batch(PathBuf),
    Single(String),
}

impl Cli {
    /// Resolve the run mode; `--csv` wins when both are present
    pub fn mode(&self) -> Option<Mode> {
        match (&self.csv, &self.url) {
            (Some(csv), _) => Some(Mode::Batch(csv.clone())),
            (None, Some(url)) => Some(Mode::Single(url.clone())),
            (None, None) => None,
        }
    }
}

/// Arguments of the minimal `get-transcript` tool
#[derive(Parser, Debug)]
#[command(
    name = "get-transcript",
    about = "Print the caption transcript of a YouTube video",
    version
)]
pub struct TranscriptCli {
    /// YouTube video URL
    #[arg(value_name = "URL", num_args = 0..)]
    pub urls: Vec<String>,

    /// Configuration file (YAML)
    #[arg(long, value_name = "FILE", env = "TRIAGE_CONFIG")]
    pub config: Option<PathBuf>,
}

impl TranscriptCli {
    pub const USAGE: &'static str = "Usage: get-transcript <youtube-url>";

    /// The single URL argument, or `None` when the count is wrong
    pub fn single_url(&self) -> Option<&str> {
        match self.urls.as_slice() {
            [url] => Some(url.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_wins_over_url() {
        let cli = Cli::parse_from([
            "transcript-triage",
            "--csv",
            "videos.csv",
            "https://youtu.be/abc",
        ]);
        assert_eq!(cli.mode(), Some(Mode::Batch(PathBuf::from("videos.csv"))));
    }

    #[test]
    fn test_single_url_mode() {
        let cli = Cli::parse_from(["transcript-triage", "--debug", "https://youtu.be/abc"]);
        assert!(cli.debug);
        assert_eq!(cli.mode(), Some(Mode::Single("https://youtu.be/abc".to_string())));
    }

    #[test]
    fn test_no_mode() {
        let cli = Cli::parse_from(["transcript-triage"]);
        assert_eq!(cli.mode(), None);
        assert!(cli.sleep.is_none());
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_sleep_flag() {
        let cli = Cli::parse_from(["transcript-triage", "--sleep", "0.5", "--csv", "in.csv"]);
        assert_eq!(cli.sleep, Some(Duration::from_millis(500)));
        assert!(Cli::try_parse_from(["transcript-triage", "--sleep", "-1"]).is_err());
    }

    #[test]
    fn test_transcript_cli_argument_count() {
        let cli = TranscriptCli::parse_from(["get-transcript", "https://youtu.be/abc"]);
        assert_eq!(cli.single_url(), Some("https://youtu.be/abc"));

        let cli = TranscriptCli::parse_from(["get-transcript"]);
        assert_eq!(cli.single_url(), None);

        let cli = TranscriptCli::parse_from(["get-transcript", "a", "b"]);
        assert_eq!(cli.single_url(), None);
    }
}
