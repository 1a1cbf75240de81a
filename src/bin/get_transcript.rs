use clap::Parser;
use std::process::ExitCode;

use transcript_triage::extractors::youtube::YoutubeCaptions;
use transcript_triage::{utils, Config, TranscriptCli, TranscriptFetcher};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = TranscriptCli::parse();
    let _log_guard = utils::init_tracing(false);

    let Some(url) = cli.single_url() else {
        eprintln!("{}", TranscriptCli::USAGE);
        return ExitCode::from(1);
    };

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            return ExitCode::from(1);
        }
    };

    let fetcher = TranscriptFetcher::new(Box::new(YoutubeCaptions::new(&config.captions)));
    match fetcher.fetch(url).await {
        Ok(transcript) => {
            println!("{}", transcript);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(1)
        }
    }
}
