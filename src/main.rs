use clap::{CommandFactory, Parser};
use std::process::ExitCode;

use transcript_triage::cli::{Cli, Mode};
use transcript_triage::pipeline::{batch, run_single, SingleOutcome};
use transcript_triage::{utils, Config, TriageError, TriagePipeline};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let _log_guard = utils::init_tracing(cli.debug);

    let Some(mode) = cli.mode() else {
        tracing::error!("{}", TriageError::Usage("either --csv or a URL is required".to_string()));
        if let Err(err) = Cli::command().print_help() {
            tracing::debug!("Failed to print help: {}", err);
        }
        return ExitCode::from(1);
    };

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("{:#}", err);
            return ExitCode::from(1);
        }
    };

    let pipeline = TriagePipeline::from_config(&config);

    match mode {
        Mode::Batch(input) => {
            let output = cli.output.unwrap_or_else(|| config.batch.output.clone());
            let pause = match cli.sleep.map(Ok).unwrap_or_else(|| config.sleep()) {
                Ok(pause) => pause,
                Err(err) => {
                    tracing::error!("{}", err);
                    return ExitCode::from(1);
                }
            };

            match batch::run_batch(&pipeline, &input, &output, pause).await {
                Ok(_) => ExitCode::SUCCESS,
                Err(err) => {
                    tracing::error!("{:#}", err);
                    ExitCode::from(1)
                }
            }
        }
        Mode::Single(url) => {
            let outcome = run_single(&pipeline, &url).await;
            if let SingleOutcome::Decided(decision) = &outcome {
                println!("{}", decision);
            }
            ExitCode::from(outcome.exit_code())
        }
    }
}
