use std::time::Duration;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

/// Parse a non-negative number of seconds, e.g. `3`, `0.5`
pub fn parse_seconds(value: &str) -> Result<Duration, String> {
    let seconds: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("`{}` is not a number of seconds", value))?;

    seconds_to_duration(seconds)
}

/// Convert fractional seconds, rejecting negative and non-finite values
pub fn seconds_to_duration(seconds: f64) -> Result<Duration, String> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("sleep must be a non-negative number of seconds, got {}", seconds));
    }
    Ok(Duration::from_secs_f64(seconds))
}

/// Build the diagnostics subscriber and install it for the current thread.
///
/// Events go to standard error. `RUST_LOG` takes precedence over `debug`.
/// Keep the guard alive for as long as logging is needed.
pub fn init_tracing(debug: bool) -> DefaultGuard {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("transcript_triage={}", default_level)));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing::subscriber::set_default(subscriber)
}

/// Shorten text for log lines without splitting a character
pub fn truncate_for_log(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
