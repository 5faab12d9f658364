//! Logging and observability setup for fiterior
//!
//! Structured logging goes through `tracing`; this module installs the
//! subscriber once per process and provides the span used around each
//! transform attempt.

use std::io::IsTerminal;
use tracing::{Level, info, span, warn};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::types::OutputFormat;

/// Check if colored output should be used.
///
/// Returns true only if stderr is a terminal and `NO_COLOR` is not set.
fn use_color() -> bool {
    std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Build the env filter: `RUST_LOG` wins, otherwise a verbosity-dependent default.
fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| {
            if verbose {
                EnvFilter::try_new("fiterior=debug,info")
            } else {
                EnvFilter::try_new("fiterior=info,warn")
            }
        })
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the tracing subscriber.
///
/// Logs are written to stderr so command output on stdout stays parseable.
/// With [`OutputFormat::Json`] every event is a JSON object; otherwise a
/// compact human-readable line. Verbose mode adds targets and span close events
/// (which carry the attempt duration).
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(
    verbose: bool,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let registry = tracing_subscriber::registry().with(env_filter(verbose));

    match format {
        OutputFormat::Json => {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_current_span(true)
                        .with_span_list(false),
                )
                .try_init()?;
        }
        OutputFormat::Text => {
            let span_events = if verbose {
                FmtSpan::CLOSE
            } else {
                FmtSpan::NONE
            };
            registry
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_ansi(use_color())
                        .with_target(verbose)
                        .with_thread_ids(false)
                        .with_thread_names(false)
                        .with_line_number(false)
                        .with_file(false)
                        .with_span_events(span_events)
                        .compact(),
                )
                .try_init()?;
        }
    }

    Ok(())
}

/// Create the span wrapping one transform attempt.
pub fn job_span(attempt: u32, theme: Option<&str>, model: Option<&str>) -> tracing::Span {
    span!(
        Level::INFO,
        "transform_attempt",
        attempt = attempt,
        theme = theme.unwrap_or("-"),
        model = model.unwrap_or("-"),
    )
}

/// Log that an attempt finished and handed its result to the caller.
pub fn log_attempt_complete(attempt: u32, job_id: &str, fallback: bool, elapsed_ms: u128) {
    info!(
        attempt = attempt,
        job_id = %job_id,
        fallback = fallback,
        elapsed_ms = %elapsed_ms,
        "Transform attempt completed"
    );
}

/// Log that an attempt ended in the failure state.
///
/// The cause is only ever logged; job state keeps the generic message.
pub fn log_attempt_failed(attempt: u32, cause: &str, elapsed_ms: u128) {
    warn!(
        attempt = attempt,
        cause = %cause,
        elapsed_ms = %elapsed_ms,
        "Transform attempt failed"
    );
}
