//! Logging setup for pgmrun
//!
//! All diagnostics go to stderr through `tracing`; stdout is left to the
//! external tools' own reporting. `RUST_LOG` overrides the default filter.

use tracing::{Level, span};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Default filter directive for the given verbosity.
#[must_use]
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "pgmrun=debug,info"
    } else {
        "pgmrun=info,warn"
    }
}

/// Initialize the global tracing subscriber.
///
/// Verbose mode adds targets and span close events, which carry the time spent
/// on each dataset.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(verbose)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false);

    if verbose {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                layer
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.with_target(false).compact())
            .try_init()?;
    }

    Ok(())
}

/// Span covering the processing of one dataset or network.
pub fn dataset_span(name: &str) -> tracing::Span {
    span!(Level::INFO, "dataset", name = %name)
}
