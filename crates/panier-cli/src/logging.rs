//! Tracing subscriber setup
//!
//! Logs go to stderr so `--format json` keeps stdout clean. `RUST_LOG`
//! overrides the verbosity flags.

use crate::config::{LogFormat, Verbosity};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter for a verbosity level
#[must_use]
pub const fn filter_directive(verbosity: Verbosity) -> &'static str {
    match verbosity {
        Verbosity::Quiet => "panier=error,panier_cli=error,chromiumoxide=off",
        Verbosity::Normal => "panier=warn,panier_cli=warn,chromiumoxide=off",
        Verbosity::Verbose => "panier=info,panier_cli=info,chromiumoxide=warn",
        Verbosity::Debug => "panier=debug,panier_cli=debug,chromiumoxide=info",
    }
}

/// Install the global subscriber
///
/// A second call is a no-op.
pub fn init_logging(verbosity: Verbosity, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbosity)));

    let fmt = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbosity == Verbosity::Debug)
        .with_file(false)
        .with_line_number(false);

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match format {
        LogFormat::Pretty => registry.with(fmt.compact()).try_init(),
        LogFormat::Json => registry.with(fmt.json()).try_init(),
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
