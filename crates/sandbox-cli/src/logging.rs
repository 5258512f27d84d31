//! Tracing subscriber setup.

use sandbox_agent::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Target under which the agent's own diagnostics are emitted.
const SDK_TARGET: &str = "sandbox_agent::sdk";

/// Build the log filter.
///
/// `RUST_LOG` wins unless `verbose` is set; the fallback is `warn`. When
/// `sdk_level` is given, the agent's forwarded diagnostics are let through
/// down to that level.
pub fn build_filter(verbose: bool, sdk_level: Option<LevelFilter>) -> EnvFilter {
    let mut filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    if let Some(level) = sdk_level {
        if let Ok(directive) = format!("{SDK_TARGET}={level}").parse() {
            filter = filter.add_directive(directive);
        }
    }
    filter
}

/// Install the global subscriber, writing compact lines to stderr.
pub fn init(verbose: bool, sdk_level: Option<LevelFilter>) {
    tracing_subscriber::registry()
        .with(build_filter(verbose, sdk_level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()
        .ok(); // Ignore error if already initialized
}
