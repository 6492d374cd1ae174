use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "chart_service=info,market_indicators=warn";

/// Installs the global fmt subscriber. `RUST_LOG` overrides the default filter.
///
/// Output goes to stderr so stdout stays reserved for JSON responses.
pub fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}
