//! Tracing subscriber bootstrap shared by the server and the CLI.

use anyhow::anyhow;
use italia_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` wins over the configured filter.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => configured_filter(&settings.filter)?,
    };

    let registry = tracing_subscriber::registry().with(filter);

    let installed = match settings.log_format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init(),
    };

    // A subscriber installed earlier (tests, embedding binaries) keeps precedence
    if installed.is_err() {
        tracing::debug!(target: "italia-telemetry", "global subscriber already installed");
    }

    tracing::info!(
        target: "italia-telemetry",
        format = ?settings.log_format,
        "telemetry initialized"
    );
    Ok(())
}

fn configured_filter(directives: &str) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_new(directives).map_err(|err| anyhow!("invalid log filter '{}': {}", directives, err))
}
