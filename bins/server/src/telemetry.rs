//! Process-wide `tracing` subscriber.

use crate::error::CliError;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use validation_demo_config::{LogFormat, LoggingConfig};

/// Build the env filter: `RUST_LOG` when set, else the configured directive.
fn env_filter(logging: &LoggingConfig) -> Result<EnvFilter, CliError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.filter))
        .map_err(|error| {
            CliError::InvalidInput(format!("invalid log filter `{}`: {error}", logging.filter))
        })
}

/// Install the global subscriber.
pub fn init(logging: &LoggingConfig) -> Result<(), CliError> {
    let filter = env_filter(logging)?;
    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer().json().with_target(true).boxed(),
        LogFormat::Text => fmt::layer().with_target(true).compact().boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|error| CliError::Telemetry(error.to_string()))
}
