//! Logging subscriber initialisation.

use std::io;

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{
    EnvFilter,
    layer::{Layer, SubscriberExt},
    util::{SubscriberInitExt, TryInitError},
};

use crate::config::{LogFormat, observability::LoggingConfig};

/// Errors raised while installing the logging subscriber.
#[derive(Debug, Error)]
pub enum ObservabilityError {
    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber")]
    Init(#[from] TryInitError),
}

/// Install the global logging subscriber.
///
/// Logs go to stderr so command output on stdout stays clean. Compact logs
/// only carry source locations once the level reaches debug.
///
/// # Errors
///
/// Returns an error if a subscriber is already installed.
pub fn init_subscriber(config: &LoggingConfig) -> Result<(), ObservabilityError> {
    let locations = config.effective_level() >= Level::DEBUG;

    let layer = match config.log_format {
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(io::stderr)
            .with_target(locations)
            .with_file(locations)
            .with_line_number(locations)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(io::stderr)
            .with_target(true)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(build_env_filter(config))
        .try_init()?;

    Ok(())
}

fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.directives()))
}

