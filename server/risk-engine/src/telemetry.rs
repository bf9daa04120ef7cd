//! Tracing setup for the binary. Logs go to stderr; stdout carries JSON.

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum TelemetryError {
  #[error("invalid log level/filter '{value}': unable to build EnvFilter")]
  EnvFilter {
    value: String,
    #[source]
    source: ParseError,
  },

  #[error("telemetry error: {0}")]
  Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

/// `RUST_LOG` wins; otherwise `log_level` is used as the filter.
pub fn init(log_level: &str) -> Result<(), TelemetryError> {
  let env_filter = match EnvFilter::try_from_default_env() {
    Ok(filter) => filter,
    Err(_) => EnvFilter::try_new(log_level).map_err(|source| TelemetryError::EnvFilter {
      value: log_level.to_string(),
      source,
    })?,
  };

  tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .compact()
    .with_ansi(false)
    .try_init()
    .map_err(TelemetryError::Subscriber)
}
