//! Tracing initialization for the joblane service.
//!
//! `RUST_LOG` wins when set; otherwise the filter is built from the
//! configured `APP_LOG_LEVEL` with the noisy HTTP dependencies capped at
//! `warn` so marketplace events stay readable at `info`.

use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

const DEPENDENCY_DIRECTIVES: &str = "hyper=warn,tower=warn,mio=warn";

#[derive(Debug)]
pub enum TelemetryError {
    Filter { directive: String, source: ParseError },
    Init(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::Filter { directive, .. } => {
                write!(f, "invalid log filter '{directive}'")
            }
            TelemetryError::Init(err) => {
                write!(f, "failed to install tracing subscriber: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::Filter { source, .. } => Some(source),
            TelemetryError::Init(err) => Some(&**err),
        }
    }
}

fn filter_from_config(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    let directive = format!("{},{DEPENDENCY_DIRECTIVES}", config.log_level.trim());
    EnvFilter::try_new(&directive).map_err(|source| TelemetryError::Filter { directive, source })
}

pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => filter_from_config(config)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Init)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_expands_to_a_scoped_filter() {
        let config = TelemetryConfig {
            log_level: "debug".to_string(),
        };
        assert!(filter_from_config(&config).is_ok());
    }

    #[test]
    fn malformed_level_reports_the_full_directive() {
        let config = TelemetryConfig {
            log_level: "no=such=level".to_string(),
        };
        let error = filter_from_config(&config).expect_err("directive must not parse");
        match error {
            TelemetryError::Filter { directive, .. } => {
                assert!(directive.starts_with("no=such=level,"));
            }
            other => panic!("expected filter error, got {other:?}"),
        }
    }
}
