use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

const RUST_LOG: &str = "RUST_LOG";

/// Failures while installing the process-wide tracing subscriber.
#[derive(Debug)]
pub enum TelemetryError {
    /// The configured directives could not be parsed.
    InvalidFilter { directives: String, source: ParseError },
    /// Another subscriber was installed first.
    AlreadyInstalled(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::InvalidFilter { directives, source } => {
                write!(f, "log filter '{directives}' is not valid: {source}")
            }
            TelemetryError::AlreadyInstalled(err) => {
                write!(f, "tracing subscriber already installed: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::InvalidFilter { source, .. } => Some(source),
            TelemetryError::AlreadyInstalled(err) => Some(&**err),
        }
    }
}

/// Installs the stderr subscriber so card summaries on stdout stay clean.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let rust_log = std::env::var(RUST_LOG).ok();
    let filter = resolve_filter(rust_log.as_deref(), &config.log_level)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false)
        .compact();

    let installed = if config.timestamps {
        builder.try_init()
    } else {
        builder.without_time().try_init()
    };
    installed.map_err(TelemetryError::AlreadyInstalled)
}

/// A usable `RUST_LOG` wins; otherwise the configured directives must parse.
fn resolve_filter(rust_log: Option<&str>, configured: &str) -> Result<EnvFilter, TelemetryError> {
    if let Some(filter) = rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
    {
        return Ok(filter);
    }

    EnvFilter::try_new(configured).map_err(|source| TelemetryError::InvalidFilter {
        directives: configured.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_filter_must_parse() {
        let error = resolve_filter(None, "soil_card=verbose").expect_err("bad level");
        assert!(matches!(error, TelemetryError::InvalidFilter { .. }));
        assert!(error.to_string().contains("soil_card=verbose"));
    }

    #[test]
    fn rust_log_overrides_configuration() {
        let filter = resolve_filter(Some("soil_card=trace"), "soil_card=verbose")
            .expect("RUST_LOG is used");
        assert!(filter.to_string().contains("soil_card=trace"));
    }

    #[test]
    fn unusable_rust_log_falls_back_to_configuration() {
        let filter = resolve_filter(Some("soil_card=verbose"), "warn").expect("configured filter");
        assert_eq!(filter.to_string(), "warn");

        let filter = resolve_filter(Some("  "), "soil_card=debug,info").expect("configured filter");
        assert!(filter.to_string().contains("soil_card=debug"));
    }
}
