//! Tracing initialization for ChargeCast services.
//!
//! Output format and default level follow the deployment environment:
//! production logs JSON at `info`, development logs pretty text at `debug`.
//! `LOG_FORMAT` and `RUST_LOG` override either choice.

use std::env;
use std::str::FromStr;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(()),
        }
    }
}

impl LogFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub service_name: String,
    pub environment: String,
    pub format: LogFormat,
    /// Filter used when RUST_LOG is unset
    pub level: String,
    /// Include file/line in log lines (LOG_LOCATION=true)
    pub include_location: bool,
}

impl TracingConfig {
    /// Resolve the tracing setup for a service running in `environment`,
    /// reading `LOG_FORMAT` and `LOG_LOCATION` from the process environment.
    pub fn for_service(service_name: impl Into<String>, environment: &str) -> Self {
        let log_format = env::var("LOG_FORMAT").ok();
        let mut config = Self::resolve(service_name, environment, log_format.as_deref());
        config.include_location = env::var("LOG_LOCATION").map(|v| v == "true").unwrap_or(false);
        config
    }

    fn resolve(
        service_name: impl Into<String>,
        environment: &str,
        log_format: Option<&str>,
    ) -> Self {
        let production = environment == "production";
        let default_format = if production {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        };

        Self {
            service_name: service_name.into(),
            environment: environment.to_string(),
            format: log_format
                .and_then(|f| f.parse().ok())
                .unwrap_or(default_format),
            level: if production { "info" } else { "debug" }.to_string(),
            include_location: false,
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `config.level`. Calling this more than
/// once is harmless; later calls leave the first subscriber in place.
pub fn init_tracing(config: TracingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let initialized = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_file(config.include_location)
                    .with_line_number(config.include_location),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .pretty()
                    .with_file(config.include_location)
                    .with_line_number(config.include_location),
            )
            .try_init(),
    };

    if initialized.is_ok() {
        tracing::info!(
            service = %config.service_name,
            environment = %config.environment,
            format = config.format.as_str(),
            "Tracing initialized"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_defaults_to_json() {
        let config = TracingConfig::resolve("test", "production", None);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, "info");
    }

    #[test]
    fn test_development_defaults_to_pretty_debug() {
        let config = TracingConfig::resolve("test", "development", None);
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.level, "debug");
        assert_eq!(config.environment, "development");
    }

    #[test]
    fn test_log_format_override() {
        let config = TracingConfig::resolve("test", "production", Some("pretty"));
        assert_eq!(config.format, LogFormat::Pretty);

        let config = TracingConfig::resolve("test", "development", Some("JSON"));
        assert_eq!(config.format, LogFormat::Json);

        // Unrecognized values keep the environment default.
        let config = TracingConfig::resolve("test", "production", Some("xml"));
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_tracing(TracingConfig::resolve("test", "development", None));
        init_tracing(TracingConfig::resolve("test", "production", None));
    }
}
