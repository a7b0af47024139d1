//! Environment-driven configuration for the ChargeCast services.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file in the working directory.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5010;
pub const DEFAULT_MODEL_PATH: &str = "model.json";
pub const DEFAULT_SLOW_REQUEST_MS: u64 = 500;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a valid port number, got '{value}'")]
    InvalidPort { key: &'static str, value: String },
    #[error("{key} must be a positive integer, got '{value}'")]
    InvalidCount { key: &'static str, value: String },
    #[error("{key} must be a number of milliseconds, got '{value}'")]
    InvalidMillis { key: &'static str, value: String },
    #[error("{key} must be a boolean (true/false/1/0/yes/no), got '{value}'")]
    InvalidFlag { key: &'static str, value: String },
    #[error("{key} must be 'development' or 'production', got '{value}'")]
    InvalidEnvMode { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvMode {
    Development,
    Production,
}

impl EnvMode {
    pub fn as_str(self) -> &'static str {
        match self {
            EnvMode::Development => "development",
            EnvMode::Production => "production",
        }
    }
}

impl FromStr for EnvMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(EnvMode::Development),
            "production" | "prod" => Ok(EnvMode::Production),
            _ => Err(()),
        }
    }
}

/// Settings for the prediction service.
#[derive(Clone, Debug)]
pub struct PredictorConfig {
    // Server
    pub host: String,
    pub port: u16,
    /// Overrides actix-web's one-worker-per-core default when set.
    pub workers: Option<usize>,
    pub env_mode: EnvMode,
    /// Successful requests slower than this are logged at warn.
    pub slow_request_ms: u64,

    // Model
    pub model_path: PathBuf,
    /// Reject region labels outside the four known regions instead of
    /// treating them as northeast.
    pub strict_region: bool,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            workers: None,
            env_mode: EnvMode::Development,
            slow_request_ms: DEFAULT_SLOW_REQUEST_MS,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            strict_region: false,
        }
    }
}

impl PredictorConfig {
    /// Load `.env` (if present) and read the configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup. Unset keys fall
    /// back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PREDICTOR_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort {
                key: "PREDICTOR_PORT",
                value: raw,
            })?,
            None => defaults.port,
        };

        let workers = match get("PREDICTOR_WORKERS") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    return Err(ConfigError::InvalidCount {
                        key: "PREDICTOR_WORKERS",
                        value: raw,
                    })
                }
            },
            None => None,
        };

        let slow_request_ms = match get("PREDICTOR_SLOW_REQUEST_MS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidMillis {
                key: "PREDICTOR_SLOW_REQUEST_MS",
                value: raw,
            })?,
            None => defaults.slow_request_ms,
        };

        let env_mode = match get("ENV_MODE") {
            Some(raw) => raw.parse::<EnvMode>().map_err(|_| ConfigError::InvalidEnvMode {
                key: "ENV_MODE",
                value: raw,
            })?,
            None => defaults.env_mode,
        };

        let strict_region = match get("PREDICTOR_STRICT_REGION") {
            Some(raw) => parse_flag("PREDICTOR_STRICT_REGION", &raw)?,
            None => defaults.strict_region,
        };

        let config = Self {
            host: get("PREDICTOR_HOST")
                .map(|h| h.trim().to_string())
                .unwrap_or(defaults.host),
            port,
            workers,
            env_mode,
            slow_request_ms,
            model_path: get("PREDICTOR_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            strict_region,
        };

        tracing::debug!(?config, "predictor configuration resolved");
        Ok(config)
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            key,
            value: raw.to_string(),
        }),
    }
}
