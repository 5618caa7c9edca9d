//! Configuration module

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use edumind_risk_core::constants;
use edumind_risk_core::ModelSource;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Where the risk model is loaded from
    pub model_source: ModelSource,

    /// Advisory catalog file (None = built-in catalog)
    pub catalog_path: Option<PathBuf>,

    /// Deadline for one model call
    pub inference_timeout: Duration,

    /// Emit JSON logs
    pub json_logs: bool,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            model_source: ModelSource::from_env(),

            catalog_path: constants::get_catalog_path().map(PathBuf::from),

            inference_timeout: Duration::from_millis(constants::get_inference_timeout_ms()),

            json_logs: env::var("LOG_FORMAT")
                .map(|f| f.eq_ignore_ascii_case("json"))
                .unwrap_or(false),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            model_source: ModelSource::Builtin,
            catalog_path: None,
            inference_timeout: Duration::from_millis(constants::DEFAULT_INFERENCE_TIMEOUT_MS),
            json_logs: false,
            environment: "development".to_string(),
        }
    }
}
