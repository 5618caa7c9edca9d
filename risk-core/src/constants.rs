//! Central Configuration Constants
//!
//! Single source of truth for engine defaults.
//! Runtime overrides (model path, catalog path, timeout) live in the server config.

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "EduMind Risk Engine";

/// Default inference deadline (milliseconds)
pub const DEFAULT_INFERENCE_TIMEOUT_MS: u64 = 2_000;

/// Default remote inference timeout (seconds)
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 5;

/// Name reported for the compiled-in model
pub const BUILTIN_MODEL_NAME: &str = "builtin-linear-v1";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get model artifact path from environment (None = built-in model)
pub fn get_model_path() -> Option<String> {
    std::env::var("MODEL_PATH").ok().filter(|s| !s.trim().is_empty())
}

/// Get expected model checksum (hex SHA-256) from environment
pub fn get_model_checksum() -> Option<String> {
    std::env::var("MODEL_SHA256").ok().filter(|s| !s.trim().is_empty())
}

/// Get advisory catalog path from environment (None = built-in catalog)
pub fn get_catalog_path() -> Option<String> {
    std::env::var("CATALOG_PATH").ok().filter(|s| !s.trim().is_empty())
}

/// Get inference timeout from environment or use default
pub fn get_inference_timeout_ms() -> u64 {
    std::env::var("INFERENCE_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_INFERENCE_TIMEOUT_MS)
}
