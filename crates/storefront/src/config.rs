//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `FRANCINE_API_BASE` - Backend origin (default: `http://localhost:5000`)
//! - `FRANCINE_HOME` - Directory holding the persisted cart and session
//!   (default: `$HOME/.francine`, or `./.francine` when `HOME` is unset)
//! - `FRANCINE_HTTP_TIMEOUT_SECS` - Per-request timeout in seconds (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Backend origin used when none is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

/// Request timeout used when none is configured.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Name of the data directory created under `$HOME`.
const DATA_DIR_NAME: &str = ".francine";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin; API paths are resolved against it.
    pub api_base: Url,
    /// Directory for persisted client state.
    pub data_dir: PathBuf,
    /// Per-request timeout.
    pub http_timeout: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base = parse_api_base(
            "FRANCINE_API_BASE",
            lookup("FRANCINE_API_BASE").as_deref().unwrap_or(DEFAULT_API_BASE),
        )?;

        let data_dir = lookup("FRANCINE_HOME").map_or_else(
            || default_data_dir(lookup("HOME")),
            PathBuf::from,
        );

        let http_timeout = match lookup("FRANCINE_HTTP_TIMEOUT_SECS") {
            Some(raw) => parse_timeout("FRANCINE_HTTP_TIMEOUT_SECS", &raw)?,
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let sentry_dsn = lookup("SENTRY_DSN").filter(|dsn| !dsn.trim().is_empty());

        Ok(Self {
            api_base,
            data_dir,
            http_timeout,
            sentry_dsn,
        })
    }

    /// Replace the backend origin (e.g. from a command-line flag).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `raw` is not an http(s) URL.
    pub fn with_api_base(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.api_base = parse_api_base("--api-base", raw)?;
        Ok(self)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse and validate the backend origin.
///
/// A trailing slash is enforced so that relative API paths join beneath any
/// path prefix rather than replacing its last segment.
fn parse_api_base(var_name: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}', expected http or https", url.scheme()),
        ));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn parse_timeout(var_name: &str, raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "timeout must be greater than zero".to_string(),
        )),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string())),
    }
}

fn default_data_dir(home: Option<String>) -> PathBuf {
    home.map_or_else(|| PathBuf::from(DATA_DIR_NAME), |home| {
        PathBuf::from(home).join(DATA_DIR_NAME)
    })
}
