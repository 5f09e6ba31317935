//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const SESSION_DIR_NAME: &str = ".bankdesk";
pub const SESSION_FILE_NAME: &str = "session.json";
pub const FALLBACK_SESSION_FILE: &str = ".bankdesk-session.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse failed: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub session_file: PathBuf,
    pub timeouts: HttpTimeouts,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `BANKDESK_API_URL`: default `http://localhost:8000/api/v1`
    /// - `BANKDESK_SESSION_FILE`: default `$HOME/.bankdesk/session.json`
    /// - `BANKDESK_REQUEST_TIMEOUT_SECS`: default 30
    /// - `BANKDESK_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if `BANKDESK_API_URL` is not an http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = normalize_api_url(std::env::var("BANKDESK_API_URL").ok().as_deref())?;
        let session_file = std::env::var("BANKDESK_SESSION_FILE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| default_session_file(std::env::var_os("HOME").map(PathBuf::from)), PathBuf::from);
        let timeouts = HttpTimeouts {
            request_secs: env_parse_u64("BANKDESK_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("BANKDESK_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        Ok(Self { api_url, session_file, timeouts })
    }
}

/// Validate an API base URL and strip trailing slashes.
///
/// # Errors
///
/// Returns an error if the URL does not start with `http://` or `https://`.
pub fn normalize_api_url(raw: Option<&str>) -> Result<String, ConfigError> {
    let raw = raw.map(str::trim).filter(|v| !v.is_empty()).unwrap_or(DEFAULT_API_URL);
    if !(raw.starts_with("http://") || raw.starts_with("https://")) {
        return Err(ConfigError::Parse(format!("BANKDESK_API_URL must be an http(s) URL, got '{raw}'")));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

fn default_session_file(home: Option<PathBuf>) -> PathBuf {
    match home {
        Some(home) => home.join(SESSION_DIR_NAME).join(SESSION_FILE_NAME),
        None => PathBuf::from(FALLBACK_SESSION_FILE),
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
