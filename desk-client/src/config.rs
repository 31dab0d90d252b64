//! Client configuration

use std::path::PathBuf;

/// Default API base URL (includes the `/api` prefix)
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Client configuration for connecting to the support desk API
///
/// # Environment
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | SUPPORT_DESK_API_URL | http://localhost:8080/api | API base URL |
/// | SUPPORT_DESK_TIMEOUT_SECS | (none) | Per-request timeout |
/// | SUPPORT_DESK_SESSION_FILE | (none) | Where `authToken` / `user` are persisted |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8080/api")
    pub base_url: String,

    /// Request timeout in seconds. `None` means requests never time out.
    pub timeout: Option<u64>,

    /// Session persistence file. `None` keeps the session in memory only.
    pub session_file: Option<PathBuf>,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
            session_file: None,
        }
    }

    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("SUPPORT_DESK_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let timeout = std::env::var("SUPPORT_DESK_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok());
        let session_file = std::env::var("SUPPORT_DESK_SESSION_FILE")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Self {
            base_url,
            timeout,
            session_file,
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    /// Persist the session to a JSON file
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_settings() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.timeout.is_none());

        let config = ClientConfig::new("http://desk.local/api")
            .with_timeout(5)
            .with_session_file("/tmp/desk.json");
        assert_eq!(config.timeout, Some(5));
        assert_eq!(config.session_file, Some(PathBuf::from("/tmp/desk.json")));
    }
}
