//! Configuration management for the Onething admin client

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Backend origin, e.g. `http://localhost:8080`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Form-login endpoint path
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Logout endpoint path
    #[serde(default = "default_logout_path")]
    pub logout_path: String,

    /// Path fragment the backend redirects to when a login is rejected
    #[serde(default = "default_login_error_marker")]
    pub login_error_marker: String,

    /// Cookie holding the CSRF token
    #[serde(default = "default_csrf_cookie")]
    pub csrf_cookie: String,

    /// Header the CSRF token is echoed in
    #[serde(default = "default_csrf_header")]
    pub csrf_header: String,

    /// Transport timeout in seconds; unset leaves the transport default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Maximum number of redirects followed per request
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or text)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_logout_path() -> String {
    "/logout".to_string()
}

fn default_login_error_marker() -> String {
    "/login?error".to_string()
}

fn default_csrf_cookie() -> String {
    "XSRF-TOKEN".to_string()
}

fn default_csrf_header() -> String {
    "X-XSRF-TOKEN".to_string()
}

const fn default_max_redirects() -> usize {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            login_path: default_login_path(),
            logout_path: default_logout_path(),
            login_error_marker: default_login_error_marker(),
            csrf_cookie: default_csrf_cookie(),
            csrf_header: default_csrf_header(),
            request_timeout_secs: None,
            max_redirects: default_max_redirects(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ApiConfig {
    /// Configuration pointing at `base_url` with every other value defaulted
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

impl Config {
    /// Load configuration from `onething.toml` (or `path`) and `ONETHING_*` environment variables
    ///
    /// Nested keys use a double underscore, e.g. `ONETHING_API__BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded, parsed or validated.
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        let file = path.map_or_else(
            || config::File::with_name("onething").required(false),
            |p| config::File::from(p).required(true),
        );

        let config: Self = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("ONETHING")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        debug!(base_url = %config.api.base_url, "configuration loaded");
        Ok(config)
    }

    /// Check values the client cannot work without
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] naming the first offending field.
    pub fn validate(&self) -> crate::Result<()> {
        let api = &self.api;

        if !(api.base_url.starts_with("http://") || api.base_url.starts_with("https://")) {
            return Err(crate::Error::validation(
                "api.base_url",
                format!("'{}' is not an http(s) URL", api.base_url),
            ));
        }
        for (field, path) in [
            ("api.login_path", &api.login_path),
            ("api.logout_path", &api.logout_path),
        ] {
            if !path.starts_with('/') {
                return Err(crate::Error::validation(field, "must start with '/'"));
            }
        }
        for (field, value) in [
            ("api.login_error_marker", &api.login_error_marker),
            ("api.csrf_cookie", &api.csrf_cookie),
            ("api.csrf_header", &api.csrf_header),
        ] {
            if value.trim().is_empty() {
                return Err(crate::Error::validation(field, "must not be empty"));
            }
        }
        if !matches!(self.logging.format.as_str(), "json" | "text") {
            return Err(crate::Error::validation(
                "logging.format",
                format!("unknown format '{}', expected json or text", self.logging.format),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.login_path, "/login");
        assert_eq!(config.api.logout_path, "/logout");
        assert_eq!(config.api.login_error_marker, "/login?error");
        assert_eq!(config.api.csrf_cookie, "XSRF-TOKEN");
        assert_eq!(config.api.csrf_header, "X-XSRF-TOKEN");
        assert!(config.api.request_timeout_secs.is_none());
        assert_eq!(config.api.max_redirects, 10);

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "text");

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_deserialization() {
        let json_str = r#"{
            "api": {"base_url": "https://admin.example.com", "request_timeout_secs": 15}
        }"#;

        let config: Config = serde_json::from_str(json_str).unwrap();

        assert_eq!(config.api.base_url, "https://admin.example.com");
        assert_eq!(config.api.request_timeout_secs, Some(15));
        assert_eq!(config.api.csrf_cookie, "XSRF-TOKEN");
        assert_eq!(config.logging.format, "text");
    }

    #[test]
    fn test_timeout_not_serialized_when_unset() {
        let serialized = serde_json::to_string(&Config::default()).unwrap();
        assert!(!serialized.contains("request_timeout_secs"));
    }

    #[test]
    fn test_validate_rejects_non_http_base_url() {
        let mut config = Config::default();
        config.api.base_url = "localhost:8080".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("api.base_url"));
    }

    #[test]
    fn test_validate_rejects_relative_login_path() {
        let mut config = Config::default();
        config.api.login_path = "login".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("api.login_path"));
    }

    #[test]
    fn test_validate_rejects_empty_csrf_names() {
        let mut config = Config::default();
        config.api.csrf_header = "  ".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("api.csrf_header"));
    }

    #[test]
    fn test_validate_rejects_unknown_log_format() {
        let mut config = Config::default();
        config.logging.format = "yaml".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admin.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"https://api.onething.example\"\nmax_redirects = 3\n\n[logging]\nformat = \"json\""
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.api.base_url, "https://api.onething.example");
        assert_eq!(config.api.max_redirects, 3);
        assert_eq!(config.api.login_path, "/login");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_with_base_url() {
        let api = ApiConfig::with_base_url("http://127.0.0.1:9000");

        assert_eq!(api.base_url, "http://127.0.0.1:9000");
        assert_eq!(api.csrf_cookie, "XSRF-TOKEN");
    }
}
