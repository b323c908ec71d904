//! Configuration types.

use std::time::Duration;

use crate::error::ConfigError;

/// Path of the classification endpoint, relative to the service base URL.
pub const PROCESS_EMAIL_PATH: &str = "/api/v1/process-email";

/// Path of the service health check.
pub const HEALTH_PATH: &str = "/healthcheck";

/// Client configuration for the classification service.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the service, e.g. `http://localhost:8000`.
    pub base_url: String,
    /// Timeout applied by the HTTP transport to each request.
    pub request_timeout: Duration,
    /// File extensions the file control accepts (lowercase, no dot).
    pub accepted_extensions: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout: Duration::from_secs(60),
            accepted_extensions: vec!["txt".to_string(), "pdf".to_string()],
        }
    }
}

impl ClientConfig {
    /// Build from `MAIL_TRIAGE_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Split out so tests don't touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let base_url = match lookup("MAIL_TRIAGE_URL") {
            Some(url) => {
                let url = url.trim().to_string();
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::InvalidValue {
                        key: "MAIL_TRIAGE_URL".into(),
                        message: format!("expected an http(s) URL, got {url:?}"),
                    });
                }
                url
            }
            None => defaults.base_url,
        };

        let request_timeout = match lookup("MAIL_TRIAGE_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: "MAIL_TRIAGE_TIMEOUT_SECS".into(),
                    message: format!("not a number of seconds: {raw:?}"),
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: "MAIL_TRIAGE_TIMEOUT_SECS".into(),
                        message: "must be greater than zero".into(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => defaults.request_timeout,
        };

        let accepted_extensions = match lookup("MAIL_TRIAGE_ACCEPT") {
            Some(raw) => {
                let exts: Vec<String> = raw
                    .split(',')
                    .map(|s| s.trim().trim_start_matches('.').to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect();
                if exts.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        key: "MAIL_TRIAGE_ACCEPT".into(),
                        message: "at least one extension is required".into(),
                    });
                }
                exts
            }
            None => defaults.accepted_extensions,
        };

        Ok(Self {
            base_url,
            request_timeout,
            accepted_extensions,
        })
    }

    /// Full URL of the classification endpoint.
    pub fn process_email_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), PROCESS_EMAIL_PATH)
    }

    /// Full URL of the health check.
    pub fn health_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), HEALTH_PATH)
    }
}
