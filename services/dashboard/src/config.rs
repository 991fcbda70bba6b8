//! Dashboard configuration (env-driven).

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listen address.
    pub listen_addr: SocketAddr,

    /// Upstream event API base URL (example: http://localhost:3000).
    pub api_url: String,

    /// Timeout applied to every upstream call.
    pub upstream_timeout: Duration,

    /// Name of the cookie carrying the session token.
    pub session_cookie: String,

    /// Mark session cookies `Secure` (enable behind HTTPS).
    pub secure_cookies: bool,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let listen_addr = var("EVENTDESK_LISTEN_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8080".to_string())
            .parse()
            .context("EVENTDESK_LISTEN_ADDR must be a socket address.")?;

        let api_url =
            var("EVENTDESK_API_URL").unwrap_or_else(|| "http://localhost:3000".to_string());
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            bail!("EVENTDESK_API_URL must be an http(s) URL, got '{api_url}'.");
        }

        let timeout_ms: u64 = var("EVENTDESK_UPSTREAM_TIMEOUT_MS")
            .map(|v| v.parse())
            .transpose()
            .context("EVENTDESK_UPSTREAM_TIMEOUT_MS must be an integer (milliseconds).")?
            .unwrap_or(5000);
        let upstream_timeout = Duration::from_millis(timeout_ms.max(50));

        let session_cookie =
            var("EVENTDESK_SESSION_COOKIE").unwrap_or_else(|| "custom-auth-token".to_string());
        if session_cookie.trim().is_empty() {
            bail!("EVENTDESK_SESSION_COOKIE cannot be empty.");
        }

        let secure_cookies = var("EVENTDESK_SECURE_COOKIES")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        let log_level = var("EVENTDESK_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let log_format = match var("EVENTDESK_LOG_FORMAT").as_deref() {
            None | Some("json") => LogFormat::Json,
            Some("pretty") => LogFormat::Pretty,
            Some(other) => bail!("EVENTDESK_LOG_FORMAT must be 'json' or 'pretty', got '{other}'."),
        };

        Ok(Self {
            listen_addr,
            api_url,
            upstream_timeout,
            session_cookie,
            secure_cookies,
            log_level,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.listen_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.api_url, "http://localhost:3000");
        assert_eq!(config.upstream_timeout, Duration::from_secs(5));
        assert_eq!(config.session_cookie, "custom-auth-token");
        assert!(!config.secure_cookies);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_timeout_has_a_floor() {
        let config = load(&[("EVENTDESK_UPSTREAM_TIMEOUT_MS", "1")]).unwrap();
        assert_eq!(config.upstream_timeout, Duration::from_millis(50));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(load(&[("EVENTDESK_UPSTREAM_TIMEOUT_MS", "soon")]).is_err());
        assert!(load(&[("EVENTDESK_API_URL", "localhost:3000")]).is_err());
        assert!(load(&[("EVENTDESK_LOG_FORMAT", "xml")]).is_err());
        assert!(load(&[("EVENTDESK_LISTEN_ADDR", "nowhere")]).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("EVENTDESK_API_URL", "https://api.example.test/v2"),
            ("EVENTDESK_SESSION_COOKIE", "sid"),
            ("EVENTDESK_SECURE_COOKIES", "TRUE"),
            ("EVENTDESK_LOG_FORMAT", "pretty"),
        ])
        .unwrap();
        assert_eq!(config.api_url, "https://api.example.test/v2");
        assert_eq!(config.session_cookie, "sid");
        assert!(config.secure_cookies);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }
}
