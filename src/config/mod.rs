//! Configuration handling for the application.
//!
//! Everything the extractors need from the environment (timeouts, client
//! identification, upload caps) is carried by an explicit [`Config`] value
//! built once at startup. Handlers derive per-call [`FetchOptions`] from it,
//! so tests can vary timeouts and headers without touching process globals.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

use crate::fetcher::FetchOptions;

/// Environment variable names.
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "FETCH_TIMEOUT_SECS";
pub const ENV_MAX_UPLOAD_BYTES: &str = "MAX_UPLOAD_BYTES";
pub const ENV_PING_MESSAGE: &str = "PING_MESSAGE";

/// Default development values used when environment variables are absent.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024; // 10MB
const DEFAULT_PING_MESSAGE: &str = "ping";

/// Sent when fetching web pages; some origins refuse unknown agents.
pub const PAGE_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const FEED_USER_AGENT: &str = "MagCraft RSS Reader 1.0";

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    bind_addr: String,
    fetch_timeout: Duration,
    max_upload_bytes: usize,
    ping_message: String,
}

impl Config {
    /// Create a new config explicitly.
    pub fn new(
        bind_addr: impl Into<String>,
        fetch_timeout: Duration,
        max_upload_bytes: usize,
        ping_message: impl Into<String>,
    ) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            fetch_timeout,
            max_upload_bytes,
            ping_message: ping_message.into(),
        }
    }

    /// Load from environment variables, falling back to development defaults.
    ///
    /// Numeric variables must parse as positive integers.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = env::var(ENV_BIND_ADDR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let fetch_timeout_secs = parse_positive(ENV_FETCH_TIMEOUT_SECS, DEFAULT_FETCH_TIMEOUT_SECS)?;
        let max_upload_bytes = parse_positive(ENV_MAX_UPLOAD_BYTES, DEFAULT_MAX_UPLOAD_BYTES as u64)?;
        let ping_message =
            env::var(ENV_PING_MESSAGE).unwrap_or_else(|_| DEFAULT_PING_MESSAGE.to_string());

        Ok(Self {
            bind_addr,
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            max_upload_bytes: usize::try_from(max_upload_bytes).map_err(|_| {
                ConfigError::InvalidValue {
                    field: ENV_MAX_UPLOAD_BYTES,
                    reason: "value does not fit in memory size".to_string(),
                }
            })?,
            ping_message,
        })
    }

    /// TCP bind address (host:port) for the HTTP server.
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }
    /// Timeout applied to every page and feed fetch.
    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }
    /// Largest accepted PDF upload.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }
    pub fn ping_message(&self) -> &str {
        &self.ping_message
    }

    /// Options for fetching an arbitrary web page.
    pub fn page_fetch_options(&self) -> FetchOptions {
        FetchOptions::new(self.fetch_timeout, PAGE_USER_AGENT)
    }

    /// Options for fetching an RSS/Atom feed.
    pub fn feed_fetch_options(&self) -> FetchOptions {
        FetchOptions::new(self.fetch_timeout, FEED_USER_AGENT)
    }

    /// Development defaults (mirrors `from_env` with no env overrides).
    pub fn default() -> Self {
        // not `Default` impl yet to keep explicit semantics
        Self::new(
            DEFAULT_BIND_ADDR,
            Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            DEFAULT_MAX_UPLOAD_BYTES,
            DEFAULT_PING_MESSAGE,
        )
    }
}

fn parse_positive(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    let Ok(raw) = env::var(key) else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidValue {
            field: key,
            reason: "must be greater than zero".to_string(),
        }),
        Ok(value) => Ok(value),
        Err(e) => Err(ConfigError::InvalidValue {
            field: key,
            reason: format!("{raw:?} is not a number: {e}"),
        }),
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
