use bytes::Bytes;
use encoding_rs::Encoding;
use reqwest::StatusCode;
use std::time::Duration;
use url::Url;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_MAX_BODY_SIZE: u64 = 5 * 1024 * 1024; // 5MB
const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Per-call HTTP settings. A client is built from these for every fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
    pub max_body_size: u64,
    pub max_redirects: usize,
}

impl FetchOptions {
    pub fn new(timeout: Duration, user_agent: impl Into<String>) -> Self {
        Self {
            timeout,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT.min(timeout),
            user_agent: user_agent.into(),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }

    pub fn with_max_body_size(mut self, max_body_size: u64) -> Self {
        self.max_body_size = max_body_size;
        self
    }
}

/// Encoding the body was decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Charset(&'static Encoding);

impl Charset {
    pub fn from_encoding(encoding: &'static Encoding) -> Self {
        Self(encoding)
    }

    pub fn encoding(self) -> &'static Encoding {
        self.0
    }

    /// WHATWG name, e.g. `UTF-8` or `windows-1252`.
    pub fn name(self) -> &'static str {
        self.0.name()
    }
}

#[derive(Debug)]
pub struct PageResponse {
    pub url_final: Url,
    pub status: StatusCode,
    pub content_type: String,
    pub body_raw: Bytes,
    pub body_utf8: String,
    pub charset: Charset,
}
