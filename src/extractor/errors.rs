use axum::http::StatusCode;
use std::fmt::{Display, Formatter};
use thiserror::Error;

use crate::fetcher::FetchError;

/// Which route a failure came from; selects the generic 500 message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipeline {
    Url,
    Pdf,
    Feed,
}

impl Display for Pipeline {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Pipeline::Url => "url",
            Pipeline::Pdf => "pdf",
            Pipeline::Feed => "feed",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("URL is required")]
    UrlRequired,

    #[error("Invalid URL format")]
    InvalidUrl(String),

    #[error("Invalid request body: {0}")]
    InvalidRequest(String),

    #[error("Website not found or unreachable")]
    SiteUnreachable(#[source] FetchError),

    #[error("Access denied by the website")]
    AccessDenied,

    #[error("Page not found")]
    PageNotFound,

    #[error("No PDF file uploaded")]
    NoFileUploaded,

    #[error("Please upload a valid PDF file")]
    NotAPdfUpload { content_type: Option<String> },

    #[error("The uploaded file is not a valid PDF")]
    InvalidPdf(String),

    #[error("{message}")]
    UploadRejected { status: StatusCode, message: String },

    #[error("Invalid RSS feed format")]
    InvalidFeed(String),

    #[error("RSS feed not found")]
    FeedNotFound(#[source] FetchError),

    #[error("RSS feed request timed out")]
    FeedTimeout,

    #[error("{}", generic_message(.pipeline))]
    Failed {
        pipeline: Pipeline,
        #[source]
        source: anyhow::Error,
    },
}

fn generic_message(pipeline: &Pipeline) -> &'static str {
    match pipeline {
        Pipeline::Url => "Failed to extract content from URL",
        Pipeline::Pdf => "Failed to process PDF file",
        Pipeline::Feed => "Failed to parse RSS feed",
    }
}

impl ExtractError {
    pub fn failed(pipeline: Pipeline, source: impl Into<anyhow::Error>) -> Self {
        Self::Failed {
            pipeline,
            source: source.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UrlRequired
            | Self::InvalidUrl(_)
            | Self::InvalidRequest(_)
            | Self::SiteUnreachable(_)
            | Self::NoFileUploaded
            | Self::NotAPdfUpload { .. }
            | Self::InvalidPdf(_)
            | Self::InvalidFeed(_) => StatusCode::BAD_REQUEST,
            Self::AccessDenied => StatusCode::FORBIDDEN,
            Self::PageNotFound | Self::FeedNotFound(_) => StatusCode::NOT_FOUND,
            Self::FeedTimeout => StatusCode::REQUEST_TIMEOUT,
            Self::UploadRejected { status, .. } => *status,
            Self::Failed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to the caller. Never includes the
    /// underlying cause of an unclassified failure.
    pub fn public_message(&self) -> String {
        self.to_string()
    }

    /// Classify a page fetch failure.
    pub fn from_page_fetch(err: FetchError) -> Self {
        if err.is_unreachable() {
            return Self::SiteUnreachable(err);
        }
        match err.status() {
            Some(status) if status == StatusCode::FORBIDDEN => Self::AccessDenied,
            Some(status) if status == StatusCode::NOT_FOUND => Self::PageNotFound,
            _ => Self::failed(Pipeline::Url, err),
        }
    }

    /// Classify a feed fetch failure.
    pub fn from_feed_fetch(err: FetchError) -> Self {
        match err {
            FetchError::Timeout => Self::FeedTimeout,
            FetchError::Dns(_) => Self::FeedNotFound(err),
            FetchError::Http { status } if status == StatusCode::NOT_FOUND => {
                Self::FeedNotFound(err)
            }
            FetchError::UnsupportedContentType(content_type) => Self::InvalidFeed(format!(
                "unexpected content-type {content_type}"
            )),
            other => Self::failed(Pipeline::Feed, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_fetch_classification() {
        let unreachable = ExtractError::from_page_fetch(FetchError::Dns("nx".into()));
        assert_eq!(unreachable.status_code(), StatusCode::BAD_REQUEST);

        let refused = ExtractError::from_page_fetch(FetchError::Connect("refused".into()));
        assert!(matches!(refused, ExtractError::SiteUnreachable(_)));

        let denied = ExtractError::from_page_fetch(FetchError::Http {
            status: StatusCode::FORBIDDEN,
        });
        assert_eq!(denied.status_code(), StatusCode::FORBIDDEN);

        let missing = ExtractError::from_page_fetch(FetchError::Http {
            status: StatusCode::NOT_FOUND,
        });
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

        let server = ExtractError::from_page_fetch(FetchError::Http {
            status: StatusCode::BAD_GATEWAY,
        });
        assert_eq!(server.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let timeout = ExtractError::from_page_fetch(FetchError::Timeout);
        assert_eq!(timeout.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_feed_fetch_classification() {
        assert_eq!(
            ExtractError::from_feed_fetch(FetchError::Timeout).status_code(),
            StatusCode::REQUEST_TIMEOUT
        );
        assert_eq!(
            ExtractError::from_feed_fetch(FetchError::Dns("nx".into())).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ExtractError::from_feed_fetch(FetchError::Http {
                status: StatusCode::NOT_FOUND
            })
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ExtractError::from_feed_fetch(FetchError::UnsupportedContentType(
                "image/png".into()
            ))
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ExtractError::from_feed_fetch(FetchError::Connect("refused".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_generic_failure_hides_cause() {
        let err = ExtractError::failed(
            Pipeline::Url,
            anyhow::anyhow!("secret internal detail at /srv/app"),
        );
        assert_eq!(err.public_message(), "Failed to extract content from URL");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = ExtractError::failed(Pipeline::Pdf, anyhow::anyhow!("boom"));
        assert_eq!(err.public_message(), "Failed to process PDF file");

        let err = ExtractError::failed(Pipeline::Feed, anyhow::anyhow!("boom"));
        assert_eq!(err.public_message(), "Failed to parse RSS feed");
    }
}
