//! Extraction pipelines: web page, PDF upload and RSS/Atom feed.
//!
//! Every pipeline is stateless. The HTML and feed pipelines perform one
//! fetch with caller-supplied [`FetchOptions`](crate::fetcher::FetchOptions);
//! the PDF pipeline works on bytes already in memory.

pub mod dates;
pub mod errors;
pub mod feed;
pub mod html;
pub mod images;
pub mod model;
pub mod normalize;
pub mod pdf;

#[cfg(test)]
mod tests;

pub use errors::{ExtractError, Pipeline};
pub use feed::{extract_feed, parse_feed};
pub use html::{extract_html, extract_url};
pub use model::{ContentMetadata, ExtractedContent, RssArticle, RssExtractedContent};
pub use pdf::{extract_pdf, extract_pdf_upload};

/// Validate a caller-supplied URL before any network work happens.
pub fn parse_request_url(raw: Option<&str>) -> Result<url::Url, ExtractError> {
    let raw = raw.map(str::trim).filter(|raw| !raw.is_empty());
    let Some(raw) = raw else {
        return Err(ExtractError::UrlRequired);
    };
    let url = url::Url::parse(raw).map_err(|e| ExtractError::InvalidUrl(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ExtractError::InvalidUrl(format!(
            "unsupported scheme {}",
            url.scheme()
        )));
    }
    Ok(url)
}
