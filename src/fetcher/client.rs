use crate::fetcher::{
    errors::FetchError,
    pipeline::{is_textual_content_type, process_response},
    types::{FetchOptions, PageResponse},
};
use reqwest::{Client, ClientBuilder};
use tracing::{debug, instrument};

const ACCEPT: &str =
    "text/html,application/xhtml+xml,application/rss+xml,application/atom+xml,application/xml;q=0.9,*/*;q=0.8";

/// Build a client for a single fetch. Nothing is pooled across requests.
pub fn build_client(options: &FetchOptions) -> Result<Client, FetchError> {
    ClientBuilder::new()
        .connect_timeout(options.connect_timeout)
        .timeout(options.timeout)
        .user_agent(options.user_agent.as_str())
        .redirect(reqwest::redirect::Policy::limited(options.max_redirects))
        .default_headers({
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert(
                reqwest::header::ACCEPT,
                reqwest::header::HeaderValue::from_static(ACCEPT),
            );
            headers
        })
        .build()
        .map_err(|e| FetchError::Client(e.to_string()))
}

#[instrument(skip_all, fields(url = %url))]
pub async fn fetch(url: &str, options: &FetchOptions) -> Result<PageResponse, FetchError> {
    let parsed_url = url::Url::parse(url)?;
    if !matches!(parsed_url.scheme(), "http" | "https") {
        return Err(FetchError::UnsupportedScheme(parsed_url.scheme().to_string()));
    }

    let client = build_client(options)?;
    let response = client
        .get(parsed_url)
        .send()
        .await
        .map_err(FetchError::from_reqwest_error)?;

    // Check content length before downloading
    if let Some(content_length) = response.content_length()
        && content_length > options.max_body_size
    {
        return Err(FetchError::BodyTooLarge(content_length));
    }

    let final_url = response.url().clone();
    let status = response.status();

    if !status.is_success() {
        return Err(FetchError::Http { status });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .unwrap_or("text/html")
        .to_string();

    if !is_textual_content_type(&content_type) {
        return Err(FetchError::UnsupportedContentType(content_type));
    }

    let body_bytes = response
        .bytes()
        .await
        .map_err(FetchError::from_reqwest_error)?;

    // Check body size after download (in case Content-Length was missing)
    if body_bytes.len() as u64 > options.max_body_size {
        return Err(FetchError::BodyTooLarge(body_bytes.len() as u64));
    }

    debug!(
        final_url = %final_url,
        bytes = body_bytes.len(),
        content_type = %content_type,
        "fetched document"
    );

    Ok(process_response(
        final_url,
        status,
        body_bytes,
        &content_type,
    ))
}
