use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tracing::{error, warn};

use crate::{
    api::dtos::{ErrorResponse, ExtractRssRequest, ExtractUrlRequest, PdfUploadForm, PingResponse},
    app_state::AppState,
    extractor::{
        self, ExtractError, ExtractedContent, RssExtractedContent, parse_request_url,
        pdf::PDF_MIME_TYPE,
    },
};

const PDF_FIELD: &str = "pdf";
const DEFAULT_PDF_NAME: &str = "document.pdf";

fn error_response(err: ExtractError) -> Response {
    let status = err.status_code();
    match &err {
        ExtractError::Failed { pipeline, source } => {
            error!(%pipeline, error = ?source, "extraction failed");
        }
        other => warn!(status = status.as_u16(), error = ?other, "extraction rejected"),
    }
    (
        status,
        Json(ErrorResponse {
            error: err.public_message(),
        }),
    )
        .into_response()
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ExtractError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ExtractError::InvalidRequest(rejection.body_text()))
}

fn respond<T: serde::Serialize>(result: Result<T, ExtractError>) -> Response {
    match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    post,
    path = "/api/extract-url",
    tag = "extract",
    request_body = ExtractUrlRequest,
    responses(
        (status = 200, description = "Readable content of the page", body = ExtractedContent),
        (status = 400, description = "Missing or invalid URL, or site unreachable", body = ErrorResponse),
        (status = 403, description = "Access denied by the website", body = ErrorResponse),
        (status = 404, description = "Page not found", body = ErrorResponse),
        (status = 500, description = "Extraction failed", body = ErrorResponse)
    )
)]
pub async fn extract_url(
    State(state): State<AppState>,
    payload: Result<Json<ExtractUrlRequest>, JsonRejection>,
) -> Response {
    respond(run_extract_url(&state, payload).await)
}

async fn run_extract_url(
    state: &AppState,
    payload: Result<Json<ExtractUrlRequest>, JsonRejection>,
) -> Result<ExtractedContent, ExtractError> {
    let request = json_body(payload)?;
    let url = parse_request_url(request.url.as_deref())?;
    extractor::extract_url(&url, &state.config.page_fetch_options()).await
}

#[utoipa::path(
    post,
    path = "/api/extract-rss",
    tag = "extract",
    request_body = ExtractRssRequest,
    responses(
        (status = 200, description = "Feed metadata and articles", body = RssExtractedContent),
        (status = 400, description = "Missing or invalid URL, or malformed feed", body = ErrorResponse),
        (status = 404, description = "Feed not found", body = ErrorResponse),
        (status = 408, description = "Feed request timed out", body = ErrorResponse),
        (status = 500, description = "Feed parsing failed", body = ErrorResponse)
    )
)]
pub async fn extract_rss(
    State(state): State<AppState>,
    payload: Result<Json<ExtractRssRequest>, JsonRejection>,
) -> Response {
    respond(run_extract_rss(&state, payload).await)
}

async fn run_extract_rss(
    state: &AppState,
    payload: Result<Json<ExtractRssRequest>, JsonRejection>,
) -> Result<RssExtractedContent, ExtractError> {
    let request = json_body(payload)?;
    let url = parse_request_url(request.url.as_deref())?;
    extractor::extract_feed(&url, request.max_items, &state.config.feed_fetch_options()).await
}

#[utoipa::path(
    post,
    path = "/api/extract-pdf",
    tag = "extract",
    request_body(content = inline(PdfUploadForm), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Text and document info of the PDF", body = ExtractedContent),
        (status = 400, description = "No file, wrong type or invalid PDF", body = ErrorResponse),
        (status = 413, description = "Upload too large", body = ErrorResponse),
        (status = 500, description = "PDF processing failed", body = ErrorResponse)
    )
)]
pub async fn extract_pdf(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let result = match read_pdf_upload(multipart, state.config.max_upload_bytes()).await {
        Ok((bytes, filename)) => extractor::extract_pdf_upload(bytes, filename).await,
        Err(err) => Err(err),
    };
    respond(result)
}

fn upload_error(err: MultipartError) -> ExtractError {
    ExtractError::UploadRejected {
        status: err.status(),
        message: err.body_text(),
    }
}

/// Pull the `pdf` part out of the form, enforcing type and size.
async fn read_pdf_upload(
    multipart: Result<Multipart, MultipartRejection>,
    max_bytes: usize,
) -> Result<(Bytes, String), ExtractError> {
    let mut multipart = multipart.map_err(|_| ExtractError::NoFileUploaded)?;

    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() != Some(PDF_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(str::to_string);
        if content_type.as_deref() != Some(PDF_MIME_TYPE) {
            return Err(ExtractError::NotAPdfUpload { content_type });
        }

        let filename = field
            .file_name()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_PDF_NAME)
            .to_string();
        let bytes = field.bytes().await.map_err(upload_error)?;
        if bytes.len() > max_bytes {
            return Err(ExtractError::UploadRejected {
                status: StatusCode::PAYLOAD_TOO_LARGE,
                message: format!("PDF exceeds the {max_bytes} byte upload limit"),
            });
        }

        return Ok((bytes, filename));
    }

    Err(ExtractError::NoFileUploaded)
}

#[utoipa::path(
    get,
    path = "/api/ping",
    tag = "health",
    responses(
        (status = 200, description = "Configured ping message", body = PingResponse)
    )
)]
pub async fn ping(State(state): State<AppState>) -> Json<PingResponse> {
    Json(PingResponse {
        message: state.config.ping_message().to_string(),
    })
}
