use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /api/extract-url`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ExtractUrlRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// Body of `POST /api/extract-rss`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractRssRequest {
    #[serde(default)]
    pub url: Option<String>,
    /// Defaults to 10; never more than 50 articles are returned.
    #[serde(default)]
    pub max_items: Option<i64>,
}

/// Multipart form of `POST /api/extract-pdf`; documentation only.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct PdfUploadForm {
    /// `application/pdf`, at most 10MB by default.
    #[schema(value_type = String, format = Binary)]
    pub pdf: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PingResponse {
    pub message: String,
}
