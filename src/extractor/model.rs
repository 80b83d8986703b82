use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const UNTITLED: &str = "Untitled";

/// Readable content pulled out of a web page or a PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExtractedContent {
    pub title: String,
    pub content: String,
    /// Absolute URLs in document order, at most 20.
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ContentMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Locale-formatted calendar date (`M/D/YYYY`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    /// PDF only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<usize>,
}

/// One item of an RSS/Atom feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RssArticle {
    pub title: String,
    pub content: String,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pub_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RssExtractedContent {
    pub feed_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_link: Option<String>,
    pub articles: Vec<RssArticle>,
    /// Item count of the source feed before capping.
    pub total_items: usize,
}
