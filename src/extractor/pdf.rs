use bytes::Bytes;
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use lopdf::{Dictionary, Document, Object};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{info, instrument};

use crate::extractor::{
    dates::format_locale_date,
    errors::{ExtractError, Pipeline},
    model::{ContentMetadata, ExtractedContent, UNTITLED},
    normalize::{collapse_whitespace, normalize, word_count},
};

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// A first line inside these bounds (exclusive) may become the title.
const TITLE_MIN_CHARS: usize = 10;
const TITLE_MAX_CHARS: usize = 100;

static PDF_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:D:)?(\d{4})(\d{2})?(\d{2})?(\d{2})?(\d{2})?(\d{2})?(?:([Zz+\-])(\d{2})?'?(\d{2})?'?)?",
    )
    .unwrap()
});

/// Parse on the blocking pool. The PDF stack can panic on hostile input;
/// a panic surfaces as a generic failure.
pub async fn extract_pdf_upload(bytes: Bytes, filename: String) -> Result<ExtractedContent, ExtractError> {
    tokio::task::spawn_blocking(move || extract_pdf(&bytes, &filename))
        .await
        .map_err(|e| ExtractError::failed(Pipeline::Pdf, e))?
}

/// Extract text and document info from raw PDF bytes.
///
/// Images are never extracted from PDFs.
#[instrument(skip(bytes), fields(size = bytes.len()))]
pub fn extract_pdf(bytes: &[u8], filename: &str) -> Result<ExtractedContent, ExtractError> {
    let document =
        Document::load_mem(bytes).map_err(|e| ExtractError::InvalidPdf(e.to_string()))?;
    let pages = document.get_pages().len();
    let info = info_dictionary(&document);

    let raw_text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractError::InvalidPdf(e.to_string()))?;

    let content = normalize(&raw_text);
    let metadata = ContentMetadata {
        author: info.and_then(|dict| info_text(&document, dict, b"Author")),
        publish_date: info
            .and_then(|dict| info_text(&document, dict, b"CreationDate"))
            .and_then(|raw| parse_pdf_date(&raw))
            .map(format_locale_date),
        word_count: Some(word_count(&content)),
        pages: Some(pages),
    };

    info!(pages, words = metadata.word_count, "extracted pdf");

    Ok(ExtractedContent {
        title: derive_title(&raw_text, filename),
        content,
        images: Vec::new(),
        metadata: Some(metadata),
    })
}

fn info_dictionary(document: &Document) -> Option<&Dictionary> {
    let info = document.trailer.get(b"Info").ok()?;
    let (_, info) = document.dereference(info).ok()?;
    info.as_dict().ok()
}

fn info_text(document: &Document, info: &Dictionary, key: &[u8]) -> Option<String> {
    let value = info.get(key).ok()?;
    let (_, value): (_, &Object) = document.dereference(value).ok()?;
    decode_pdf_text(value.as_str().ok()?)
}

/// Document-info strings are UTF-16BE with a byte-order mark, or
/// single-byte PDFDocEncoding (close enough to Windows-1252).
fn decode_pdf_text(raw: &[u8]) -> Option<String> {
    let text = if let Some(utf16) = raw.strip_prefix(&[0xFE, 0xFF]) {
        encoding_rs::UTF_16BE
            .decode_without_bom_handling(utf16)
            .0
            .into_owned()
    } else if let Some(utf8) = raw.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        String::from_utf8_lossy(utf8).into_owned()
    } else if let Ok(utf8) = std::str::from_utf8(raw) {
        utf8.to_string()
    } else {
        encoding_rs::WINDOWS_1252.decode_without_bom_handling(raw).0.into_owned()
    };

    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// `D:YYYYMMDDHHmmSSOHH'mm'`, everything after the year optional.
pub fn parse_pdf_date(raw: &str) -> Option<DateTime<Utc>> {
    let captures = PDF_DATE.captures(raw.trim())?;
    let number = |index: usize, default: u32| -> Option<u32> {
        match captures.get(index) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(default),
        }
    };

    let year: i32 = captures.get(1)?.as_str().parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, number(2, 1)?, number(3, 1)?)?;
    let local = date.and_hms_opt(number(4, 0)?, number(5, 0)?, number(6, 0)?)?;

    let magnitude = (number(8, 0)? * 3600 + number(9, 0)? * 60) as i32;
    let offset_seconds = match captures.get(7).map(|m| m.as_str()) {
        Some("+") => magnitude,
        Some("-") => -magnitude,
        _ => 0,
    };

    let offset = FixedOffset::east_opt(offset_seconds)?;
    offset
        .from_local_datetime(&local)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Filename without `.pdf`, underscores and hyphens read as spaces.
pub fn title_from_filename(filename: &str) -> String {
    let stem = match filename.len().checked_sub(4) {
        Some(cut)
            if filename.is_char_boundary(cut) && filename[cut..].eq_ignore_ascii_case(".pdf") =>
        {
            &filename[..cut]
        }
        _ => filename,
    };
    let title = stem.replace(['_', '-'], " ").trim().to_string();
    if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title
    }
}

/// The first text line wins over the filename when it looks like a
/// heading rather than a sentence.
pub fn derive_title(raw_text: &str, filename: &str) -> String {
    raw_text
        .lines()
        .map(collapse_whitespace)
        .find(|line| !line.is_empty())
        .filter(|line| is_title_like(line))
        .unwrap_or_else(|| title_from_filename(filename))
}

fn is_title_like(line: &str) -> bool {
    let len = line.chars().count();
    len > TITLE_MIN_CHARS && len < TITLE_MAX_CHARS && !line.contains('.')
}
