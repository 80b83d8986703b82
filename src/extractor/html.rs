use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::{info, instrument};
use url::Url;

use crate::extractor::{
    dates::to_locale_date,
    errors::ExtractError,
    images::collect_images,
    model::{ContentMetadata, ExtractedContent, UNTITLED},
    normalize::{PARAGRAPH_SEPARATOR, normalize, word_count},
};
use crate::fetcher::{FetchOptions, fetch};

const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "[role='main']",
    ".content",
    ".post-content",
    ".entry-content",
    ".article-content",
    "main",
    ".main-content",
];

const AUTHOR_SELECTORS: &[&str] = &[
    "meta[name='author']",
    "meta[property='article:author']",
    ".author",
    ".byline",
    "[rel='author']",
];

const DATE_SELECTORS: &[&str] = &[
    "meta[property='article:published_time']",
    "meta[name='publish_date']",
    "time[datetime]",
    ".publish-date",
    ".date",
];

/// Text under these never counts as readable content.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

const BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "dd",
    "div",
    "dl",
    "dt",
    "figcaption",
    "figure",
    "footer",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "tr",
    "ul",
];

fn compile(selectors: &[&str]) -> Vec<Selector> {
    selectors
        .iter()
        .map(|css| Selector::parse(css).unwrap())
        .collect()
}

static CONTENT: LazyLock<Vec<Selector>> = LazyLock::new(|| compile(CONTENT_SELECTORS));
static AUTHOR: LazyLock<Vec<Selector>> = LazyLock::new(|| compile(AUTHOR_SELECTORS));
static DATE: LazyLock<Vec<Selector>> = LazyLock::new(|| compile(DATE_SELECTORS));
static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
static H1: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").unwrap());
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());

/// Fetch `url` and extract its readable content.
#[instrument(skip_all, fields(url = %url))]
pub async fn extract_url(url: &Url, options: &FetchOptions) -> Result<ExtractedContent, ExtractError> {
    let response = fetch(url.as_str(), options)
        .await
        .map_err(ExtractError::from_page_fetch)?;

    let content = extract_html(&response.body_utf8, &response.url_final);

    info!(
        final_url = %response.url_final,
        charset = response.charset.name(),
        words = content.metadata.as_ref().and_then(|m| m.word_count),
        images = content.images.len(),
        "extracted page"
    );

    Ok(content)
}

/// Extract title, body text, images and metadata from an HTML document.
pub fn extract_html(html: &str, base_url: &Url) -> ExtractedContent {
    let document = Html::parse_document(html);

    let content = normalize(&extract_main_content(&document));
    let metadata = ContentMetadata {
        author: extract_author(&document),
        publish_date: extract_publish_date(&document),
        word_count: Some(word_count(&content)),
        pages: None,
    };

    ExtractedContent {
        title: extract_title(&document),
        content,
        images: collect_images(&document, base_url),
        metadata: Some(metadata),
    }
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    let element = document.select(selector).next()?;
    let text = element.text().collect::<String>().trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn extract_title(document: &Html) -> String {
    first_text(document, &TITLE)
        .or_else(|| first_text(document, &H1))
        .unwrap_or_else(|| UNTITLED.to_string())
}

fn extract_main_content(document: &Html) -> String {
    // The first selector with any match decides the region.
    for selector in CONTENT.iter() {
        let matches: Vec<ElementRef> = document.select(selector).collect();
        if matches.is_empty() {
            continue;
        }

        let ids: HashSet<_> = matches.iter().map(|element| element.id()).collect();
        let mut text = String::new();
        for element in matches {
            // Nested matches are already covered by their ancestor.
            if element.ancestors().any(|ancestor| ids.contains(&ancestor.id())) {
                continue;
            }
            collect_text(element, &mut text);
            text.push_str(PARAGRAPH_SEPARATOR);
        }

        if !text.trim().is_empty() {
            return text;
        }
        break;
    }

    document
        .select(&PARAGRAPH)
        .map(|p| {
            let mut text = String::new();
            collect_text(p, &mut text);
            text.trim().to_string()
        })
        .collect::<Vec<_>>()
        .join(PARAGRAPH_SEPARATOR)
}

/// Readable text of an element. Block elements are framed by paragraph
/// breaks so adjacent blocks never run together.
fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child) = ElementRef::wrap(child) {
            let name = child.value().name();
            if SKIPPED_ELEMENTS.contains(&name) {
                continue;
            }
            if name == "br" {
                out.push('\n');
                continue;
            }
            let block = BLOCK_ELEMENTS.contains(&name);
            if block {
                out.push_str(PARAGRAPH_SEPARATOR);
            }
            collect_text(child, out);
            if block {
                out.push_str(PARAGRAPH_SEPARATOR);
            }
        }
    }
}

fn extract_author(document: &Html) -> Option<String> {
    let element = AUTHOR
        .iter()
        .find_map(|selector| document.select(selector).next())?;

    let value = match element.value().attr("content") {
        Some(content) if !content.trim().is_empty() => content.to_string(),
        _ => element.text().collect::<String>(),
    };
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn extract_publish_date(document: &Html) -> Option<String> {
    DATE.iter().find_map(|selector| {
        let element = document.select(selector).next()?;
        let attrs = element.value();
        let raw = attrs
            .attr("content")
            .filter(|v| !v.trim().is_empty())
            .or_else(|| attrs.attr("datetime").filter(|v| !v.trim().is_empty()))
            .map(str::to_string)
            .unwrap_or_else(|| element.text().collect::<String>());
        // Unparseable candidates fall through to the next selector.
        to_locale_date(&raw)
    })
}
