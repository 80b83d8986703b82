use std::fs;
use url::Url;

use crate::extractor::{ExtractError, extract_html, parse_request_url};

#[test]
fn test_extract_article() {
    let html = fs::read_to_string("src/extractor/tests/fixtures/article.html")
        .expect("Failed to read test fixture");

    let base = Url::parse("https://example.com/news/article").unwrap();
    let content = extract_html(&html, &base);

    assert_eq!(content.title, "Sample Article - News Site");
    assert!(content.content.starts_with("Sample Article\n\nThis is the first paragraph"));
    assert!(content.content.contains("It wraps across lines in the source."));
    assert!(content.content.contains("related link"));
    assert!(!content.content.contains("inline widget"));
    assert!(!content.content.contains("Copyright"));
    assert!(!content.content.contains("Home"));

    // Document order, relative sources resolved, icons and banners dropped.
    assert_eq!(
        content.images,
        vec![
            "https://example.com/news/images/sample.jpg",
            "https://example.com/promo/large.jpg",
        ]
    );

    let metadata = content.metadata.unwrap();
    assert_eq!(metadata.author.as_deref(), Some("Alex Writer"));
    assert_eq!(metadata.publish_date.as_deref(), Some("3/10/2024"));
    assert_eq!(
        metadata.word_count,
        Some(content.content.split_whitespace().count())
    );
    assert_eq!(metadata.pages, None);
}

#[test]
fn test_extract_blog_post_without_content_region() {
    let html = fs::read_to_string("src/extractor/tests/fixtures/blog.html")
        .expect("Failed to read test fixture");

    let base = Url::parse("https://blog.example.com/posts/better-software").unwrap();
    let content = extract_html(&html, &base);

    assert_eq!(content.title, "How to Build Better Software");
    assert_eq!(
        content.content,
        "Building better software starts with small, well understood steps.\n\nKey Principles: keep functions short and tests close to the code."
    );
    assert_eq!(
        content.images,
        vec![
            "https://blog.example.com/img/diagram.png",
            "https://blog.example.com/img/unsized.png",
        ]
    );

    let metadata = content.metadata.unwrap();
    assert_eq!(metadata.author.as_deref(), Some("by Sam Coder"));
    assert_eq!(metadata.publish_date.as_deref(), Some("6/2/2023"));
    assert_eq!(metadata.word_count, Some(20));
}

#[test]
fn test_malformed_html() {
    let html = "<html><head><title>Broken</title><body><p>Unclosed tags<div>More content";
    let content = extract_html(html, &Url::parse("https://example.com/broken").unwrap());

    assert_eq!(content.title, "Broken");
    assert!(content.content.contains("Unclosed tags"));
}

#[test]
fn test_request_url_validation() {
    assert!(matches!(parse_request_url(None), Err(ExtractError::UrlRequired)));
    assert!(matches!(parse_request_url(Some("   ")), Err(ExtractError::UrlRequired)));
    assert!(matches!(
        parse_request_url(Some("not-a-url")),
        Err(ExtractError::InvalidUrl(_))
    ));
    assert!(matches!(
        parse_request_url(Some("ftp://example.com/file")),
        Err(ExtractError::InvalidUrl(_))
    ));

    let url = parse_request_url(Some(" https://example.com/feed.xml ")).unwrap();
    assert_eq!(url.as_str(), "https://example.com/feed.xml");
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_panics(
            html in ".*",
            url in "https://[a-z]+\\.com/.*"
        ) {
            if let Ok(base) = Url::parse(&url) {
                let _ = extract_html(&html, &base);
            }
        }

        #[test]
        fn test_extracted_invariants_hold(html in ".*") {
            let base = Url::parse("https://example.com").unwrap();
            let content = extract_html(&html, &base);
            let metadata = content.metadata.unwrap();
            prop_assert!(!content.title.is_empty());
            prop_assert!(content.images.len() <= 20);
            prop_assert_eq!(metadata.word_count, Some(content.content.split_whitespace().count()));
            for image in &content.images {
                prop_assert!(Url::parse(image).is_ok());
            }
        }
    }
}
