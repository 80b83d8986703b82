#![no_main]

use libfuzzer_sys::fuzz_target;
use url::Url;

use magcraft::extractor::{extract_html, normalize::normalize, parse_feed};

fuzz_target!(|data: &[u8]| {
    let html = String::from_utf8_lossy(data);
    let base = Url::parse("https://example.com/articles/").unwrap();

    // Extraction must never panic and must leave content normalized.
    let content = extract_html(&html, &base);
    assert_eq!(normalize(&content.content), content.content);
    assert!(content.images.len() <= 20);

    if let Ok(feed) = parse_feed(data, Some(i64::from(data.first().copied().unwrap_or(0)))) {
        assert!(feed.articles.len() <= 50);
        assert!(feed.articles.len() <= feed.total_items);
    }
});
