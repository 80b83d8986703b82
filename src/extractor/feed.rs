use feed_rs::model::{Entry, Feed, FeedType, Link, Person};
use tracing::{info, instrument};
use url::Url;

use crate::extractor::{
    dates::format_locale_date,
    errors::ExtractError,
    model::{RssArticle, RssExtractedContent, UNTITLED},
    normalize::strip_tags,
};
use crate::fetcher::{FetchOptions, fetch};

pub const DEFAULT_MAX_ITEMS: i64 = 10;
/// Hard ceiling on returned articles, whatever the caller asks for.
pub const MAX_ITEMS_CEILING: usize = 50;
const DEFAULT_FEED_TITLE: &str = "RSS Feed";

/// `min(requested, 50)`, with negative requests treated as zero.
pub fn effective_cap(requested: Option<i64>) -> usize {
    let requested = requested.unwrap_or(DEFAULT_MAX_ITEMS).max(0);
    usize::try_from(requested)
        .unwrap_or(MAX_ITEMS_CEILING)
        .min(MAX_ITEMS_CEILING)
}

#[instrument(skip(options), fields(url = %url))]
pub async fn extract_feed(
    url: &Url,
    max_items: Option<i64>,
    options: &FetchOptions,
) -> Result<RssExtractedContent, ExtractError> {
    let response = fetch(url.as_str(), options)
        .await
        .map_err(ExtractError::from_feed_fetch)?;

    let content = parse_feed(&response.body_raw, max_items)?;

    info!(
        total_items = content.total_items,
        returned = content.articles.len(),
        "extracted feed"
    );

    Ok(content)
}

/// Parse an RSS or Atom document and map it to the response shape.
pub fn parse_feed(body: &[u8], max_items: Option<i64>) -> Result<RssExtractedContent, ExtractError> {
    let feed = feed_rs::parser::parse(body).map_err(|e| ExtractError::InvalidFeed(e.to_string()))?;
    Ok(map_feed(feed, effective_cap(max_items)))
}

fn map_feed(feed: Feed, cap: usize) -> RssExtractedContent {
    let total_items = feed.entries.len();

    let feed_title = feed
        .title
        .map(|title| title.content.trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| DEFAULT_FEED_TITLE.to_string());

    let feed_description = feed
        .description
        .map(|description| strip_tags(&description.content))
        .filter(|description| !description.is_empty());

    let feed_link = preferred_link(&feed.links);

    let rss = matches!(
        feed.feed_type,
        FeedType::RSS0 | FeedType::RSS1 | FeedType::RSS2
    );
    let articles = feed
        .entries
        .into_iter()
        .take(cap)
        .map(|entry| map_entry(entry, rss))
        .collect();

    RssExtractedContent {
        feed_title,
        feed_description,
        feed_link,
        articles,
        total_items,
    }
}

fn map_entry(entry: Entry, rss: bool) -> RssArticle {
    let title = entry
        .title
        .map(|title| title.content)
        .filter(|title| !title.trim().is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());

    let summary = entry.summary.map(|summary| summary.content);

    // content:encoded / Atom content first, then description / summary.
    let content = entry
        .content
        .and_then(|content| content.body)
        .filter(|body| !body.trim().is_empty())
        .or_else(|| summary.clone().filter(|s| !s.trim().is_empty()))
        .map(|raw| strip_tags(&raw))
        .unwrap_or_default();

    let author = entry_author(&entry.authors, rss);

    let categories = entry
        .categories
        .into_iter()
        .map(|category| category.term)
        .filter(|term| !term.trim().is_empty())
        .collect();

    RssArticle {
        title,
        content,
        link: preferred_link(&entry.links).unwrap_or_default(),
        pub_date: entry.published.or(entry.updated).map(format_locale_date),
        author,
        categories,
        description: summary
            .map(|s| strip_tags(&s))
            .filter(|s| !s.is_empty()),
    }
}

/// `dc:creator`, else `<author>`. In RSS a creator arrives as a bare name
/// while `<author>` keeps its raw text in `email` under the name "author".
fn entry_author(authors: &[Person], rss: bool) -> Option<String> {
    let non_empty = |value: &str| {
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    };

    if !rss {
        return authors.iter().find_map(|person| non_empty(&person.name));
    }

    authors
        .iter()
        .filter(|person| person.email.is_none())
        .find_map(|person| non_empty(&person.name))
        .or_else(|| {
            authors
                .iter()
                .filter_map(|person| person.email.as_deref())
                .find_map(non_empty)
        })
}

/// The alternate (or rel-less) link, else whatever comes first.
fn preferred_link(links: &[Link]) -> Option<String> {
    links
        .iter()
        .find(|link| matches!(link.rel.as_deref(), None | Some("alternate")))
        .or_else(|| links.first())
        .map(|link| link.href.clone())
}
