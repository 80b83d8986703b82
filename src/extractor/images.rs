use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

pub const MAX_IMAGES: usize = 20;

/// Images at or below this size on either axis are treated as icons.
const ICON_MAX_DIMENSION: i64 = 100;

static IMG: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());

/// Content images in document order, resolved against `base_url`.
pub fn collect_images(document: &Html, base_url: &Url) -> Vec<String> {
    document
        .select(&IMG)
        .filter_map(|img| {
            let element = img.value();
            let src = element.attr("src")?.trim();
            if src.is_empty() {
                return None;
            }
            // Malformed sources are skipped silently.
            let resolved = base_url.join(src).ok()?;
            if is_icon_sized(element.attr("width"), element.attr("height")) {
                return None;
            }
            Some(resolved.to_string())
        })
        .take(MAX_IMAGES)
        .collect()
}

/// Both dimensions must be known for an image to be dropped.
fn is_icon_sized(width: Option<&str>, height: Option<&str>) -> bool {
    match (width.and_then(parse_dimension), height.and_then(parse_dimension)) {
        (Some(w), Some(h)) => w <= ICON_MAX_DIMENSION || h <= ICON_MAX_DIMENSION,
        _ => false,
    }
}

/// Leading integer of an attribute value: `"300px"` is 300, `"auto"` is unknown.
pub fn parse_dimension(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let (sign, rest) = match value.as_bytes().first() {
        Some(b'-') => (-1, &value[1..]),
        Some(b'+') => (1, &value[1..]),
        _ => (1, value),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    rest[..digits_len].parse::<i64>().ok().map(|n| sign * n)
}
