//! Illustrative image resolution.
//!
//! Tries the destination page's `og:image` social-preview tag first, then
//! falls back to the category's default image, so every post ends up with a
//! usable image even when the page is unreachable or carries no metadata.

use crate::categories::Category;
use crate::models::ImageSource;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use std::error::Error;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Pages are untrusted and best-effort; don't let one hang the run.
const PAGE_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

static OG_IMAGE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:image"]"#).unwrap());

/// Fetch the page and extract its `og:image` URL, if any.
///
/// Any network or parse failure is logged and yields `None`; the caller
/// falls back to the category default.
#[instrument(level = "info", skip(client))]
pub async fn fetch_og_image(client: &Client, url: &str) -> Option<String> {
    match try_fetch(client, url).await {
        Ok(Some(image_url)) => {
            debug!(%image_url, "Found og:image");
            Some(image_url)
        }
        Ok(None) => {
            debug!("Page has no og:image tag");
            None
        }
        Err(e) => {
            warn!(error = %e, "og:image fetch failed");
            None
        }
    }
}

async fn try_fetch(client: &Client, url: &str) -> Result<Option<String>, Box<dyn Error>> {
    let html = client
        .get(url)
        .timeout(PAGE_FETCH_TIMEOUT)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    Ok(extract_og_image(&html))
}

/// Pull the first non-empty `og:image` content attribute out of a document.
pub fn extract_og_image(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&OG_IMAGE_SELECTOR)
        .filter_map(|element| element.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty())
        .map(String::from)
}

/// Apply the fallback policy: page metadata wins, else the category default.
///
/// The returned URL is always non-empty since every category carries a
/// default image.
pub fn resolve_image(og_image: Option<String>, category: Category) -> (String, ImageSource) {
    match og_image.filter(|url| !url.is_empty()) {
        Some(url) => (url, ImageSource::PageMetadata),
        None => (
            category.default_image_url().to_string(),
            ImageSource::CategoryDefault,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_og_image() {
        let html = r#"<html><head>
            <meta property="og:title" content="Widget">
            <meta property="og:image" content="https://example.com/widget.png">
        </head><body></body></html>"#;
        assert_eq!(
            extract_og_image(html),
            Some("https://example.com/widget.png".to_string())
        );
    }

    #[test]
    fn test_extract_og_image_missing_tag() {
        let html = "<html><head><title>No metadata</title></head><body></body></html>";
        assert_eq!(extract_og_image(html), None);
    }

    #[test]
    fn test_extract_og_image_empty_content() {
        let html = r#"<html><head><meta property="og:image" content=""></head></html>"#;
        assert_eq!(extract_og_image(html), None);
    }

    #[test]
    fn test_extract_og_image_not_valid_html() {
        // html5ever never fails outright; garbage just yields no tag.
        assert_eq!(extract_og_image("%%% not html at all"), None);
    }

    #[test]
    fn test_resolve_prefers_page_metadata() {
        let (url, source) = resolve_image(
            Some("https://example.com/widget.png".to_string()),
            Category::Chat,
        );
        assert_eq!(url, "https://example.com/widget.png");
        assert_eq!(source, ImageSource::PageMetadata);
    }

    #[test]
    fn test_resolve_falls_back_to_category_default() {
        // A timed-out metadata fetch yields None; the chat category's own
        // default image must win.
        let (url, source) = resolve_image(None, Category::Chat);
        assert_eq!(
            url,
            "https://in-house.co.jp/ai/wp-content/uploads/2025/06/chat-scaled.jpeg"
        );
        assert_eq!(source, ImageSource::CategoryDefault);
        assert_eq!(Category::Chat.id(), 4);
    }

    #[test]
    fn test_resolve_treats_empty_url_as_missing() {
        let (url, source) = resolve_image(Some(String::new()), Category::Other);
        assert_eq!(url, Category::Other.default_image_url());
        assert_eq!(source, ImageSource::CategoryDefault);
    }

    #[tokio::test]
    async fn test_unreachable_page_yields_none() {
        let client = Client::new();
        let result = fetch_og_image(&client, "http://page.invalid/launch").await;
        assert_eq!(result, None);
    }
}
