//! Announcement feed reader.
//!
//! Fetches the syndication feed and maps it to a bounded list of
//! [`FeedItem`]s. Feed problems are tolerated rather than handled: an
//! unreachable or malformed feed logs a warning and yields an empty list, so
//! a bad feed day produces no posts instead of a failed run.

use crate::models::FeedItem;
use itertools::Itertools;
use reqwest::Client;
use std::error::Error;
use tracing::{debug, info, instrument, warn};

/// Fetch the feed and return up to `limit` entries in feed order.
///
/// Entries without a link are skipped and duplicate links are dropped.
/// Returns an empty list on any fetch or parse failure.
#[instrument(level = "info", skip(client))]
pub async fn fetch_latest(client: &Client, url: &str, limit: usize) -> Vec<FeedItem> {
    match try_fetch(client, url).await {
        Ok(items) => {
            let items: Vec<FeedItem> = items
                .into_iter()
                .unique_by(|item| item.link.clone())
                .take(limit)
                .collect();
            info!(count = items.len(), limit, "Fetched feed entries");
            items
        }
        Err(e) => {
            warn!(error = %e, "Feed fetch failed; continuing with no entries");
            Vec::new()
        }
    }
}

async fn try_fetch(client: &Client, url: &str) -> Result<Vec<FeedItem>, Box<dyn Error>> {
    let body = client.get(url).send().await?.error_for_status()?.bytes().await?;
    let feed = feed_rs::parser::parse(body.as_ref())?;
    debug!(entries = feed.entries.len(), "Parsed feed document");

    Ok(feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let link = entry.links.first()?.href.clone();
            let title = entry
                .title
                .map(|t| t.content)
                .unwrap_or_else(|| "Untitled".to_string());
            Some(FeedItem { title, link })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Launches</title>
    <link>https://example.com</link>
    <item>
      <title>Widget</title>
      <link>https://example.com/widget</link>
    </item>
    <item>
      <title>Gadget</title>
      <link>https://example.com/gadget</link>
    </item>
    <item>
      <title>Widget again</title>
      <link>https://example.com/widget</link>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_maps_title_and_link() {
        let feed = feed_rs::parser::parse(SAMPLE_RSS.as_bytes()).unwrap();
        assert_eq!(feed.entries.len(), 3);
        let first = &feed.entries[0];
        assert_eq!(first.title.as_ref().unwrap().content, "Widget");
        assert_eq!(first.links[0].href, "https://example.com/widget");
    }

    #[tokio::test]
    async fn test_unreachable_feed_yields_empty_list() {
        let client = Client::new();
        // Reserved TLD, guaranteed unresolvable.
        let items = fetch_latest(&client, "http://feed.invalid/rss", 3).await;
        assert!(items.is_empty());
    }
}
