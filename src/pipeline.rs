//! The per-entry publishing pipeline.
//!
//! One run fetches the feed once and then processes each entry to completion
//! before the next begins: three generation calls, image resolution, media
//! upload, post creation. Entries are independent; a failed entry is recorded
//! in the report and the run moves on.

use crate::api::ChatClient;
use crate::config::Config;
use crate::feed;
use crate::generate;
use crate::image;
use crate::models::{EntryOutcome, FeedItem, ResolvedImage, RunReport};
use crate::wordpress::{NewPost, WordPressClient};
use chrono::Local;
use reqwest::Client;
use std::error::Error;
use std::time::Duration;
use tracing::{info, instrument, warn};

const USER_AGENT: &str = concat!("launchpress/", env!("CARGO_PKG_VERSION"));

/// Outbound calls all share this ceiling; the page-metadata fetch uses its
/// own tighter per-request timeout.
const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Execute one full run and return the per-entry report.
#[instrument(level = "info", skip_all)]
pub async fn run(config: &Config) -> Result<RunReport, Box<dyn Error>> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(HTTP_TIMEOUT)
        .build()?;

    let chat = ChatClient::new(client.clone(), &config.openai);
    let wordpress = WordPressClient::new(client.clone(), config.wordpress.clone());

    let items = feed::fetch_latest(&client, &config.feed_url, config.batch_size).await;

    let mut report = RunReport::default();
    for item in &items {
        let outcome = process_entry(&chat, &wordpress, &client, item).await;
        report.outcomes.push(outcome);
    }
    Ok(report)
}

/// Process a single feed entry: generate, resolve an image, publish.
#[instrument(level = "info", skip_all, fields(entry = %item.title))]
async fn process_entry(
    chat: &ChatClient,
    wordpress: &WordPressClient,
    client: &Client,
    item: &FeedItem,
) -> EntryOutcome {
    let article = match generate::generate_article(chat, item).await {
        Ok(article) => article,
        Err(e) => {
            warn!(error = %e, "Content generation failed; skipping entry");
            return EntryOutcome {
                feed_title: item.title.clone(),
                post_title: None,
                category: None,
                media_attached: false,
                http_status: None,
            };
        }
    };

    let og_image = image::fetch_og_image(client, &item.link).await;
    let (image_url, image_source) = image::resolve_image(og_image, article.category);
    let media_id = wordpress.upload_media(&image_url).await;
    let resolved = ResolvedImage {
        url: image_url,
        source: image_source,
        media_id,
    };

    let content = embed_lead_image(&resolved.url, &article.title, &article.body_html);
    let post = NewPost {
        title: &article.title,
        content: &content,
        category_id: article.category.id(),
        featured_media: resolved.media_id,
        meta_description: &article.description,
    };

    let http_status = match wordpress.create_post(&post).await {
        Ok(status) => {
            info!(
                timestamp = %Local::now().format("%Y-%m-%d %H:%M:%S"),
                title = %article.title,
                category = %article.category,
                status,
                "Post created"
            );
            Some(status)
        }
        Err(e) => {
            warn!(error = %e, "Post creation failed; skipping entry");
            None
        }
    };

    EntryOutcome {
        feed_title: item.title.clone(),
        post_title: Some(article.title),
        category: Some(article.category),
        media_attached: resolved.media_id.is_some(),
        http_status,
    }
}

/// Prepend the resolved image to the body.
///
/// The image goes inline at the top as a safeguard in case the featured-media
/// attachment failed, so every published body carries its image either way.
fn embed_lead_image(image_url: &str, title: &str, body_html: &str) -> String {
    format!("<p><img src=\"{image_url}\" alt=\"{title}\"></p>\n\n{body_html}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::Category;

    #[test]
    fn test_embed_lead_image_places_image_first() {
        let body = embed_lead_image(
            "https://example.com/widget.png",
            "Widgetの紹介",
            "<h3>概要</h3>\n<p>本文</p>",
        );
        assert!(body.starts_with("<p><img src=\"https://example.com/widget.png\" alt=\"Widgetの紹介\"></p>"));
        assert!(body.ends_with("<p>本文</p>"));
    }

    #[test]
    fn test_embedded_body_has_exactly_one_image() {
        let category = Category::Chat;
        let (url, _) = image::resolve_image(None, category);
        let body = embed_lead_image(&url, "タイトル", "<h3>見出し</h3><p>段落</p><ul><li>項目</li></ul>");
        assert_eq!(body.matches("<img").count(), 1);
        assert!(!body.contains("src=\"\""));
    }
}
