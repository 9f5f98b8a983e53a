//! WordPress REST API publisher.
//!
//! Two calls per entry, both under HTTP Basic auth with an application
//! password: a media-asset upload and the post creation. The upload is
//! best-effort; a post with no featured image is an acceptable degraded
//! outcome. The post creation is fire-and-forget: its HTTP status is
//! surfaced in the report, never branched on.

use crate::config::WordPressConfig;
use crate::utils::filename_from_url;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::error::Error;
use tracing::{debug, instrument, warn};

/// The fields of a post to be created.
#[derive(Debug)]
pub struct NewPost<'a> {
    pub title: &'a str,
    /// Full HTML body, image already embedded.
    pub content: &'a str,
    pub category_id: u32,
    pub featured_media: Option<u64>,
    pub meta_description: &'a str,
}

#[derive(Serialize)]
struct PostPayload<'a> {
    title: &'a str,
    content: &'a str,
    status: &'static str,
    categories: [u32; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    featured_media: Option<u64>,
    meta: PostMeta<'a>,
}

#[derive(Serialize)]
struct PostMeta<'a> {
    meta_description: &'a str,
}

impl<'a> PostPayload<'a> {
    fn from_post(post: &'a NewPost<'a>) -> Self {
        Self {
            title: post.title,
            content: post.content,
            status: "publish",
            categories: [post.category_id],
            featured_media: post.featured_media,
            meta: PostMeta {
                meta_description: post.meta_description,
            },
        }
    }
}

#[derive(Deserialize)]
struct MediaResponse {
    id: u64,
}

/// Client for the WordPress media and posts endpoints.
pub struct WordPressClient {
    client: Client,
    config: WordPressConfig,
}

impl WordPressClient {
    pub fn new(client: Client, config: WordPressConfig) -> Self {
        Self { client, config }
    }

    /// Download the image and upload it as a media asset.
    ///
    /// Returns the new asset's id, or `None` on any failure (network,
    /// non-2xx, malformed response body). Failures are logged and the post
    /// proceeds without a featured image.
    #[instrument(level = "info", skip(self))]
    pub async fn upload_media(&self, image_url: &str) -> Option<u64> {
        match self.try_upload(image_url).await {
            Ok(id) => {
                debug!(media_id = id, "Uploaded media asset");
                Some(id)
            }
            Err(e) => {
                warn!(error = %e, "Media upload failed; post will have no featured image");
                None
            }
        }
    }

    async fn try_upload(&self, image_url: &str) -> Result<u64, Box<dyn Error>> {
        let bytes = self
            .client
            .get(image_url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let filename = filename_from_url(image_url);
        let response = self
            .client
            .post(&self.config.media_url)
            .basic_auth(&self.config.username, Some(&self.config.app_password))
            .header(CONTENT_DISPOSITION, format!("attachment; filename={filename}"))
            .header(CONTENT_TYPE, "image/jpeg")
            .body(bytes)
            .send()
            .await?
            .error_for_status()?;

        let body = response.bytes().await?;
        let media: MediaResponse = serde_json::from_slice(&body)?;
        Ok(media.id)
    }

    /// Create an immediately-published post.
    ///
    /// Returns the response's HTTP status code. The status is reported, not
    /// interpreted; only transport-level failures are errors.
    #[instrument(level = "info", skip_all, fields(title = %post.title))]
    pub async fn create_post(&self, post: &NewPost<'_>) -> Result<u16, Box<dyn Error>> {
        let response = self
            .client
            .post(&self.config.posts_url)
            .basic_auth(&self.config.username, Some(&self.config.app_password))
            .json(&PostPayload::from_post(post))
            .send()
            .await?;

        Ok(response.status().as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let post = NewPost {
            title: "Widgetの紹介",
            content: "<p>本文</p>",
            category_id: 4,
            featured_media: Some(42),
            meta_description: "説明",
        };
        let json = serde_json::to_value(PostPayload::from_post(&post)).unwrap();

        assert_eq!(json["title"], "Widgetの紹介");
        assert_eq!(json["status"], "publish");
        assert_eq!(json["categories"], serde_json::json!([4]));
        assert_eq!(json["featured_media"], 42);
        assert_eq!(json["meta"]["meta_description"], "説明");
    }

    #[test]
    fn test_payload_omits_absent_featured_media() {
        let post = NewPost {
            title: "t",
            content: "c",
            category_id: 1,
            featured_media: None,
            meta_description: "",
        };
        let json = serde_json::to_string(&PostPayload::from_post(&post)).unwrap();
        assert!(!json.contains("featured_media"));
    }
}
