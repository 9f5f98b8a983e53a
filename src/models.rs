//! Data models for feed entries and their published representations.
//!
//! This module defines the structures flowing through the pipeline:
//! - [`FeedItem`]: one entry from the announcement feed
//! - [`GeneratedArticle`]: the model-drafted title, description, body, and category
//! - [`ResolvedImage`]: the illustrative image after resolution and upload
//! - [`EntryOutcome`] / [`RunReport`]: the per-entry and per-run result report

use crate::categories::Category;

/// A single entry from the announcement feed.
#[derive(Debug, Clone)]
pub struct FeedItem {
    /// The service name as the feed titles it.
    pub title: String,
    /// The entry's destination URL.
    pub link: String,
}

/// The model-drafted article for one feed entry.
#[derive(Debug)]
pub struct GeneratedArticle {
    /// SEO title, or the fixed placeholder when no title line was found.
    pub title: String,
    /// Meta description; empty when the model omitted it.
    pub description: String,
    /// Article body as an HTML fragment, code fences stripped.
    pub body_html: String,
    /// Category resolved from the classifier's output.
    pub category: Category,
}

/// Where the illustrative image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// Extracted from the destination page's `og:image` tag.
    PageMetadata,
    /// The category's default image.
    CategoryDefault,
}

/// The illustrative image after resolution and (attempted) upload.
#[derive(Debug)]
pub struct ResolvedImage {
    /// Always non-empty: page metadata or a category default.
    pub url: String,
    /// Where `url` came from.
    pub source: ImageSource,
    /// WordPress media id, absent when the upload failed.
    pub media_id: Option<u64>,
}

/// The result of processing one feed entry.
#[derive(Debug)]
pub struct EntryOutcome {
    /// The entry's title as it appeared in the feed.
    pub feed_title: String,
    /// The generated post title, when generation got that far.
    pub post_title: Option<String>,
    /// The resolved category, when classification got that far.
    pub category: Option<Category>,
    /// Whether a media asset was attached to the post.
    pub media_attached: bool,
    /// HTTP status of the post-creation call, absent when the entry was
    /// skipped before or during that call.
    pub http_status: Option<u16>,
}

impl EntryOutcome {
    /// Whether the post-creation call completed at the transport level.
    ///
    /// The publish call is fire-and-forget: a non-2xx status is reported,
    /// not treated as a skip.
    pub fn published(&self) -> bool {
        self.http_status.is_some()
    }
}

/// The full report for one run, one row per feed entry.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<EntryOutcome>,
}

impl RunReport {
    pub fn published_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.published()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.len() - self.published_count()
    }
}
