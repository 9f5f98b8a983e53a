//! # launchpress
//!
//! A content-automation pipeline that polls a product-announcement feed,
//! drafts a Japanese article for each entry with an OpenAI-compatible model,
//! resolves an illustrative image, and publishes the result to a WordPress
//! site via its REST API.
//!
//! ## Architecture
//!
//! Each feed entry moves through four sequential stages:
//! 1. **Feed reader** ([`feed`]): fetch and parse the feed, take the most
//!    recent entries
//! 2. **Content generator** ([`generate`]): three independent chat calls per
//!    entry (title + meta description, HTML body, category)
//! 3. **Image resolver** ([`image`]): page `og:image`, falling back to the
//!    category's default image
//! 4. **Publisher** ([`wordpress`]): media upload, then post creation
//!
//! Entries are processed one at a time; the run produces a
//! [`models::RunReport`] distinguishing published entries from skipped ones.

pub mod api;
pub mod categories;
pub mod cli;
pub mod config;
pub mod feed;
pub mod generate;
pub mod image;
pub mod models;
pub mod pipeline;
pub mod utils;
pub mod wordpress;
