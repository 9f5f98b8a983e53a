//! Runtime configuration for a pipeline run.
//!
//! Configuration is assembled from three layers, later layers winning:
//! built-in defaults, an optional YAML config file, and CLI flags (which
//! carry the env-backed secrets). The assembled [`Config`] value is passed
//! into the pipeline so runs are reproducible and testable against local
//! endpoints.

use crate::cli::Cli;
use serde::Deserialize;
use std::error::Error;
use std::fs;

const DEFAULT_FEED_URL: &str = "https://www.producthunt.com/feed";
const DEFAULT_BATCH_SIZE: usize = 3;
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4.1-nano";
const DEFAULT_WORDPRESS_API_BASE: &str = "https://in-house.co.jp/ai/wp-json/wp/v2";

/// Optional overrides loaded from a YAML config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub feed_url: Option<String>,
    pub batch_size: Option<usize>,
    pub openai_base_url: Option<String>,
    pub model: Option<String>,
    pub wordpress_api_base: Option<String>,
}

/// Connection settings for the OpenAI-compatible generation API.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

/// Connection settings for the WordPress REST API.
#[derive(Debug, Clone)]
pub struct WordPressConfig {
    /// Endpoint for post creation.
    pub posts_url: String,
    /// Endpoint for media-asset creation.
    pub media_url: String,
    pub username: String,
    pub app_password: String,
}

impl WordPressConfig {
    /// Derive the posts and media endpoints from the API base.
    pub fn from_api_base(api_base: &str, username: String, app_password: String) -> Self {
        let base = api_base.trim_end_matches('/');
        Self {
            posts_url: format!("{base}/posts"),
            media_url: format!("{base}/media"),
            username,
            app_password,
        }
    }
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub feed_url: String,
    pub batch_size: usize,
    pub openai: OpenAiConfig,
    pub wordpress: WordPressConfig,
}

impl Config {
    /// Assemble the configuration from the CLI and an optional config file.
    ///
    /// Missing secrets are an error here rather than a downstream
    /// authentication failure.
    pub fn load(cli: &Cli) -> Result<Self, Box<dyn Error>> {
        let file = match &cli.config {
            Some(path) => serde_yaml::from_str::<FileConfig>(&fs::read_to_string(path)?)?,
            None => FileConfig::default(),
        };
        Self::from_layers(cli, file)
    }

    /// Merge the CLI layer over the file layer over the defaults.
    pub fn from_layers(cli: &Cli, file: FileConfig) -> Result<Self, Box<dyn Error>> {
        let api_key = cli
            .openai_api_key
            .clone()
            .ok_or("OPENAI_API_KEY is not set")?;
        let username = cli
            .wordpress_username
            .clone()
            .ok_or("WORDPRESS_USERNAME is not set")?;
        let app_password = cli
            .wordpress_app_password
            .clone()
            .ok_or("WORDPRESS_APP_PASSWORD is not set")?;

        let api_base = cli
            .wordpress_api_base
            .clone()
            .or(file.wordpress_api_base)
            .unwrap_or_else(|| DEFAULT_WORDPRESS_API_BASE.to_string());

        Ok(Self {
            feed_url: cli
                .feed_url
                .clone()
                .or(file.feed_url)
                .unwrap_or_else(|| DEFAULT_FEED_URL.to_string()),
            batch_size: cli
                .batch_size
                .or(file.batch_size)
                .unwrap_or(DEFAULT_BATCH_SIZE),
            openai: OpenAiConfig {
                base_url: cli
                    .openai_base_url
                    .clone()
                    .or(file.openai_base_url)
                    .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
                api_key,
                model: cli
                    .model
                    .clone()
                    .or(file.model)
                    .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            },
            wordpress: WordPressConfig::from_api_base(&api_base, username, app_password),
        })
    }
}
