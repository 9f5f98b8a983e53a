//! Command-line interface definitions for launchpress.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Secrets are read from environment variables; everything else can come from
//! flags or the optional YAML config file.

use clap::Parser;

/// Command-line arguments for the launchpress application.
///
/// # Examples
///
/// ```sh
/// # Default feed and endpoints, secrets from the environment
/// launchpress
///
/// # Explicit feed and batch size
/// launchpress --feed-url https://www.producthunt.com/feed --batch-size 5
///
/// # With a config file
/// launchpress -c launchpress.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Announcement feed URL to poll
    #[arg(short, long)]
    pub feed_url: Option<String>,

    /// Number of most-recent feed entries to process
    #[arg(short = 'n', long)]
    pub batch_size: Option<usize>,

    /// OpenAI-compatible API base URL (e.g. https://api.openai.com/v1)
    #[arg(long)]
    pub openai_base_url: Option<String>,

    /// Model identifier for the generation calls
    #[arg(long)]
    pub model: Option<String>,

    /// WordPress REST API base (e.g. https://example.com/wp-json/wp/v2)
    #[arg(long)]
    pub wordpress_api_base: Option<String>,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// WordPress account username
    #[arg(long, env = "WORDPRESS_USERNAME")]
    pub wordpress_username: Option<String>,

    /// WordPress application password
    #[arg(long, env = "WORDPRESS_APP_PASSWORD", hide_env_values = true)]
    pub wordpress_app_password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(&[
            "launchpress",
            "--feed-url",
            "https://example.com/feed",
            "--batch-size",
            "5",
        ]);

        assert_eq!(cli.feed_url.as_deref(), Some("https://example.com/feed"));
        assert_eq!(cli.batch_size, Some(5));
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(&["launchpress", "-f", "https://example.com/feed", "-n", "1"]);

        assert_eq!(cli.feed_url.as_deref(), Some("https://example.com/feed"));
        assert_eq!(cli.batch_size, Some(1));
    }

    #[test]
    fn test_cli_defaults_to_none() {
        let cli = Cli::parse_from(&["launchpress"]);
        assert!(cli.feed_url.is_none());
        assert!(cli.batch_size.is_none());
        assert!(cli.config.is_none());
    }
}
