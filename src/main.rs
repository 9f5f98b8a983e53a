//! Binary entry point: parse the CLI, load configuration, run one pass of
//! the publishing pipeline, and log the run summary.

use clap::Parser;
use launchpress::cli::Cli;
use launchpress::config::Config;
use launchpress::pipeline;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("launchpress starting up");

    let args = Cli::parse();
    debug!(?args.feed_url, ?args.batch_size, ?args.config, "Parsed CLI arguments");

    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Configuration is incomplete; aborting before any network call");
            return Err(e);
        }
    };
    info!(
        feed_url = %config.feed_url,
        batch_size = config.batch_size,
        model = %config.openai.model,
        "Configuration loaded"
    );

    let report = pipeline::run(&config).await?;

    for outcome in &report.outcomes {
        info!(
            feed_title = %outcome.feed_title,
            post_title = outcome.post_title.as_deref().unwrap_or("-"),
            category = %outcome.category.map(|c| c.label()).unwrap_or("-"),
            media_attached = outcome.media_attached,
            http_status = %outcome.http_status.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string()),
            published = outcome.published(),
            "Entry result"
        );
    }

    let elapsed = start_time.elapsed();
    info!(
        entries = report.outcomes.len(),
        published = report.published_count(),
        skipped = report.skipped_count(),
        ?elapsed,
        "Execution complete"
    );

    Ok(())
}
