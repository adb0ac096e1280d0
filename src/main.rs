//! # Steel News Brief
//!
//! A daily news-curation pipeline for a steel-maintenance audience. It
//! gathers Korean economic and industry articles from RSS feeds and a news
//! search API, keeps only recent, unique, live articles, sorts them into a
//! small fixed taxonomy and asks an LLM for short grounded summary cards.
//!
//! ## Usage
//!
//! ```sh
//! OPENAI_API_KEY=... steel_news_brief -o docs/data
//! steel_news_brief --demo --date 2025-09-26
//! ```
//!
//! ## Architecture
//!
//! 1. **Collect**: pull every configured feed and search query
//! 2. **Curate**: recency window, dedup, link verification, categorize, cap
//! 3. **Summarize**: one prompt, bounded retries; fallback cards on failure
//! 4. **Output**: one dated JSON file, never overwritten
//!
//! A run whose dated file already exists does nothing.

use chrono::Utc;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod curate;
mod error;
mod fallback;
mod http;
mod models;
mod outputs;
mod pipeline;
mod prompt;
mod sources;
mod taxonomy;
mod utils;

#[cfg(test)]
mod testing;

use api::OpenAiCompletion;
use cli::Cli;
use config::{Config, RunContext};
use http::ReqwestHttp;
use pipeline::{Pipeline, RunOutcome};
use sources::Feed;

#[tokio::main]
#[instrument]
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
    info!("steel_news_brief starting up");

    let args = Cli::parse();
    debug!(output_dir = %args.output_dir, date = ?args.date, demo = args.demo, "Parsed CLI arguments");

    let config = match Config::from_cli(&args) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Configuration error; aborting");
            return Err(e.into());
        }
    };
    let ctx = RunContext::resolve(&config, Utc::now());
    info!(date = %ctx.center_date, path = %ctx.output_path.display(), "Resolved run");

    let http = ReqwestHttp::new(&config.http)?;
    let outcome = match &config.openai {
        Some(settings) if !config.demo => {
            let completion = OpenAiCompletion::new(settings.clone())?;
            let feed = Feed::live(&config);
            Pipeline::new(&config, &feed, &http, Some(&completion)).run(&ctx).await?
        }
        _ => {
            info!("Demo mode: fixture candidates, no completion calls");
            let feed = Feed::demo(ctx.center_date);
            Pipeline::<_, OpenAiCompletion>::new(&config, &feed, &http, None)
                .run(&ctx)
                .await?
        }
    };

    match &outcome {
        RunOutcome::Skipped { path } => {
            info!(path = %path.display(), "Nothing to do");
        }
        RunOutcome::Written { path, cards, origin } => {
            info!(path = %path.display(), cards, ?origin, "Cards written");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
