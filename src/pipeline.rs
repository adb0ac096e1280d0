//! One daily run, end to end.
//!
//! ```text
//! exists? ─yes─> Skipped
//!    │no
//! collect ─> window ─> dedup ─> verify ─> categorize ─> cap
//!    ─> summarize ─(empty)─> fallback cards | []
//!    ─> write
//! ```
//!
//! Stages run strictly in order. Only configuration errors and output I/O
//! can fail a run; every other problem shrinks the data instead.

use crate::api::{Completion, CompletionRequest, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, summarize};
use crate::cli::EmptyPolicy;
use crate::config::{Config, RunContext};
use crate::curate::categorize::{cap, categorize};
use crate::curate::dedup::dedup_keep_order;
use crate::curate::liveness::verify_all;
use crate::curate::window::retain_recent;
use crate::error::NewsError;
use crate::fallback::{CardMark, compose_cards};
use crate::http::HttpFetch;
use crate::outputs::json;
use crate::prompt::build_prompt;
use crate::sources::Feed;
use serde_json::Value;
use std::path::PathBuf;
use tracing::{info, instrument, warn};

/// Where the written cards came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardOrigin {
    Summarized,
    Fallback,
    Demo,
    Empty,
}

/// Result of a run that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The dated file already existed; nothing was fetched or written.
    Skipped { path: PathBuf },
    Written {
        path: PathBuf,
        cards: usize,
        origin: CardOrigin,
    },
}

/// Wires the capabilities to the stages for one run.
///
/// With no completion backend the run is a demo run: cards are composed
/// from the candidates directly.
pub struct Pipeline<'a, H, C> {
    config: &'a Config,
    feed: &'a Feed,
    http: &'a H,
    completion: Option<&'a C>,
}

impl<'a, H: HttpFetch, C: Completion> Pipeline<'a, H, C> {
    pub fn new(config: &'a Config, feed: &'a Feed, http: &'a H, completion: Option<&'a C>) -> Self {
        Self {
            config,
            feed,
            http,
            completion,
        }
    }

    #[instrument(level = "info", skip_all, fields(date = %ctx.center_date, path = %ctx.output_path.display()))]
    pub async fn run(&self, ctx: &RunContext) -> Result<RunOutcome, NewsError> {
        if json::output_exists(&ctx.output_path).await? {
            info!("Output already exists; skipping run");
            return Ok(RunOutcome::Skipped {
                path: ctx.output_path.clone(),
            });
        }

        let config = self.config;
        let offset = &config.utc_offset;

        let collected = self.feed.collect(self.http, config).await;
        let collected_count = collected.len();
        let recent = retain_recent(collected, ctx.center_date, offset);
        let recent_count = recent.len();
        let unique = dedup_keep_order(recent);
        let unique_count = unique.len();

        let verified = if self.feed.is_trusted() {
            unique
        } else {
            verify_all(self.http, unique, &config.liveness, &config.http).await
        };

        let buckets = cap(categorize(verified, &config.taxonomy), &config.taxonomy);
        info!(
            collected = collected_count,
            recent = recent_count,
            unique = unique_count,
            selected = buckets.total(),
            "Curated candidates"
        );

        let Some(completion) = self.completion else {
            let cards = compose_cards(&buckets, &config.taxonomy, ctx.center_date, CardMark::Demo);
            return self.write(ctx, &cards, CardOrigin::Demo).await;
        };

        if buckets.is_empty() {
            warn!("No candidates survived curation; writing empty output");
            return self.write::<Value>(ctx, &[], CardOrigin::Empty).await;
        }

        let prompt = build_prompt(ctx.center_date, &config.taxonomy, &buckets, offset);
        let (temperature, max_tokens) = config
            .openai
            .as_ref()
            .map(|o| (o.temperature, o.max_tokens))
            .unwrap_or((DEFAULT_TEMPERATURE, DEFAULT_MAX_TOKENS));
        let request = CompletionRequest::new(prompt, temperature, max_tokens);

        let cards = summarize(completion, &request, &config.retry).await;
        if !cards.is_empty() {
            return self.write(ctx, &cards, CardOrigin::Summarized).await;
        }

        match config.empty_policy {
            EmptyPolicy::Fallback => {
                warn!("Summarizer returned nothing; composing fallback cards");
                let cards = compose_cards(&buckets, &config.taxonomy, ctx.center_date, CardMark::Fallback);
                self.write(ctx, &cards, CardOrigin::Fallback).await
            }
            EmptyPolicy::Empty => {
                warn!("Summarizer returned nothing; writing empty output");
                self.write::<Value>(ctx, &[], CardOrigin::Empty).await
            }
        }
    }

    async fn write<T: serde::Serialize>(
        &self,
        ctx: &RunContext,
        cards: &[T],
        origin: CardOrigin,
    ) -> Result<RunOutcome, NewsError> {
        json::write_cards(&ctx.output_path, cards).await?;
        Ok(RunOutcome::Written {
            path: ctx.output_path.clone(),
            cards: cards.len(),
            origin,
        })
    }
}
