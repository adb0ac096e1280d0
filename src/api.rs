//! LLM API interaction with bounded, classified retries.
//!
//! # Architecture
//!
//! - [`Completion`]: capability that turns one request into reply text
//! - [`OpenAiCompletion`]: OpenAI-compatible chat completions over `reqwest`
//! - [`summarize`]: retry loop that also parses the reply into a JSON array
//!
//! # Retry Strategy
//!
//! - At most [`RetryPolicy::max_attempts`] attempts (4 by default)
//! - Quota exhaustion ends the loop immediately
//! - Anything else (429, network, unparseable reply) backs off by
//!   `base * 2^attempt` plus a little jitter, with a larger base for 429
//! - Every failure path ends in an empty result; nothing is raised

use crate::config::OpenAiSettings;
use crate::error::CompletionError;
use crate::utils::truncate_for_log;
use once_cell::sync::Lazy;
use rand::{Rng, rng};
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

/// System instruction sent with every summarization request.
pub const SYSTEM_INSTRUCTION: &str = "You are a rigorous news summarizer for a steel maintenance company. \
     Use only the articles you are given. Output strictly valid JSON.";

/// Everything a completion backend needs for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Sampling temperature used unless configured otherwise.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
/// Reply budget used unless configured otherwise.
pub const DEFAULT_MAX_TOKENS: u32 = 1200;

impl CompletionRequest {
    pub fn new(prompt: String, temperature: f32, max_tokens: u32) -> Self {
        Self {
            system: SYSTEM_INSTRUCTION.to_string(),
            prompt,
            temperature,
            max_tokens,
        }
    }
}

/// Trait for a chat-style completion backend.
///
/// Implementations make exactly one attempt; retrying is the caller's job.
pub trait Completion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

/// Backoff parameters for [`summarize`].
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Base delay after a rate-limit response.
    pub rate_limit_base: Duration,
    /// Base delay after any other retriable failure.
    pub transient_base: Duration,
    /// Upper bound of the random jitter added to each delay.
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            rate_limit_base: Duration::from_secs(5),
            transient_base: Duration::from_secs(3),
            max_jitter: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    /// Delay before the next attempt after `attempt` (zero-based) failed with `err`.
    pub fn delay_for(&self, err: &CompletionError, attempt: u32) -> Duration {
        let base = match err {
            CompletionError::RateLimited(_) => self.rate_limit_base,
            _ => self.transient_base,
        };
        let delay = base.saturating_mul(1u32 << attempt.min(16));
        let jitter_ms = self.max_jitter.as_millis() as u64;
        let jitter = rng().random_range(0..=jitter_ms);
        delay + Duration::from_millis(jitter)
    }
}

static CODE_FENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)```").unwrap());

/// Remove a surrounding fenced code block if the reply has one.
pub fn strip_code_fence(reply: &str) -> &str {
    match CODE_FENCE_RE.captures(reply).and_then(|c| c.get(1)) {
        Some(m) => m.as_str().trim(),
        None => reply.trim(),
    }
}

/// Parse a reply into a JSON array.
///
/// `Ok(None)` means the reply was valid JSON but not an array.
pub fn parse_card_array(reply: &str) -> Result<Option<Vec<Value>>, CompletionError> {
    let body = strip_code_fence(reply);
    if body.is_empty() {
        return Err(CompletionError::EmptyReply);
    }
    match serde_json::from_str::<Value>(body)? {
        Value::Array(items) => Ok(Some(items)),
        _ => Ok(None),
    }
}

/// Send the prompt and return the parsed card array, or an empty vector on
/// any failure once retries are spent.
///
/// Elements are passed through as-is; their shape is not validated.
#[instrument(level = "info", skip_all, fields(max_attempts = policy.max_attempts))]
pub async fn summarize<C: Completion>(
    completion: &C,
    request: &CompletionRequest,
    policy: &RetryPolicy,
) -> Vec<Value> {
    let total_t0 = Instant::now();

    for attempt in 0..policy.max_attempts {
        let attempt_t0 = Instant::now();
        let outcome = match completion.complete(request).await {
            Ok(reply) => parse_card_array(&reply).inspect_err(|e| {
                warn!(
                    attempt,
                    error = %e,
                    response_preview = %truncate_for_log(&reply, 300),
                    "Reply is not a JSON array"
                )
            }),
            Err(e) => Err(e),
        };

        let err = match outcome {
            Ok(Some(cards)) => {
                info!(
                    attempt,
                    cards = cards.len(),
                    elapsed_ms_total = total_t0.elapsed().as_millis() as u64,
                    "summarize() succeeded"
                );
                return cards;
            }
            Ok(None) => {
                warn!(attempt, "Reply parsed but is not an array; giving up");
                return Vec::new();
            }
            Err(e) => e,
        };

        if !err.is_retriable() {
            warn!(attempt, error = %err, "Quota exhausted; not retrying");
            return Vec::new();
        }

        if attempt + 1 >= policy.max_attempts {
            error!(
                attempt,
                max = policy.max_attempts,
                elapsed_ms_total = total_t0.elapsed().as_millis() as u64,
                error = %err,
                "summarize() exhausted retries"
            );
            return Vec::new();
        }

        let delay = policy.delay_for(&err, attempt);
        warn!(
            attempt,
            max = policy.max_attempts,
            elapsed_ms_attempt = attempt_t0.elapsed().as_millis() as u64,
            ?delay,
            error = %err,
            "summarize() attempt failed; backing off"
        );
        sleep(delay).await;
    }

    Vec::new()
}

/// [`Completion`] against an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiCompletion {
    client: Client,
    settings: OpenAiSettings,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl OpenAiCompletion {
    pub fn new(settings: OpenAiSettings) -> Result<Self, CompletionError> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self { client, settings })
    }

    /// Build the request for `prompt` from the configured model settings.
    pub fn request(&self, prompt: String) -> CompletionRequest {
        CompletionRequest::new(prompt, self.settings.temperature, self.settings.max_tokens)
    }
}

/// Map a non-success status and body to the retry class.
pub fn classify_failure(status: u16, body: String) -> CompletionError {
    match status {
        429 if body.contains("insufficient_quota") => CompletionError::QuotaExhausted(body),
        429 => CompletionError::RateLimited(body),
        _ => CompletionError::Status { status, body },
    }
}

impl Completion for OpenAiCompletion {
    #[instrument(level = "info", skip_all, fields(model = %self.settings.model))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let t0 = Instant::now();
        let body = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.settings.base_url))
            .bearer_auth(&self.settings.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            warn!(
                status = status.as_u16(),
                elapsed_ms = t0.elapsed().as_millis() as u64,
                body = %truncate_for_log(&text, 300),
                "API call failed"
            );
            return Err(classify_failure(status.as_u16(), text));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .unwrap_or_default();
        if content.is_empty() {
            return Err(CompletionError::EmptyReply);
        }
        info!(elapsed_ms = t0.elapsed().as_millis() as u64, bytes = content.len(), "API call succeeded");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedCompletion;

    fn request() -> CompletionRequest {
        CompletionRequest {
            system: SYSTEM_INSTRUCTION.to_string(),
            prompt: "prompt".to_string(),
            temperature: 0.2,
            max_tokens: 1200,
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 4,
            rate_limit_base: Duration::ZERO,
            transient_base: Duration::ZERO,
            max_jitter: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_transient_errors_exhaust_four_attempts() {
        let completion = ScriptedCompletion::new(|_| Err(CompletionError::RateLimited("429".into())));
        let cards = summarize(&completion, &request(), &fast_policy()).await;
        assert!(cards.is_empty());
        assert_eq!(completion.attempts(), 4);
    }

    #[tokio::test]
    async fn test_quota_exhausted_stops_after_one_attempt() {
        let completion =
            ScriptedCompletion::new(|_| Err(CompletionError::QuotaExhausted("insufficient_quota".into())));
        let cards = summarize(&completion, &request(), &fast_policy()).await;
        assert!(cards.is_empty());
        assert_eq!(completion.attempts(), 1);
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failure() {
        let completion = ScriptedCompletion::new(|attempt| match attempt {
            0 => Err(CompletionError::EmptyReply),
            1 => Ok("not json at all".to_string()),
            _ => Ok("```json\n[{\"title\": \"a\"}, {\"unexpected\": true}]\n```".to_string()),
        });
        let cards = summarize(&completion, &request(), &fast_policy()).await;
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1]["unexpected"], true);
        assert_eq!(completion.attempts(), 3);
    }

    #[tokio::test]
    async fn test_non_array_reply_is_empty_without_retry() {
        let completion = ScriptedCompletion::always(r#"{"cards": []}"#);
        let cards = summarize(&completion, &request(), &fast_policy()).await;
        assert!(cards.is_empty());
        assert_eq!(completion.attempts(), 1);
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("```\n[2]\n```"), "[2]");
        assert_eq!(strip_code_fence("  [3]  "), "[3]");
        assert_eq!(strip_code_fence("Here you go:\n```json [4] ``` thanks"), "[4]");
    }

    #[test]
    fn test_parse_card_array() {
        assert_eq!(parse_card_array("[]").unwrap(), Some(vec![]));
        assert_eq!(parse_card_array("{}").unwrap(), None);
        assert!(matches!(parse_card_array(""), Err(CompletionError::EmptyReply)));
        assert!(matches!(parse_card_array("[1,"), Err(CompletionError::Parse(_))));
    }

    #[test]
    fn test_classify_failure() {
        let body = r#"{"error":{"code":"insufficient_quota"}}"#.to_string();
        assert!(matches!(classify_failure(429, body), CompletionError::QuotaExhausted(_)));
        assert!(matches!(
            classify_failure(429, "Rate limit reached".into()),
            CompletionError::RateLimited(_)
        ));
        assert!(matches!(classify_failure(500, String::new()), CompletionError::Status { status: 500, .. }));
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy {
            max_jitter: Duration::ZERO,
            ..RetryPolicy::default()
        };
        let rl = CompletionError::RateLimited(String::new());
        let other = CompletionError::EmptyReply;
        assert_eq!(policy.delay_for(&rl, 0), Duration::from_secs(5));
        assert_eq!(policy.delay_for(&rl, 2), Duration::from_secs(20));
        assert_eq!(policy.delay_for(&other, 1), Duration::from_secs(6));
    }
}
