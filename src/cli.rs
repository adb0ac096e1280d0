//! Command-line interface definitions.
//!
//! Every option can also be supplied through the environment, which is how
//! the scheduled job passes credentials and the run date.

use clap::{Parser, ValueEnum};

/// What to write when summarization yields nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EmptyPolicy {
    /// Compose link-only cards from the curated candidates.
    Fallback,
    /// Write an empty array and let the reader show "no data".
    Empty,
}

/// Command-line arguments for the news brief.
///
/// # Examples
///
/// ```sh
/// # Normal run (today in UTC+9)
/// steel_news_brief --openai-api-key sk-...
///
/// # Re-run a specific day without credentials
/// steel_news_brief --demo --date 2025-09-26
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory that receives `<YYYY-MM-DD>.json`
    #[arg(short, long, env = "OUTPUT_DIR", default_value = "docs/data")]
    pub output_dir: String,

    /// Pin the center date instead of using today (YYYY-MM-DD)
    #[arg(short, long, env = "TARGET_DATE")]
    pub date: Option<String>,

    /// Produce deterministic sample cards without any network calls
    #[arg(
        long,
        env = "DEMO_MODE",
        value_parser = parse_flag,
        num_args = 0..=1,
        default_value = "0",
        default_missing_value = "1"
    )]
    pub demo: bool,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Chat completions model
    #[arg(long, env = "OPENAI_MODEL", default_value = "gpt-4o-mini")]
    pub model: String,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
    pub openai_base_url: String,

    /// Timeout for one chat completions call, in seconds
    #[arg(long, env = "COMPLETION_TIMEOUT_SECS", default_value_t = 60)]
    pub completion_timeout_secs: u64,

    /// Naver search API client id
    #[arg(long, env = "NAVER_CLIENT_ID")]
    pub naver_client_id: Option<String>,

    /// Naver search API client secret
    #[arg(long, env = "NAVER_CLIENT_SECRET", hide_env_values = true)]
    pub naver_client_secret: Option<String>,

    /// Behavior when the summarizer returns nothing
    #[arg(long, env = "EMPTY_POLICY", value_enum, default_value_t = EmptyPolicy::Fallback)]
    pub empty_policy: EmptyPolicy,

    /// Fixed UTC offset, in hours, used to decide "today"
    #[arg(long, env = "UTC_OFFSET_HOURS", default_value_t = 9, allow_hyphen_values = true)]
    pub utc_offset_hours: i32,

    /// Optional YAML file overriding keywords, caps, queries and feeds
    #[arg(long, env = "TAXONOMY_FILE")]
    pub taxonomy: Option<String>,
}

/// Accept the `DEMO_MODE=1` convention as well as `true`/`false`.
fn parse_flag(s: &str) -> Result<bool, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("expected 0/1 or true/false, got {other:?}")),
    }
}
