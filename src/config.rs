//! Immutable run configuration.
//!
//! [`Config`] is built once from the parsed [`Cli`] and borrowed by every
//! stage; nothing below `main` looks at the process environment.
//! [`RunContext`] pins the center date and output path for a single run.

use crate::api::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, RetryPolicy};
use crate::cli::{Cli, EmptyPolicy};
use crate::curate::liveness::LivenessSettings;
use crate::error::ConfigError;
use crate::taxonomy::{self, Taxonomy, TaxonomyFile};
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument};

/// Browser-like identity sent with every request; several outlets reject
/// unknown agents.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Credentials and request shape for the chat completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Whole-request timeout; a full reply takes far longer than a page fetch.
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct NaverCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Shared HTTP client settings.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub user_agent: String,
    /// Pause between successive requests of the same loop.
    pub request_delay: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(12),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_delay: Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub output_dir: PathBuf,
    pub target_date: Option<NaiveDate>,
    pub utc_offset: FixedOffset,
    pub demo: bool,
    /// `None` only in demo mode.
    pub openai: Option<OpenAiSettings>,
    /// `None` disables the search source without failing the run.
    pub naver: Option<NaverCredentials>,
    pub empty_policy: EmptyPolicy,
    pub taxonomy: Taxonomy,
    pub naver_queries: Vec<String>,
    pub naver_page_size: u32,
    pub rss_feeds: Vec<String>,
    pub http: HttpSettings,
    pub liveness: LivenessSettings,
    pub retry: RetryPolicy,
}

fn non_empty(s: &Option<String>) -> Option<String> {
    s.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl Config {
    /// Defaults for everything except the output directory.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            target_date: None,
            utc_offset: FixedOffset::east_opt(9 * 3600).unwrap_or_else(|| Utc.fix()),
            demo: false,
            openai: None,
            naver: None,
            empty_policy: EmptyPolicy::Fallback,
            taxonomy: Taxonomy::default(),
            naver_queries: taxonomy::default_naver_queries(),
            naver_page_size: 10,
            rss_feeds: taxonomy::default_rss_feeds(),
            http: HttpSettings::default(),
            liveness: LivenessSettings::default(),
            retry: RetryPolicy::default(),
        }
    }

    /// Validate the CLI and build the run configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingApiKey`] when no OpenAI key is given outside
    /// demo mode; date, offset and taxonomy-file problems are also fatal.
    #[instrument(level = "info", skip_all)]
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = Config::new(&cli.output_dir);
        config.demo = cli.demo;
        config.empty_policy = cli.empty_policy;

        config.utc_offset = cli
            .utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or(ConfigError::InvalidOffset(cli.utc_offset_hours))?;

        if let Some(raw) = non_empty(&cli.date) {
            let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .map_err(|_| ConfigError::InvalidDate(raw.clone()))?;
            config.target_date = Some(date);
        }

        match non_empty(&cli.openai_api_key) {
            Some(api_key) => {
                config.openai = Some(OpenAiSettings {
                    api_key,
                    base_url: cli.openai_base_url.trim_end_matches('/').to_string(),
                    model: cli.model.clone(),
                    temperature: DEFAULT_TEMPERATURE,
                    max_tokens: DEFAULT_MAX_TOKENS,
                    timeout: Duration::from_secs(cli.completion_timeout_secs.max(1)),
                });
            }
            None if !cli.demo => return Err(ConfigError::MissingApiKey),
            None => {}
        }

        if let (Some(client_id), Some(client_secret)) = (
            non_empty(&cli.naver_client_id),
            non_empty(&cli.naver_client_secret),
        ) {
            config.naver = Some(NaverCredentials {
                client_id,
                client_secret,
            });
        }

        if let Some(path) = &cli.taxonomy {
            config.apply_taxonomy_file(Path::new(path))?;
        }

        info!(
            demo = config.demo,
            naver = config.naver.is_some(),
            rss_feeds = config.rss_feeds.len(),
            output_dir = %config.output_dir.display(),
            "Configuration loaded"
        );
        Ok(config)
    }

    fn apply_taxonomy_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::TaxonomyIo {
            path: path.to_path_buf(),
            source,
        })?;
        let file: TaxonomyFile =
            serde_yaml::from_str(&raw).map_err(|source| ConfigError::TaxonomyYaml {
                path: path.to_path_buf(),
                source,
            })?;

        self.taxonomy.apply(&file.categories);
        if let Some(queries) = file.naver_queries {
            self.naver_queries = queries;
        }
        if let Some(feeds) = file.rss_feeds {
            self.rss_feeds = feeds;
        }
        info!(path = %path.display(), "Applied taxonomy file");
        Ok(())
    }
}

/// Per-run values derived once at start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub center_date: NaiveDate,
    pub output_path: PathBuf,
}

impl RunContext {
    /// Center date is the override if present, else `now` in the configured offset.
    pub fn resolve(config: &Config, now: DateTime<Utc>) -> Self {
        let center_date = config
            .target_date
            .unwrap_or_else(|| now.with_timezone(&config.utc_offset).date_naive());
        let output_path = config
            .output_dir
            .join(format!("{}.json", center_date.format("%Y-%m-%d")));
        Self {
            center_date,
            output_path,
        }
    }
}
