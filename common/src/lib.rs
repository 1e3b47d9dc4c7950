/*!
common/src/lib.rs

Shared configuration types for Newsbrief.

This file provides:
- Config data structures (deserialized from TOML)
- An async loader for a TOML config file
- Built-in defaults matching the stock deployment, so a missing or partial
  config file still yields a fully usable configuration
*/

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Upstream news API configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the news search API (e.g. "https://newsapi.org/v2/")
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    /// The key itself is never stored in the config file.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Total per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Result cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Seconds a cached result set stays valid
    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_seconds: default_cache_ttl() }
    }
}

/// Fetching and retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Upper bound on the number of articles returned per fetch
    #[serde(default = "default_max_articles")]
    pub max_articles: usize,
    /// Total upstream attempts per fetch (first try included)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Backoff before the first retry, doubling afterwards
    #[serde(default = "default_backoff_base")]
    pub backoff_base_seconds: u64,
    /// Ceiling for the exponential backoff
    #[serde(default = "default_backoff_cap")]
    pub backoff_cap_seconds: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_articles: default_max_articles(),
            max_attempts: default_max_attempts(),
            backoff_base_seconds: default_backoff_base(),
            backoff_cap_seconds: default_backoff_cap(),
        }
    }
}

/// Summarization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Number of sentences per digest summary
    #[serde(default = "default_summary_sentences")]
    pub sentences: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self { sentences: default_summary_sentences() }
    }
}

/// Fixed parts of the upstream search query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Free-text search terms, including topic exclusions
    #[serde(default = "default_query_terms")]
    pub terms: String,
    /// Domains excluded from results
    #[serde(default = "default_exclude_domains")]
    pub exclude_domains: Vec<String>,
    /// Upstream sort mode
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            terms: default_query_terms(),
            exclude_domains: default_exclude_domains(),
            sort_by: default_sort_by(),
        }
    }
}

/// Source-trust weights used by the article scorer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Weight applied to sources not listed in `source_weights`
    #[serde(default = "default_source_weight")]
    pub default_source_weight: f64,
    /// Per-source weight in [0, 1], keyed by upstream source id
    #[serde(default = "default_source_weights")]
    pub source_weights: HashMap<String, f64>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            default_source_weight: default_source_weight(),
            source_weights: default_source_weights(),
        }
    }
}

/// Top-level application configuration (deserialized from config.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub summary: SummaryConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl Config {
    /// Load configuration from a TOML file asynchronously.
    ///
    /// Example:
    ///   let cfg = Config::from_file("config.toml").await?;
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = tokio::fs::read_to_string(path.as_ref())
            .await
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let cfg: Config = toml::from_str(&data).context("Failed to parse TOML configuration")?;
        Ok(cfg)
    }

    /// Load from an optional path, falling back to built-in defaults when no
    /// file is given. A given-but-unreadable path is an error, not a fallback.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p).await,
            None => Ok(Self::default()),
        }
    }

    /// Resolve the upstream API key from the configured environment variable.
    /// A missing key is a setup defect and surfaces as a fatal error.
    pub fn api_key(&self) -> Result<String> {
        std::env::var(&self.api.api_key_env)
            .with_context(|| format!("news API key env var '{}' not set", self.api.api_key_env))
    }
}

fn default_base_url() -> String {
    "https://newsapi.org/v2/".to_string()
}

fn default_api_key_env() -> String {
    "NEWS_API_KEY".to_string()
}

fn default_timeout_seconds() -> u64 {
    15
}

fn default_cache_ttl() -> u64 {
    300
}

fn default_max_articles() -> usize {
    15
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_base() -> u64 {
    2
}

fn default_backoff_cap() -> u64 {
    10
}

fn default_summary_sentences() -> usize {
    3
}

fn default_query_terms() -> String {
    "news NOT sport NOT entertainment".to_string()
}

fn default_exclude_domains() -> Vec<String> {
    vec!["twitter.com".to_string(), "facebook.com".to_string()]
}

fn default_sort_by() -> String {
    "publishedAt".to_string()
}

fn default_source_weight() -> f64 {
    0.7
}

fn default_source_weights() -> HashMap<String, f64> {
    HashMap::from([
        ("spiegel-online".to_string(), 1.0),
        ("tagesschau".to_string(), 0.95),
        ("zeit".to_string(), 0.9),
        ("reuters".to_string(), 0.85),
        ("the-washington-post".to_string(), 0.8),
    ])
}
