use anyhow::{Context, Result};
use common::Config;
use rand::Rng;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::article::{Article, QueryParams, RawArticle, SearchResponse};
use crate::cache::TtlCache;
use crate::scoring::Scorer;

/// Fetches articles from the upstream search endpoint.
///
/// Owns the single shared HTTP client, the result cache and the scorer.
/// `fetch` degrades gracefully: callers always receive a list, never an
/// error, so a dead upstream turns into an empty digest instead of a crash.
pub struct NewsFetcher {
    base_url: String,
    api_key: String,
    client: Client,
    cache: TtlCache<Vec<Article>>,
    scorer: Scorer,
    max_attempts: u32,
    backoff_base: Duration,
    backoff_cap: Duration,
}

impl NewsFetcher {
    pub fn new(config: &Config, api_key: String) -> Result<Self> {
        // one client for the process lifetime; reconnecting per request would
        // defeat connection reuse across retries and fetches
        let client = Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_seconds))
            .user_agent(concat!("newsbrief/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self {
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
            cache: TtlCache::new(Duration::from_secs(config.cache.ttl_seconds)),
            scorer: Scorer::new(config.scoring.clone(), config.fetch.max_articles),
            max_attempts: config.fetch.max_attempts.max(1),
            backoff_base: Duration::from_secs(config.fetch.backoff_base_seconds),
            backoff_cap: Duration::from_secs(config.fetch.backoff_cap_seconds),
        })
    }

    /// Fetch, validate, score, sort and cap articles for `params`.
    ///
    /// Served from the cache when a fresh entry exists; otherwise queried
    /// upstream with retries. After the retry budget is exhausted the failure
    /// is logged and an empty list is returned. Exactly one cache write
    /// happens per successful upstream fetch, none on hit or failure.
    pub async fn fetch(&self, params: &QueryParams) -> Vec<Article> {
        let key = params.cache_key();
        if let Some(articles) = self.cache.get(&key).await {
            debug!(articles = articles.len(), "serving articles from cache");
            return articles;
        }
        debug!(language = %params.language, "cache miss, querying upstream");

        match self.fetch_upstream(params).await {
            Ok(raw) => {
                let articles = self.scorer.rank(raw);
                self.cache.put(&key, articles.clone()).await;
                info!(articles = articles.len(), "fetched and ranked articles");
                articles
            }
            Err(e) => {
                error!(error = %e, "news fetch failed after retries, returning empty list");
                Vec::new()
            }
        }
    }

    async fn fetch_upstream(&self, params: &QueryParams) -> Result<Vec<RawArticle>> {
        let url = format!("{}/everything", self.base_url);
        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            if attempt > 1 {
                let delay = self.backoff_for(attempt - 1);
                info!(
                    attempt,
                    max = self.max_attempts,
                    ?delay,
                    "retrying news fetch"
                );
                tokio::time::sleep(delay + jitter(delay)).await;
            }

            match self.try_fetch(&url, params).await {
                Ok(raw) => return Ok(raw),
                Err(e) => {
                    warn!(attempt, error = %e, "news fetch attempt failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("unknown error after retries")))
    }

    async fn try_fetch(&self, url: &str, params: &QueryParams) -> Result<Vec<RawArticle>> {
        let response = self
            .client
            .get(url)
            .header("X-Api-Key", &self.api_key)
            .query(&params.to_query())
            .send()
            .await
            .context("network error during news fetch")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("search endpoint returned status {status}");
        }

        let body: SearchResponse = response
            .json()
            .await
            .context("failed to decode search response")?;
        Ok(body.articles)
    }

    /// Backoff before the n-th retry: base * 2^(n-1), capped.
    fn backoff_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.backoff_base.saturating_mul(factor).min(self.backoff_cap)
    }
}

fn jitter(delay: Duration) -> Duration {
    let cap = (delay.as_millis() / 4) as u64;
    if cap == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::thread_rng().gen_range(0..=cap))
}
