use chrono::{DateTime, Utc};
use common::ScoringConfig;
use std::cmp::Ordering;

use crate::article::{Article, RawArticle};

/// Minimum field lengths (in characters) for an article to be usable.
/// Boundaries are inclusive: a 300-character content passes.
const MIN_TITLE_CHARS: usize = 10;
const MIN_CONTENT_CHARS: usize = 300;
const MIN_URL_CHARS: usize = 10;
const MIN_PUBLISHED_CHARS: usize = 10;

/// Content length at which the length sub-score saturates at 1.0.
const CONTENT_SATURATION_CHARS: f64 = 2000.0;
const DAY_SECONDS: f64 = 86_400.0;

const SOURCE_WEIGHT_FACTOR: f64 = 0.5;
const CONTENT_WEIGHT_FACTOR: f64 = 0.3;
const TIME_WEIGHT_FACTOR: f64 = 0.2;

/// Convert a raw upstream article into a validated `Article`.
///
/// Returns `None` for expected upstream noise: missing fields, fields below
/// their minimum length, or a timestamp that does not parse as ISO-8601.
/// Rejections are silent; they are not errors.
pub fn validate(raw: RawArticle) -> Option<Article> {
    let title = raw.title.filter(|s| s.chars().count() >= MIN_TITLE_CHARS)?;
    let content = raw
        .content
        .filter(|s| s.chars().count() >= MIN_CONTENT_CHARS)?;
    let url = raw.url.filter(|s| s.chars().count() >= MIN_URL_CHARS)?;
    let published_raw = raw
        .published_at
        .filter(|s| s.chars().count() >= MIN_PUBLISHED_CHARS)?;
    let published_at = DateTime::parse_from_rfc3339(&published_raw)
        .ok()?
        .with_timezone(&Utc);

    Some(Article {
        title,
        content,
        url,
        published_at,
        source_id: raw.source.id,
        source_name: raw.source.name.unwrap_or_default(),
        image_url: raw.url_to_image,
        score: None,
    })
}

/// Computes composite relevance scores and produces the ranked, capped list
/// the fetcher hands out.
pub struct Scorer {
    config: ScoringConfig,
    max_articles: usize,
}

impl Scorer {
    pub fn new(config: ScoringConfig, max_articles: usize) -> Self {
        Self {
            config,
            max_articles,
        }
    }

    /// Composite score at a fixed reference time. The freshness term is an
    /// unclamped linear decay: articles older than 24h push it negative,
    /// pulling the composite down without a floor.
    pub fn score_at(&self, article: &Article, now: DateTime<Utc>) -> f64 {
        let source_weight = article
            .source_id
            .as_deref()
            .and_then(|id| self.config.source_weights.get(id).copied())
            .unwrap_or(self.config.default_source_weight);

        let content_score =
            (article.content.chars().count() as f64 / CONTENT_SATURATION_CHARS).min(1.0);

        let age_seconds = (now - article.published_at).num_milliseconds() as f64 / 1000.0;
        let time_score = 1.0 - age_seconds / DAY_SECONDS;

        source_weight * SOURCE_WEIGHT_FACTOR
            + content_score * CONTENT_WEIGHT_FACTOR
            + time_score * TIME_WEIGHT_FACTOR
    }

    /// Validate, score, sort and cap a batch of raw upstream articles.
    ///
    /// Sort order: score descending, then `published_at` ascending as a total
    /// tie-break, so equal-scored articles always come out in the same order.
    pub fn rank_at(&self, raw: Vec<RawArticle>, now: DateTime<Utc>) -> Vec<Article> {
        let mut articles: Vec<Article> = raw
            .into_iter()
            .filter_map(validate)
            .map(|mut article| {
                article.score = Some(self.score_at(&article, now));
                article
            })
            .collect();

        sort_articles(&mut articles);
        articles.truncate(self.max_articles);
        articles
    }

    pub fn rank(&self, raw: Vec<RawArticle>) -> Vec<Article> {
        self.rank_at(raw, Utc::now())
    }
}

/// Score descending, then `published_at` ascending. The secondary key makes
/// the order total for distinct articles, so equal scores never leave the
/// result order unspecified.
fn sort_articles(articles: &mut [Article]) {
    articles.sort_by(|a, b| {
        let sa = a.score.unwrap_or(0.0);
        let sb = b.score.unwrap_or(0.0);
        sb.partial_cmp(&sa)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.published_at.cmp(&b.published_at))
    });
}
