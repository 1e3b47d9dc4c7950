use common::Config;
use serde::Serialize;
use tracing::info;

use crate::article::{Article, QueryParams};
use crate::fetcher::NewsFetcher;
use crate::summarize::{Language, Summarizer};

/// One ready-to-deliver article with its extractive summary.
#[derive(Debug, Clone, Serialize)]
pub struct DigestItem {
    pub article: Article,
    pub summary: String,
}

/// Outcome of a digest request. `NoContent` is a normal result, not an
/// error: the transport layer renders it as a "no news found" message.
#[derive(Debug, Clone, Serialize)]
pub enum Digest {
    NoContent,
    Items(Vec<DigestItem>),
}

/// Composes the fetcher and the summarizer into (article, summary) pairs.
/// This is the seam the transport layer consumes.
pub struct Pipeline {
    fetcher: NewsFetcher,
    summarizer: Summarizer,
    query_terms: String,
    exclude_domains: Vec<String>,
    sort_by: String,
    page_size: usize,
}

impl Pipeline {
    pub fn new(config: &Config, fetcher: NewsFetcher, summarizer: Summarizer) -> Self {
        Self {
            fetcher,
            summarizer,
            query_terms: config.query.terms.clone(),
            exclude_domains: config.query.exclude_domains.clone(),
            sort_by: config.query.sort_by.clone(),
            page_size: config.fetch.max_articles,
        }
    }

    /// The fixed query shape for one digest language.
    pub fn query_params(&self, language: Language) -> QueryParams {
        QueryParams {
            language,
            sort_by: self.sort_by.clone(),
            page_size: self.page_size,
            query: self.query_terms.clone(),
            exclude_domains: self.exclude_domains.clone(),
        }
    }

    /// Produce the digest for one language: fetch, then summarize each
    /// article in the fetcher's sort order.
    pub async fn digest(&self, language: Language) -> Digest {
        let params = self.query_params(language);
        let articles = self.fetcher.fetch(&params).await;

        if articles.is_empty() {
            info!(language = %language, "no articles available for digest");
            return Digest::NoContent;
        }

        let items: Vec<DigestItem> = articles
            .into_iter()
            .map(|article| {
                let summary = self.summarizer.summarize(&article.content, language);
                DigestItem { article, summary }
            })
            .collect();
        Digest::Items(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Config;
    use crate::fetcher::NewsFetcher;

    #[test]
    fn query_params_follow_the_configured_shape() {
        let config = Config::default();
        let fetcher = NewsFetcher::new(&config, "k".to_string()).expect("fetcher");
        let pipeline = Pipeline::new(&config, fetcher, Summarizer::new(3));

        let params = pipeline.query_params(Language::De);
        assert_eq!(params.language, Language::De);
        assert_eq!(params.page_size, 15);
        assert_eq!(params.sort_by, "publishedAt");
        assert_eq!(params.query, "news NOT sport NOT entertainment");
        assert_eq!(
            params.exclude_domains,
            vec!["twitter.com".to_string(), "facebook.com".to_string()]
        );
    }
}
