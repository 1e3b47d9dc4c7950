use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::summarize::Language;

/// A validated news article, ready for ranking and delivery.
/// `score` is absent until the scorer assigns it; once set, the article is
/// treated as immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub content: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub source_id: Option<String>,
    pub source_name: String,
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Article as the upstream search endpoint delivers it. Every field is
/// optional: nulls, missing keys and short values are routine upstream noise
/// and must not fail response decoding. Validation decides per article.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    #[serde(default)]
    pub source: RawSource,
    pub title: Option<String>,
    pub content: Option<String>,
    pub url: Option<String>,
    pub published_at: Option<String>,
    pub url_to_image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSource {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Response envelope of the "everything" search endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub articles: Vec<RawArticle>,
}

/// Parameters for one upstream search.
#[derive(Debug, Clone)]
pub struct QueryParams {
    pub language: Language,
    pub sort_by: String,
    pub page_size: usize,
    pub query: String,
    pub exclude_domains: Vec<String>,
}

impl QueryParams {
    /// Canonical cache key: the parameters rendered as sorted-field JSON.
    /// Two parameter sets that serialize to the same values share a key
    /// regardless of field or insertion order.
    pub fn cache_key(&self) -> String {
        let mut fields = BTreeMap::new();
        fields.insert("excludeDomains", self.exclude_domains.join(","));
        fields.insert("language", self.language.code().to_string());
        fields.insert("pageSize", self.page_size.to_string());
        fields.insert("q", self.query.clone());
        fields.insert("sortBy", self.sort_by.clone());
        serde_json::to_string(&fields).unwrap_or_default()
    }

    /// Key/value pairs for the HTTP query string.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("language", self.language.code().to_string()),
            ("sortBy", self.sort_by.clone()),
            ("pageSize", self.page_size.to_string()),
            ("q", self.query.clone()),
            ("excludeDomains", self.exclude_domains.join(",")),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> QueryParams {
        QueryParams {
            language: Language::De,
            sort_by: "publishedAt".to_string(),
            page_size: 15,
            query: "news NOT sport".to_string(),
            exclude_domains: vec!["twitter.com".to_string(), "facebook.com".to_string()],
        }
    }

    #[test]
    fn cache_key_is_canonical() {
        // the key must not depend on how the map was populated, only on values
        let key = params().cache_key();
        let expected: BTreeMap<&str, String> = [
            ("sortBy", "publishedAt".to_string()),
            ("language", "de".to_string()),
            ("q", "news NOT sport".to_string()),
            ("excludeDomains", "twitter.com,facebook.com".to_string()),
            ("pageSize", "15".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(key, serde_json::to_string(&expected).unwrap());
    }

    #[test]
    fn equal_params_share_a_key_different_params_do_not() {
        let a = params();
        let b = params();
        assert_eq!(a.cache_key(), b.cache_key());

        let mut c = params();
        c.language = Language::En;
        assert_ne!(a.cache_key(), c.cache_key());
    }

    #[test]
    fn raw_article_decodes_with_missing_fields() {
        let json = r#"{"source": {"id": null, "name": "Example"}, "title": "t"}"#;
        let raw: RawArticle = serde_json::from_str(json).expect("decode");
        assert_eq!(raw.title.as_deref(), Some("t"));
        assert!(raw.content.is_none());
        assert!(raw.source.id.is_none());
        assert_eq!(raw.source.name.as_deref(), Some("Example"));
    }
}
