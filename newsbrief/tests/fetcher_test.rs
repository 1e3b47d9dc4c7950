use chrono::{Duration, Utc};
use common::Config;
use newsbrief::article::QueryParams;
use newsbrief::fetcher::NewsFetcher;
use newsbrief::summarize::Language;
use serde_json::{json, Value};

fn test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.api.base_url = base_url.to_string();
    // no real waiting between retry attempts in tests
    config.fetch.backoff_base_seconds = 0;
    config.fetch.backoff_cap_seconds = 0;
    config
}

fn params() -> QueryParams {
    QueryParams {
        language: Language::En,
        sort_by: "publishedAt".to_string(),
        page_size: 15,
        query: "news NOT sport NOT entertainment".to_string(),
        exclude_domains: vec!["twitter.com".to_string()],
    }
}

fn article_json(title: &str, content_len: usize, minutes_old: i64, source_id: &str) -> Value {
    json!({
        "source": { "id": source_id, "name": "Example News" },
        "title": title,
        "content": "x".repeat(content_len),
        "url": "https://example.org/some/article/path",
        "publishedAt": (Utc::now() - Duration::minutes(minutes_old)).to_rfc3339(),
        "urlToImage": null
    })
}

fn search_body(articles: Vec<Value>) -> String {
    json!({
        "status": "ok",
        "totalResults": articles.len(),
        "articles": articles
    })
    .to_string()
}

#[tokio::test]
async fn fetch_ranks_caps_and_serves_repeat_from_cache() {
    let mut server = mockito::Server::new_async().await;

    let articles: Vec<Value> = (0..20)
        .map(|i| article_json(&format!("article number {i}"), 400, i, "example"))
        .collect();

    let mock = server
        .mock("GET", "/everything")
        .match_query(mockito::Matcher::Any)
        .match_header("x-api-key", "test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(search_body(articles))
        .expect(1)
        .create_async()
        .await;

    let fetcher = NewsFetcher::new(&test_config(&server.url()), "test-key".to_string())
        .expect("build fetcher");

    let first = fetcher.fetch(&params()).await;
    assert_eq!(first.len(), 15, "output is capped at max_articles");
    assert!(first.iter().all(|a| a.score.is_some()));

    // identical params immediately after: served from cache, no second call
    let second = fetcher.fetch(&params()).await;
    assert_eq!(second.len(), first.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.title, b.title);
        assert_eq!(a.score, b.score);
    }

    mock.assert_async().await;
}

#[tokio::test]
async fn fetch_output_is_sorted_by_score_descending() {
    let mut server = mockito::Server::new_async().await;

    // same age and length, so the source weight decides the order
    let articles = vec![
        article_json("unknown source article", 800, 30, "some-blog"),
        article_json("top weighted article!", 800, 30, "spiegel-online"),
        article_json("mid weighted article!", 800, 30, "reuters"),
    ];

    let _mock = server
        .mock("GET", "/everything")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(search_body(articles))
        .create_async()
        .await;

    let fetcher = NewsFetcher::new(&test_config(&server.url()), "test-key".to_string())
        .expect("build fetcher");

    let result = fetcher.fetch(&params()).await;
    let titles: Vec<&str> = result.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "top weighted article!",
            "mid weighted article!",
            "unknown source article",
        ]
    );
    let scores: Vec<f64> = result.iter().map(|a| a.score.unwrap()).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn invalid_articles_are_dropped_at_the_boundary() {
    let mut server = mockito::Server::new_async().await;

    let articles = vec![
        article_json("content too short!", 299, 5, "example"),
        article_json("content just long enough", 300, 5, "example"),
        json!({
            "source": { "id": null, "name": null },
            "title": null,
            "content": "x".repeat(400),
            "url": "https://example.org/no-title",
            "publishedAt": Utc::now().to_rfc3339(),
        }),
    ];

    let _mock = server
        .mock("GET", "/everything")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(search_body(articles))
        .create_async()
        .await;

    let fetcher = NewsFetcher::new(&test_config(&server.url()), "test-key".to_string())
        .expect("build fetcher");

    let result = fetcher.fetch(&params()).await;
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].title, "content just long enough");
}

#[tokio::test]
async fn upstream_failure_is_retried_then_degrades_to_empty() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/everything")
        .match_query(mockito::Matcher::Any)
        .with_status(500)
        .with_body("upstream exploded")
        .expect(3)
        .create_async()
        .await;

    let fetcher = NewsFetcher::new(&test_config(&server.url()), "test-key".to_string())
        .expect("build fetcher");

    let result = fetcher.fetch(&params()).await;
    assert!(result.is_empty(), "failure degrades to an empty list");

    mock.assert_async().await;
}

#[tokio::test]
async fn failures_are_not_cached() {
    let mut server = mockito::Server::new_async().await;

    // two fetches, three attempts each: a failed fetch must not leave a
    // cache entry behind that would swallow the second fetch
    let mock = server
        .mock("GET", "/everything")
        .match_query(mockito::Matcher::Any)
        .with_status(503)
        .expect(6)
        .create_async()
        .await;

    let fetcher = NewsFetcher::new(&test_config(&server.url()), "test-key".to_string())
        .expect("build fetcher");

    assert!(fetcher.fetch(&params()).await.is_empty());
    assert!(fetcher.fetch(&params()).await.is_empty());

    mock.assert_async().await;
}

#[tokio::test]
async fn malformed_response_body_degrades_to_empty() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/everything")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{ this is not json")
        .create_async()
        .await;

    let fetcher = NewsFetcher::new(&test_config(&server.url()), "test-key".to_string())
        .expect("build fetcher");

    assert!(fetcher.fetch(&params()).await.is_empty());
}

/// Live smoke test against the real API; requires NEWS_API_KEY in the
/// environment (or a .env file) and network access.
#[tokio::test]
#[ignore]
async fn live_fetch_smoke_test() {
    dotenv::dotenv().ok();
    let config = Config::default();
    let Ok(api_key) = config.api_key() else {
        eprintln!("NEWS_API_KEY not set, skipping live test");
        return;
    };

    let fetcher = NewsFetcher::new(&config, api_key).expect("build fetcher");
    let result = fetcher.fetch(&params()).await;
    assert!(result.len() <= 15);
}
