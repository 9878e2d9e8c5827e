//! Integration tests for the crawl engine
//!
//! These tests use wiremock mock servers to exercise the full pipeline
//! end-to-end: policy gates, claims, fetch, extraction, persistence, and
//! seen-set updates.

use std::sync::Arc;
use std::time::{Duration, Instant};
use webharvest::config::{
    Config, CrawlerConfig, PolicyConfig, SeenConfig, UserAgentConfig,
};
use webharvest::crawler::{Coordinator, CrawlFailure, CrawlResult, CrawlTarget, Frontier, SkipReason};
use webharvest::seen::{MemorySeenSet, SeenSet};
use webharvest::sink::MemorySink;
use webharvest::url::Fingerprint;
use webharvest::canonicalize_url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration
fn test_config(blocked: Vec<&str>, respect_robots: bool) -> Config {
    Config {
        crawler: CrawlerConfig {
            workers: 4,
            fetch_timeout_ms: 2_000,
            max_redirects: 5,
            epoch_timeout_secs: None,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        policy: PolicyConfig {
            blocked_substrings: blocked.into_iter().map(String::from).collect(),
            blocked_domains: vec![],
            respect_robots,
        },
        seen: SeenConfig::default(),
        seeds: vec![],
    }
}

struct Harness {
    coordinator: Arc<Coordinator>,
    seen: Arc<MemorySeenSet>,
    sink: Arc<MemorySink>,
}

fn harness(config: &Config) -> Harness {
    let seen = Arc::new(MemorySeenSet::new());
    let sink = Arc::new(MemorySink::new());
    let coordinator = Arc::new(
        Coordinator::new(config, seen.clone(), sink.clone()).expect("Failed to build coordinator"),
    );
    Harness {
        coordinator,
        seen,
        sink,
    }
}

fn fingerprint_of(url: &str) -> Fingerprint {
    Fingerprint::of(&canonicalize_url(url).expect("Failed to canonicalize"))
}

#[tokio::test]
async fn test_full_pipeline_stores_normalized_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head>
                <title> Example Article </title>
                <meta name="keywords" content="rust, crawling, rust">
            </head><body>
                <p>First paragraph.</p>
                <script>var x = 1;</script>
                <p>Second paragraph.</p>
            </body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    let config = test_config(vec![], false);
    let h = harness(&config);

    let url = format!("{}/article", mock_server.uri());
    let result = h
        .coordinator
        .crawl(&CrawlTarget::new(&url))
        .await
        .unwrap();

    let document = result.document().expect("Expected a stored document");
    assert_eq!(document.title.as_deref(), Some("Example Article"));
    assert_eq!(document.keywords, vec!["rust", "crawling"]);
    assert_eq!(document.body, "First paragraph. Second paragraph.");
    assert!(!document.body.contains("var x"));

    assert_eq!(h.sink.len(), 1);
    assert!(h.seen.contains(&fingerprint_of(&url)).unwrap());
}

#[tokio::test]
async fn test_idempotence_second_crawl_skipped() {
    let mock_server = MockServer::start().await;

    // The page must be fetched exactly once across both attempts
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><head><title>Page</title></head></html>"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = test_config(vec![], false);
    let h = harness(&config);

    let url = format!("{}/page", mock_server.uri());

    let first = h.coordinator.crawl(&CrawlTarget::new(&url)).await.unwrap();
    assert!(first.is_stored());

    let second = h.coordinator.crawl(&CrawlTarget::new(&url)).await.unwrap();
    assert_eq!(second, CrawlResult::Skipped(SkipReason::AlreadySeen));

    assert_eq!(h.sink.len(), 1);
}

#[tokio::test]
async fn test_canonical_variants_deduplicated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>hi</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = test_config(vec![], false);
    let h = harness(&config);

    let base = mock_server.uri();

    let first = h
        .coordinator
        .crawl(&CrawlTarget::new(format!("{}/page", base)))
        .await
        .unwrap();
    assert!(first.is_stored());

    // Same page modulo fragment, trailing slash, and tracking params
    let second = h
        .coordinator
        .crawl(&CrawlTarget::new(format!(
            "{}/page/?utm_source=feed#section",
            base
        )))
        .await
        .unwrap();
    assert_eq!(second, CrawlResult::Skipped(SkipReason::AlreadySeen));
}

#[tokio::test]
async fn test_concurrent_crawls_persist_at_most_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/popular"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<p>content</p>")
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&mock_server)
        .await;

    let config = test_config(vec![], false);
    let h = harness(&config);

    let url = format!("{}/popular", mock_server.uri());

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..8 {
        let coordinator = h.coordinator.clone();
        let url = url.clone();
        tasks.spawn(async move { coordinator.crawl(&CrawlTarget::new(&url)).await.unwrap() });
    }

    let mut stored = 0;
    while let Some(result) = tasks.join_next().await {
        let result = result.unwrap();
        match result {
            CrawlResult::Stored(_) => stored += 1,
            CrawlResult::Skipped(SkipReason::InFlight)
            | CrawlResult::Skipped(SkipReason::AlreadySeen) => {}
            other => panic!("Unexpected outcome: {:?}", other),
        }
    }

    assert_eq!(stored, 1, "Exactly one worker should win the claim");
    assert_eq!(h.sink.len(), 1, "The sink must receive at most one store");
}

#[tokio::test]
async fn test_blocklisted_url_never_fetched() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ads/banner"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>ad</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = test_config(vec!["/ads/"], false);
    let h = harness(&config);

    let url = format!("{}/ads/banner", mock_server.uri());
    let result = h.coordinator.crawl(&CrawlTarget::new(&url)).await.unwrap();

    assert_eq!(result, CrawlResult::Skipped(SkipReason::PolicyRejected));
    assert!(h.sink.is_empty());
    // Wiremock verifies expect(0) when the server drops
}

#[tokio::test]
async fn test_robots_disallowed_url_never_fetched() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /admin"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/admin"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>secret</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/public"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>open</p>"))
        .mount(&mock_server)
        .await;

    let config = test_config(vec![], true);
    let h = harness(&config);

    let denied = h
        .coordinator
        .crawl(&CrawlTarget::new(format!("{}/admin", mock_server.uri())))
        .await
        .unwrap();
    assert_eq!(denied, CrawlResult::Skipped(SkipReason::PolicyRejected));

    let allowed = h
        .coordinator
        .crawl(&CrawlTarget::new(format!("{}/public", mock_server.uri())))
        .await
        .unwrap();
    assert!(allowed.is_stored());
}

#[tokio::test]
async fn test_http_error_is_retryable_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let config = test_config(vec![], false);
    let h = harness(&config);

    let url = format!("{}/missing", mock_server.uri());
    let result = h.coordinator.crawl(&CrawlTarget::new(&url)).await.unwrap();

    assert_eq!(result, CrawlResult::Failed(CrawlFailure::Http(404)));
    assert!(h.sink.is_empty());
    assert!(!h.seen.contains(&fingerprint_of(&url)).unwrap());
}

#[tokio::test]
async fn test_sink_failure_leaves_url_retryable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/doc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>payload</p>"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = test_config(vec![], false);
    let h = harness(&config);

    let url = format!("{}/doc", mock_server.uri());

    h.sink.fail_next_stores(true);
    let failed = h.coordinator.crawl(&CrawlTarget::new(&url)).await.unwrap();
    assert!(matches!(
        failed,
        CrawlResult::Failed(CrawlFailure::Sink(_))
    ));

    // Fingerprint absent from the seen-set, so a later pass can retry
    assert!(!h.seen.contains(&fingerprint_of(&url)).unwrap());

    h.sink.fail_next_stores(false);
    let retried = h.coordinator.crawl(&CrawlTarget::new(&url)).await.unwrap();
    assert!(retried.is_stored());
    assert_eq!(h.sink.len(), 1);
    assert!(h.seen.contains(&fingerprint_of(&url)).unwrap());
}

#[tokio::test]
async fn test_fetch_timeout_bounded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<p>late</p>")
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&mock_server)
        .await;

    let mut config = test_config(vec![], false);
    config.crawler.fetch_timeout_ms = 500;
    let h = harness(&config);

    let url = format!("{}/slow", mock_server.uri());
    let start = Instant::now();
    let result = h.coordinator.crawl(&CrawlTarget::new(&url)).await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(result, CrawlResult::Failed(CrawlFailure::Timeout));
    assert!(
        elapsed < Duration::from_secs(3),
        "Timeout took too long: {:?}",
        elapsed
    );
    assert!(!h.seen.contains(&fingerprint_of(&url)).unwrap());
}

#[tokio::test]
async fn test_redirect_loop_is_capped() {
    let mock_server = MockServer::start().await;

    // Self-referential redirect: an uncapped client would follow forever
    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/loop"))
        .mount(&mock_server)
        .await;

    let config = test_config(vec![], false);
    let h = harness(&config);

    let url = format!("{}/loop", mock_server.uri());
    let start = Instant::now();
    let result = h.coordinator.crawl(&CrawlTarget::new(&url)).await.unwrap();

    assert!(matches!(
        result,
        CrawlResult::Failed(CrawlFailure::Network(_))
    ));
    assert!(
        start.elapsed() < Duration::from_secs(3),
        "Redirect cap took too long: {:?}",
        start.elapsed()
    );
    assert!(h.sink.is_empty());
    assert!(!h.seen.contains(&fingerprint_of(&url)).unwrap());
}

#[tokio::test]
async fn test_empty_body_is_still_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&mock_server)
        .await;

    let config = test_config(vec![], false);
    let h = harness(&config);

    let url = format!("{}/empty", mock_server.uri());
    let result = h.coordinator.crawl(&CrawlTarget::new(&url)).await.unwrap();

    let document = result.document().expect("Empty body should still store");
    assert_eq!(document.title, None);
    assert!(document.keywords.is_empty());
    assert!(document.body.is_empty());
    assert!(h.seen.contains(&fingerprint_of(&url)).unwrap());
}

#[tokio::test]
async fn test_worker_pool_drains_frontier() {
    let mock_server = MockServer::start().await;

    for i in 0..5 {
        Mock::given(method("GET"))
            .and(path(format!("/page{}", i)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(format!("<title>Page {}</title><p>body {}</p>", i, i)),
            )
            .mount(&mock_server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = test_config(vec!["blocked-path"], false);
    let h = harness(&config);

    let frontier = Arc::new(Frontier::new());
    for i in 0..5 {
        frontier.push(CrawlTarget::new(format!("{}/page{}", mock_server.uri(), i)));
    }
    frontier.push(CrawlTarget::new(format!(
        "{}/missing",
        mock_server.uri()
    )));
    frontier.push(CrawlTarget::new(format!(
        "{}/blocked-path",
        mock_server.uri()
    )));

    let stats = h.coordinator.run(&frontier).await;

    assert!(frontier.is_empty());
    assert_eq!(stats.stored, 5);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.skipped, 1);
    assert_eq!(h.sink.len(), 5);
}

#[tokio::test]
async fn test_epoch_deadline_aborts_and_releases_claims() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/hang"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<p>late</p>")
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&mock_server)
        .await;

    let mut config = test_config(vec![], false);
    config.crawler.workers = 1;
    config.crawler.fetch_timeout_ms = 60_000;
    config.crawler.epoch_timeout_secs = Some(1);
    let h = harness(&config);

    let url = format!("{}/hang", mock_server.uri());
    let frontier = Arc::new(Frontier::new());
    frontier.push(CrawlTarget::new(&url));

    let start = Instant::now();
    let stats = h.coordinator.run(&frontier).await;
    assert!(start.elapsed() < Duration::from_secs(5));

    // The aborted fetch never stored anything and released its claim
    assert_eq!(stats.stored, 0);
    assert!(h.sink.is_empty());
    assert!(!h.seen.contains(&fingerprint_of(&url)).unwrap());
}
