//! Single-run crawl behaviour: gating, budget, failures, persistence

use crate::support::{page, FailingSink, RecordingSink, TestSite};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_single_page_discovers_one_link() {
    let site = TestSite::start().await;
    site.mount_robots("User-agent: *\nAllow: /").await;
    site.mount_page(
        "/a",
        page("A", &[site.url("/b#frag"), "http://other.com/c".to_string()]),
        1,
    )
    .await;
    // Discovered links wait for the next run
    site.mount_page("/b", page("B", &[]), 0).await;
    site.write_seeds(&[site.url("/a")]);

    let sink = RecordingSink::default();
    let summary = site.engine(5, &sink).run().await.unwrap();

    assert_eq!(summary.pages_fetched, 1);
    assert_eq!(summary.links_found, 1);
    assert!(summary.failed_urls.is_empty());
    assert_eq!(summary.frontier_size, 1);
    assert_eq!(summary.visited_total, 1);
    assert_eq!(summary.pages[0].title, "A");

    assert_eq!(site.visited(), vec![site.url("/a")]);
    assert_eq!(site.pending(), vec![site.url("/b")]);
    assert_eq!(sink.count(), 1);
}

#[tokio::test]
async fn test_robots_denial_marks_visited_without_fetching() {
    let site = TestSite::start().await;
    site.mount_robots("User-agent: *\nDisallow: /private").await;
    site.mount_page("/private/page", page("Secret", &[]), 0).await;
    site.mount_page("/public", page("Public", &[]), 1).await;
    site.write_seeds(&[site.url("/private/page"), site.url("/public")]);

    let sink = RecordingSink::default();
    let summary = site.engine(5, &sink).run().await.unwrap();

    assert_eq!(summary.pages_fetched, 1);
    assert_eq!(summary.robots_denied, 1);

    let visited = site.visited();
    assert!(visited.contains(&site.url("/private/page")));
    assert!(visited.contains(&site.url("/public")));
    assert!(site.pending().is_empty());
}

#[tokio::test]
async fn test_robots_for_named_agent() {
    let site = TestSite::start().await;
    site.mount_robots("User-agent: TestSpider\nDisallow: /\n\nUser-agent: *\nAllow: /")
        .await;
    site.mount_page("/a", page("A", &[]), 0).await;
    site.write_seeds(&[site.url("/a")]);

    let sink = RecordingSink::default();
    let summary = site.engine(5, &sink).run().await.unwrap();

    assert_eq!(summary.pages_fetched, 0);
    assert_eq!(summary.robots_denied, 1);
    assert_eq!(site.visited(), vec![site.url("/a")]);
}

#[tokio::test]
async fn test_unreachable_robots_fails_open_once_per_host() {
    let site = TestSite::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&site.server)
        .await;
    site.mount_page("/one", page("One", &[]), 1).await;
    site.mount_page("/two", page("Two", &[]), 1).await;
    site.write_seeds(&[site.url("/one"), site.url("/two")]);

    let sink = RecordingSink::default();
    let summary = site.engine(5, &sink).run().await.unwrap();

    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.robots_denied, 0);
}

#[tokio::test]
async fn test_budget_counts_failed_attempts() {
    let site = TestSite::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&site.server)
        .await;
    site.mount_page("/ok1", page("Ok1", &[]), 1).await;
    site.mount_page("/ok2", page("Ok2", &[]), 0).await;
    site.write_seeds(&[site.url("/broken"), site.url("/ok1"), site.url("/ok2")]);

    let sink = RecordingSink::default();
    let summary = site.engine(2, &sink).run().await.unwrap();

    assert_eq!(summary.pages_fetched, 1);
    assert_eq!(summary.failed_urls, vec![site.url("/broken")]);
    assert_eq!(summary.fetch_attempts(), 2);

    // The failure is isolated: not visited, not re-queued
    assert_eq!(site.visited(), vec![site.url("/ok1")]);
    assert_eq!(site.pending(), vec![site.url("/ok2")]);
}

#[tokio::test]
async fn test_gated_urls_do_not_consume_budget() {
    let site = TestSite::start().await;
    site.mount_page("/a", page("A", &[]), 1).await;
    site.write_pending(&[
        "http://other.com/x".to_string(),
        "not a url".to_string(),
        site.url("/a"),
    ]);

    let sink = RecordingSink::default();
    let summary = site.engine(1, &sink).run().await.unwrap();

    assert_eq!(summary.pages_fetched, 1);
    assert!(summary.failed_urls.is_empty());
    assert_eq!(site.visited(), vec![site.url("/a")]);
    // Dequeued entries that failed the domain gate are consumed
    assert!(site.pending().is_empty());
}

#[tokio::test]
async fn test_pending_has_no_canonical_duplicates() {
    let site = TestSite::start().await;
    site.mount_page(
        "/a",
        page(
            "A",
            &[
                site.url("/c"),
                site.url("/c#section"),
                site.url("/c?ref=nav"),
                site.url("/d"),
                site.url("/a"),
            ],
        ),
        1,
    )
    .await;
    site.mount_page("/c", page("C", &[]), 0).await;
    site.write_seeds(&[site.url("/a"), site.url("/c")]);

    let sink = RecordingSink::default();
    let summary = site.engine(1, &sink).run().await.unwrap();

    assert_eq!(summary.pages_fetched, 1);
    // c, d and the self-link were new at discovery time
    assert_eq!(summary.links_found, 3);
    assert_eq!(site.pending(), vec![site.url("/c"), site.url("/d")]);
}

#[tokio::test]
async fn test_empty_run_skips_report() {
    let site = TestSite::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&site.server)
        .await;
    site.write_seeds(&[site.url("/gone")]);

    let sink = RecordingSink::default();
    let summary = site.engine(5, &sink).run().await.unwrap();

    assert_eq!(summary.pages_fetched, 0);
    assert_eq!(summary.fetch_failures(), 1);
    assert_eq!(sink.count(), 0);
    // The frontier is still persisted
    assert!(site.state_path("visited.txt").exists());
    assert!(site.state_path("pending.txt").exists());
}

#[tokio::test]
async fn test_report_failure_does_not_fail_run() {
    let site = TestSite::start().await;
    site.mount_page("/a", page("A", &[site.url("/b")]), 1).await;
    site.write_seeds(&[site.url("/a")]);

    let mut engine = polite_spider::CrawlEngine::new(site.config(5))
        .unwrap()
        .with_sink(Box::new(FailingSink));
    let summary = engine.run().await.unwrap();

    assert_eq!(summary.pages_fetched, 1);
    assert_eq!(site.visited(), vec![site.url("/a")]);
    assert_eq!(site.pending(), vec![site.url("/b")]);
}

#[tokio::test]
async fn test_persistence_failure_is_fatal_and_leaves_state() {
    let site = TestSite::start().await;
    site.mount_page("/a", page("A", &[site.url("/b")]), 1).await;
    site.write_pending(&[site.url("/a")]);
    // A directory where the pending temp file must go makes the save fail
    std::fs::create_dir(site.state_path("pending.txt.tmp")).unwrap();

    let sink = RecordingSink::default();
    let result = site.engine(5, &sink).run().await;

    assert!(result.is_err());
    assert_eq!(sink.count(), 0);
    assert!(!site.state_path("visited.txt").exists());
    assert!(!site.state_path("visited.txt.tmp").exists());
    assert_eq!(site.pending(), vec![site.url("/a")]);
}

#[tokio::test]
async fn test_html_snapshots_written_when_configured() {
    let site = TestSite::start().await;
    site.mount_page("/a", page("A", &[]), 1).await;
    site.write_seeds(&[site.url("/a")]);

    let mut config = site.config(5);
    let data_dir = site.state_path("data");
    config.output.data_dir = Some(data_dir.clone());

    let sink = RecordingSink::default();
    let mut engine = polite_spider::CrawlEngine::new(config)
        .unwrap()
        .with_sink(Box::new(sink.clone()));
    engine.run().await.unwrap();

    let snapshot = data_dir.join(polite_spider::storage::snapshot_file_name(&site.url("/a")));
    let html = std::fs::read_to_string(snapshot).unwrap();
    assert!(html.contains("<title>A</title>"));
}

#[tokio::test]
async fn test_delay_follows_every_attempt_but_the_last() {
    let site = TestSite::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&site.server)
        .await;
    site.mount_page("/a", page("A", &[]), 1).await;
    site.mount_page("/b", page("B", &[]), 1).await;
    site.write_seeds(&[site.url("/broken"), site.url("/a"), site.url("/b")]);

    let sink = RecordingSink::default();
    let mut engine = polite_spider::CrawlEngine::new(site.config_with_delay(5, 400))
        .unwrap()
        .with_sink(Box::new(sink.clone()));

    let started = Instant::now();
    let summary = engine.run().await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(summary.fetch_attempts(), 3);
    // One pause after the failed fetch, one after /a, none after /b
    assert!(elapsed >= Duration::from_millis(800), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(1200), "elapsed {:?}", elapsed);
}

#[tokio::test]
async fn test_no_delay_when_budget_is_spent() {
    let site = TestSite::start().await;
    site.mount_page("/a", page("A", &[]), 1).await;
    site.mount_page("/b", page("B", &[]), 0).await;
    site.write_seeds(&[site.url("/a"), site.url("/b")]);

    let sink = RecordingSink::default();
    let mut engine = polite_spider::CrawlEngine::new(site.config_with_delay(1, 400))
        .unwrap()
        .with_sink(Box::new(sink.clone()));

    let started = Instant::now();
    engine.run().await.unwrap();

    assert!(started.elapsed() < Duration::from_millis(400));
    assert_eq!(site.pending(), vec![site.url("/b")]);
}
