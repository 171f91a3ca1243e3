//! Multi-run behaviour: resumption, seeding and visited monotonicity

use crate::support::{page, RecordingSink, TestSite};

#[tokio::test]
async fn test_second_run_resumes_from_pending() {
    let site = TestSite::start().await;
    site.mount_robots("User-agent: *\nAllow: /").await;
    site.mount_page("/a", page("A", &[site.url("/b")]), 1).await;
    site.mount_page("/b", page("B", &[site.url("/a"), site.url("/c")]), 1)
        .await;
    site.mount_page("/c", page("C", &[]), 1).await;
    site.write_seeds(&[site.url("/a")]);

    let sink = RecordingSink::default();

    let first = site.engine(5, &sink).run().await.unwrap();
    assert_eq!(first.pages_fetched, 1);
    let visited_after_first = site.visited();
    assert_eq!(site.pending(), vec![site.url("/b")]);

    let second = site.engine(5, &sink).run().await.unwrap();
    assert_eq!(second.pages_fetched, 1);
    assert_eq!(second.pages[0].title, "B");
    // The link back to /a is already visited
    assert_eq!(second.links_found, 1);
    assert_eq!(site.pending(), vec![site.url("/c")]);

    let visited_after_second = site.visited();
    assert!(visited_after_first
        .iter()
        .all(|url| visited_after_second.contains(url)));

    let third = site.engine(5, &sink).run().await.unwrap();
    assert_eq!(third.pages_fetched, 1);
    assert_eq!(third.visited_total, 3);
    assert!(site.pending().is_empty());
    assert_eq!(sink.count(), 3);
}

#[tokio::test]
async fn test_seeds_are_not_reapplied_while_work_remains() {
    let site = TestSite::start().await;
    site.mount_page("/a", page("A", &[site.url("/b")]), 1).await;
    site.mount_page("/b", page("B", &[]), 1).await;
    site.write_seeds(&[site.url("/a")]);

    let sink = RecordingSink::default();
    site.engine(1, &sink).run().await.unwrap();
    site.engine(1, &sink).run().await.unwrap();

    // The seed was used once; the second run worked the carried-over queue
    assert_eq!(site.visited(), vec![site.url("/a"), site.url("/b")]);
    assert!(site.pending().is_empty());
}

#[tokio::test]
async fn test_exhausted_frontier_reseeds_and_skips_visited() {
    let site = TestSite::start().await;
    site.mount_page("/a", page("A", &[]), 1).await;
    site.write_seeds(&[site.url("/a")]);

    let sink = RecordingSink::default();
    let first = site.engine(5, &sink).run().await.unwrap();
    assert_eq!(first.pages_fetched, 1);
    assert!(site.pending().is_empty());

    // Pending is empty again, so seeds bootstrap it; the seed is already visited
    let second = site.engine(5, &sink).run().await.unwrap();
    assert_eq!(second.pages_fetched, 0);
    assert_eq!(second.visited_total, 1);
    assert_eq!(site.visited(), vec![site.url("/a")]);
}

#[tokio::test]
async fn test_visited_file_is_sorted() {
    let site = TestSite::start().await;
    site.mount_page("/z", page("Z", &[]), 1).await;
    site.mount_page("/m", page("M", &[]), 1).await;
    site.mount_page("/a", page("A", &[]), 1).await;
    site.write_seeds(&[site.url("/z"), site.url("/m"), site.url("/a")]);

    let sink = RecordingSink::default();
    site.engine(5, &sink).run().await.unwrap();

    assert_eq!(
        site.visited(),
        vec![site.url("/a"), site.url("/m"), site.url("/z")]
    );
}
