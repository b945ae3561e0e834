//! Pipeline runner behavior against in-memory mocks: skip semantics,
//! poll-loop termination, and fatal vs per-item failure handling.
//!
//! Tests that reach the poll loop run under paused tokio time so the
//! 2-second poll sleeps advance instantly.

use chrono::{TimeZone, Utc};

use commentlens_common::{PipelineError, Sentiment};
use commentlens_pipeline::testing::{comment, MockAnalyzer, MockScraper, MockStore, CANNED_REPLY};
use commentlens_pipeline::{FetchedComment, PipelineRunner, MAX_POLLS};

const POST_URL: &str = "https://instagram.com/p/ABC";

#[tokio::test(start_paused = true)]
async fn empty_text_items_are_never_inserted_or_counted() {
    // 3 fetched items, item 2 has empty text.
    let scraper = MockScraper::new().with_items(vec![
        comment("first"),
        FetchedComment {
            message: Some(String::new()),
            created_at: None,
        },
        comment("third"),
    ]);
    let analyzer = MockAnalyzer::happy();
    let store = MockStore::new();

    let runner = PipelineRunner::new(&scraper, &analyzer, &store);
    let outcome = runner.run(POST_URL, 2).await.unwrap();

    assert_eq!(outcome.total_fetched, 3);
    assert_eq!(outcome.processed_count, 2);
    let rows = store.rows();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| !r.content.is_empty()));
}

#[tokio::test(start_paused = true)]
async fn missing_message_field_is_skipped() {
    let scraper = MockScraper::new().with_items(vec![
        FetchedComment {
            message: None,
            created_at: None,
        },
        comment("real comment"),
    ]);
    let analyzer = MockAnalyzer::happy();
    let store = MockStore::new();

    let runner = PipelineRunner::new(&scraper, &analyzer, &store);
    let outcome = runner.run(POST_URL, 10).await.unwrap();

    assert_eq!(outcome.total_fetched, 2);
    assert_eq!(outcome.processed_count, 1);
    assert_eq!(store.rows().len(), 1);
    assert_eq!(analyzer.calls.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn analysis_and_analyzed_at_are_set_together() {
    let scraper = MockScraper::new().with_items(vec![
        comment("analyzed fine"),
        comment("unparseable"),
    ]);
    let analyzer = MockAnalyzer::happy().on_reply("unparseable", "sorry, here is prose");
    let store = MockStore::new();

    let runner = PipelineRunner::new(&scraper, &analyzer, &store);
    runner.run(POST_URL, 10).await.unwrap();

    for row in store.rows() {
        assert_eq!(
            row.analysis.is_some(),
            row.analyzed_at.is_some(),
            "analysis and analyzed_at must be set together for {}",
            row.content
        );
    }
}

#[tokio::test(start_paused = true)]
async fn poll_cap_reached_while_running_fails_with_zero_processed() {
    let scraper = MockScraper::new()
        .with_statuses(&["RUNNING"])
        .with_items(vec![comment("never reached")]);
    let analyzer = MockAnalyzer::happy();
    let store = MockStore::new();

    let runner = PipelineRunner::new(&scraper, &analyzer, &store);
    let err = runner.run(POST_URL, 10).await.unwrap_err();

    match err {
        PipelineError::ScrapeNotSucceeded(status) => assert_eq!(status, "RUNNING"),
        other => panic!("expected ScrapeNotSucceeded, got {other:?}"),
    }
    assert_eq!(scraper.poll_count(), MAX_POLLS);
    assert!(store.rows().is_empty());
    assert!(analyzer.calls.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn terminal_failure_status_aborts_the_run() {
    let scraper = MockScraper::new().with_statuses(&["RUNNING", "RUNNING", "FAILED"]);
    let analyzer = MockAnalyzer::happy();
    let store = MockStore::new();

    let runner = PipelineRunner::new(&scraper, &analyzer, &store);
    let err = runner.run(POST_URL, 10).await.unwrap_err();

    match err {
        PipelineError::ScrapeNotSucceeded(status) => assert_eq!(status, "FAILED"),
        other => panic!("expected ScrapeNotSucceeded, got {other:?}"),
    }
    assert_eq!(scraper.poll_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn launch_failure_is_fatal_and_inserts_nothing() {
    let scraper = MockScraper::new()
        .failing_launch("actor not found")
        .with_items(vec![comment("never reached")]);
    let analyzer = MockAnalyzer::happy();
    let store = MockStore::new();

    let runner = PipelineRunner::new(&scraper, &analyzer, &store);
    let err = runner.run(POST_URL, 10).await.unwrap_err();

    match err {
        PipelineError::LaunchFailed(msg) => assert!(msg.contains("actor not found")),
        other => panic!("expected LaunchFailed, got {other:?}"),
    }
    assert!(store.rows().is_empty());
    assert_eq!(scraper.poll_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn invalid_completion_json_keeps_raw_row_without_analysis() {
    let scraper = MockScraper::new().with_items(vec![comment("weird one")]);
    let analyzer = MockAnalyzer::happy().on_reply("weird one", "```json not really```");
    let store = MockStore::new();

    let runner = PipelineRunner::new(&scraper, &analyzer, &store);
    let outcome = runner.run(POST_URL, 10).await.unwrap();

    assert_eq!(outcome.processed_count, 0);
    let rows = store.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].content, "weird one");
    assert!(rows[0].analysis.is_none());
    assert!(rows[0].analyzed_at.is_none());
}

#[tokio::test(start_paused = true)]
async fn completion_network_error_excludes_item_but_keeps_row() {
    // Completion call for item 1 throws a network error.
    let scraper = MockScraper::new().with_items(vec![comment("first"), comment("second")]);
    let analyzer = MockAnalyzer::happy().failing("first");
    let store = MockStore::new();

    let runner = PipelineRunner::new(&scraper, &analyzer, &store);
    let outcome = runner.run(POST_URL, 10).await.unwrap();

    assert_eq!(outcome.processed_count, 1);
    let rows = store.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].content, "first");
    assert!(rows[0].analysis.is_none());
    assert!(rows[1].analysis.is_some());
}

#[tokio::test(start_paused = true)]
async fn insert_failure_skips_item_without_calling_analyzer() {
    let scraper = MockScraper::new().with_items(vec![comment("bad row"), comment("good row")]);
    let analyzer = MockAnalyzer::happy();
    let store = MockStore::new().failing_insert_for("bad row");

    let runner = PipelineRunner::new(&scraper, &analyzer, &store);
    let outcome = runner.run(POST_URL, 10).await.unwrap();

    assert_eq!(outcome.processed_count, 1);
    assert_eq!(store.rows().len(), 1);
    assert_eq!(*analyzer.calls.lock().unwrap(), vec!["good row".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn update_failure_leaves_row_unanalyzed_and_uncounted() {
    let scraper = MockScraper::new().with_items(vec![comment("stuck")]);
    let analyzer = MockAnalyzer::happy();
    let store = MockStore::new().failing_update_for("stuck");

    let runner = PipelineRunner::new(&scraper, &analyzer, &store);
    let outcome = runner.run(POST_URL, 10).await.unwrap();

    assert_eq!(outcome.processed_count, 0);
    let rows = store.rows();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].analysis.is_none());
    assert!(rows[0].analyzed_at.is_none());
}

#[tokio::test(start_paused = true)]
async fn rows_carry_source_and_item_timestamp() {
    let ts = Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 0).unwrap();
    let scraper = MockScraper::new().with_items(vec![
        FetchedComment {
            message: Some("timestamped".to_string()),
            created_at: Some(ts),
        },
        comment("untimestamped"),
    ]);
    let analyzer = MockAnalyzer::happy();
    let store = MockStore::new();

    let runner = PipelineRunner::new(&scraper, &analyzer, &store);
    runner.run(POST_URL, 10).await.unwrap();

    let rows = store.rows();
    assert_eq!(rows[0].source, POST_URL);
    assert_eq!(rows[0].created_at, ts);
    // Missing item timestamp falls back to insertion time.
    assert!(rows[1].created_at > ts);
}

#[tokio::test(start_paused = true)]
async fn successful_analysis_is_persisted_as_parsed() {
    let scraper = MockScraper::new().with_items(vec![comment("love it")]);
    let analyzer = MockAnalyzer::happy().on_reply("love it", CANNED_REPLY);
    let store = MockStore::new();

    let runner = PipelineRunner::new(&scraper, &analyzer, &store);
    let outcome = runner.run(POST_URL, 10).await.unwrap();

    assert_eq!(outcome.processed_count, 1);
    let rows = store.rows();
    let analysis = rows[0].analysis.as_ref().unwrap();
    assert_eq!(analysis.sentiment, Sentiment::Positive);
    assert_eq!(analysis.category, "praise");
}

#[tokio::test(start_paused = true)]
async fn rerunning_inserts_new_rows_rather_than_updating() {
    let scraper = MockScraper::new().with_items(vec![comment("same comment")]);
    let analyzer = MockAnalyzer::happy();
    let store = MockStore::new();

    let runner = PipelineRunner::new(&scraper, &analyzer, &store);
    runner.run(POST_URL, 10).await.unwrap();
    runner.run(POST_URL, 10).await.unwrap();

    let rows = store.rows();
    assert_eq!(rows.len(), 2);
    assert_ne!(rows[0].id, rows[1].id);
    assert_eq!(rows[0].content, rows[1].content);
}

#[tokio::test]
async fn empty_post_url_is_rejected_before_any_call() {
    let scraper = MockScraper::new();
    let analyzer = MockAnalyzer::happy();
    let store = MockStore::new();

    let runner = PipelineRunner::new(&scraper, &analyzer, &store);
    let err = runner.run("", 10).await.unwrap_err();

    assert!(matches!(err, PipelineError::Validation(_)));
    assert!(scraper.launches.lock().unwrap().is_empty());
}

#[tokio::test]
async fn zero_max_items_is_rejected_before_any_call() {
    let scraper = MockScraper::new();
    let analyzer = MockAnalyzer::happy();
    let store = MockStore::new();

    let runner = PipelineRunner::new(&scraper, &analyzer, &store);
    let err = runner.run(POST_URL, 0).await.unwrap_err();

    assert!(matches!(err, PipelineError::Validation(_)));
    assert!(scraper.launches.lock().unwrap().is_empty());
}
