//! Integration tests for the compute pool and the caching facade.
//!
//! Exercises: request/reply round-trips, batch fan-out, per-request
//! failure isolation, terminate semantics, and the cache's
//! full-content-only store rule.

use diffweave::{DiffPool, DiffService, EngineConfig, ParseRequest, PoolError, ServiceConfig};

fn request(patch: &str, filename: &str) -> ParseRequest {
    ParseRequest {
        patch: patch.to_string(),
        filename: filename.to_string(),
        ..ParseRequest::default()
    }
}

fn line_count(diff: &diffweave::ParsedDiff) -> usize {
    diff.hunks
        .iter()
        .map(|section| match section {
            diffweave::DiffSection::Hunk(hunk) => hunk.lines.len(),
            diffweave::DiffSection::Skip(_) => 0,
        })
        .sum()
}

#[tokio::test]
async fn round_trip_through_a_worker() {
    let pool = DiffPool::new(2, EngineConfig::default());
    let diff = pool
        .parse_diff(request("@@ -1,2 +1,2 @@\n ctx\n-old\n+new\n", "demo.rs"))
        .await
        .unwrap();
    assert_eq!(diff.hunks.len(), 1);
    assert_eq!(line_count(&diff), 2);
    pool.terminate();
}

#[tokio::test]
async fn concurrent_replies_resolve_by_id() {
    let pool = DiffPool::new(4, EngineConfig::default());

    // Each patch inserts a distinct number of lines; the reply must match
    // the request it belongs to regardless of completion order.
    let tasks: Vec<_> = (1..=8u32)
        .map(|n| {
            let body: String = (0..n).map(|i| format!("+line {i}\n")).collect();
            let patch = format!("@@ -0,0 +1,{n} @@\n{body}");
            pool.parse_diff(request(&patch, "demo.rs"))
        })
        .collect();
    let diffs = futures::future::join_all(tasks).await;

    for (idx, diff) in diffs.iter().enumerate() {
        let diff = diff.as_ref().unwrap();
        assert_eq!(line_count(diff), idx + 1);
    }
    pool.terminate();
}

#[tokio::test]
async fn batch_awaits_every_request() {
    let pool = DiffPool::new(2, EngineConfig::default());
    let requests = vec![
        request("@@ -1,1 +1,1 @@\n-a\n+b\n", "one.rs"),
        request("@@ -1,1 +1,1 @@\n-c\n+d\n", "two.rs"),
        request("", "three.rs"),
    ];
    let diffs = pool.parse_diff_batch(requests).await.unwrap();
    assert_eq!(diffs.len(), 3);
    assert!(diffs[2].hunks.is_empty());
    pool.terminate();
}

#[tokio::test]
async fn one_bad_request_does_not_poison_the_others() {
    let pool = DiffPool::new(2, EngineConfig::default());

    let good = pool.parse_diff(request("@@ -1,1 +1,1 @@\n-a\n+b\n", "good.rs"));
    let bad = pool.parse_diff(request("+change line with no hunk header\n", "bad.rs"));
    let (good, bad) = tokio::join!(good, bad);

    assert!(good.is_ok());
    match bad {
        Err(PoolError::Request(message)) => {
            assert!(message.contains("malformed patch"), "unexpected error: {message}")
        }
        other => panic!("expected a request error, got {other:?}"),
    }

    // The pool stays usable afterwards.
    assert!(pool
        .parse_diff(request("@@ -1,1 +1,1 @@\n-x\n+y\n", "again.rs"))
        .await
        .is_ok());
    pool.terminate();
}

#[tokio::test]
async fn batch_fails_fast_on_a_bad_member() {
    let pool = DiffPool::new(2, EngineConfig::default());
    let requests = vec![
        request("@@ -1,1 +1,1 @@\n-a\n+b\n", "one.rs"),
        request("-orphan delete\n", "bad.rs"),
    ];
    assert!(matches!(
        pool.parse_diff_batch(requests).await,
        Err(PoolError::Request(_))
    ));
    pool.terminate();
}

#[tokio::test]
async fn highlight_lines_round_trip() {
    let pool = DiffPool::new(1, EngineConfig::default());
    let content = "fn a() {}\nfn b() {}\nfn c() {}\n".to_string();
    let lines = pool.highlight_lines(content, "demo.rs".to_string(), 2, 1).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].new_line_number, Some(2));
    assert_eq!(lines[0].content[0].value, "fn b() {}");
    pool.terminate();
}

#[tokio::test]
async fn terminated_pool_rejects_new_requests() {
    let pool = DiffPool::new(2, EngineConfig::default());
    pool.terminate();
    assert!(matches!(
        pool.parse_diff(request("@@ -1,1 +1,1 @@\n-a\n+b\n", "demo.rs")).await,
        Err(PoolError::PoolClosed)
    ));
}

#[tokio::test]
async fn service_caches_only_fully_specified_requests() {
    let service = DiffService::new(ServiceConfig {
        workers: 2,
        cache_capacity: 10,
        ..ServiceConfig::default()
    });

    // Without file contents: computed but not stored.
    let bare = request("@@ -1,1 +1,1 @@\n-a\n+b\n", "demo.rs");
    service.parse_diff(bare).await.unwrap();
    assert_eq!(service.cached_entries(), 0);

    // With both contents: stored, and the second call hits.
    let full = ParseRequest {
        old_content: Some("a\n".to_string()),
        new_content: Some("b\n".to_string()),
        ..request("@@ -1,1 +1,1 @@\n-a\n+b\n", "demo.rs")
    };
    let first = service.parse_diff(full.clone()).await.unwrap();
    assert_eq!(service.cached_entries(), 1);
    let second = service.parse_diff(full).await.unwrap();
    assert_eq!(service.cached_entries(), 1);
    assert_eq!(first, second);

    service.terminate();
}

#[tokio::test]
async fn cache_hits_survive_termination() {
    let service = DiffService::new(ServiceConfig {
        workers: 1,
        cache_capacity: 10,
        ..ServiceConfig::default()
    });
    let full = ParseRequest {
        old_content: Some("a\n".to_string()),
        new_content: Some("b\n".to_string()),
        ..request("@@ -1,1 +1,1 @@\n-a\n+b\n", "demo.rs")
    };
    let before = service.parse_diff(full.clone()).await.unwrap();

    service.terminate();

    // The cached entry still answers; a miss now fails.
    let hit = service.parse_diff(full).await.unwrap();
    assert_eq!(before, hit);
    assert!(matches!(
        service.parse_diff(request("@@ -1,1 +1,1 @@\n-x\n+y\n", "other.rs")).await,
        Err(PoolError::PoolClosed)
    ));
}
