//! One task's failure or stall never affects its siblings

use crate::integration::test_utils::{
    artifacts_with_prefix, read_json, DelayedBackend, EchoIdTool, FailEveryNthBackend,
    ThrottledBackend,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use synthgen::{Orchestrator, Outcome, RetryPolicy, RunRequest};
use tempfile::TempDir;

#[tokio::test]
async fn test_scheduled_failures_are_counted_and_leave_no_files() {
    let dir = TempDir::new().unwrap();
    let orchestrator = Orchestrator::new(
        Arc::new(EchoIdTool),
        Arc::new(FailEveryNthBackend::new(3)),
    );
    let request = RunRequest::new(9, dir.path()).with_concurrency(3);

    let summary = orchestrator.run(&request).await.unwrap();

    assert_eq!(summary.attempted(), 9);
    assert_eq!(summary.succeeded(), 6);
    assert_eq!(summary.failed(), 3);
    assert!(summary
        .failures()
        .iter()
        .all(|report| matches!(report.outcome, Outcome::BackendFailed { .. })));

    let indices: Vec<usize> = summary.failures().iter().map(|r| r.index).collect();
    let mut sorted = indices.clone();
    sorted.sort();
    assert_eq!(indices, sorted);

    let files = artifacts_with_prefix(dir.path(), "echo");
    assert_eq!(files.len(), 6);
    for path in &files {
        assert!(read_json(path)["id"].is_string());
    }
}

#[tokio::test]
async fn test_stalled_task_times_out_while_siblings_finish() {
    let dir = TempDir::new().unwrap();
    let timeout = Duration::from_millis(200);
    let orchestrator = Orchestrator::new(
        Arc::new(EchoIdTool),
        Arc::new(DelayedBackend::new(1, Duration::from_secs(30))),
    );
    let request = RunRequest::new(5, dir.path())
        .with_concurrency(5)
        .with_timeout(Some(timeout));

    let started = Instant::now();
    let summary = orchestrator.run(&request).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(summary.succeeded(), 4);
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.failures()[0].outcome, Outcome::TimedOut);
    assert_eq!(summary.failures()[0].attempts, 1);
    assert!(
        elapsed < timeout + Duration::from_secs(2),
        "run took {:?}",
        elapsed
    );
    assert_eq!(artifacts_with_prefix(dir.path(), "echo").len(), 4);
}

#[tokio::test]
async fn test_timed_out_task_releases_its_only_slot() {
    let dir = TempDir::new().unwrap();
    let timeout = Duration::from_millis(200);
    let orchestrator = Orchestrator::new(
        Arc::new(EchoIdTool),
        Arc::new(DelayedBackend::new(1, Duration::from_secs(30))),
    );
    let request = RunRequest::new(3, dir.path())
        .with_concurrency(1)
        .with_timeout(Some(timeout));

    let started = Instant::now();
    let summary = orchestrator.run(&request).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(summary.succeeded(), 2);
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.failures()[0].outcome, Outcome::TimedOut);
    assert!(
        elapsed < timeout + Duration::from_secs(1),
        "queued tasks waited {:?}",
        elapsed
    );
    assert_eq!(artifacts_with_prefix(dir.path(), "echo").len(), 2);
}

#[tokio::test]
async fn test_retrying_task_gives_up_its_slot_at_the_timeout() {
    let dir = TempDir::new().unwrap();
    let timeout = Duration::from_millis(200);
    let backend = Arc::new(ThrottledBackend::new(usize::MAX, Duration::from_millis(150)));
    let orchestrator = Orchestrator::new(Arc::new(EchoIdTool), backend.clone());
    let request = RunRequest::new(2, dir.path())
        .with_concurrency(1)
        .with_timeout(Some(timeout))
        .with_retry(RetryPolicy::new(4, Duration::from_millis(100)));

    let started = Instant::now();
    let summary = orchestrator.run(&request).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(summary.failed(), 2);
    assert!(summary
        .failures()
        .iter()
        .all(|report| report.outcome == Outcome::TimedOut));
    assert_eq!(backend.calls(), 2);
    assert!(
        elapsed < 2 * timeout + Duration::from_secs(1),
        "run took {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_no_timeout_waits_for_slow_calls() {
    let dir = TempDir::new().unwrap();
    let orchestrator = Orchestrator::new(
        Arc::new(EchoIdTool),
        Arc::new(DelayedBackend::new(2, Duration::from_millis(50))),
    );
    let request = RunRequest::new(3, dir.path()).with_timeout(None);

    let summary = orchestrator.run(&request).await.unwrap();
    assert_eq!(summary.succeeded(), 3);
}

#[tokio::test]
async fn test_unwritable_output_fails_every_task_without_aborting() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();
    let orchestrator = Orchestrator::new(
        Arc::new(EchoIdTool),
        Arc::new(DelayedBackend::new(0, Duration::ZERO)),
    );

    let summary = orchestrator
        .run(&RunRequest::new(4, &blocker).with_concurrency(2))
        .await
        .unwrap();

    assert_eq!(summary.attempted(), 4);
    assert_eq!(summary.failed(), 4);
    assert!(summary
        .failures()
        .iter()
        .all(|report| matches!(report.outcome, Outcome::PersistFailed { .. })));
}
