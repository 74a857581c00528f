//! Concurrency bound and re-entrancy of the orchestrator

use crate::integration::test_utils::{
    artifacts_with_prefix, read_json, EchoIdTool, InstrumentedBackend,
};
use std::sync::Arc;
use std::time::Duration;
use synthgen::{Orchestrator, RunRequest};
use tempfile::TempDir;

fn orchestrator(backend: Arc<InstrumentedBackend>) -> Orchestrator {
    Orchestrator::new(Arc::new(EchoIdTool), backend)
}

#[tokio::test]
async fn test_in_flight_calls_never_exceed_concurrency() {
    let dir = TempDir::new().unwrap();
    let backend = Arc::new(InstrumentedBackend::new(Duration::from_millis(20)));
    let request = RunRequest::new(20, dir.path()).with_concurrency(4);

    let summary = orchestrator(backend.clone()).run(&request).await.unwrap();

    assert_eq!(summary.attempted(), 20);
    assert_eq!(summary.succeeded(), 20);
    assert_eq!(backend.calls(), 20);
    assert_eq!(backend.high_water(), 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_bound_holds_on_multi_thread_runtime() {
    let dir = TempDir::new().unwrap();
    let backend = Arc::new(InstrumentedBackend::new(Duration::from_millis(10)));
    let request = RunRequest::new(30, dir.path()).with_concurrency(3);

    let summary = orchestrator(backend.clone()).run(&request).await.unwrap();

    assert_eq!(summary.succeeded(), 30);
    assert!(backend.high_water() <= 3);
}

#[tokio::test]
async fn test_json_records_land_under_prefix() {
    let dir = TempDir::new().unwrap();
    let backend = Arc::new(InstrumentedBackend::new(Duration::from_millis(1)));
    let request = RunRequest::new(5, dir.path()).with_concurrency(2);

    let summary = orchestrator(backend).run(&request).await.unwrap();
    assert_eq!(summary.succeeded(), 5);
    assert!(summary.is_success());

    let files = artifacts_with_prefix(dir.path(), "echo");
    assert_eq!(files.len(), 5);
    for path in &files {
        let stem = path.file_stem().unwrap().to_str().unwrap();
        let record = read_json(path);
        assert_eq!(record["id"].as_str(), stem.strip_prefix("echo_"));
        assert_eq!(path.extension().unwrap(), "json");
    }

    let mut reported: Vec<_> = summary.artifact_paths().map(|p| p.to_path_buf()).collect();
    reported.sort();
    assert_eq!(reported, files);
}

#[tokio::test]
async fn test_concurrency_one_serializes_calls() {
    let dir = TempDir::new().unwrap();
    let backend = Arc::new(InstrumentedBackend::new(Duration::from_millis(5)));
    let request = RunRequest::new(4, dir.path()).with_concurrency(1);

    let summary = orchestrator(backend.clone()).run(&request).await.unwrap();
    assert_eq!(summary.succeeded(), 4);
    assert_eq!(backend.high_water(), 1);

    let intervals = backend.intervals();
    for pair in intervals.windows(2) {
        assert!(pair[0].1 <= pair[1].0, "calls overlapped: {:?}", pair);
    }
}

#[tokio::test]
async fn test_concurrency_above_count_runs_everything_at_once() {
    let dir = TempDir::new().unwrap();
    let backend = Arc::new(InstrumentedBackend::new(Duration::from_millis(20)));
    let request = RunRequest::new(3, dir.path()).with_concurrency(50);

    let summary = orchestrator(backend.clone()).run(&request).await.unwrap();
    assert_eq!(summary.succeeded(), 3);
    assert_eq!(backend.high_water(), 3);
}

#[tokio::test]
async fn test_same_orchestrator_runs_twice() {
    let dir = TempDir::new().unwrap();
    let backend = Arc::new(InstrumentedBackend::new(Duration::from_millis(1)));
    let orchestrator = orchestrator(backend.clone());
    let request = RunRequest::new(3, dir.path()).with_concurrency(2);

    let first = orchestrator.run(&request).await.unwrap();
    let second = orchestrator.run(&request).await.unwrap();

    assert_eq!(first.succeeded(), 3);
    assert_eq!(second.succeeded(), 3);
    assert_eq!(artifacts_with_prefix(dir.path(), "echo").len(), 6);
}

#[tokio::test]
async fn test_concurrent_runs_have_independent_bounds() {
    let first_dir = TempDir::new().unwrap();
    let second_dir = TempDir::new().unwrap();
    let backend = Arc::new(InstrumentedBackend::new(Duration::from_millis(20)));
    let orchestrator = orchestrator(backend.clone());

    let first_request = RunRequest::new(6, first_dir.path()).with_concurrency(2);
    let second_request = RunRequest::new(6, second_dir.path()).with_concurrency(2);
    let (first, second) = tokio::join!(
        orchestrator.run(&first_request),
        orchestrator.run(&second_request)
    );

    assert_eq!(first.unwrap().succeeded(), 6);
    assert_eq!(second.unwrap().succeeded(), 6);
    assert!(backend.high_water() <= 4);
    assert_eq!(artifacts_with_prefix(first_dir.path(), "echo").len(), 6);
    assert_eq!(artifacts_with_prefix(second_dir.path(), "echo").len(), 6);
}
