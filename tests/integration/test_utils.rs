//! Shared fakes for integration tests
//!
//! A stub tool whose prompt is already a JSON record, and instrumented backends that
//! count in-flight calls, fail on a schedule, stall, or rate-limit.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use synthgen::{
    ArgSpec, BackendError, GenerationOptions, GeneratorTool, OutputFormat, TextBackend,
    ToolArgs, ValidationError,
};

/// Prompt is `{"id":"<unique id>"}`, so an echoing backend returns a valid record
pub struct EchoIdTool;

impl GeneratorTool for EchoIdTool {
    fn scenario_name(&self) -> &str {
        "echo_id"
    }

    fn artifact_prefix(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Emits its own identifier as a JSON record"
    }

    fn examples(&self) -> Vec<String> {
        vec!["synthgen generate echo_id --count 3".to_string()]
    }

    fn cli_arguments(&self) -> Vec<ArgSpec> {
        Vec::new()
    }

    fn validate_args(&mut self, _args: &ToolArgs) -> Result<(), ValidationError> {
        Ok(())
    }

    fn build_prompt(&self, _output_format: &OutputFormat, unique_id: &str) -> String {
        format!("{{\"id\":\"{}\"}}", unique_id)
    }

    fn supported_output_formats(&self) -> Vec<OutputFormat> {
        vec![OutputFormat::Json]
    }
}

/// Echoes prompts after a delay while tracking the in-flight high-water mark
pub struct InstrumentedBackend {
    delay: Duration,
    in_flight: AtomicUsize,
    high_water: AtomicUsize,
    calls: AtomicUsize,
    intervals: Mutex<Vec<(Instant, Instant)>>,
}

impl InstrumentedBackend {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            in_flight: AtomicUsize::new(0),
            high_water: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
            intervals: Mutex::new(Vec::new()),
        }
    }

    pub fn high_water(&self) -> usize {
        self.high_water.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Call intervals ordered by start time
    pub fn intervals(&self) -> Vec<(Instant, Instant)> {
        let mut intervals = self.intervals.lock().clone();
        intervals.sort_by_key(|(start, _)| *start);
        intervals
    }
}

#[async_trait]
impl TextBackend for InstrumentedBackend {
    async fn generate(
        &self,
        prompt: &str,
        _options: &GenerationOptions,
    ) -> Result<String, BackendError> {
        let start = Instant::now();
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.high_water.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.intervals.lock().push((start, Instant::now()));
        Ok(prompt.to_string())
    }

    fn name(&self) -> &str {
        "instrumented"
    }
}

/// Fails every `n`th call (1-based) with a permanent error, echoes otherwise
pub struct FailEveryNthBackend {
    n: usize,
    calls: AtomicUsize,
}

impl FailEveryNthBackend {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TextBackend for FailEveryNthBackend {
    async fn generate(
        &self,
        prompt: &str,
        _options: &GenerationOptions,
    ) -> Result<String, BackendError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::task::yield_now().await;
        if call % self.n == 0 {
            Err(BackendError::InvalidResponse(format!(
                "scheduled failure on call {}",
                call
            )))
        } else {
            Ok(prompt.to_string())
        }
    }

    fn name(&self) -> &str {
        "fail_every_nth"
    }
}

/// Stalls the first `stalled` calls for `stall`, answers the rest immediately
pub struct DelayedBackend {
    stalled: usize,
    stall: Duration,
    calls: AtomicUsize,
}

impl DelayedBackend {
    pub fn new(stalled: usize, stall: Duration) -> Self {
        Self {
            stalled,
            stall,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TextBackend for DelayedBackend {
    async fn generate(
        &self,
        prompt: &str,
        _options: &GenerationOptions,
    ) -> Result<String, BackendError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.stalled {
            tokio::time::sleep(self.stall).await;
        }
        Ok(prompt.to_string())
    }

    fn name(&self) -> &str {
        "delayed"
    }
}

/// Rate-limits the first `throttled` calls after `delay`, echoes the rest immediately
pub struct ThrottledBackend {
    throttled: usize,
    delay: Duration,
    calls: AtomicUsize,
}

impl ThrottledBackend {
    pub fn new(throttled: usize, delay: Duration) -> Self {
        Self {
            throttled,
            delay,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextBackend for ThrottledBackend {
    async fn generate(
        &self,
        prompt: &str,
        _options: &GenerationOptions,
    ) -> Result<String, BackendError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.throttled {
            tokio::time::sleep(self.delay).await;
            return Err(BackendError::RateLimited("429".to_string()));
        }
        Ok(prompt.to_string())
    }

    fn name(&self) -> &str {
        "throttled"
    }
}

/// Files in `dir` whose names start with `prefix_`, sorted
pub fn artifacts_with_prefix(dir: &Path, prefix: &str) -> Vec<PathBuf> {
    let wanted = format!("{}_", prefix);
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| {
                    path.file_name()
                        .and_then(|name| name.to_str())
                        .map(|name| name.starts_with(&wanted))
                        .unwrap_or(false)
                })
                .collect()
        })
        .unwrap_or_default();
    paths.sort();
    paths
}

/// Parse an artifact file as JSON, panicking with the path on failure
pub fn read_json(path: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e));
    serde_json::from_str(&text)
        .unwrap_or_else(|e| panic!("{} is not valid JSON: {}", path.display(), e))
}
